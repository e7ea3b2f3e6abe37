//! Usage summary copied to the clipboard after binding

use super::SecretKeySet;

/// First line of the clipboard payload
pub const USAGE_HEADER: &str =
    "// To use the bound service, read the following environment variables in your application:";

/// Environment variable exposing `key` of `binding_id`
pub fn env_var_name(binding_id: &str, key: &str) -> String {
    format!("{}_{}", binding_id, key).to_uppercase()
}

/// Header followed by one `// NAME` comment line per key
pub fn usage_summary(binding_id: &str, keys: &SecretKeySet) -> String {
    let mut lines = Vec::with_capacity(keys.len() + 1);
    lines.push(USAGE_HEADER.to_string());
    for key in keys {
        lines.push(format!("// {}", env_var_name(binding_id, key)));
    }
    lines.join("\n")
}
