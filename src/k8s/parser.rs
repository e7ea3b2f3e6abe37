//! `kind/name` references in manifest documents
//!
//! A document refers to a resource either as a manifest (YAML or JSON with
//! `kind` and `metadata.name`) or as a bare reference such as `pod/web-0`.
//! Kinds are normalised to kubectl's lowercase plural resource names.

use serde::Deserialize;
use serde_yaml::Value;
use std::fmt;

/// Resource reference with a plural, lowercase kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindName {
    pub kind: String,
    pub name: String,
    pub namespace: Option<String>,
}

impl KindName {
    pub fn is_pod(&self) -> bool {
        self.kind == "pods"
    }
}

impl fmt::Display for KindName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// kubectl resource name for a manifest kind or shorthand
pub fn plural_kind(kind: &str) -> String {
    let lower = kind.to_ascii_lowercase();
    match lower.as_str() {
        "po" => "pods".to_string(),
        "svc" => "services".to_string(),
        "deploy" => "deployments".to_string(),
        "endpoints" => lower,
        k if k.ends_with("policy") => format!("{}ies", &k[..k.len() - 1]),
        // Ingress, StorageClass: singular despite the trailing "s"
        k if k.ends_with("ss") => format!("{}es", lower),
        k if k.ends_with('s') => lower,
        _ => format!("{}s", lower),
    }
}

/// Find the resource a document refers to.
///
/// Multi-document YAML yields the first document carrying both a kind and a
/// name.
pub fn find_kind_name(text: &str) -> Option<KindName> {
    find_in_manifest(text).or_else(|| parse_bare_reference(text))
}

fn find_in_manifest(text: &str) -> Option<KindName> {
    for document in serde_yaml::Deserializer::from_str(text) {
        let Ok(value) = Value::deserialize(document) else {
            return None;
        };
        let kind = value.get("kind").and_then(Value::as_str);
        let metadata = value.get("metadata");
        let name = metadata.and_then(|m| m.get("name")).and_then(Value::as_str);
        if let (Some(kind), Some(name)) = (kind, name) {
            return Some(KindName {
                kind: plural_kind(kind),
                name: name.to_string(),
                namespace: metadata
                    .and_then(|m| m.get("namespace"))
                    .and_then(Value::as_str)
                    .map(String::from),
            });
        }
    }
    None
}

fn parse_bare_reference(text: &str) -> Option<KindName> {
    let (kind, name) = text.trim().split_once('/')?;
    let valid_kind = !kind.is_empty() && kind.chars().all(|c| c.is_ascii_alphabetic() || c == '.');
    let valid_name = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
    if !(valid_kind && valid_name) {
        return None;
    }
    Some(KindName {
        kind: plural_kind(kind),
        name: name.to_string(),
        namespace: None,
    })
}
