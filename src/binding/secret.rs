//! Binding credentials
//!
//! A binding materialises as a Kubernetes secret named after the binding.
//! Only the key names are consumed; values never leave this module.

use crate::config::ClusterScope;
use crate::errors::{KubedevError, Result};
use crate::invoker::{CliCommand, CliInvoker};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// The subset of a `kubectl get secret -o json` document we read
#[derive(Debug, Deserialize)]
struct SecretDocument {
    data: IndexMap<String, JsonValue>,
}

/// Key names of a binding secret, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretKeySet(Vec<String>);

impl SecretKeySet {
    pub fn new(keys: Vec<String>) -> Self {
        Self(keys)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a SecretKeySet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

pub fn secret_command(secret_name: &str, scope: &ClusterScope) -> CliCommand {
    CliCommand::kubectl(["get", "secret", secret_name, "-o", "json"]).scoped(scope)
}

/// Decode the key names from a secret document
pub fn parse_secret_keys(json: &str) -> std::result::Result<SecretKeySet, serde_json::Error> {
    let document: SecretDocument = serde_json::from_str(json)?;
    Ok(SecretKeySet(document.data.into_keys().collect()))
}

/// Fetch the secret generated for `secret_name` and return its key names
pub async fn fetch_secret_keys(
    invoker: &dyn CliInvoker,
    scope: &ClusterScope,
    secret_name: &str,
) -> Result<SecretKeySet> {
    let command = secret_command(secret_name, scope);
    let stdout = invoker.invoke(&command).await?.into_stdout(&command)?;
    parse_secret_keys(&stdout).map_err(|e| KubedevError::decode(command.to_string(), e.to_string()))
}
