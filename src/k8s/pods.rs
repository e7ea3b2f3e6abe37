//! Pod discovery

use crate::config::ClusterScope;
use crate::errors::{KubedevError, Result};
use crate::invoker::{CliCommand, CliInvoker};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PodList {
    #[serde(default)]
    items: Vec<PodItem>,
}

#[derive(Debug, Deserialize)]
struct PodItem {
    metadata: PodMetadata,
}

#[derive(Debug, Deserialize)]
struct PodMetadata {
    name: String,
    #[serde(default)]
    namespace: Option<String>,
}

/// A pod the operator may forward to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodCandidate {
    pub name: String,
    pub namespace: Option<String>,
    /// Taken from the open document rather than listed from the cluster
    pub from_document: bool,
}

pub fn list_pods_command(scope: &ClusterScope) -> CliCommand {
    CliCommand::kubectl(["get", "pods", "-o", "json"]).scoped(scope)
}

pub fn parse_pod_list(json: &str) -> std::result::Result<Vec<PodCandidate>, serde_json::Error> {
    let list: PodList = serde_json::from_str(json)?;
    Ok(list
        .items
        .into_iter()
        .map(|item| PodCandidate {
            name: item.metadata.name,
            namespace: item.metadata.namespace,
            from_document: false,
        })
        .collect())
}

/// All pods in the current context
pub async fn list_pods(invoker: &dyn CliInvoker, scope: &ClusterScope) -> Result<Vec<PodCandidate>> {
    let command = list_pods_command(scope);
    let stdout = invoker.invoke(&command).await?.into_stdout(&command)?;
    parse_pod_list(&stdout).map_err(|e| KubedevError::decode(command.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pod_list() {
        let json = r#"{
            "apiVersion": "v1",
            "kind": "List",
            "items": [
                {"metadata": {"name": "web-0", "namespace": "shop"}, "status": {"phase": "Running"}},
                {"metadata": {"name": "worker-1"}}
            ]
        }"#;
        let pods = parse_pod_list(json).unwrap();
        assert_eq!(pods.len(), 2);
        assert_eq!(pods[0].name, "web-0");
        assert_eq!(pods[0].namespace.as_deref(), Some("shop"));
        assert_eq!(pods[1].namespace, None);
        assert!(pods.iter().all(|p| !p.from_document));
    }

    #[test]
    fn test_empty_list() {
        assert!(parse_pod_list(r#"{"kind": "List", "items": []}"#).unwrap().is_empty());
        assert!(parse_pod_list(r#"{"kind": "List"}"#).unwrap().is_empty());
    }

    #[test]
    fn test_item_without_name_is_an_error() {
        assert!(parse_pod_list(r#"{"items": [{"metadata": {}}]}"#).is_err());
    }
}
