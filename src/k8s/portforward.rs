//! Port-forward resolution
//!
//! Works out which pod to forward to and on which ports, then hands
//! `kubectl port-forward` to an attached terminal session:
//!
//! - an explicit pod skips discovery;
//! - otherwise an open document naming a pod is used as-is;
//! - otherwise every pod in the current context is offered for selection.
//!
//! The tunnel runs on its own. The returned [`PortForward`] carries the session
//! handle, but nothing here waits on it or learns whether kubectl succeeded.

use super::parser::find_kind_name;
use super::pods::{list_pods, PodCandidate};
use super::ports::{find_free_port, validate_port};
use crate::config::ClusterScope;
use crate::context::Session;
use crate::errors::{KubedevError, Result};
use crate::host::Operator;
use crate::invoker::{AttachedSession, CliCommand};
use std::path::PathBuf;
use tracing::{debug, error, info};

/// What the caller already knows
#[derive(Debug, Clone, Default)]
pub struct PortForwardRequest {
    /// Pod chosen elsewhere (for example on the command line)
    pub pod: Option<String>,
    /// Document to look for a `pods/<name>` reference in
    pub document: Option<PathBuf>,
    pub local_port: Option<u16>,
    pub remote_port: Option<u16>,
}

/// Fully resolved forward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortForwardTarget {
    pub pod: String,
    pub namespace: Option<String>,
    pub local_port: u16,
    pub remote_port: u16,
}

impl PortForwardTarget {
    pub fn port_mapping(&self) -> String {
        format!("{}:{}", self.local_port, self.remote_port)
    }

    pub fn local_url(&self) -> String {
        format!("http://localhost:{}", self.local_port)
    }

    /// `kubectl port-forward` for this target; the pod's namespace wins over the scope's
    pub fn command(&self, scope: &ClusterScope) -> CliCommand {
        let scope = ClusterScope {
            namespace: self.namespace.clone().or_else(|| scope.namespace.clone()),
            context: scope.context.clone(),
        };
        CliCommand::kubectl(["port-forward".to_string(), self.pod.clone(), self.port_mapping()])
            .scoped(&scope)
    }
}

/// A started forward
#[derive(Debug)]
pub struct PortForward {
    pub target: PortForwardTarget,
    pub session: AttachedSession,
}

/// How a port-forward request ended
#[derive(Debug)]
pub enum PortForwardOutcome {
    Started(PortForward),
    /// The operator dismissed a prompt
    Cancelled,
    /// Resolution failed; the message has already been shown to the operator
    Failed(KubedevError),
}

/// Resolve `request` and start the forward, reporting failures to the operator
pub async fn port_forward(session: &Session, request: PortForwardRequest) -> PortForwardOutcome {
    let started = match resolve_target(session, &request).await {
        Ok(Some(target)) => start(session, target),
        Ok(None) => {
            info!("port-forward cancelled");
            return PortForwardOutcome::Cancelled;
        }
        Err(e) => Err(e),
    };

    match started {
        Ok(forward) => {
            session.operator.info(&format!(
                "Forwarding {} to pod {} port {}",
                forward.target.local_url(),
                forward.target.pod,
                forward.target.remote_port
            ));
            PortForwardOutcome::Started(forward)
        }
        Err(e) => {
            error!(error = %e, "port-forward failed");
            session.operator.error(&e.to_string());
            PortForwardOutcome::Failed(e)
        }
    }
}

fn start(session: &Session, target: PortForwardTarget) -> Result<PortForward> {
    let command = target.command(session.scope());
    let attached = session.invoker.spawn_attached(&command)?;
    info!(pod = %target.pod, ports = %target.port_mapping(), "port-forward started");
    Ok(PortForward {
        target,
        session: attached,
    })
}

/// Pod and ports for `request`; `None` when the operator cancels
pub async fn resolve_target(
    session: &Session,
    request: &PortForwardRequest,
) -> Result<Option<PortForwardTarget>> {
    let operator = session.operator.as_ref();

    let pod = match &request.pod {
        Some(name) => PodCandidate {
            name: name.clone(),
            namespace: None,
            from_document: false,
        },
        None => {
            let candidates = discover_pods(session, request.document.as_ref()).await?;
            match choose_pod(operator, candidates)? {
                Some(pod) => pod,
                None => return Ok(None),
            }
        }
    };
    debug!(pod = %pod.name, from_document = pod.from_document, "pod resolved");

    let remote_port = match request.remote_port {
        Some(port) => port,
        None => match prompt_remote_port(operator)? {
            Some(port) => port,
            None => return Ok(None),
        },
    };

    let local_port = match request.local_port {
        Some(port) => port,
        None => find_free_port(session.config.port_search_start)?,
    };

    Ok(Some(PortForwardTarget {
        pod: pod.name,
        namespace: pod.namespace,
        local_port,
        remote_port,
    }))
}

/// The pod named by the open document, or every pod in the current context
async fn discover_pods(session: &Session, document: Option<&PathBuf>) -> Result<Vec<PodCandidate>> {
    if let Some(path) = document {
        let text = std::fs::read_to_string(path).map_err(|e| {
            KubedevError::Manifest(format!("cannot read {}: {}", path.display(), e))
        })?;
        match find_kind_name(&text) {
            Some(reference) if reference.is_pod() => {
                debug!(reference = %reference, "pod taken from document");
                return Ok(vec![PodCandidate {
                    name: reference.name,
                    namespace: reference.namespace,
                    from_document: true,
                }]);
            }
            Some(reference) => {
                debug!(reference = %reference, "document does not name a pod, listing pods");
            }
            None => debug!(path = %path.display(), "no resource reference in document"),
        }
    }

    list_pods(session.invoker.as_ref(), session.scope()).await
}

/// Skip the prompt only for a single pod taken from the open document
fn choose_pod(operator: &dyn Operator, mut candidates: Vec<PodCandidate>) -> Result<Option<PodCandidate>> {
    if candidates.len() == 1 && candidates[0].from_document {
        return Ok(candidates.pop());
    }
    if candidates.is_empty() {
        return Err(KubedevError::Argument(
            "no pods found in the current context".to_string(),
        ));
    }

    let names: Vec<String> = candidates.iter().map(|p| p.name.clone()).collect();
    let Some(choice) = operator.select("Select the pod to forward to", &names)? else {
        return Ok(None);
    };
    Ok(candidates.into_iter().find(|p| p.name == choice))
}

fn prompt_remote_port(operator: &dyn Operator) -> Result<Option<u16>> {
    let validate = |input: &str| validate_port(input).map(|_| ());
    let Some(answer) = operator.input("Port on the pod to forward to", &validate)? else {
        return Ok(None);
    };
    // Operators may hand back text their prompt never validated
    validate_port(&answer)
        .map(Some)
        .map_err(KubedevError::Argument)
}
