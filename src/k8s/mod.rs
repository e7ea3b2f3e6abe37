//! Kubernetes helpers for forwarding a local port to a pod
//!
//! - [`parser`] finds the resource an open document refers to
//! - [`pods`] lists pods through kubectl
//! - [`ports`] validates operator-supplied ports and finds free local ones
//! - [`portforward`] resolves a forward and starts `kubectl port-forward`

pub mod parser;
pub mod pods;
pub mod portforward;
pub mod ports;

pub use parser::{find_kind_name, plural_kind, KindName};
pub use pods::{list_pods, PodCandidate};
pub use portforward::{
    port_forward, resolve_target, PortForward, PortForwardOutcome, PortForwardRequest,
    PortForwardTarget,
};
pub use ports::{find_free_port, validate_port, PORT_RANGE_MESSAGE};
