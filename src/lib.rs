//! kubedev library interface
//!
//! Developer helpers for a Kubernetes cluster with the service catalog
//! installed, driven through the `kubectl` and `svcat` command-line tools.
//!
//! # Module Organization
//!
//! - [`catalog`] - Service instance listing and its per-session cache
//! - [`binding`] - Bind a service instance and record it in a Helm chart
//! - [`k8s`] - Pod discovery and port forwarding
//! - [`invoker`] - Running kubectl and svcat (CliInvoker, ProcessInvoker)
//! - [`host`] - Prompts, notifications and the clipboard
//! - [`errors`] - Error types (KubedevError, Result)
//! - [`status`] - Exit status codes (ExitStatus)
//! - [`core`] - Main execution logic

pub mod binding;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod host;
pub mod invoker;
pub mod k8s;
pub mod signals;
pub mod status;
pub mod table;
