//! Service catalog
//!
//! Service instances are the provisioned external dependencies (databases,
//! queues, ...) tracked by the cluster's service catalog. They are listed once
//! per session through `svcat get instances` and kept in a
//! [`ServiceInstanceCache`].

pub mod cache;
pub mod parser;

pub use cache::ServiceInstanceCache;
pub use parser::parse_instance_table;

use serde::Serialize;

/// One provisioned service known to the cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInstance {
    pub name: String,
    pub namespace: String,
    pub class: String,
    pub plan: String,
    pub status: String,
}
