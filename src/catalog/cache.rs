//! Session-scoped service instance cache

use super::{parse_instance_table, ServiceInstance};
use crate::config::ClusterScope;
use crate::errors::Result;
use crate::invoker::{CliCommand, CliInvoker};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct CatalogState {
    /// Instance names in listing order
    names: Vec<String>,
    by_name: HashMap<String, ServiceInstance>,
    /// Parallel to `names`
    instances: Vec<ServiceInstance>,
}

impl CatalogState {
    fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn insert_batch(&mut self, batch: Vec<ServiceInstance>) {
        for instance in batch {
            if self.by_name.contains_key(&instance.name) {
                warn!(name = %instance.name, "duplicate service instance in listing, keeping the first");
                continue;
            }
            self.names.push(instance.name.clone());
            self.by_name.insert(instance.name.clone(), instance.clone());
            self.instances.push(instance);
        }
    }
}

/// Known service instances, listed lazily on first use.
///
/// The listing is fetched at most once at a time: concurrent callers queue on
/// the same lock and find the cache filled when they get it. A failed listing
/// leaves the cache empty so the next call tries again. There is no refresh;
/// a populated cache is authoritative for its lifetime.
#[derive(Debug)]
pub struct ServiceInstanceCache {
    scope: ClusterScope,
    state: Mutex<CatalogState>,
}

impl ServiceInstanceCache {
    pub fn new(scope: ClusterScope) -> Self {
        Self {
            scope,
            state: Mutex::new(CatalogState::default()),
        }
    }

    /// The command used to list instances
    pub fn list_command(&self) -> CliCommand {
        CliCommand::svcat(["get", "instances"]).scoped(&self.scope)
    }

    /// Cached instances, listing them through `invoker` when the cache is empty
    pub async fn get_service_instances(
        &self,
        invoker: &dyn CliInvoker,
    ) -> Result<Vec<ServiceInstance>> {
        let mut state = self.state.lock().await;
        if !state.is_empty() {
            debug!(count = state.instances.len(), "service instance cache hit");
            return Ok(state.instances.clone());
        }

        let command = self.list_command();
        let stdout = invoker.invoke(&command).await?.into_stdout(&command)?;
        let batch = parse_instance_table(&stdout);

        state.insert_batch(batch);
        info!(count = state.instances.len(), "service instance cache populated");
        Ok(state.instances.clone())
    }

    /// Instance names in listing order
    pub async fn names(&self) -> Vec<String> {
        self.state.lock().await.names.clone()
    }

    pub async fn get(&self, name: &str) -> Option<ServiceInstance> {
        self.state.lock().await.by_name.get(name).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.instances.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.is_empty()
    }

    /// Sizes of the name list, the lookup map and the record list
    pub async fn view_sizes(&self) -> (usize, usize, usize) {
        let state = self.state.lock().await;
        (state.names.len(), state.by_name.len(), state.instances.len())
    }
}
