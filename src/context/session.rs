//! Per-run session: collaborators plus the state they share

use crate::catalog::ServiceInstanceCache;
use crate::config::{ClusterScope, Config};
use crate::host::{Clipboard, Operator};
use crate::invoker::CliInvoker;
use std::sync::Arc;

/// Everything a command handler needs.
///
/// The service instance cache lives here, so its lifetime is the session's:
/// one listing per run of the binary, and a fresh cache per test.
pub struct Session {
    pub config: Config,
    pub invoker: Arc<dyn CliInvoker>,
    pub operator: Arc<dyn Operator>,
    pub clipboard: Arc<dyn Clipboard>,
    pub catalog: ServiceInstanceCache,
}

impl Session {
    pub fn new(
        config: Config,
        invoker: Arc<dyn CliInvoker>,
        operator: Arc<dyn Operator>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        let catalog = ServiceInstanceCache::new(config.scope.clone());
        Self {
            config,
            invoker,
            operator,
            clipboard,
            catalog,
        }
    }

    pub fn scope(&self) -> &ClusterScope {
        &self.config.scope
    }
}
