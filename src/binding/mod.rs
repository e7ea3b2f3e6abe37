//! Service binding workflow
//!
//! Binding a service instance to an application:
//!
//! 1. make sure the service catalog is listed
//! 2. let the operator pick an instance
//! 3. `svcat bind <instance>` (the binding is named after the instance)
//! 4. read the key names of the secret the binding generated
//! 5. let the operator pick the Helm chart of the application
//! 6. record the keys under `serviceCatalogEnv` in the chart's `values.yaml`
//! 7. copy a summary of the resulting environment variables to the clipboard
//!
//! Any failing step is reported to the operator and ends the run. A binding
//! created in step 3 stays on the cluster even if a later step fails.

pub mod chart;
pub mod secret;
pub mod usage;
pub mod values;

pub use chart::{discover_charts, pick_chart};
pub use secret::{fetch_secret_keys, parse_secret_keys, SecretKeySet};
pub use usage::{env_var_name, usage_summary, USAGE_HEADER};
pub use values::{ChartValues, ServiceCatalogEnv};

use crate::config::ClusterScope;
use crate::context::Session;
use crate::errors::{KubedevError, Result};
use crate::invoker::{CliCommand, CliInvoker};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// A binding created on the cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Binding (and secret) name; the instance it was created from
    pub id: String,
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct BoundService {
    pub binding: Binding,
    pub secret_keys: SecretKeySet,
    pub chart_dir: PathBuf,
    pub values_file: PathBuf,
    pub usage: String,
}

/// How a run of the workflow ended
#[derive(Debug)]
pub enum BindOutcome {
    Bound(BoundService),
    /// The operator dismissed a prompt
    Cancelled,
    /// A step failed; the message has already been shown to the operator
    Failed(KubedevError),
}

pub fn bind_command(instance: &str, scope: &ClusterScope) -> CliCommand {
    CliCommand::svcat(["bind", instance]).scoped(scope)
}

/// Create a binding for `instance`
pub async fn create_binding(
    invoker: &dyn CliInvoker,
    scope: &ClusterScope,
    instance: &str,
) -> Result<Binding> {
    let command = bind_command(instance, scope);
    invoker.invoke(&command).await?.into_stdout(&command)?;
    info!(instance = %instance, "binding created");
    Ok(Binding {
        id: instance.to_string(),
    })
}

/// Run the whole workflow, reporting failures to the operator
pub async fn bind_service(session: &Session) -> BindOutcome {
    match run_steps(session).await {
        Ok(Some(bound)) => {
            session.operator.info(&format!(
                "Bound the application to external service \"{}\"",
                bound.binding.id
            ));
            BindOutcome::Bound(bound)
        }
        Ok(None) => {
            info!("binding workflow cancelled");
            BindOutcome::Cancelled
        }
        Err(e) => {
            error!(error = %e, "binding workflow failed");
            session.operator.error(&e.to_string());
            BindOutcome::Failed(e)
        }
    }
}

async fn run_steps(session: &Session) -> Result<Option<BoundService>> {
    let operator = session.operator.as_ref();
    let invoker = session.invoker.as_ref();

    session.catalog.get_service_instances(invoker).await?;
    let names = session.catalog.names().await;
    if names.is_empty() {
        return Err(KubedevError::Argument(
            "the service catalog has no instances to bind".to_string(),
        ));
    }

    let Some(instance) =
        operator.select("Pick an external service to add to the application", &names)?
    else {
        return Ok(None);
    };

    let binding = create_binding(invoker, session.scope(), &instance).await?;
    let secret_keys = fetch_secret_keys(invoker, session.scope(), &binding.id).await?;
    if secret_keys.is_empty() {
        warn!(binding = %binding.id, "binding secret has no keys");
    }

    let Some(chart_dir) = pick_chart(operator, &session.config.chart_root)? else {
        info!(binding = %binding.id, "chart selection cancelled; the binding stays on the cluster");
        return Ok(None);
    };

    let values_file = ChartValues::path_for_chart(&chart_dir);
    let mut values = ChartValues::load(&values_file)?;
    values.append_service_env(&binding.id, &secret_keys)?;
    values.save()?;
    info!(binding = %binding.id, values = %values_file.display(), "secret keys recorded");

    let usage = usage_summary(&binding.id, &secret_keys);
    session.clipboard.write_text(&usage)?;
    operator.info("Wrote service usage information to your clipboard.");

    Ok(Some(BoundService {
        binding,
        secret_keys,
        chart_dir,
        values_file,
        usage,
    }))
}
