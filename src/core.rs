use clap::Parser;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::binding::{bind_service, BindOutcome};
use crate::cli::{Args, Command, LogFormat, Shell};
use crate::config::Config;
use crate::context::{Environment, Session};
use crate::errors::KubedevError;
use crate::host::{SystemClipboard, TerminalOperator};
use crate::invoker::ProcessInvoker;
use crate::k8s::{port_forward, PortForwardOutcome, PortForwardRequest};
use crate::signals;
use crate::status::ExitStatus;
use crate::table;

/// Main entry point for the CLI.
///
/// Handles argument parsing, configuration loading, and dispatches
/// to the subcommand handlers.
pub fn run(args: Vec<String>, mut env: Environment) -> ExitStatus {
    if let Some(name) = args.first() {
        if let Some(basename) = std::path::Path::new(name).file_stem() {
            env.program_name = basename.to_string_lossy().to_string();
        }
    }

    let parsed = match Args::try_parse_from(&args) {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            return if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                ExitStatus::Success
            } else {
                ExitStatus::Error
            };
        }
    };

    if let Some(shell) = &parsed.generate_completions {
        generate_completions(shell, &env.program_name);
        return ExitStatus::Success;
    }

    if parsed.generate_manpage {
        return match generate_manpage() {
            Ok(()) => ExitStatus::Success,
            Err(e) => handle_error(e, false),
        };
    }

    let traceback = parsed.traceback || parsed.debug;
    init_tracing(parsed.log_format.unwrap_or_default(), parsed.debug);

    let Some(command) = parsed.command.clone() else {
        eprintln!("usage: {} <COMMAND>", env.program_name);
        eprintln!("\nFor more information, run: {} --help", env.program_name);
        return ExitStatus::Error;
    };

    let config = match Config::load(parsed.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "falling back to default configuration");
            eprintln!("Warning: Failed to load config: {}", e);
            Config::default()
        }
    };
    let config = apply_overrides(config, &parsed);
    debug!(?config, "configuration resolved");

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => return handle_error(KubedevError::Io(e), traceback),
    };

    match runtime.block_on(program(command, config, env)) {
        Ok(status) => status,
        Err(e) => handle_error(e, traceback),
    }
}

/// Run `command` against the real cluster tools, terminal and clipboard
pub async fn program(
    command: Command,
    config: Config,
    env: Environment,
) -> Result<ExitStatus, KubedevError> {
    let invoker = Arc::new(ProcessInvoker::new(&config.tools));
    let operator = Arc::new(TerminalOperator::new(&env));
    let session = Session::new(config, invoker, operator, Arc::new(SystemClipboard));

    match command {
        Command::Instances => list_instances(&session).await,
        Command::Bind { .. } => Ok(run_bind(&session).await),
        Command::PortForward {
            pod,
            document,
            local_port,
            remote_port,
            detach,
        } => {
            let request = PortForwardRequest {
                pod,
                document,
                local_port,
                remote_port,
            };
            run_port_forward(&session, request, detach).await
        }
    }
}

async fn list_instances(session: &Session) -> Result<ExitStatus, KubedevError> {
    let instances = session
        .catalog
        .get_service_instances(session.invoker.as_ref())
        .await?;
    println!("{}", table::format_instances(&instances));
    Ok(ExitStatus::Success)
}

async fn run_bind(session: &Session) -> ExitStatus {
    match bind_service(session).await {
        BindOutcome::Bound(bound) => {
            info!(binding = %bound.binding.id, chart = %bound.chart_dir.display(), "bind finished");
            ExitStatus::Success
        }
        BindOutcome::Cancelled => cancelled_status(),
        BindOutcome::Failed(_) => ExitStatus::Error,
    }
}

async fn run_port_forward(
    session: &Session,
    request: PortForwardRequest,
    detach: bool,
) -> Result<ExitStatus, KubedevError> {
    let forward = match port_forward(session, request).await {
        PortForwardOutcome::Started(forward) => forward,
        PortForwardOutcome::Cancelled => return Ok(cancelled_status()),
        PortForwardOutcome::Failed(_) => return Ok(ExitStatus::Error),
    };

    if detach {
        info!(session = %forward.session.description(), "leaving port-forward running");
        return Ok(ExitStatus::Success);
    }

    let code = forward.session.wait().await?;
    if signals::was_interrupted() {
        return Ok(ExitStatus::Interrupted);
    }
    Ok(ExitStatus::from_code(code))
}

/// A dismissed prompt caused by Ctrl+C reports as an interrupt
fn cancelled_status() -> ExitStatus {
    if signals::was_interrupted() {
        ExitStatus::Interrupted
    } else {
        ExitStatus::Cancelled
    }
}

/// Command-line options take precedence over the configuration file
fn apply_overrides(mut config: Config, args: &Args) -> Config {
    if let Some(kubectl) = &args.kubectl {
        config.tools.kubectl = kubectl.clone();
    }
    if let Some(svcat) = &args.svcat {
        config.tools.svcat = svcat.clone();
    }
    if let Some(namespace) = &args.namespace {
        config.scope.namespace = Some(namespace.clone());
    }
    if let Some(context) = &args.context {
        config.scope.context = Some(context.clone());
    }
    if let Some(Command::Bind {
        chart_root: Some(root),
    }) = &args.command
    {
        config.chart_root = root.clone();
    }
    config
}

fn init_tracing(format: LogFormat, debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // Ignore a second initialisation (tests run `run` more than once)
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

fn handle_error(error: KubedevError, traceback: bool) -> ExitStatus {
    if traceback {
        eprintln!("Error: {:?}", error);
    } else {
        eprintln!("Error: {}", error);
    }

    ExitStatus::Error
}

fn generate_completions(shell: &Shell, bin_name: &str) {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as ClapShell};

    let mut cmd = Args::command();
    let shell = match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::PowerShell => ClapShell::PowerShell,
        Shell::Elvish => ClapShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}

fn generate_manpage() -> Result<(), KubedevError> {
    use clap::CommandFactory;

    let cmd = Args::command();
    let man = clap_mangen::Man::new(cmd);
    man.render(&mut std::io::stdout())?;
    Ok(())
}
