//! CLI argument definitions using clap

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "kubedev", version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    // =========================================================================
    // CLUSTER
    // =========================================================================

    /// kubectl executable (overrides [tools] kubectl)
    #[arg(long = "kubectl", value_name = "PATH", global = true)]
    pub kubectl: Option<PathBuf>,

    /// svcat executable (overrides [tools] svcat)
    #[arg(long = "svcat", value_name = "PATH", global = true)]
    pub svcat: Option<PathBuf>,

    /// Namespace passed to every kubectl and svcat call
    #[arg(short = 'n', long = "namespace", value_name = "NAMESPACE", global = true)]
    pub namespace: Option<String>,

    /// kubeconfig context passed to every kubectl and svcat call
    #[arg(long = "context", value_name = "CONTEXT", global = true)]
    pub context: Option<String>,

    // =========================================================================
    // CONFIGURATION AND DIAGNOSTICS
    // =========================================================================

    /// Configuration file (default: <config dir>/kubedev/config.toml)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log output format: text (default) or json (JSON Lines)
    #[arg(long = "log-format", value_name = "FORMAT", value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Show traceback on error
    #[arg(long = "traceback", action = ArgAction::SetTrue, global = true)]
    pub traceback: bool,

    /// Debug logging (implies --traceback)
    #[arg(long = "debug", action = ArgAction::SetTrue, global = true)]
    pub debug: bool,

    /// Generate shell completions for the specified shell
    #[arg(long = "generate-completions", value_name = "SHELL", value_enum, hide = true)]
    pub generate_completions: Option<Shell>,

    /// Generate man page to stdout
    #[arg(long = "generate-manpage", action = ArgAction::SetTrue, hide = true)]
    pub generate_manpage: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the service instances in the service catalog
    Instances,

    /// Bind a service instance and record its secret keys in a Helm chart
    Bind {
        /// Directory searched for Helm charts (overrides [bind] chart_root)
        #[arg(long = "chart-root", value_name = "DIR")]
        chart_root: Option<PathBuf>,
    },

    /// Forward a local port to a pod
    PortForward {
        /// Pod to forward to; prompted for when omitted
        #[arg(value_name = "POD")]
        pod: Option<String>,

        /// Manifest to take the pod from
        #[arg(long = "document", value_name = "FILE", conflicts_with = "pod")]
        document: Option<PathBuf>,

        /// Local port (default: first free port at or above [port_forward] search_start)
        #[arg(long = "local-port", value_name = "PORT", value_parser = parse_port)]
        local_port: Option<u16>,

        /// Port on the pod; prompted for when omitted
        #[arg(long = "remote-port", value_name = "PORT", value_parser = parse_port)]
        remote_port: Option<u16>,

        /// Return once kubectl has started instead of waiting for it to exit
        #[arg(long = "detach", action = ArgAction::SetTrue)]
        detach: bool,
    },
}

fn parse_port(input: &str) -> Result<u16, String> {
    crate::k8s::validate_port(input)
}

/// Shell for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Log format for structured output
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON Lines format for parsing
    Json,
}
