//! Cluster tool invocation
//!
//! Every interaction with the cluster goes through [`CliInvoker`]: either a
//! captured run (`invoke`) returning exit code plus stdout/stderr, or an
//! attached interactive session (`spawn_attached`) that inherits the terminal.
//!
//! A tool that cannot be started is reported as [`KubedevError::Launch`]; a tool
//! that ran and exited non-zero comes back as a normal [`CliOutput`] and is
//! turned into [`KubedevError::CommandFailed`] by [`CliOutput::into_stdout`].

pub mod process;

pub use process::ProcessInvoker;

use crate::config::ClusterScope;
use crate::errors::{KubedevError, Result};
use async_trait::async_trait;
use std::fmt;
use tokio::task::JoinHandle;

/// Which cluster tool a command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Kubectl,
    Svcat,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Kubectl => "kubectl",
            Tool::Svcat => "svcat",
        }
    }
}

/// A single tool invocation: tool, argument vector, optional stdin payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliCommand {
    pub tool: Tool,
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

impl CliCommand {
    pub fn new<I, S>(tool: Tool, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tool,
            args: args.into_iter().map(Into::into).collect(),
            stdin: None,
        }
    }

    pub fn kubectl<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Tool::Kubectl, args)
    }

    pub fn svcat<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Tool::Svcat, args)
    }

    /// Append the namespace/context flags of `scope`
    pub fn scoped(mut self, scope: &ClusterScope) -> Self {
        if let Some(namespace) = &scope.namespace {
            self.args.push("--namespace".to_string());
            self.args.push(namespace.clone());
        }
        if let Some(context) = &scope.context {
            self.args.push("--context".to_string());
            self.args.push(context.clone());
        }
        self
    }

    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }
}

impl fmt::Display for CliCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tool.name())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished tool run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CliOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout of a successful run, or `CommandFailed` carrying stderr
    pub fn into_stdout(self, command: &CliCommand) -> Result<String> {
        if self.is_success() {
            Ok(self.stdout)
        } else {
            Err(KubedevError::CommandFailed {
                command: command.to_string(),
                code: self.exit_code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Handle to an interactive tool session running attached to the terminal.
///
/// Dropping the handle leaves the session running.
pub struct AttachedSession {
    description: String,
    handle: JoinHandle<Result<i32>>,
}

impl AttachedSession {
    pub fn new(description: impl Into<String>, handle: JoinHandle<Result<i32>>) -> Self {
        Self {
            description: description.into(),
            handle,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Wait for the session to end and return its exit code
    pub async fn wait(self) -> Result<i32> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(KubedevError::Io(std::io::Error::other(e))),
        }
    }
}

impl fmt::Debug for AttachedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachedSession")
            .field("description", &self.description)
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}

/// Runs cluster tool commands
#[async_trait]
pub trait CliInvoker: Send + Sync {
    /// Run `command` to completion, capturing its output
    async fn invoke(&self, command: &CliCommand) -> Result<CliOutput>;

    /// Start `command` attached to the operator's terminal without waiting for it
    fn spawn_attached(&self, command: &CliCommand) -> Result<AttachedSession>;
}
