//! `tokio::process` backed invoker

use super::{AttachedSession, CliCommand, CliInvoker, CliOutput, Tool};
use crate::config::ToolPaths;
use crate::errors::{KubedevError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Runs kubectl/svcat as child processes
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    kubectl: PathBuf,
    svcat: PathBuf,
}

impl ProcessInvoker {
    pub fn new(tools: &ToolPaths) -> Self {
        Self {
            kubectl: tools.kubectl.clone(),
            svcat: tools.svcat.clone(),
        }
    }

    fn program(&self, tool: Tool) -> &Path {
        match tool {
            Tool::Kubectl => &self.kubectl,
            Tool::Svcat => &self.svcat,
        }
    }

    fn build(&self, command: &CliCommand) -> Command {
        let mut cmd = Command::new(self.program(command.tool));
        cmd.args(&command.args);
        cmd
    }

    fn launch_error(&self, tool: Tool, source: std::io::Error) -> KubedevError {
        KubedevError::Launch {
            program: self.program(tool).display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl CliInvoker for ProcessInvoker {
    async fn invoke(&self, command: &CliCommand) -> Result<CliOutput> {
        debug!(program = %self.program(command.tool).display(), args = ?command.args, "invoking cluster tool");

        let mut cmd = self.build(command);
        cmd.stdin(if command.stdin.is_some() { Stdio::piped() } else { Stdio::null() });
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| self.launch_error(command.tool, e))?;

        if let Some(input) = &command.stdin {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(input.as_bytes()).await?;
                // Close stdin so the tool sees EOF
                drop(stdin);
            }
        }

        let output = child.wait_with_output().await?;
        // Killed by a signal: no code available
        let exit_code = output.status.code().unwrap_or(-1);
        debug!(command = %command, exit_code, "cluster tool finished");

        Ok(CliOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn spawn_attached(&self, command: &CliCommand) -> Result<AttachedSession> {
        debug!(command = %command, "starting attached session");

        let mut cmd = self.build(command);
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        let mut child = cmd.spawn().map_err(|e| self.launch_error(command.tool, e))?;
        let description = command.to_string();
        let handle = tokio::spawn(async move {
            let status = child.wait().await?;
            Ok(status.code().unwrap_or(-1))
        });

        Ok(AttachedSession::new(description, handle))
    }
}
