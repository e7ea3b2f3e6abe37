//! Error types for kubedev

use thiserror::Error;

/// Main error type for kubedev
#[derive(Error, Debug)]
pub enum KubedevError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The tool could not be started at all (missing binary, permissions, ...)
    #[error("Failed to run {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but reported failure
    #[error("{command} failed (exit code {code}): {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Unexpected output from {command}: {message}")]
    Decode { command: String, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Invalid argument: {0}")]
    Argument(String),
}

impl KubedevError {
    pub fn decode(command: impl Into<String>, message: impl Into<String>) -> Self {
        KubedevError::Decode {
            command: command.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, KubedevError>;
