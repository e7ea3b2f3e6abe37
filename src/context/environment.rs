//! Environment struct (terminal capabilities)

/// Execution environment
#[derive(Debug, Clone)]
pub struct Environment {
    pub stdin_isatty: bool,
    pub stdout_isatty: bool,
    pub stderr_isatty: bool,
    pub colors: bool,
    pub program_name: String,
}

impl Environment {
    pub fn init() -> Self {
        Self::default()
    }

    /// Prompts need a keyboard on stdin and a terminal on stderr to draw on
    pub fn is_interactive(&self) -> bool {
        self.stdin_isatty && self.stderr_isatty
    }
}

impl Default for Environment {
    fn default() -> Self {
        let stderr_isatty = atty::is(atty::Stream::Stderr);
        Self {
            stdin_isatty: atty::is(atty::Stream::Stdin),
            stdout_isatty: atty::is(atty::Stream::Stdout),
            stderr_isatty,
            colors: stderr_isatty && std::env::var_os("NO_COLOR").is_none(),
            program_name: "kubedev".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_requires_stdin_and_stderr() {
        let mut env = Environment {
            stdin_isatty: true,
            stdout_isatty: false,
            stderr_isatty: true,
            colors: false,
            program_name: "kubedev".to_string(),
        };
        assert!(env.is_interactive());

        env.stdin_isatty = false;
        assert!(!env.is_interactive());
    }
}
