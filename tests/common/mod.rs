//! Common test utilities for kubedev integration tests
//!
//! - [`FakeInvoker`] answers kubectl/svcat commands from a script and records them
//! - [`ScriptedOperator`] answers prompts from a queue and records notifications
//! - [`MemoryClipboard`] keeps whatever was copied
//! - chart fixtures in temporary directories
//! - helpers for running the built binary
#![allow(dead_code)]

use async_trait::async_trait;
use kubedev::config::{ClusterScope, Config};
use kubedev::context::Session;
use kubedev::errors::{KubedevError, Result};
use kubedev::host::{Clipboard, Operator, Validator};
use kubedev::invoker::{AttachedSession, CliCommand, CliInvoker, CliOutput};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// `svcat get instances` output with three instances
pub const INSTANCE_LISTING: &str = "\
  NAME      NAMESPACE     CLASS          PLAN     STATUS
+--------+-----------+-------------+---------+--------+
  mydb     default       azure-mysql    basic    Ready
  cache    default       azure-redis    basic    Ready
  queue    default       azure-sb       std      Failed
";

pub fn secret_json(keys: &[&str]) -> String {
    let data: serde_json::Map<String, serde_json::Value> = keys
        .iter()
        .map(|k| (k.to_string(), serde_json::Value::String("c2VjcmV0".to_string())))
        .collect();
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {"name": "mydb"},
        "data": data,
    })
    .to_string()
}

pub fn pod_list_json(names: &[&str]) -> String {
    let items: Vec<serde_json::Value> = names
        .iter()
        .map(|n| serde_json::json!({"metadata": {"name": n, "namespace": "default"}}))
        .collect();
    serde_json::json!({"apiVersion": "v1", "kind": "List", "items": items}).to_string()
}

// ============================================================================
// Fake invoker
// ============================================================================

/// Answers commands by their rendered form (`"svcat get instances"`).
///
/// Unscripted commands fail with exit code 1, like an unknown kubectl verb.
#[derive(Default)]
pub struct FakeInvoker {
    responses: Mutex<HashMap<String, CliOutput>>,
    calls: Mutex<Vec<CliCommand>>,
    attached: Mutex<Vec<CliCommand>>,
    attached_exit_code: AtomicUsize,
}

impl FakeInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, command: &str, output: CliOutput) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(command.to_string(), output);
        self
    }

    pub fn succeed(&self, command: &str, stdout: &str) -> &Self {
        self.respond(command, CliOutput::success(stdout))
    }

    pub fn fail(&self, command: &str, code: i32, stderr: &str) -> &Self {
        self.respond(command, CliOutput::failure(code, stderr))
    }

    pub fn set_attached_exit_code(&self, code: usize) {
        self.attached_exit_code.store(code, Ordering::SeqCst);
    }

    /// Every captured command, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    pub fn call_count(&self, command: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == command).count()
    }

    /// Every attached session started, in order
    pub fn attached(&self) -> Vec<String> {
        self.attached
            .lock()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

#[async_trait]
impl CliInvoker for FakeInvoker {
    async fn invoke(&self, command: &CliCommand) -> Result<CliOutput> {
        self.calls.lock().unwrap().push(command.clone());
        // Give concurrent callers a chance to interleave
        tokio::task::yield_now().await;
        let rendered = command.to_string();
        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(&rendered)
            .cloned()
            .unwrap_or_else(|| CliOutput::failure(1, format!("unscripted command: {}", rendered))))
    }

    fn spawn_attached(&self, command: &CliCommand) -> Result<AttachedSession> {
        self.attached.lock().unwrap().push(command.clone());
        let code = self.attached_exit_code.load(Ordering::SeqCst) as i32;
        Ok(AttachedSession::new(
            command.to_string(),
            tokio::spawn(async move { Ok(code) }),
        ))
    }
}

// ============================================================================
// Scripted operator
// ============================================================================

/// One queued answer; `None` dismisses the prompt
#[derive(Debug, Clone)]
pub enum Answer {
    Select(Option<String>),
    Input(Option<String>),
}

impl Answer {
    pub fn pick(item: &str) -> Self {
        Answer::Select(Some(item.to_string()))
    }

    pub fn type_text(text: &str) -> Self {
        Answer::Input(Some(text.to_string()))
    }
}

/// A prompt the operator was shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shown {
    pub prompt: String,
    pub items: Vec<String>,
}

#[derive(Default)]
pub struct ScriptedOperator {
    answers: Mutex<VecDeque<Answer>>,
    prompts: Mutex<Vec<Shown>>,
    rejections: Mutex<Vec<String>>,
    infos: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl ScriptedOperator {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn prompts(&self) -> Vec<Shown> {
        self.prompts.lock().unwrap().clone()
    }

    /// Validation messages for rejected input
    pub fn rejections(&self) -> Vec<String> {
        self.rejections.lock().unwrap().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn remaining_answers(&self) -> usize {
        self.answers.lock().unwrap().len()
    }

    fn next_answer(&self, prompt: &str) -> Result<Answer> {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| KubedevError::Prompt(format!("no scripted answer for {:?}", prompt)))
    }
}

impl Operator for ScriptedOperator {
    fn select(&self, prompt: &str, items: &[String]) -> Result<Option<String>> {
        self.prompts.lock().unwrap().push(Shown {
            prompt: prompt.to_string(),
            items: items.to_vec(),
        });
        match self.next_answer(prompt)? {
            Answer::Select(choice) => Ok(choice),
            other => panic!("expected a select answer for {:?}, got {:?}", prompt, other),
        }
    }

    fn input(&self, prompt: &str, validate: Validator<'_>) -> Result<Option<String>> {
        self.prompts.lock().unwrap().push(Shown {
            prompt: prompt.to_string(),
            items: Vec::new(),
        });
        // Rejected text is re-prompted, like the terminal does
        loop {
            match self.next_answer(prompt)? {
                Answer::Input(None) => return Ok(None),
                Answer::Input(Some(text)) => match validate(&text) {
                    Ok(()) => return Ok(Some(text)),
                    Err(message) => self.rejections.lock().unwrap().push(message),
                },
                other => panic!("expected an input answer for {:?}, got {:?}", prompt, other),
            }
        }
    }

    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

// ============================================================================
// Clipboard
// ============================================================================

#[derive(Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    broken: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write
    pub fn broken() -> Self {
        Self {
            contents: Mutex::new(None),
            broken: true,
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        if self.broken {
            return Err(KubedevError::Clipboard("clipboard unavailable".to_string()));
        }
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

// ============================================================================
// Sessions and fixtures
// ============================================================================

/// Collaborators of one test session, kept for inspection afterwards
pub struct Harness {
    pub invoker: Arc<FakeInvoker>,
    pub operator: Arc<ScriptedOperator>,
    pub clipboard: Arc<MemoryClipboard>,
    pub session: Session,
}

impl Harness {
    pub fn new(invoker: FakeInvoker, operator: ScriptedOperator, config: Config) -> Self {
        Self::with_clipboard(invoker, operator, MemoryClipboard::new(), config)
    }

    pub fn with_clipboard(
        invoker: FakeInvoker,
        operator: ScriptedOperator,
        clipboard: MemoryClipboard,
        config: Config,
    ) -> Self {
        let invoker = Arc::new(invoker);
        let operator = Arc::new(operator);
        let clipboard = Arc::new(clipboard);
        let session = Session::new(config, invoker.clone(), operator.clone(), clipboard.clone());
        Self {
            invoker,
            operator,
            clipboard,
            session,
        }
    }
}

pub fn config_with_chart_root(root: &Path) -> Config {
    Config {
        chart_root: root.to_path_buf(),
        ..Config::default()
    }
}

pub fn scoped_config(namespace: &str, context: &str) -> Config {
    Config {
        scope: ClusterScope {
            namespace: Some(namespace.to_string()),
            context: Some(context.to_string()),
        },
        ..Config::default()
    }
}

/// Create `<root>/<relative>/Chart.yaml` (and `values.yaml` when given)
pub fn create_chart(root: &Path, relative: &str, values: Option<&str>) -> PathBuf {
    let dir = if relative.is_empty() {
        root.to_path_buf()
    } else {
        root.join(relative)
    };
    std::fs::create_dir_all(&dir).expect("Failed to create chart dir");
    std::fs::write(
        dir.join("Chart.yaml"),
        format!("apiVersion: v2\nname: {}\nversion: 0.1.0\n", relative),
    )
    .expect("Failed to write Chart.yaml");
    if let Some(values) = values {
        std::fs::write(dir.join("values.yaml"), values).expect("Failed to write values.yaml");
    }
    dir
}

pub fn create_temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write temp file");
    (dir, path)
}

pub fn read_yaml(path: &Path) -> serde_yaml::Value {
    let text = std::fs::read_to_string(path).expect("Failed to read YAML file");
    serde_yaml::from_str(&text).expect("Failed to parse YAML file")
}

// ============================================================================
// Binary
// ============================================================================

/// Result of running the kubedev binary
#[derive(Debug)]
pub struct CliResponse {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run the binary with an isolated config directory and no terminal
pub fn kubedev(args: &[&str]) -> CliResponse {
    let config_dir = TempDir::new().expect("Failed to create temp config dir");
    kubedev_with_config_dir(args, config_dir.path())
}

pub fn kubedev_with_config_dir(args: &[&str], config_dir: &Path) -> CliResponse {
    let output = Command::new(env!("CARGO_BIN_EXE_kubedev"))
        .args(args)
        .env(kubedev::config::CONFIG_DIR_ENV, config_dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute kubedev");

    CliResponse {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    }
}

/// Write an executable shell script standing in for kubectl or svcat
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", script)).expect("Failed to write fake tool");
    let mut perms = std::fs::metadata(&path).expect("Failed to stat fake tool").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("Failed to chmod fake tool");
    path
}
