//! Config file handling

use crate::errors::KubedevError;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "KUBEDEV_CONFIG_DIR";

/// Default starting point when searching for a free local port
pub const DEFAULT_PORT_SEARCH_START: u16 = 10000;

/// Locations of the cluster tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub kubectl: PathBuf,
    pub svcat: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            kubectl: PathBuf::from("kubectl"),
            svcat: PathBuf::from("svcat"),
        }
    }
}

/// Namespace and kubeconfig context applied to every cluster command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterScope {
    pub namespace: Option<String>,
    pub context: Option<String>,
}

/// kubedev configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub tools: ToolPaths,
    pub scope: ClusterScope,
    /// Directory searched for Helm charts by `bind`
    pub chart_root: PathBuf,
    /// First local port tried by `port-forward`
    pub port_search_start: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tools: ToolPaths::default(),
            scope: ClusterScope::default(),
            chart_root: PathBuf::from("."),
            port_search_start: DEFAULT_PORT_SEARCH_START,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from `<config dir>/config.toml`
    pub fn load(path: Option<&Path>) -> Result<Self, KubedevError> {
        let config_file = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_dir().join("config.toml"),
        };

        if !config_file.exists() {
            if path.is_some() {
                return Err(KubedevError::Config(format!(
                    "Config file not found: {}",
                    config_file.display()
                )));
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_file)
            .map_err(|e| KubedevError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, KubedevError> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| KubedevError::Config(format!("Invalid config TOML: {}", e)))?;

        let defaults = ToolPaths::default();
        let tools = ToolPaths {
            kubectl: get_str(&toml_value, "tools", "kubectl")
                .map(PathBuf::from)
                .unwrap_or(defaults.kubectl),
            svcat: get_str(&toml_value, "tools", "svcat")
                .map(PathBuf::from)
                .unwrap_or(defaults.svcat),
        };

        let scope = ClusterScope {
            namespace: get_str(&toml_value, "cluster", "namespace").map(String::from),
            context: get_str(&toml_value, "cluster", "context").map(String::from),
        };

        let chart_root = get_str(&toml_value, "bind", "chart_root")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let port_search_start = match toml_value
            .get("port_forward")
            .and_then(|s| s.get("search_start"))
        {
            None => DEFAULT_PORT_SEARCH_START,
            Some(value) => value
                .as_integer()
                .and_then(|n| u16::try_from(n).ok())
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    KubedevError::Config(format!(
                        "port_forward.search_start must be a port number, got {}",
                        value
                    ))
                })?,
        };

        Ok(Self {
            tools,
            scope,
            chart_root,
            port_search_start,
        })
    }

    /// Get the default config directory
    fn default_config_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            if !dir.trim().is_empty() {
                return PathBuf::from(dir);
            }
        }

        dirs::config_dir()
            .map(|p| p.join("kubedev"))
            .unwrap_or_else(|| PathBuf::from(".kubedev"))
    }
}

fn get_str<'a>(toml: &'a toml::Value, section: &str, key: &str) -> Option<&'a str> {
    toml.get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
