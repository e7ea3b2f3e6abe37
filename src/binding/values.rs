//! Chart `values.yaml` editing
//!
//! Bindings are recorded under a `serviceCatalogEnv` list:
//!
//! ```yaml
//! serviceCatalogEnv:
//!   - name: mydb
//!     vars: [USERNAME, PASSWORD]
//! ```
//!
//! Everything else in the document is carried through unchanged.

use super::SecretKeySet;
use crate::errors::{KubedevError, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const VALUES_FILE_NAME: &str = "values.yaml";
pub const SERVICE_CATALOG_ENV_KEY: &str = "serviceCatalogEnv";

/// One `serviceCatalogEnv` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCatalogEnv {
    pub name: String,
    pub vars: Vec<String>,
}

/// In-memory values document of one chart
#[derive(Debug, Clone)]
pub struct ChartValues {
    path: PathBuf,
    document: Mapping,
}

impl ChartValues {
    /// `values.yaml` inside `chart_dir`
    pub fn path_for_chart(chart_dir: &Path) -> PathBuf {
        chart_dir.join(VALUES_FILE_NAME)
    }

    /// Load a values file; a missing or empty file is an empty document
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        Self::from_yaml_str(path.to_path_buf(), &content)
    }

    pub fn from_yaml_str(path: PathBuf, content: &str) -> Result<Self> {
        let document = match serde_yaml::from_str::<Value>(content)? {
            Value::Null => Mapping::new(),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(KubedevError::Chart(format!(
                    "{} must contain a mapping at the top level, found {}",
                    path.display(),
                    yaml_kind(&other)
                )))
            }
        };
        Ok(Self { path, document })
    }

    pub fn document(&self) -> &Mapping {
        &self.document
    }

    /// Entries currently recorded under `serviceCatalogEnv`
    pub fn service_catalog_env(&self) -> Result<Vec<ServiceCatalogEnv>> {
        match self.document.get(SERVICE_CATALOG_ENV_KEY) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => Ok(serde_yaml::from_value(value.clone())?),
        }
    }

    /// Append `{name, vars}` to `serviceCatalogEnv`, creating the list if needed
    pub fn append_service_env(&mut self, name: &str, vars: &SecretKeySet) -> Result<()> {
        let entry = serde_yaml::to_value(ServiceCatalogEnv {
            name: name.to_string(),
            vars: vars.as_slice().to_vec(),
        })?;

        let key = Value::String(SERVICE_CATALOG_ENV_KEY.to_string());
        match self.document.get_mut(&key) {
            Some(Value::Sequence(entries)) => entries.push(entry),
            None | Some(Value::Null) => {
                self.document.insert(key, Value::Sequence(vec![entry]));
            }
            Some(other) => {
                return Err(KubedevError::Chart(format!(
                    "{} in {} is a {}, expected a list",
                    SERVICE_CATALOG_ENV_KEY,
                    self.path.display(),
                    yaml_kind(other)
                )))
            }
        }
        Ok(())
    }

    /// Replace the file on disk: the old file is removed, then written anew
    pub fn save(&self) -> Result<()> {
        let content = serde_yaml::to_string(&self.document)?;
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), "values file rewritten");
        Ok(())
    }
}

fn yaml_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
