//! Helm chart discovery

use crate::errors::{KubedevError, Result};
use crate::host::Operator;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

pub const CHART_FILE_NAME: &str = "Chart.yaml";

/// Directories never searched for charts
const SKIPPED_DIRS: &[&str] = &["node_modules", "target"];

/// Directories under `root` (inclusive) containing a `Chart.yaml`, sorted by path.
///
/// Entries that cannot be read are skipped.
pub fn discover_charts(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(KubedevError::Chart(format!(
            "chart root {} is not a directory",
            root.display()
        )));
    }

    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e));

    let mut charts = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry during chart discovery");
                continue;
            }
        };
        if entry.file_type().is_dir() && entry.path().join(CHART_FILE_NAME).is_file() {
            charts.push(entry.into_path());
        }
    }

    charts.sort();
    debug!(root = %root.display(), count = charts.len(), "chart discovery finished");
    Ok(charts)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    match entry.file_name().to_str() {
        Some(name) => name.starts_with('.') || SKIPPED_DIRS.contains(&name),
        None => false,
    }
}

/// Label shown to the operator for a chart directory
fn chart_label(root: &Path, chart: &Path) -> String {
    match chart.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.display().to_string(),
        Err(_) => chart.display().to_string(),
    }
}

/// Choose the chart to update: the only one found, or the operator's pick
pub fn pick_chart(operator: &dyn Operator, root: &Path) -> Result<Option<PathBuf>> {
    let mut charts = discover_charts(root)?;
    match charts.len() {
        0 => Err(KubedevError::Chart(format!(
            "no Helm chart ({}) found under {}",
            CHART_FILE_NAME,
            root.display()
        ))),
        1 => Ok(charts.pop()),
        _ => {
            let labels: Vec<String> = charts.iter().map(|c| chart_label(root, c)).collect();
            let choice = operator.select("Select the chart to add the service to", &labels)?;
            Ok(choice.and_then(|label| {
                labels
                    .iter()
                    .position(|l| *l == label)
                    .map(|index| charts[index].clone())
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_chart(root: &Path, rel: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CHART_FILE_NAME), "name: test\n").unwrap();
    }

    #[test]
    fn test_finds_nested_charts_sorted() {
        let tmp = TempDir::new().unwrap();
        make_chart(tmp.path(), "charts/web");
        make_chart(tmp.path(), "api");
        fs::create_dir_all(tmp.path().join("docs")).unwrap();

        let charts = discover_charts(tmp.path()).unwrap();
        assert_eq!(
            charts,
            vec![tmp.path().join("api"), tmp.path().join("charts/web")]
        );
    }

    #[test]
    fn test_root_itself_can_be_a_chart() {
        let tmp = TempDir::new().unwrap();
        make_chart(tmp.path(), "");
        assert_eq!(discover_charts(tmp.path()).unwrap(), vec![tmp.path().to_path_buf()]);
        assert_eq!(chart_label(tmp.path(), tmp.path()), ".");
    }

    #[test]
    fn test_hidden_and_build_dirs_are_skipped() {
        let tmp = TempDir::new().unwrap();
        make_chart(tmp.path(), ".git/chart");
        make_chart(tmp.path(), "node_modules/pkg");
        make_chart(tmp.path(), "target/debug");
        assert!(discover_charts(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_hidden_root_is_still_searched() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join(".charts");
        make_chart(&root, "app");
        assert_eq!(discover_charts(&root).unwrap(), vec![root.join("app")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_sibling_does_not_hide_charts() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        make_chart(tmp.path(), "app");
        let locked = tmp.path().join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let charts = discover_charts(tmp.path());

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(charts.unwrap(), vec![tmp.path().join("app")]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let err = discover_charts(Path::new("/definitely/not/a/dir")).unwrap_err();
        assert!(matches!(err, KubedevError::Chart(_)));
    }
}
