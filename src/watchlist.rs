//! Watchlist configuration.
//!
//! Operators drop one YAML document per watch target into the config
//! directory; each document names a `system` and/or a `region`. The loader
//! skips malformed documents instead of aborting the run — a single bad
//! file must not take down the whole watchlist — and reports each failure
//! as a value so the orchestrator can notify the debug channel.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;

/// One watch target parsed from a single YAML document.
///
/// Either field may be absent; unknown keys are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WatchConfig {
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl WatchConfig {
    /// `true` when the document names at least one non-empty watch target.
    pub fn is_watching(&self) -> bool {
        let has = |field: &Option<String>| {
            field.as_deref().is_some_and(|v| !v.is_empty())
        };
        has(&self.system) || has(&self.region)
    }
}

/// A document that failed to parse or validate.
#[derive(Debug)]
pub struct ConfigFailure {
    pub path: PathBuf,
    pub message: String,
}

impl ConfigFailure {
    pub fn to_error(&self) -> AppError {
        AppError::ConfigParse {
            path: self.path.clone(),
            message: self.message.clone(),
        }
    }
}

/// Result of scanning the config directory.
#[derive(Debug, Default)]
pub struct LoadedConfigs {
    pub configs: Vec<WatchConfig>,
    pub failures: Vec<ConfigFailure>,
}

/// Load all watch documents from `dir`.
///
/// Malformed documents are recorded in `failures` and skipped; empty
/// documents and documents naming no target are dropped silently. An
/// unreadable directory is fatal — without it there is no watchlist at all.
pub fn load_configs(dir: &Path) -> Result<LoadedConfigs, AppError> {
    let entries = fs::read_dir(dir).map_err(|err| {
        AppError::config(format!(
            "unable to read config directory {}: {}",
            dir.display(),
            err
        ))
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("yaml") | Some("yml")
            )
        })
        .collect();
    paths.sort();

    let mut loaded = LoadedConfigs::default();
    for path in paths {
        match load_one(&path) {
            Ok(Some(config)) => loaded.configs.push(config),
            Ok(None) => {
                tracing::debug!("Skipping {}: no watch target", path.display());
            }
            Err(message) => {
                tracing::warn!("Unable to parse {}: {}", path.display(), message);
                loaded.failures.push(ConfigFailure { path, message });
            }
        }
    }

    Ok(loaded)
}

/// Parse and validate a single document.
///
/// `Ok(None)` means the document is empty or names no target. `Err` carries
/// a human-readable parse/validation message.
fn load_one(path: &Path) -> Result<Option<WatchConfig>, String> {
    let contents = fs::read_to_string(path).map_err(|err| err.to_string())?;

    let value: serde_yaml::Value =
        serde_yaml::from_str(&contents).map_err(|err| err.to_string())?;

    match value {
        serde_yaml::Value::Null => Ok(None),
        serde_yaml::Value::Mapping(_) => {
            let config: WatchConfig =
                serde_yaml::from_value(value).map_err(|err| err.to_string())?;
            Ok(config.is_watching().then_some(config))
        }
        other => Err(format!(
            "expected a mapping with `system` and/or `region`, got {}",
            yaml_kind(&other)
        )),
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

/// Distinct non-empty system names across all configs.
pub fn watched_systems(configs: &[WatchConfig]) -> BTreeSet<String> {
    configs
        .iter()
        .filter_map(|c| c.system.as_deref())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Distinct non-empty region names across all configs.
pub fn watched_regions(configs: &[WatchConfig]) -> BTreeSet<String> {
    configs
        .iter()
        .filter_map(|c| c.region.as_deref())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use proptest::prelude::*;
    use tempfile::TempDir;

    fn write_doc(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    // ---- load_configs ----

    #[test]
    fn loads_system_and_region_documents() {
        let dir = TempDir::new().unwrap();
        write_doc(&dir, "amarr.yaml", "system: Amarr\n");
        write_doc(&dir, "forge.yml", "region: The Forge\n");

        let loaded = load_configs(dir.path()).unwrap();

        assert_eq!(loaded.configs.len(), 2);
        assert!(loaded.failures.is_empty());
        assert_eq!(watched_systems(&loaded.configs).len(), 1);
        assert_eq!(watched_regions(&loaded.configs).len(), 1);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let dir = TempDir::new().unwrap();
        write_doc(&dir, "watch.yaml", "system: Jita\nnote: trade hub\n");

        let loaded = load_configs(dir.path()).unwrap();

        assert_eq!(loaded.configs.len(), 1);
        assert_eq!(loaded.configs[0].system.as_deref(), Some("Jita"));
    }

    #[test]
    fn malformed_document_is_skipped_and_reported() {
        let dir = TempDir::new().unwrap();
        write_doc(&dir, "good.yaml", "system: Amarr\n");
        write_doc(&dir, "bad.yaml", "system: [unclosed\n");

        let loaded = load_configs(dir.path()).unwrap();

        assert_eq!(loaded.configs.len(), 1);
        assert_eq!(loaded.failures.len(), 1);
        assert!(loaded.failures[0].path.ends_with("bad.yaml"));
    }

    #[test]
    fn non_mapping_document_is_a_failure() {
        let dir = TempDir::new().unwrap();
        write_doc(&dir, "scalar.yaml", "just a string\n");

        let loaded = load_configs(dir.path()).unwrap();

        assert!(loaded.configs.is_empty());
        assert_eq!(loaded.failures.len(), 1);
        assert!(loaded.failures[0].message.contains("expected a mapping"));
    }

    #[test]
    fn empty_and_targetless_documents_are_dropped_silently() {
        let dir = TempDir::new().unwrap();
        write_doc(&dir, "empty.yaml", "");
        write_doc(&dir, "other.yaml", "comment: nothing watched here\n");

        let loaded = load_configs(dir.path()).unwrap();

        assert!(loaded.configs.is_empty());
        assert!(loaded.failures.is_empty());
    }

    #[test]
    fn non_yaml_files_are_not_scanned() {
        let dir = TempDir::new().unwrap();
        write_doc(&dir, "readme.txt", "not a config");
        write_doc(&dir, "watch.yaml", "region: Domain\n");

        let loaded = load_configs(dir.path()).unwrap();

        assert_eq!(loaded.configs.len(), 1);
        assert!(loaded.failures.is_empty());
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = load_configs(&missing).unwrap_err();

        assert_eq!(err.exit_code(), 1);
    }

    // ---- watched sets ----

    #[test]
    fn watched_sets_deduplicate_across_documents() {
        let configs = vec![
            WatchConfig { system: Some("Amarr".into()), region: None },
            WatchConfig { system: Some("Amarr".into()), region: Some("Domain".into()) },
            WatchConfig { system: None, region: Some("Domain".into()) },
        ];

        assert_eq!(watched_systems(&configs).len(), 1);
        assert_eq!(watched_regions(&configs).len(), 1);
    }

    #[test]
    fn empty_string_targets_are_excluded() {
        let configs = vec![WatchConfig {
            system: Some(String::new()),
            region: Some("Domain".into()),
        }];

        assert!(watched_systems(&configs).is_empty());
        assert_eq!(watched_regions(&configs).len(), 1);
    }

    proptest! {
        /// The projections contain exactly the distinct non-empty values
        /// present across the config set, regardless of ordering or
        /// duplication.
        #[test]
        fn watched_systems_is_the_distinct_nonempty_projection(
            names in proptest::collection::vec("[A-Za-z0-9 -]{0,12}", 0..20)
        ) {
            let configs: Vec<WatchConfig> = names
                .iter()
                .map(|n| WatchConfig { system: Some(n.clone()), region: None })
                .collect();

            let expected: BTreeSet<String> = names
                .iter()
                .filter(|n| !n.is_empty())
                .cloned()
                .collect();

            prop_assert_eq!(watched_systems(&configs), expected);
        }
    }
}
