// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings file resolution and persistence.

use std::path::{Path, PathBuf};

use ausweis_core::error::Result;
use ausweis_core::EngineConfig;
use tracing::{debug, info};

const CONFIG_FILE: &str = "config.json";

/// Directory holding the settings file.
pub fn config_dir() -> PathBuf {
    config_base().join("ausweis")
}

/// Default location of the settings file.
pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

fn config_base() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    PathBuf::from(".")
}

/// Resolve the engine settings.
///
/// An explicit path must exist and parse. Without one, the default location
/// is used if present, otherwise built-in defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<EngineConfig> {
    let config = match explicit {
        Some(path) => read_config(path)?,
        None => {
            let path = default_config_path();
            if path.is_file() {
                read_config(&path)?
            } else {
                debug!("No settings file, using defaults");
                EngineConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<EngineConfig> {
    let data = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&data)?;
    debug!(path = %path.display(), "Settings loaded");
    Ok(config)
}

/// Write `config` to `path`, creating parent directories.
pub fn persist_config(path: &Path, config: &EngineConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "Settings written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ausweis_core::config::{EmbeddedScanMode, ExtractionConfig, SexPolicy};
    use ausweis_core::AusweisError;

    #[test]
    fn persisted_config_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let mut config = EngineConfig::default();
        config.extraction.sex_policy = SexPolicy::Explicit;
        config.extraction.embedded_scan = EmbeddedScanMode::Strict;

        persist_config(&path, &config).expect("persist");
        assert_eq!(load_config(Some(&path)).expect("load"), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"matching": {"partial_threshold": 0.8}}"#).expect("write");

        let config = load_config(Some(&path)).expect("load");
        assert_eq!(config.matching.partial_threshold, 0.8);
        assert_eq!(config.matching.max_word_matches, 15);
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = load_config(Some(&dir.path().join("absent.json")));
        assert!(matches!(result, Err(AusweisError::Io(_))));
    }

    #[test]
    fn malformed_or_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);

        std::fs::write(&path, "{ not json").expect("write");
        assert!(matches!(load_config(Some(&path)), Err(AusweisError::Serialization(_))));

        std::fs::write(&path, r#"{"matching": {"partial_threshold": 2.0}}"#).expect("write");
        assert!(matches!(load_config(Some(&path)), Err(AusweisError::Config(_))));
    }
}
