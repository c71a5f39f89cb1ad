// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! YAML and JSON file loading.
//!
//! Used for the editor configuration and for template catalogs. The
//! format is chosen from the file extension.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Import a value from a `.yaml`, `.yml` or `.json` file.
pub fn import<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let extension = path.extension().and_then(|s| s.to_str());
    match extension {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        _ => bail!("Unsupported file extension: {:?}", extension),
    }
}

/// Import a value from YAML format.
pub fn import_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let data = serde_yaml::from_str(&yaml)
        .with_context(|| format!("Invalid YAML in {}", path.display()))?;
    Ok(data)
}

/// Import a value from JSON format.
pub fn import_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let data = serde_json::from_str(&json)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_import_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("values.yml");
        std::fs::write(&yaml, "a: 1\nb: 2\n").unwrap();
        let from_yaml: BTreeMap<String, u32> = import(&yaml).unwrap();

        let json = dir.path().join("values.json");
        std::fs::write(&json, r#"{"a": 1, "b": 2}"#).unwrap();
        let from_json: BTreeMap<String, u32> = import(&json).unwrap();

        assert_eq!(from_yaml, from_json);
        assert_eq!(from_yaml["b"], 2);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.toml");
        std::fs::write(&path, "a = 1").unwrap();
        assert!(import::<BTreeMap<String, u32>>(&path).is_err());
    }
}
