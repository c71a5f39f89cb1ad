// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Meme template catalog.
//!
//! Templates are a fixed list of background images. The built-in list is
//! embedded at compile time; a replacement list can be loaded from a YAML
//! or JSON file named in the configuration.

use crate::io::media::MediaLocator;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_TEMPLATES: &str = include_str!("../../assets/templates.yaml");

/// A selectable background image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemeTemplate {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub category: String,
}

impl MemeTemplate {
    pub fn locator(&self) -> MediaLocator {
        MediaLocator::parse(&self.url)
    }
}

/// Ordered list of templates with unique ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCatalog {
    templates: Vec<MemeTemplate>,
}

impl TemplateCatalog {
    /// The catalog shipped with the application.
    pub fn builtin() -> Result<Self> {
        let templates: Vec<MemeTemplate> = serde_yaml::from_str(BUILTIN_TEMPLATES)?;
        Self::from_templates(templates)
    }

    /// Load a catalog file (`.yaml`, `.yml` or `.json`).
    pub fn load(path: &Path) -> Result<Self> {
        let templates: Vec<MemeTemplate> = crate::io::serialization::import(path)?;
        log::info!("Loaded {} templates from {}", templates.len(), path.display());
        Self::from_templates(templates)
    }

    pub fn from_templates(templates: Vec<MemeTemplate>) -> Result<Self> {
        let mut seen = HashSet::new();
        for template in &templates {
            if !seen.insert(template.id.as_str()) {
                bail!("Duplicate template id: {}", template.id);
            }
        }
        Ok(Self { templates })
    }

    pub fn templates(&self) -> &[MemeTemplate] {
        &self.templates
    }

    /// Template whose image is `locator`, if any.
    pub fn find_by_locator(&self, locator: &MediaLocator) -> Option<&MemeTemplate> {
        self.templates.iter().find(|t| &t.locator() == locator)
    }
}
