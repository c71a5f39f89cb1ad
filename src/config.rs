// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.
//!
//! Every setting has a default, so a config file only needs the values
//! it changes. The file is named by the `MEME_CREATOR_CONFIG` environment
//! variable and may be YAML or JSON.

use crate::render::compositor::RenderTarget;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "MEME_CREATOR_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Side of the square exported image, in pixels.
    pub export_size: u32,
    /// Largest side of the live preview, in points.
    pub preview_max_size: f32,
    /// Surface width at which font sizes are specified.
    pub reference_width: f32,
    pub download_file_name: String,
    pub share_file_name: String,
    /// Save downloads here instead of asking with a dialog.
    pub download_dir: Option<PathBuf>,
    pub notification_seconds: f32,
    pub http_timeout_seconds: u64,
    /// Replacement template catalog (YAML or JSON).
    pub template_catalog: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            export_size: 800,
            preview_max_size: 500.0,
            reference_width: 400.0,
            download_file_name: "my-awesome-meme.png".to_string(),
            share_file_name: "meme.png".to_string(),
            download_dir: None,
            notification_seconds: 4.0,
            http_timeout_seconds: 15,
            template_catalog: None,
        }
    }
}

impl EditorConfig {
    /// Load from the file named by `MEME_CREATOR_CONFIG`, or use defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = crate::io::serialization::import(path)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn export_target(&self) -> RenderTarget {
        RenderTarget::square(self.export_size, self.reference_width)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs_f32(self.notification_seconds.max(0.0))
    }
}
