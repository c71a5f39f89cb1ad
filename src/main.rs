// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Meme Creator
//!
//! A cross-platform desktop meme editor: pick a template or upload your own
//! image, add outlined text, drag it into place and export a PNG.

mod app;
mod config;
mod drag;
mod io;
mod models;
mod render;
mod ui;
mod util;

use anyhow::Result;
use app::MemeCreatorApp;
use config::EditorConfig;
use models::template::TemplateCatalog;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = EditorConfig::from_env()?;
    let catalog = match &config.template_catalog {
        Some(path) => TemplateCatalog::load(path)?,
        None => TemplateCatalog::builtin()?,
    };
    log::info!("Loaded {} templates", catalog.templates().len());

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([900.0, 640.0])
            .with_title("Meme Creator")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Meme Creator",
        options,
        Box::new(move |_cc| Ok(Box::new(MemeCreatorApp::new(config, catalog)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
