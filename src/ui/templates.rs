// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Template picker and media upload panel.

use crate::io::media::{MediaLocator, BROWSE_EXTENSIONS};
use crate::models::editor::EditorState;
use crate::models::template::TemplateCatalog;
use std::path::PathBuf;

/// Result of the background panel.
pub enum BackgroundAction {
    None,
    SelectTemplate(MediaLocator),
    Upload(Vec<PathBuf>),
    ClearUpload,
}

/// Display the template grid and the upload drop zone.
///
/// `drop_hover` highlights the drop zone while files are dragged over
/// the window.
pub fn show(
    ui: &mut egui::Ui,
    catalog: &TemplateCatalog,
    state: &EditorState,
    drop_hover: bool,
) -> BackgroundAction {
    let mut action = BackgroundAction::None;

    ui.heading("Choose Template");
    ui.add_space(4.0);

    egui::Grid::new("templates")
        .num_columns(2)
        .spacing([8.0, 8.0])
        .show(ui, |ui| {
            for (i, template) in catalog.templates().iter().enumerate() {
                let locator = template.locator();
                let selected = state.selected_template() == Some(&locator);
                let label = if selected {
                    format!("✔ {}", template.name)
                } else {
                    template.name.clone()
                };

                let response = ui
                    .add_sized([110.0, 40.0], egui::SelectableLabel::new(selected, label))
                    .on_hover_text(template.category.as_str());
                if response.clicked() {
                    action = BackgroundAction::SelectTemplate(locator);
                }

                if i % 2 == 1 {
                    ui.end_row();
                }
            }
        });

    ui.add_space(12.0);
    ui.separator();
    ui.heading("Upload Media");
    ui.add_space(4.0);

    let stroke_color = if drop_hover {
        egui::Color32::from_rgb(0xA8, 0x55, 0xF7)
    } else {
        egui::Color32::from_gray(120)
    };

    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(2.0, stroke_color))
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label("Drop your image, GIF, or video here");
                ui.label(egui::RichText::new("Supports JPG, PNG, GIF, MP4, WebM").small().weak());
                ui.add_space(6.0);
                if ui.button("Browse Files").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images and videos", BROWSE_EXTENSIONS)
                        .pick_file()
                    {
                        action = BackgroundAction::Upload(vec![path]);
                    }
                }
            });
        });

    if let Some(upload) = state.uploaded_media() {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(format!("Using {}", upload.locator)).small());
            if ui.small_button("✖").on_hover_text("Back to template").clicked() {
                action = BackgroundAction::ClearUpload;
            }
        });
    }

    action
}
