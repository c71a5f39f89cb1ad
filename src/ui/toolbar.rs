// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Export toolbar.
//!
//! This module provides the buttons that download or share the finished
//! meme.

/// Export requested from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Download,
    Share,
}

/// Display the export buttons. `busy` shows a spinner while exports are
/// rendering; the buttons stay enabled.
pub fn show(ui: &mut egui::Ui, busy: bool) -> Option<ExportKind> {
    let mut requested = None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 12.0;

        let download = egui::Button::new(egui::RichText::new("⬇ Download Meme").strong().size(16.0))
            .fill(egui::Color32::from_rgb(0x10, 0xB9, 0x81))
            .min_size(egui::vec2(180.0, 40.0));
        if ui.add(download).clicked() {
            requested = Some(ExportKind::Download);
        }

        let share = egui::Button::new(egui::RichText::new("🔗 Share Now").strong().size(16.0))
            .fill(egui::Color32::from_rgb(0x8B, 0x5C, 0xF6))
            .min_size(egui::vec2(180.0, 40.0));
        if ui.add(share).clicked() {
            requested = Some(ExportKind::Share);
        }

        if busy {
            ui.spinner();
        }
    });

    ui.label(egui::RichText::new("🔥 Your meme is ready to go viral!").italics().weak());

    requested
}
