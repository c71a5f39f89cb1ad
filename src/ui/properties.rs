// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text customisation panel.
//!
//! This module provides the panel for choosing which text element to
//! edit and changing its content, font, size, colours and outline.

use crate::models::editor::{EditorAction, EditorState};
use crate::models::text_element::{
    FontFamily, HexColor, TextUpdate, FONT_SIZE_RANGE, PALETTE, STROKE_WIDTH_RANGE,
};

/// Display the text customiser. Returns the action the user took, if any.
pub fn show(ui: &mut egui::Ui, state: &EditorState) -> Option<EditorAction> {
    let mut action = None;

    ui.heading("Customize Text");
    ui.add_space(4.0);

    ui.label(egui::RichText::new("Text Elements").strong());
    ui.horizontal_wrapped(|ui| {
        for (i, element) in state.elements().iter().enumerate() {
            let selected = element.id == state.selected_id();
            if ui.selectable_label(selected, format!("Text {}", i + 1)).clicked() {
                action = Some(EditorAction::SelectText(element.id.clone()));
            }
        }
        if ui.button("➕").on_hover_text("Add text").clicked() {
            action = Some(EditorAction::AddText);
        }
        if state.elements().len() > 1
            && ui
                .button(egui::RichText::new("🗑").color(egui::Color32::from_rgb(0xEF, 0x44, 0x44)))
                .on_hover_text("Delete selected text")
                .clicked()
        {
            action = Some(EditorAction::DeleteText(state.selected_id().to_string()));
        }
    });

    let Some(selected) = state.selected() else {
        return action;
    };
    let id = selected.id.clone();
    let update = |update: TextUpdate| Some(EditorAction::UpdateText { id: id.clone(), update });

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Text Content").strong());
    let mut text = selected.text.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut text)
            .hint_text("Enter your meme text...")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        action = update(TextUpdate::text(text));
    }

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Font Style").strong());
    let mut family = selected.font_family;
    egui::ComboBox::from_id_source("font_family")
        .selected_text(family.name())
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for option in FontFamily::ALL {
                ui.selectable_value(&mut family, option, option.name());
            }
        });
    if family != selected.font_family {
        action = update(TextUpdate { font_family: Some(family), ..Default::default() });
    }

    ui.add_space(8.0);
    ui.label(egui::RichText::new(format!("Font Size: {}px", selected.font_size)).strong());
    let mut size = selected.font_size;
    if ui
        .add(egui::Slider::new(&mut size, FONT_SIZE_RANGE).step_by(2.0).show_value(false))
        .changed()
    {
        action = update(TextUpdate { font_size: Some(size), ..Default::default() });
    }

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Text Color").strong());
    if let Some(color) = swatches(ui, "text_color", selected.color) {
        action = update(TextUpdate { color: Some(color), ..Default::default() });
    }

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Stroke Color").strong());
    if let Some(color) = swatches(ui, "stroke_color", selected.stroke_color) {
        action = update(TextUpdate { stroke_color: Some(color), ..Default::default() });
    }

    ui.add_space(8.0);
    ui.label(egui::RichText::new(format!("Stroke Width: {}px", selected.stroke_width)).strong());
    let mut width = selected.stroke_width;
    if ui
        .add(egui::Slider::new(&mut width, STROKE_WIDTH_RANGE).show_value(false))
        .changed()
    {
        action = update(TextUpdate { stroke_width: Some(width), ..Default::default() });
    }

    action
}

/// Palette grid; returns the clicked colour.
fn swatches(ui: &mut egui::Ui, id: &str, current: HexColor) -> Option<HexColor> {
    let mut picked = None;
    egui::Grid::new(id).spacing([6.0, 6.0]).show(ui, |ui| {
        for (i, color) in PALETTE.iter().enumerate() {
            let [r, g, b, a] = color.rgba();
            let selected = *color == current;
            let stroke = if selected {
                egui::Stroke::new(2.5, egui::Color32::from_gray(30))
            } else {
                egui::Stroke::new(1.0, egui::Color32::from_gray(160))
            };
            let button = egui::Button::new("")
                .fill(egui::Color32::from_rgba_unmultiplied(r, g, b, a))
                .stroke(stroke)
                .min_size(egui::vec2(26.0, 26.0));
            if ui.add(button).on_hover_text(color.to_string()).clicked() {
                picked = Some(*color);
            }
            if i % 6 == 5 {
                ui.end_row();
            }
        }
    });
    picked
}
