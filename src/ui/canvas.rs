// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Live preview canvas.
//!
//! This module shows the composited meme and turns mouse input on it
//! into pointer events in percent coordinates of the displayed square.

use crate::drag::PointerEvent;
use crate::util::geometry::to_percent;

const CORNER_RADIUS: f32 = 16.0;

/// Result of canvas interaction.
pub struct CanvasResponse {
    pub event: Option<PointerEvent>,
    /// Pixel resolution the preview should be rendered at.
    pub pixel_size: u32,
}

/// Pointer state sampled once per frame.
#[derive(Debug, Clone, Copy, Default)]
struct PointerInput {
    pressed: bool,
    released: bool,
    /// Movement since last frame; any non-zero delta counts as a move.
    delta: egui::Vec2,
    interact_pos: Option<egui::Pos2>,
    hover_pos: Option<egui::Pos2>,
}

fn pointer_event(input: &PointerInput, rect: egui::Rect, hovered: bool, dragging: bool) -> Option<PointerEvent> {
    let percent = |pos: egui::Pos2| to_percent((pos.x, pos.y), (rect.min.x, rect.min.y), (rect.width(), rect.height()));

    if input.pressed && hovered {
        return input.interact_pos.map(|pos| PointerEvent::Down(percent(pos)));
    }
    if !dragging {
        return None;
    }
    match input.hover_pos {
        _ if input.released => Some(PointerEvent::Up),
        Some(pos) if rect.contains(pos) => {
            (input.delta != egui::Vec2::ZERO).then(|| PointerEvent::Move(percent(pos)))
        }
        _ => Some(PointerEvent::Leave),
    }
}

/// Display the preview square and translate mouse input.
///
/// `dragging` tells the canvas a drag session is live, so moves and
/// leaving the square are reported.
pub fn show(
    ui: &mut egui::Ui,
    texture: Option<&egui::TextureHandle>,
    max_size: f32,
    dragging: bool,
    loading: bool,
) -> CanvasResponse {
    let side = ui.available_width().min(max_size).max(1.0);
    let pixel_size = (side * ui.ctx().pixels_per_point()).round().max(1.0) as u32;

    let (rect, response) = ui.allocate_exact_size(egui::vec2(side, side), egui::Sense::click_and_drag());
    let painter = ui.painter_at(rect);

    match texture {
        Some(texture) => {
            egui::Image::from_texture(egui::load::SizedTexture::from_handle(texture))
                .rounding(CORNER_RADIUS)
                .paint_at(ui, rect);
        }
        None => {
            painter.rect_filled(rect, CORNER_RADIUS, egui::Color32::from_gray(40));
        }
    }
    painter.rect_stroke(rect, CORNER_RADIUS, egui::Stroke::new(2.0, egui::Color32::from_gray(200)));

    if loading {
        let spinner_rect = egui::Rect::from_min_size(rect.min + egui::vec2(12.0, 12.0), egui::vec2(20.0, 20.0));
        ui.put(spinner_rect, egui::Spinner::new());
    }

    if response.hovered() || dragging {
        ui.ctx().set_cursor_icon(if dragging {
            egui::CursorIcon::Grabbing
        } else {
            egui::CursorIcon::PointingHand
        });
    }

    let input = ui.input(|i| PointerInput {
        pressed: i.pointer.primary_pressed(),
        released: i.pointer.primary_released(),
        delta: i.pointer.delta(),
        interact_pos: i.pointer.interact_pos(),
        hover_pos: i.pointer.hover_pos(),
    });
    let event = pointer_event(&input, rect, response.hovered(), dragging);

    ui.add_space(8.0);
    ui.vertical_centered(|ui| {
        ui.label(
            egui::RichText::new("🎯 Click and drag text to reposition • Click to select different text elements")
                .weak(),
        );
    });

    CanvasResponse { event, pixel_size }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::geometry::Percent;

    fn rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(200.0, 200.0))
    }

    fn hovering(pos: egui::Pos2, delta: egui::Vec2) -> PointerInput {
        PointerInput { delta, interact_pos: Some(pos), hover_pos: Some(pos), ..Default::default() }
    }

    #[test]
    fn test_press_inside_is_down_in_percent() {
        let input = PointerInput { pressed: true, ..hovering(egui::pos2(200.0, 100.0), egui::Vec2::ZERO) };
        assert_eq!(
            pointer_event(&input, rect(), true, false),
            Some(PointerEvent::Down(Percent::new(50.0, 25.0)))
        );
        assert_eq!(pointer_event(&input, rect(), false, false), None);
    }

    #[test]
    fn test_any_movement_while_dragging_is_a_move() {
        // A single small step, as from a slow drag with no velocity history.
        let input = hovering(egui::pos2(150.0, 150.0), egui::vec2(0.5, 0.0));
        assert_eq!(
            pointer_event(&input, rect(), true, true),
            Some(PointerEvent::Move(Percent::new(25.0, 50.0)))
        );

        let still = hovering(egui::pos2(150.0, 150.0), egui::Vec2::ZERO);
        assert_eq!(pointer_event(&still, rect(), true, true), None);
    }

    #[test]
    fn test_movement_without_drag_is_ignored() {
        let input = hovering(egui::pos2(150.0, 150.0), egui::vec2(3.0, 3.0));
        assert_eq!(pointer_event(&input, rect(), true, false), None);
    }

    #[test]
    fn test_release_and_leave_end_drag() {
        let release = PointerInput { released: true, ..hovering(egui::pos2(150.0, 150.0), egui::Vec2::ZERO) };
        assert_eq!(pointer_event(&release, rect(), true, true), Some(PointerEvent::Up));

        let outside = hovering(egui::pos2(10.0, 10.0), egui::vec2(1.0, 0.0));
        assert_eq!(pointer_event(&outside, rect(), false, true), Some(PointerEvent::Leave));

        let gone = PointerInput::default();
        assert_eq!(pointer_event(&gone, rect(), false, true), Some(PointerEvent::Leave));
    }

    #[test]
    fn test_preview_image_shares_frame_rounding() {
        let ctx = egui::Context::default();
        let texture = ctx.load_texture(
            "preview",
            egui::ColorImage::new([4, 4], egui::Color32::RED),
            egui::TextureOptions::LINEAR,
        );

        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                show(ui, Some(&texture), 200.0, false, false);
            });
        });

        let rounding = output.shapes.iter().find_map(|clipped| match &clipped.shape {
            egui::Shape::Rect(rect) if rect.fill_texture_id == texture.id() => Some(rect.rounding),
            _ => None,
        });
        assert_eq!(rounding, Some(egui::Rounding::same(CORNER_RADIUS)));
    }
}
