// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hit-testing and dragging of text elements on the preview.
//!
//! Pointer events arrive already converted to percent coordinates. A hit
//! selects the element and arms a drag; moves reposition it, clamped to
//! the safe area; release or leaving the surface ends the drag.

use crate::models::text_element::TextElement;
use crate::util::geometry::Percent;

/// Hit radius around an element's anchor, in percent.
pub const HIT_TOLERANCE: f32 = 10.0;

/// Allowed anchor range while dragging.
pub const DRAG_X_RANGE: (f32, f32) = (5.0, 95.0);
pub const DRAG_Y_RANGE: (f32, f32) = (10.0, 90.0);

/// Pointer input on the preview surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Percent),
    Move(Percent),
    Up,
    Leave,
}

/// What the editor should do in response to a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEffect {
    None,
    Select(String),
    Move { id: String, x: f32, y: f32 },
}

#[derive(Debug, Clone, PartialEq)]
struct DragSession {
    id: String,
    /// Pointer minus element anchor at the time of the hit.
    offset: Percent,
}

/// Tracks the current drag session, if any.
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn handle(&mut self, event: PointerEvent, elements: &[TextElement]) -> DragEffect {
        match event {
            PointerEvent::Down(pointer) => match hit_test(elements, pointer) {
                Some(element) => {
                    self.session = Some(DragSession {
                        id: element.id.clone(),
                        offset: Percent::new(pointer.x - element.x, pointer.y - element.y),
                    });
                    log::debug!("Started dragging text element {}", element.id);
                    DragEffect::Select(element.id.clone())
                }
                None => DragEffect::None,
            },
            PointerEvent::Move(pointer) => match &self.session {
                Some(session) => {
                    let target = clamp_to_drag_bounds(Percent::new(
                        pointer.x - session.offset.x,
                        pointer.y - session.offset.y,
                    ));
                    DragEffect::Move { id: session.id.clone(), x: target.x, y: target.y }
                }
                None => DragEffect::None,
            },
            PointerEvent::Up | PointerEvent::Leave => {
                if let Some(session) = self.session.take() {
                    log::debug!("Stopped dragging text element {}", session.id);
                }
                DragEffect::None
            }
        }
    }
}

/// First element, in list order, whose anchor is strictly within
/// [`HIT_TOLERANCE`] of `pointer`. A later, closer element does not win.
pub fn hit_test(elements: &[TextElement], pointer: Percent) -> Option<&TextElement> {
    elements
        .iter()
        .find(|e| pointer.distance(Percent::new(e.x, e.y)) < HIT_TOLERANCE)
}

pub fn clamp_to_drag_bounds(point: Percent) -> Percent {
    Percent {
        x: point.x.clamp(DRAG_X_RANGE.0, DRAG_X_RANGE.1),
        y: point.y.clamp(DRAG_Y_RANGE.0, DRAG_Y_RANGE.1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements() -> Vec<TextElement> {
        vec![
            TextElement::new("1", "TOP TEXT", 50.0, 20.0, 32),
            TextElement::new("2", "BOTTOM TEXT", 50.0, 80.0, 32),
        ]
    }

    #[test]
    fn test_exact_position_hits() {
        let elements = elements();
        for element in &elements {
            let hit = hit_test(&elements, Percent::new(element.x, element.y)).unwrap();
            assert_eq!(hit.id, element.id);
        }
    }

    #[test]
    fn test_tolerance_is_exclusive() {
        let elements = elements();
        assert!(hit_test(&elements, Percent::new(59.9, 20.0)).is_some());
        assert!(hit_test(&elements, Percent::new(60.0, 20.0)).is_none());
        assert!(hit_test(&elements, Percent::new(56.0, 28.0)).is_none());
        assert!(hit_test(&elements, Percent::new(50.0, 50.0)).is_none());
    }

    #[test]
    fn test_first_match_wins_over_nearest() {
        let elements = vec![
            TextElement::new("a", "A", 50.0, 50.0, 24),
            TextElement::new("b", "B", 55.0, 50.0, 24),
        ];
        // Pointer sits exactly on "b" but "a" is first and within range.
        let hit = hit_test(&elements, Percent::new(55.0, 50.0)).unwrap();
        assert_eq!(hit.id, "a");
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let elements = elements();
        let mut drag = DragController::new();

        let effect = drag.handle(PointerEvent::Down(Percent::new(53.0, 22.0)), &elements);
        assert_eq!(effect, DragEffect::Select("1".into()));
        assert!(drag.is_dragging());

        let effect = drag.handle(PointerEvent::Move(Percent::new(63.0, 42.0)), &elements);
        assert_eq!(effect, DragEffect::Move { id: "1".into(), x: 60.0, y: 40.0 });
    }

    #[test]
    fn test_drag_is_clamped() {
        let elements = elements();
        let mut drag = DragController::new();
        drag.handle(PointerEvent::Down(Percent::new(50.0, 80.0)), &elements);

        for pointer in [
            Percent::new(-500.0, -500.0),
            Percent::new(500.0, 500.0),
            Percent::new(0.0, 100.0),
            Percent::new(f32::MAX, f32::MIN),
        ] {
            match drag.handle(PointerEvent::Move(pointer), &elements) {
                DragEffect::Move { x, y, .. } => {
                    assert!((5.0..=95.0).contains(&x), "x = {}", x);
                    assert!((10.0..=90.0).contains(&y), "y = {}", y);
                }
                other => panic!("expected a move, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_miss_does_not_arm_drag() {
        let elements = elements();
        let mut drag = DragController::new();

        assert_eq!(drag.handle(PointerEvent::Down(Percent::new(5.0, 50.0)), &elements), DragEffect::None);
        assert!(!drag.is_dragging());
        assert_eq!(drag.handle(PointerEvent::Move(Percent::new(50.0, 50.0)), &elements), DragEffect::None);
    }

    #[test]
    fn test_up_and_leave_end_session() {
        let elements = elements();
        let mut drag = DragController::new();

        for end in [PointerEvent::Up, PointerEvent::Leave] {
            drag.handle(PointerEvent::Down(Percent::new(50.0, 20.0)), &elements);
            assert!(drag.is_dragging());
            drag.handle(end, &elements);
            assert!(!drag.is_dragging());
            assert_eq!(drag.handle(PointerEvent::Move(Percent::new(70.0, 70.0)), &elements), DragEffect::None);
        }
    }
}
