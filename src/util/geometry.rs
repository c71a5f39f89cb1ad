// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides utilities for coordinate transformations between
//! on-screen pixel coordinates and percentage coordinates (0 to 100).

/// A position in percent of the surface width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percent {
    pub x: f32,
    pub y: f32,
}

impl Percent {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Percent) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Convert a pointer position to percent of an on-screen box.
///
/// `origin` and `size` describe the box as displayed, not the pixel
/// resolution of whatever is drawn inside it.
pub fn to_percent(pointer: (f32, f32), origin: (f32, f32), size: (f32, f32)) -> Percent {
    let axis = |p: f32, o: f32, s: f32| if s > 0.0 { (p - o) / s * 100.0 } else { 0.0 };
    Percent {
        x: axis(pointer.0, origin.0, size.0),
        y: axis(pointer.1, origin.1, size.1),
    }
}

/// Convert a percent position to pixel coordinates of a surface.
pub fn from_percent(point: Percent, width: u32, height: u32) -> (f32, f32) {
    (point.x / 100.0 * width as f32, point.y / 100.0 * height as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_roundtrip() {
        let p = to_percent((260.0, 135.0), (10.0, 10.0), (500.0, 250.0));
        assert_eq!(p, Percent::new(50.0, 50.0));

        let (x, y) = from_percent(p, 800, 800);
        assert!((x - 400.0).abs() < 0.0001);
        assert!((y - 400.0).abs() < 0.0001);
    }

    #[test]
    fn test_percent_corners() {
        let tl = to_percent((100.0, 50.0), (100.0, 50.0), (300.0, 300.0));
        assert_eq!(tl, Percent::new(0.0, 0.0));

        let br = to_percent((400.0, 350.0), (100.0, 50.0), (300.0, 300.0));
        assert_eq!(br, Percent::new(100.0, 100.0));
    }

    #[test]
    fn test_degenerate_box() {
        assert_eq!(to_percent((5.0, 5.0), (0.0, 0.0), (0.0, 0.0)), Percent::new(0.0, 0.0));
    }

    #[test]
    fn test_distance() {
        assert_eq!(Percent::new(0.0, 0.0).distance(Percent::new(6.0, 8.0)), 10.0);
    }
}
