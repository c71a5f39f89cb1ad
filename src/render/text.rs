// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text rasterization for overlay labels.
//!
//! Fonts are looked up by family name through `font-kit` and rasterized
//! with `ab_glyph` into single-channel coverage masks. Outlines are made
//! by dilating the fill mask, which matches a stroke centred on the glyph
//! contour once the fill is painted over it.

use crate::models::text_element::{FontFamily, GenericFamily};
use ab_glyph::{point, Font, FontArc, Glyph, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::collections::HashMap;

/// Resolves [`FontFamily`] values to loaded fonts, caching lookups.
#[derive(Clone)]
pub struct FontBook {
    fonts: HashMap<FontFamily, Option<FontArc>>,
    use_system: bool,
}

impl FontBook {
    /// Look fonts up on the system as they are first needed.
    pub fn system() -> Self {
        Self { fonts: HashMap::new(), use_system: true }
    }

    /// A font book that only knows fonts added with [`FontBook::insert`].
    pub fn empty() -> Self {
        Self { fonts: HashMap::new(), use_system: false }
    }

    pub fn insert(&mut self, family: FontFamily, font: FontArc) {
        self.fonts.insert(family, Some(font));
    }

    /// The font for `family`, or its generic fallback. `None` when nothing
    /// suitable is installed.
    pub fn resolve(&mut self, family: FontFamily) -> Option<FontArc> {
        let use_system = self.use_system;
        self.fonts
            .entry(family)
            .or_insert_with(|| {
                if !use_system {
                    return None;
                }
                let font = load_system_font(family);
                match &font {
                    Some(_) => log::debug!("Resolved font {}", family),
                    None => log::warn!("No font found for {} or its fallback; text will be skipped", family),
                }
                font
            })
            .clone()
    }
}

fn load_system_font(family: FontFamily) -> Option<FontArc> {
    use font_kit::family_name::FamilyName;
    use font_kit::properties::Properties;
    use font_kit::source::SystemSource;

    let generic = match family.generic() {
        GenericFamily::SansSerif => FamilyName::SansSerif,
        GenericFamily::Serif => FamilyName::Serif,
        GenericFamily::Monospace => FamilyName::Monospace,
    };

    let handle = SystemSource::new()
        .select_best_match(&[FamilyName::Title(family.name().to_string()), generic], &Properties::new())
        .ok()?;
    let font = handle.load().ok()?;
    let data = font.copy_font_data()?;
    FontArc::try_from_vec((*data).clone()).ok()
}

/// Convert a CSS-style em size in pixels to an `ab_glyph` scale, which is
/// measured from ascent to descent rather than per em.
pub fn em_to_scale(font: &FontArc, em_px: f32) -> PxScale {
    match font.units_per_em() {
        Some(units) if units > 0.0 => PxScale::from(em_px * font.height_unscaled() / units),
        _ => PxScale::from(em_px),
    }
}

/// Advance width of a single line of text.
pub fn measure(font: &FontArc, text: &str, em_px: f32) -> f32 {
    layout(font, text, em_px, 0.0, 0.0).1
}

/// Lay out one line left-aligned with its baseline at `(x, baseline)`.
/// Returns the glyphs and the total advance width.
fn layout(font: &FontArc, text: &str, em_px: f32, x: f32, baseline: f32) -> (Vec<Glyph>, f32) {
    let scale = em_to_scale(font, em_px);
    let scaled = font.as_scaled(scale);

    let mut glyphs = Vec::with_capacity(text.len());
    let mut cursor = 0.0f32;
    let mut previous = None;

    for ch in text.chars().filter(|c| !c.is_control()) {
        let id = font.glyph_id(ch);
        if let Some(prev) = previous {
            cursor += scaled.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(x + cursor, baseline)));
        cursor += scaled.h_advance(id);
        previous = Some(id);
    }

    (glyphs, cursor)
}

/// Single-channel coverage over a rectangle of the target surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<f32>,
}

impl Mask {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height, coverage: vec![0.0; width as usize * height as usize] }
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.coverage[y as usize * self.width as usize + x as usize]
    }

    fn accumulate(&mut self, x: i32, y: i32, value: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.coverage[idx] = (self.coverage[idx] + value).min(1.0);
    }

    /// Grow the covered area by `radius` pixels in every direction (a
    /// disc-shaped max filter). The mask keeps its bounds, so it must
    /// already be padded by at least `radius`.
    pub fn dilate(&self, radius: f32) -> Mask {
        if radius <= 0.0 {
            return self.clone();
        }

        let reach = radius.ceil() as i32;
        let r2 = radius * radius;
        let offsets: Vec<(i32, i32)> = (-reach..=reach)
            .flat_map(|dy| (-reach..=reach).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| (dx * dx + dy * dy) as f32 <= r2)
            .collect();

        let mut out = Mask::new(self.x, self.y, self.width, self.height);
        let (w, h) = (self.width as i32, self.height as i32);

        for sy in 0..h {
            for sx in 0..w {
                let value = self.coverage[(sy * w + sx) as usize];
                if value <= 0.0 {
                    continue;
                }
                for &(dx, dy) in &offsets {
                    let (tx, ty) = (sx + dx, sy + dy);
                    if tx < 0 || ty < 0 || tx >= w || ty >= h {
                        continue;
                    }
                    let idx = (ty * w + tx) as usize;
                    if out.coverage[idx] < value {
                        out.coverage[idx] = value;
                    }
                }
            }
        }

        out
    }

    /// Paint `color` through this mask onto `canvas` (source-over).
    pub fn paint(&self, canvas: &mut RgbaImage, color: [u8; 4]) {
        let (cw, ch) = (canvas.width() as i32, canvas.height() as i32);
        for my in 0..self.height {
            let py = self.y + my as i32;
            if py < 0 || py >= ch {
                continue;
            }
            for mx in 0..self.width {
                let px = self.x + mx as i32;
                if px < 0 || px >= cw {
                    continue;
                }
                let cov = self.get(mx, my);
                if cov <= 0.0 {
                    continue;
                }
                let dst = canvas.get_pixel_mut(px as u32, py as u32);
                *dst = blend(*dst, color, cov);
            }
        }
    }
}

/// Source-over blend of `color` at `coverage` onto `dst`.
pub fn blend(dst: Rgba<u8>, color: [u8; 4], coverage: f32) -> Rgba<u8> {
    let sa = color[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| {
        let c = (color[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([channel(0), channel(1), channel(2), (out_a * 255.0).round() as u8])
}

/// Rasterize `text` centred on `(cx, cy)`: horizontally on its advance
/// width, vertically on the middle of the em box. The mask is padded by
/// `pad` pixels so it can be dilated for an outline.
///
/// Returns `None` for text with no visible glyphs.
pub fn rasterize_centered(
    font: &FontArc,
    text: &str,
    em_px: f32,
    cx: f32,
    cy: f32,
    pad: f32,
) -> Option<Mask> {
    let scaled = font.as_scaled(em_to_scale(font, em_px));
    // descent is negative; this puts the em-box middle on cy
    let baseline = cy + (scaled.ascent() + scaled.descent()) / 2.0;
    let width = measure(font, text, em_px);
    let (glyphs, _) = layout(font, text, em_px, cx - width / 2.0, baseline);

    let outlined: Vec<_> = glyphs.into_iter().filter_map(|g| font.outline_glyph(g)).collect();
    if outlined.is_empty() {
        return None;
    }

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (f32::MAX, f32::MAX, f32::MIN, f32::MIN);
    for glyph in &outlined {
        let bounds = glyph.px_bounds();
        min_x = min_x.min(bounds.min.x);
        min_y = min_y.min(bounds.min.y);
        max_x = max_x.max(bounds.max.x);
        max_y = max_y.max(bounds.max.y);
    }

    let pad = pad.max(0.0).ceil() + 1.0;
    let x0 = (min_x - pad).floor() as i32;
    let y0 = (min_y - pad).floor() as i32;
    let x1 = (max_x + pad).ceil() as i32;
    let y1 = (max_y + pad).ceil() as i32;

    let mut mask = Mask::new(x0, y0, (x1 - x0).max(0) as u32, (y1 - y0).max(0) as u32);
    for glyph in &outlined {
        let bounds = glyph.px_bounds();
        let gx = bounds.min.x as i32 - x0;
        let gy = bounds.min.y as i32 - y0;
        glyph.draw(|x, y, c| mask.accumulate(gx + x as i32, gy + y as i32, c));
    }

    Some(mask)
}
