// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background and text compositing.
//!
//! One compositor serves both the live preview and the export. Text is
//! sized relative to the surface width so both render the same layout at
//! different resolutions.

use super::deferred::Deferred;
use super::text::{self, FontBook};
use crate::io::media::{self, MediaLocator};
use crate::models::text_element::TextElement;
use crate::util::geometry::{from_percent, Percent};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::sync::Arc;
use std::time::Duration;

/// Gradient drawn when there is no background, top-left to bottom-right.
pub const GRADIENT_START: [u8; 4] = [0x66, 0x7E, 0xEA, 0xFF];
pub const GRADIENT_END: [u8; 4] = [0x76, 0x4B, 0xA2, 0xFF];

const SELECTION_COLOR: [u8; 4] = [0xFF, 0x6B, 0x6B, 0xFF];
const SELECTION_DASH: u32 = 5;

/// Output surface dimensions plus the width at which font sizes are
/// specified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTarget {
    pub width: u32,
    pub height: u32,
    pub reference_width: f32,
}

impl RenderTarget {
    pub fn new(width: u32, height: u32, reference_width: f32) -> Self {
        Self { width, height, reference_width }
    }

    /// Square surface.
    pub fn square(size: u32, reference_width: f32) -> Self {
        Self::new(size, size, reference_width)
    }

    /// Multiplier applied to font sizes and stroke widths.
    pub fn text_scale(&self) -> f32 {
        if self.reference_width > 0.0 {
            self.width as f32 / self.reference_width
        } else {
            1.0
        }
    }
}

/// Renders backgrounds and text overlays onto RGBA surfaces.
pub struct Compositor {
    fonts: FontBook,
}

impl Compositor {
    pub fn new(fonts: FontBook) -> Self {
        Self { fonts }
    }

    /// Fonts resolved so far, for handing to an off-thread render.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Composite `elements` over `background` (or the default gradient).
    ///
    /// `selection` draws a dashed box around that element; the export
    /// passes `None`.
    pub fn render(
        &mut self,
        background: Option<&RgbaImage>,
        elements: &[TextElement],
        target: RenderTarget,
        selection: Option<&str>,
    ) -> RgbaImage {
        let mut canvas = RgbaImage::new(target.width, target.height);
        if target.width == 0 || target.height == 0 {
            return canvas;
        }

        match background {
            Some(image) => draw_stretched(&mut canvas, image),
            None => fill_gradient(&mut canvas, GRADIENT_START, GRADIENT_END),
        }

        let scale = target.text_scale();
        for element in elements {
            self.draw_text(&mut canvas, element, scale);
        }

        if let Some(element) = selection.and_then(|id| elements.iter().find(|e| e.id == id)) {
            self.draw_selection(&mut canvas, element, scale);
        }

        canvas
    }

    fn draw_text(&mut self, canvas: &mut RgbaImage, element: &TextElement, scale: f32) {
        if element.text.is_empty() {
            return;
        }
        let Some(font) = self.fonts.resolve(element.font_family) else {
            return;
        };

        let (cx, cy) = anchor(element, canvas);
        let em_px = element.font_size as f32 * scale;
        // Canvas-style strokes are centred on the contour, so only half
        // of the line width shows outside the fill.
        let line_width = element.stroke_width as f32 * 2.0 * scale;
        let outset = line_width / 2.0;

        let Some(fill) = text::rasterize_centered(&font, &element.text, em_px, cx, cy, outset) else {
            return;
        };

        if element.stroke_width > 0 {
            fill.dilate(outset).paint(canvas, element.stroke_color.rgba());
        }
        fill.paint(canvas, element.color.rgba());
    }

    fn draw_selection(&mut self, canvas: &mut RgbaImage, element: &TextElement, scale: f32) {
        let (cx, cy) = anchor(element, canvas);
        let em_px = element.font_size as f32 * scale;
        let text_width = self
            .fonts
            .resolve(element.font_family)
            .map(|font| text::measure(&font, &element.text, em_px))
            .unwrap_or(0.0);

        let x = cx - text_width / 2.0 - 10.0;
        let y = cy - em_px / 2.0 - 5.0;
        dashed_rect(
            canvas,
            x.round() as i32,
            y.round() as i32,
            (text_width + 20.0).round() as i32,
            (em_px + 10.0).round() as i32,
            SELECTION_COLOR,
        );
    }

    /// Composite off the UI thread, loading the background first.
    ///
    /// With no background the result is computed immediately. A
    /// background that fails to load is replaced by the gradient.
    pub fn render_async(
        fonts: FontBook,
        background: Option<BackgroundInput>,
        elements: Arc<Vec<TextElement>>,
        target: RenderTarget,
        fetch_timeout: Duration,
    ) -> Deferred<RgbaImage> {
        match background {
            None => {
                let mut compositor = Compositor::new(fonts);
                Deferred::ready(compositor.render(None, &elements, target, None))
            }
            Some(input) => Deferred::spawn(move || {
                let image = input.resolve(fetch_timeout);
                let mut compositor = Compositor::new(fonts);
                compositor.render(image.as_deref(), &elements, target, None)
            }),
        }
    }
}

/// A background for [`Compositor::render_async`]: either already decoded
/// or still to be loaded.
#[derive(Debug, Clone)]
pub enum BackgroundInput {
    Loaded(Arc<RgbaImage>),
    Load(MediaLocator),
}

impl BackgroundInput {
    fn resolve(self, timeout: Duration) -> Option<Arc<RgbaImage>> {
        match self {
            BackgroundInput::Loaded(image) => Some(image),
            BackgroundInput::Load(locator) => match media::load_background(&locator, timeout) {
                Ok(image) => Some(Arc::new(image)),
                Err(e) => {
                    log::warn!("Background {} failed to load, using gradient: {}", locator, e);
                    None
                }
            },
        }
    }
}

fn anchor(element: &TextElement, canvas: &RgbaImage) -> (f32, f32) {
    from_percent(Percent::new(element.x, element.y), canvas.width(), canvas.height())
}

/// Scale `image` to exactly fill `canvas`, ignoring aspect ratio.
fn draw_stretched(canvas: &mut RgbaImage, image: &RgbaImage) {
    if image.width() == 0 || image.height() == 0 {
        return;
    }
    if image.dimensions() == canvas.dimensions() {
        imageops::replace(canvas, image, 0, 0);
    } else {
        let scaled = imageops::resize(image, canvas.width(), canvas.height(), FilterType::Triangle);
        imageops::replace(canvas, &scaled, 0, 0);
    }
}

/// Linear gradient along the top-left to bottom-right diagonal.
pub fn fill_gradient(canvas: &mut RgbaImage, start: [u8; 4], end: [u8; 4]) {
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    let len2 = w * w + h * h;

    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        // projection of the pixel centre onto the diagonal
        let t = (((x as f32 + 0.5) * w + (y as f32 + 0.5) * h) / len2).clamp(0.0, 1.0);
        let lerp = |i: usize| (start[i] as f32 + (end[i] as f32 - start[i] as f32) * t).round() as u8;
        *pixel = Rgba([lerp(0), lerp(1), lerp(2), lerp(3)]);
    }
}

fn dashed_rect(canvas: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, color: [u8; 4]) {
    if w <= 0 || h <= 0 {
        return;
    }
    let mut plot = |px: i32, py: i32, along: i32| {
        if (along as u32 / SELECTION_DASH) % 2 == 1 {
            return;
        }
        // 2px line: the pixel and its inward neighbour
        for (ox, oy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let (qx, qy) = (px + ox, py + oy);
            if qx >= 0 && qy >= 0 && (qx as u32) < canvas.width() && (qy as u32) < canvas.height() {
                canvas.put_pixel(qx as u32, qy as u32, Rgba(color));
            }
        }
    };

    for i in 0..w {
        plot(x + i, y, i);
        plot(x + i, y + h - 1, i);
    }
    for i in 0..h {
        plot(x, y + i, i);
        plot(x + w - 1, y + i, i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::text_element::{FontFamily, HexColor};
    use crate::render::deferred::Poll;
    use std::path::PathBuf;

    fn compositor() -> Compositor {
        Compositor::new(FontBook::empty())
    }

    fn elements() -> Vec<TextElement> {
        vec![
            TextElement::new("1", "TOP TEXT", 50.0, 20.0, 32),
            TextElement::new("2", "BOTTOM TEXT", 50.0, 80.0, 32),
        ]
    }

    /// egui's bundled monospace face, standing in for every family.
    fn hack_fonts() -> FontBook {
        let definitions = egui::FontDefinitions::default();
        let data = definitions.font_data["Hack"].font.to_vec();
        let font = ab_glyph::FontArc::try_from_vec(data).unwrap();
        let mut fonts = FontBook::empty();
        fonts.insert(FontFamily::ArialBlack, font);
        fonts
    }

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn styled(stroke_width: u32) -> TextElement {
        let mut element = TextElement::new("1", "HH", 50.0, 50.0, 40);
        element.stroke_color = HexColor::rgb(255, 0, 0);
        element.stroke_width = stroke_width;
        element
    }

    fn render_on_blue(element: &TextElement, size: u32) -> RgbaImage {
        let background = RgbaImage::from_pixel(4, 4, Rgba(BLUE));
        Compositor::new(hack_fonts()).render(
            Some(&background),
            std::slice::from_ref(element),
            RenderTarget::square(size, 400.0),
            None,
        )
    }

    /// Bounding box of pixels matching `predicate`, as (min_x, min_y, max_x, max_y).
    fn bounds(image: &RgbaImage, predicate: impl Fn([u8; 4]) -> bool) -> Option<(u32, u32, u32, u32)> {
        image
            .enumerate_pixels()
            .filter(|(_, _, p)| predicate(p.0))
            .fold(None, |acc, (x, y, _)| {
                Some(match acc {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                })
            })
    }

    fn is_fill(p: [u8; 4]) -> bool {
        p[0] > 128 && p[1] > 128
    }

    fn is_stroke(p: [u8; 4]) -> bool {
        p[0] > 200 && p[1] < 60 && p[2] < 60
    }

    #[test]
    fn test_output_has_requested_dimensions() {
        let out = compositor().render(None, &elements(), RenderTarget::new(320, 180, 400.0), None);
        assert_eq!(out.dimensions(), (320, 180));
    }

    #[test]
    fn test_text_scale() {
        assert_eq!(RenderTarget::square(800, 400.0).text_scale(), 2.0);
        assert_eq!(RenderTarget::square(400, 400.0).text_scale(), 1.0);
        assert_eq!(RenderTarget::square(500, 0.0).text_scale(), 1.0);
    }

    #[test]
    fn test_gradient_without_background() {
        let out = compositor().render(None, &[], RenderTarget::square(100, 400.0), None);

        let tl = out.get_pixel(0, 0).0;
        let br = out.get_pixel(99, 99).0;
        for i in 0..3 {
            assert!((tl[i] as i32 - GRADIENT_START[i] as i32).abs() <= 2);
            assert!((br[i] as i32 - GRADIENT_END[i] as i32).abs() <= 2);
        }
        // The anti-diagonal corners sit halfway along the gradient.
        assert_eq!(out.get_pixel(99, 0), out.get_pixel(0, 99));
        assert_eq!(tl[3], 255);
    }

    #[test]
    fn test_background_is_stretched_to_fill() {
        // Left half red, right half blue, in a wide image.
        let background = RgbaImage::from_fn(40, 10, |x, _| {
            if x < 20 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });

        let out = compositor().render(Some(&background), &[], RenderTarget::square(100, 400.0), None);

        assert_eq!(out.get_pixel(5, 5).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(5, 95).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(95, 50).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let background = RgbaImage::from_fn(17, 23, |x, y| Rgba([(x * 13) as u8, (y * 7) as u8, 99, 255]));
        let mut compositor = compositor();
        let target = RenderTarget::new(64, 48, 400.0);

        let first = compositor.render(Some(&background), &elements(), target, Some("1"));
        let second = compositor.render(Some(&background), &elements(), target, Some("1"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_selection_box_only_when_selected() {
        let target = RenderTarget::square(200, 400.0);
        let plain = compositor().render(None, &elements(), target, None);
        let selected = compositor().render(None, &elements(), target, Some("2"));
        let unknown = compositor().render(None, &elements(), target, Some("missing"));

        assert_ne!(plain, selected);
        assert_eq!(plain, unknown);

        // With no font the box is 20 wide and one em plus 10 tall,
        // centred on (100, 160): its top-left dash starts at (90, 147).
        assert_eq!(selected.get_pixel(90, 147).0, SELECTION_COLOR);
    }

    #[test]
    fn test_background_load_failure_falls_back_to_gradient() {
        let target = RenderTarget::square(32, 400.0);
        let missing = BackgroundInput::Load(MediaLocator::File(PathBuf::from("/no/such/background.png")));

        let failed = Compositor::render_async(
            FontBook::empty(),
            Some(missing),
            Arc::new(elements()),
            target,
            Duration::from_secs(1),
        )
        .wait()
        .unwrap();
        let gradient = compositor().render(None, &elements(), target, None);

        assert_eq!(failed, gradient);
    }

    #[test]
    fn test_render_async_without_background_is_immediate() {
        let mut deferred = Compositor::render_async(
            FontBook::empty(),
            None,
            Arc::new(elements()),
            RenderTarget::square(16, 400.0),
            Duration::from_secs(1),
        );
        assert!(matches!(deferred, Deferred::Ready(Some(_))));
        assert!(matches!(deferred.poll(), Poll::Ready(_)));
    }

    #[test]
    fn test_render_async_uses_loaded_background() {
        let background = Arc::new(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255])));
        let out = Compositor::render_async(
            FontBook::empty(),
            Some(BackgroundInput::Loaded(background)),
            Arc::new(Vec::new()),
            RenderTarget::square(8, 400.0),
            Duration::from_secs(1),
        )
        .wait()
        .unwrap();
        assert_eq!(out.get_pixel(7, 7).0, [1, 2, 3, 255]);
    }

    #[test]
    fn test_stroke_drawn_under_fill_only_when_wide() {
        let stroked = render_on_blue(&styled(4), 400);
        let fill = bounds(&stroked, is_fill).unwrap();
        let stroke = bounds(&stroked, is_stroke).unwrap();

        // The outline surrounds the fill.
        assert!(stroke.0 < fill.0 && stroke.1 < fill.1);
        assert!(stroke.2 > fill.2 && stroke.3 > fill.3);

        // The outline mask covers the glyphs too, so solid fill pixels
        // mean the fill was painted after it.
        let cy = (fill.1 + fill.3) / 2;
        assert!((0..stroked.width()).any(|x| stroked.get_pixel(x, cy).0 == RED));
        assert!((fill.0..=fill.2).any(|x| stroked.get_pixel(x, cy).0 == [255, 255, 255, 255]));

        let plain = render_on_blue(&styled(0), 400);
        assert!(!plain.pixels().any(|p| is_stroke(p.0)));
    }

    #[test]
    fn test_text_is_centred_on_anchor() {
        let mut element = styled(0);
        element.x = 25.0;
        element.y = 75.0;
        let out = render_on_blue(&element, 400);

        let (x0, y0, x1, y1) = bounds(&out, is_fill).unwrap();
        let centre = ((x0 + x1) as f32 / 2.0, (y0 + y1) as f32 / 2.0);
        assert!((centre.0 - 100.0).abs() <= 3.0, "centre = {:?}", centre);
        assert!((centre.1 - 300.0).abs() <= 3.0, "centre = {:?}", centre);
    }

    #[test]
    fn test_text_scales_with_surface_width() {
        let element = styled(4);
        let preview = render_on_blue(&element, 400);
        let export = render_on_blue(&element, 800);

        let width = |image: &RgbaImage, predicate: fn([u8; 4]) -> bool| {
            let (x0, _, x1, _) = bounds(image, predicate).unwrap();
            (x1 - x0) as f32
        };
        let fill = (width(&preview, is_fill), width(&export, is_fill));
        assert!((fill.1 - 2.0 * fill.0).abs() <= 4.0, "fill widths {:?}", fill);

        let stroke = (width(&preview, is_stroke), width(&export, is_stroke));
        assert!((stroke.1 - 2.0 * stroke.0).abs() <= 6.0, "stroke widths {:?}", stroke);
    }

    #[test]
    fn test_rendering_text_is_idempotent() {
        let mut compositor = Compositor::new(hack_fonts());
        let mut elements = elements();
        elements[1].stroke_width = 5;
        let target = RenderTarget::square(240, 400.0);

        let first = compositor.render(None, &elements, target, Some("2"));
        let second = compositor.render(None, &elements, target, Some("2"));
        assert_eq!(first, second);
        assert!(bounds(&first, is_fill).is_some());
    }
}
