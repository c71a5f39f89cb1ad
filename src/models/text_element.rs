// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text overlay data structures.
//!
//! This module defines the text elements drawn on top of the meme
//! background, their fonts and colours, and partial updates to them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Font families offered in the text customiser.
///
/// Availability is not checked here; the renderer falls back to a generic
/// family when the named one is not installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    #[serde(rename = "Arial Black")]
    ArialBlack,
    Impact,
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    Helvetica,
    #[serde(rename = "Comic Sans MS")]
    ComicSansMs,
    #[serde(rename = "Courier New")]
    CourierNew,
}

impl FontFamily {
    pub const ALL: [FontFamily; 6] = [
        FontFamily::ArialBlack,
        FontFamily::Impact,
        FontFamily::TimesNewRoman,
        FontFamily::Helvetica,
        FontFamily::ComicSansMs,
        FontFamily::CourierNew,
    ];

    /// Family name as installed on the system.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::ArialBlack => "Arial Black",
            FontFamily::Impact => "Impact",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::Helvetica => "Helvetica",
            FontFamily::ComicSansMs => "Comic Sans MS",
            FontFamily::CourierNew => "Courier New",
        }
    }

    /// Generic class used when the named family is missing.
    pub fn generic(&self) -> GenericFamily {
        match self {
            FontFamily::TimesNewRoman => GenericFamily::Serif,
            FontFamily::CourierNew => GenericFamily::Monospace,
            _ => GenericFamily::SansSerif,
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericFamily {
    SansSerif,
    Serif,
    Monospace,
}

/// An sRGB colour parsed from a CSS-style hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub [u8; 4]);

impl HexColor {
    pub const WHITE: HexColor = HexColor([0xFF, 0xFF, 0xFF, 0xFF]);
    pub const BLACK: HexColor = HexColor([0x00, 0x00, 0x00, 0xFF]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        HexColor([r, g, b, 0xFF])
    }

    pub fn rgba(&self) -> [u8; 4] {
        self.0
    }
}

impl FromStr for HexColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| format!("colour must start with '#': {:?}", s))?;
        let digit = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map_err(|_| format!("invalid hex digit in {:?}", s))
        };
        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("invalid hex digit in {:?}", s))
        };

        if !hex.is_ascii() {
            return Err(format!("invalid colour {:?}", s));
        }

        match hex.len() {
            3 => Ok(HexColor([digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, 0xFF])),
            6 => Ok(HexColor([byte(0)?, byte(2)?, byte(4)?, 0xFF])),
            8 => Ok(HexColor([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
            _ => Err(format!("colour must have 3, 6 or 8 hex digits: {:?}", s)),
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 0xFF {
            write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        }
    }
}

/// Swatches shown for both text and stroke colour.
pub const PALETTE: [HexColor; 12] = [
    HexColor::rgb(0xFF, 0xFF, 0xFF),
    HexColor::rgb(0x00, 0x00, 0x00),
    HexColor::rgb(0xFF, 0x6B, 0x6B),
    HexColor::rgb(0x4E, 0xCD, 0xC4),
    HexColor::rgb(0x45, 0xB7, 0xD1),
    HexColor::rgb(0x96, 0xCE, 0xB4),
    HexColor::rgb(0xFE, 0xCA, 0x57),
    HexColor::rgb(0xFF, 0x9F, 0xF3),
    HexColor::rgb(0x54, 0xA0, 0xFF),
    HexColor::rgb(0x5F, 0x27, 0xCD),
    HexColor::rgb(0x00, 0xD2, 0xD3),
    HexColor::rgb(0xFF, 0x9F, 0x43),
];

/// Font size slider range (reference pixels).
pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<u32> = 12..=72;

/// Stroke width slider range (reference pixels).
pub const STROKE_WIDTH_RANGE: std::ops::RangeInclusive<u32> = 0..=8;

/// One text overlay label.
///
/// `x` and `y` are percentages of the surface width and height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: String,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: u32,
    pub font_family: FontFamily,
    pub color: HexColor,
    pub stroke_color: HexColor,
    pub stroke_width: u32,
}

impl TextElement {
    /// Create a text element with the default meme styling: white
    /// Arial Black with a 2px black outline.
    pub fn new(id: impl Into<String>, text: impl Into<String>, x: f32, y: f32, font_size: u32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            x,
            y,
            font_size,
            font_family: FontFamily::ArialBlack,
            color: HexColor::WHITE,
            stroke_color: HexColor::BLACK,
            stroke_width: 2,
        }
    }

    /// Apply a partial update. Returns true if anything changed.
    pub fn apply(&mut self, update: &TextUpdate) -> bool {
        let before = self.clone();

        if let Some(text) = &update.text {
            self.text.clone_from(text);
        }
        if let Some(x) = update.x {
            self.x = x;
        }
        if let Some(y) = update.y {
            self.y = y;
        }
        if let Some(size) = update.font_size {
            self.font_size = size.max(1);
        }
        if let Some(family) = update.font_family {
            self.font_family = family;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(color) = update.stroke_color {
            self.stroke_color = color;
        }
        if let Some(width) = update.stroke_width {
            self.stroke_width = width;
        }

        *self != before
    }
}

/// A partial update to a [`TextElement`]; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextUpdate {
    pub text: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub font_size: Option<u32>,
    pub font_family: Option<FontFamily>,
    pub color: Option<HexColor>,
    pub stroke_color: Option<HexColor>,
    pub stroke_width: Option<u32>,
}

impl TextUpdate {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), ..Default::default() }
    }

    pub fn position(x: f32, y: f32) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }
}
