// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain style inputs: colors, fonts, spacing, and sizing policy.

use alloc::sync::Arc;

/// An sRGB color with 8-bit channels and straight alpha.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Creates a color with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Font weight/slant variant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Regular upright.
    #[default]
    Normal,
    /// Bold upright.
    Bold,
    /// Regular italic.
    Italic,
    /// Bold italic.
    BoldItalic,
}

/// Description of a font to acquire from a [`TextBackend`](crate::TextBackend).
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Family name.
    pub family: Arc<str>,
    /// Size in logical pixels.
    pub size: f64,
    /// Weight/slant.
    pub style: FontStyle,
}

impl FontSpec {
    /// Creates a regular font spec.
    pub fn new(family: impl Into<Arc<str>>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            style: FontStyle::Normal,
        }
    }

    /// Returns a copy with a different style.
    #[must_use]
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }
}

/// Gaps added around every glyph cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spacing {
    /// Added to every cell's width.
    pub horizontal: f64,
    /// Added to every row's height.
    pub vertical: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            horizontal: 4.0,
            vertical: 4.0,
        }
    }
}

/// How cell widths are chosen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WidthMode {
    /// Every cell is as wide as the widest glyph in the whole catalog.
    #[default]
    Default,
    /// Every cell in a row is as wide as the widest glyph in that row.
    RowMax,
    /// Each cell keeps its own glyph's width.
    PerGlyph,
}

impl WidthMode {
    /// Returns `true` when all cells of a row share one width, which allows
    /// direct column arithmetic for hit testing.
    pub const fn is_uniform(self) -> bool {
        !matches!(self, Self::PerGlyph)
    }
}

/// How row heights are chosen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HeightMode {
    /// Every row is as tall as the tallest glyph in the whole catalog.
    #[default]
    Default,
    /// Each row is as tall as its own tallest glyph.
    RowMax,
}

/// Combined width/height sizing policy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SizingPolicy {
    /// Width rule.
    pub width: WidthMode,
    /// Height rule.
    pub height: HeightMode,
}

impl SizingPolicy {
    /// Creates a policy from its two modes.
    pub const fn new(width: WidthMode, height: HeightMode) -> Self {
        Self { width, height }
    }
}
