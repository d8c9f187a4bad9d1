// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph catalog value types: ranges, glyphs, and measured metrics.

use alloc::string::String;
use alloc::sync::Arc;

use kurbo::{Rect, Size};

/// Opaque identifier of a Unicode range (block).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RangeId(pub u32);

/// A named, contiguous block of code points such as "Basic Latin".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnicodeRange {
    /// Identity of the range.
    pub id: RangeId,
    /// Display name, used as the header label.
    pub name: Arc<str>,
    /// First code point in the block (inclusive).
    pub first: u32,
    /// Last code point in the block (inclusive).
    pub last: u32,
}

impl UnicodeRange {
    /// Creates a range covering `first..=last`.
    pub fn new(id: RangeId, name: impl Into<Arc<str>>, first: u32, last: u32) -> Self {
        debug_assert!(first <= last, "UnicodeRange must not be inverted");
        Self {
            id,
            name: name.into(),
            first,
            last,
        }
    }

    /// Returns `true` if `code_point` lies within this block.
    pub const fn contains(&self, code_point: u32) -> bool {
        code_point >= self.first && code_point <= self.last
    }
}

/// One renderable code point of a font family.
///
/// Glyphs are produced by font enumeration and never mutated afterward.
/// Two glyphs are equal when they share a code point and a family; the
/// display text and range are derived data.
#[derive(Clone, Debug)]
pub struct Glyph {
    /// Unicode scalar value (or raw code point for unpaired surrogates).
    pub code_point: u32,
    /// The code point rendered as text.
    pub text: Arc<str>,
    /// Family of the font that owns this glyph.
    pub family: Arc<str>,
    /// Range this code point belongs to.
    pub range: UnicodeRange,
}

impl Glyph {
    /// Creates a glyph, deriving its display text from `code_point`.
    ///
    /// Code points that are not Unicode scalar values (surrogates) are shown
    /// as U+FFFD but keep their original `code_point`.
    pub fn new(code_point: u32, family: impl Into<Arc<str>>, range: UnicodeRange) -> Self {
        let ch = char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER);
        let mut text = String::new();
        text.push(ch);
        Self {
            code_point,
            text: text.into(),
            family: family.into(),
            range,
        }
    }

    /// Creates a glyph with explicit display text (for example a base
    /// character plus a combining mark).
    pub fn with_text(
        code_point: u32,
        text: impl Into<Arc<str>>,
        family: impl Into<Arc<str>>,
        range: UnicodeRange,
    ) -> Self {
        Self {
            code_point,
            text: text.into(),
            family: family.into(),
            range,
        }
    }
}

impl PartialEq for Glyph {
    fn eq(&self, other: &Self) -> bool {
        self.code_point == other.code_point && self.family == other.family
    }
}

impl Eq for Glyph {}

/// Measured metrics of one piece of text under one font.
///
/// `ink` is the visual bounding box relative to the pen origin on the
/// baseline, y growing downward (so `ink.y0` is typically `-ascent`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphMetrics {
    /// Horizontal advance of the pen.
    pub advance: f64,
    /// Distance from the baseline to the top of the line box.
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the line box.
    pub descent: f64,
    /// Visual (ink) bounds relative to the baseline origin.
    pub ink: Rect,
}

impl GlyphMetrics {
    /// Sentinel for "nothing drawable".
    pub const EMPTY: Self = Self {
        advance: 0.0,
        ascent: 0.0,
        descent: 0.0,
        ink: Rect::ZERO,
    };

    /// Width of the glyph: the larger of its advance and its ink width.
    ///
    /// Combining marks often have a zero advance but visible ink.
    pub fn width(&self) -> f64 {
        self.advance.max(self.ink.width())
    }

    /// Line-box height, `ascent + descent`.
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }

    /// Measured bounding size.
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns `false` for zero-height, negative, or non-finite measurements.
    pub fn is_drawable(&self) -> bool {
        let h = self.height();
        h.is_finite() && h > 0.0 && self.width().is_finite() && self.width() >= 0.0
    }
}

impl Default for GlyphMetrics {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latin() -> UnicodeRange {
        UnicodeRange::new(RangeId(0), "Basic Latin", 0x0000, 0x007F)
    }

    #[test]
    fn glyph_text_is_derived_from_code_point() {
        let g = Glyph::new(0x41, "Sans", latin());
        assert_eq!(&*g.text, "A");
        let surrogate = Glyph::new(0xD800, "Sans", latin());
        assert_eq!(&*surrogate.text, "\u{FFFD}");
        assert_eq!(surrogate.code_point, 0xD800);
    }

    #[test]
    fn glyph_equality_ignores_text_and_range() {
        let a = Glyph::new(0x41, "Sans", latin());
        let b = Glyph::with_text(
            0x41,
            "a",
            "Sans",
            UnicodeRange::new(RangeId(9), "Other", 0, 0xFFFF),
        );
        let c = Glyph::new(0x41, "Serif", latin());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn empty_metrics_are_not_drawable() {
        assert!(!GlyphMetrics::EMPTY.is_drawable());
        let m = GlyphMetrics {
            advance: 0.0,
            ascent: 8.0,
            descent: 2.0,
            ink: Rect::new(-3.0, -8.0, 1.0, 0.0),
        };
        assert!(m.is_drawable());
        assert_eq!(m.size(), Size::new(4.0, 10.0));
    }

    #[test]
    fn range_contains_is_inclusive() {
        let r = latin();
        assert!(r.contains(0));
        assert!(r.contains(0x7F));
        assert!(!r.contains(0x80));
    }
}
