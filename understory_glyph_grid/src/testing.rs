// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic text backend and catalog builders shared by unit tests.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;

use crate::backend::TextBackend;
use crate::glyph::{Glyph, GlyphMetrics, RangeId, UnicodeRange};
use crate::style::{FontSpec, FontStyle};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TestFont {
    pub(crate) family: Arc<str>,
    pub(crate) size: f64,
    pub(crate) style: FontStyle,
}

/// Measures every text as `size / 2` wide and `size` tall unless a width
/// or full metrics were registered for it.
#[derive(Debug, Default)]
pub(crate) struct TestBackend {
    widths: HashMap<String, f64>,
    metrics: HashMap<String, GlyphMetrics>,
    loads: usize,
    measures: usize,
}

impl TestBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_width(mut self, text: &str, width: f64) -> Self {
        self.widths.insert(text.into(), width);
        self
    }

    pub(crate) fn with_metrics(mut self, text: &str, metrics: GlyphMetrics) -> Self {
        self.metrics.insert(text.into(), metrics);
        self
    }

    pub(crate) fn loads(&self) -> usize {
        self.loads
    }

    pub(crate) fn measures(&self) -> usize {
        self.measures
    }
}

impl TextBackend for TestBackend {
    type Font = TestFont;

    fn load_font(&mut self, spec: &FontSpec) -> TestFont {
        self.loads += 1;
        TestFont {
            family: spec.family.clone(),
            size: spec.size,
            style: spec.style,
        }
    }

    fn measure(&mut self, text: &str, font: &TestFont) -> GlyphMetrics {
        self.measures += 1;
        if let Some(m) = self.metrics.get(text) {
            return *m;
        }
        let advance = self.widths.get(text).copied().unwrap_or(font.size / 2.0);
        let ascent = font.size * 0.75;
        let descent = font.size * 0.25;
        GlyphMetrics {
            advance,
            ascent,
            descent,
            ink: Rect::new(0.0, -ascent, advance, descent),
        }
    }
}

pub(crate) fn range(id: u32, name: &str) -> UnicodeRange {
    UnicodeRange::new(RangeId(id), name, id * 0x100, id * 0x100 + 0xFF)
}

/// Builds a catalog from `(code_point, range_id, range_name)` triples.
pub(crate) fn catalog(items: &[(u32, u32, &str)]) -> Vec<Glyph> {
    items
        .iter()
        .map(|&(cp, id, name)| Glyph::new(cp, "Test Sans", range(id, name)))
        .collect()
}
