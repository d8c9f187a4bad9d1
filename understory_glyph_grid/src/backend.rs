// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seams to the host: text measurement and paint.
//!
//! The grid never rasterizes text itself. A [`TextBackend`] measures text
//! and hands out font handles; a [`Surface`] receives paint calls. The
//! [`DisplayList`] surface records those calls so they can be replayed,
//! compared, or inspected.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::{Point, Rect};

use crate::glyph::GlyphMetrics;
use crate::style::{Color, FontSpec};

/// Font acquisition and text measurement.
pub trait TextBackend {
    /// A loaded font. Dropping the handle releases whatever it holds.
    type Font: Clone + Debug;

    /// Acquires a font for `spec`.
    fn load_font(&mut self, spec: &FontSpec) -> Self::Font;

    /// Measures `text` set in `font`.
    ///
    /// Return [`GlyphMetrics::EMPTY`] (or any zero-height metrics) when the
    /// font has nothing drawable for `text`.
    fn measure(&mut self, text: &str, font: &Self::Font) -> GlyphMetrics;
}

/// Paint target for a grid pass.
pub trait Surface<F> {
    /// Fills `rect` with `color`.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Strokes the outline of `rect` with a line of `width`.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);

    /// Draws `text` with its baseline-left pen position at `origin`.
    fn draw_text(&mut self, text: &str, font: &F, color: Color, origin: Point);
}

/// One recorded paint call.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand<F> {
    /// See [`Surface::fill_rect`].
    FillRect {
        /// Area.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// See [`Surface::stroke_rect`].
    StrokeRect {
        /// Outline.
        rect: Rect,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: f64,
    },
    /// See [`Surface::draw_text`].
    Text {
        /// Text run.
        text: Arc<str>,
        /// Font handle.
        font: F,
        /// Text color.
        color: Color,
        /// Baseline-left pen position.
        origin: Point,
    },
}

/// A [`Surface`] that records paint calls in order.
#[derive(Clone, Debug)]
pub struct DisplayList<F> {
    commands: Vec<PaintCommand<F>>,
}

impl<F> Default for DisplayList<F> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
        }
    }
}

impl<F> DisplayList<F> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands, in paint order.
    pub fn commands(&self) -> &[PaintCommand<F>] {
        &self.commands
    }

    /// Removes and returns all recorded commands.
    pub fn take(&mut self) -> Vec<PaintCommand<F>> {
        core::mem::take(&mut self.commands)
    }

    /// Forgets all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Iterates the text runs that were drawn.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            PaintCommand::Text { text, origin, .. } => Some((&**text, *origin)),
            _ => None,
        })
    }
}

impl<F: Clone> Surface<F> for DisplayList<F> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(PaintCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.commands
            .push(PaintCommand::StrokeRect { rect, color, width });
    }

    fn draw_text(&mut self, text: &str, font: &F, color: Color, origin: Point) {
        self.commands.push(PaintCommand::Text {
            text: text.into(),
            font: font.clone(),
            color,
            origin,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_list_records_in_order() {
        let mut list = DisplayList::<u8>::new();
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        list.draw_text("A", &7, Color::BLACK, Point::new(2.0, 3.0));
        list.stroke_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK, 2.0);
        assert_eq!(list.commands().len(), 3);
        assert!(matches!(list.commands()[0], PaintCommand::FillRect { .. }));
        assert!(matches!(
            list.commands()[2],
            PaintCommand::StrokeRect { width, .. } if width == 2.0
        ));
        let texts: Vec<_> = list.texts().collect();
        assert_eq!(texts, [("A", Point::new(2.0, 3.0))]);
        assert_eq!(list.take().len(), 3);
        assert!(list.commands().is_empty());
    }
}
