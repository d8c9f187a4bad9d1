// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy packing of one range's cells into fixed-width rows.

use core::ops::Range;

use kurbo::Size;

use crate::cell::GlyphCell;
use crate::context::RenderContext;
use crate::row::ContentRow;
use crate::style::WidthMode;

/// Accumulates consecutive cells into one row until the surface width is
/// exhausted.
///
/// Cells of one range are stored contiguously, so a packer only tracks the
/// index of its first cell and how many it accepted. Call
/// [`RowPacker::try_add`] for each cell in order; when it returns `false`,
/// finish this packer and offer the same cell to a fresh one.
#[derive(Debug)]
pub struct RowPacker<'a, F> {
    ctx: &'a RenderContext<F>,
    start: usize,
    len: usize,
    packed_width: f64,
    max_width: f64,
    max_height: f64,
}

impl<'a, F> RowPacker<'a, F> {
    /// Creates an empty packer whose first cell will be `cells[start]`.
    pub fn new(ctx: &'a RenderContext<F>, start: usize) -> Self {
        Self {
            ctx,
            start,
            len: 0,
            packed_width: 0.0,
            max_width: 0.0,
            max_height: 0.0,
        }
    }

    /// Number of accepted cells.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no cell was accepted yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indices of the accepted cells.
    pub fn cells(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Width of the accepted cells, spacing included.
    pub fn packed_width(&self) -> f64 {
        self.packed_width
    }

    /// Widest glyph slot accepted so far.
    pub fn max_width(&self) -> f64 {
        self.max_width
    }

    /// Tallest glyph slot accepted so far.
    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    /// Offers the next cell; returns `false` if it does not fit.
    ///
    /// The first cell offered to an empty packer is always accepted, even
    /// when it alone is wider than the surface.
    ///
    /// Under [`WidthMode::RowMax`] a cell wider than every accepted cell
    /// widens all of them retroactively. The row is then re-validated as if
    /// every cell, the new one included, had the new width.
    pub fn try_add(&mut self, cell: &GlyphCell) -> bool {
        let preferred = cell.preferred_size(self.ctx);
        let spacing = self.ctx.spacing().horizontal;
        let surface_width = self.ctx.surface().width;
        let first = self.is_empty();

        let (width, packed_before) = match self.ctx.policy().width {
            WidthMode::Default | WidthMode::PerGlyph => (preferred.width, self.packed_width),
            WidthMode::RowMax if !first && preferred.width > self.max_width => {
                let widened = count_as_f64(self.len) * (preferred.width + spacing);
                (preferred.width, widened)
            }
            WidthMode::RowMax => (preferred.width.max(self.max_width), self.packed_width),
        };

        let cell_width = width + spacing;
        if !first && packed_before + cell_width > surface_width {
            return false;
        }

        self.packed_width = packed_before + cell_width;
        self.max_width = self.max_width.max(width);
        self.max_height = self.max_height.max(preferred.height);
        self.len += 1;
        true
    }

    /// Assigns every accepted cell its final glyph slot from the row's
    /// settled maxima and returns the row size, spacing included.
    ///
    /// This is a separate pass because `RowMax` may widen the row after some
    /// cells were already accepted.
    pub(crate) fn size_items(&self, cells: &mut [GlyphCell]) -> Size {
        let spacing = self.ctx.spacing();
        let mode = self.ctx.policy().width;
        let mut width = 0.0;
        for cell in &mut cells[self.cells()] {
            let slot_width = match mode {
                WidthMode::Default | WidthMode::RowMax => self.max_width,
                WidthMode::PerGlyph => cell.preferred_size(self.ctx).width,
            };
            cell.set_slot(Size::new(slot_width, self.max_height));
            width += slot_width + spacing.horizontal;
        }
        Size::new(width, self.max_height + spacing.vertical)
    }

    /// Sizes the accepted cells and returns the finished row.
    pub fn finish(self, entry: usize, cells: &mut [GlyphCell]) -> ContentRow {
        debug_assert!(!self.is_empty(), "a content row holds at least one cell");
        let size = self.size_items(cells);
        ContentRow::new(
            entry,
            self.cells(),
            Size::new(self.max_width, self.max_height),
            size,
        )
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Row cell counts are far below 2^52."
)]
fn count_as_f64(n: usize) -> f64 {
    n as f64
}
