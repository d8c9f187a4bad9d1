// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rows of the grid: range headers and packed content rows.

use core::ops::Range;

use kurbo::{Point, Rect, Size};

use crate::backend::Surface;
use crate::cell::GlyphCell;
use crate::context::RenderContext;
use crate::glyph::{GlyphMetrics, RangeId, UnicodeRange};

/// Metadata for one range's segment of the grid.
///
/// Entries are stored in catalog order; `previous` always points at a
/// lower index, which replaces a linked list of header objects.
#[derive(Clone, Debug)]
pub struct RangeEntry {
    /// The range.
    pub range: UnicodeRange,
    /// Indices of this range's cells.
    pub cells: Range<usize>,
    /// Entry of the preceding range, if any.
    pub previous: Option<usize>,
    /// Row-list index of this range's header row; `None` for the first range,
    /// whose header only appears in the header band.
    pub header_row: Option<usize>,
    /// Row-list index of this range's first content row.
    pub first_content_row: usize,
    /// Header label measured with the header font.
    pub label: GlyphMetrics,
}

/// Discriminant of a [`Row`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// A range label.
    Header,
    /// Packed glyph cells.
    Content,
}

/// A row labelling the start of a range.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderRow {
    entry: usize,
    size: Size,
    bounds: Rect,
}

impl HeaderRow {
    pub(crate) fn new(entry: usize, size: Size) -> Self {
        Self {
            entry,
            size,
            bounds: Rect::ZERO,
        }
    }

    /// Index of the labelled range in [`GlyphGrid::ranges`](crate::GlyphGrid::ranges).
    pub fn entry(&self) -> usize {
        self.entry
    }

    pub(crate) fn arrange(&mut self, origin: Point) {
        self.bounds = Rect::from_origin_size(origin, self.size);
    }

    /// Paints the background and the range name, vertically centered and
    /// inset by the horizontal spacing.
    pub(crate) fn draw<F, S>(
        &self,
        surface: &mut S,
        entries: &[RangeEntry],
        font: &F,
        ctx: &RenderContext<F>,
    ) where
        S: Surface<F> + ?Sized,
    {
        let header = ctx.header();
        surface.fill_rect(self.bounds, header.background);
        let Some(entry) = entries.get(self.entry) else {
            return;
        };
        let label = entry.label;
        let top = self.bounds.center().y - label.height() / 2.0;
        let origin = Point::new(
            self.bounds.x0 + ctx.spacing().horizontal,
            top + label.ascent,
        );
        surface.draw_text(&entry.range.name, font, header.color, origin);
    }
}

/// A left-to-right run of cells from one range.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentRow {
    entry: usize,
    cells: Range<usize>,
    glyph_max: Size,
    size: Size,
    bounds: Rect,
}

impl ContentRow {
    pub(crate) fn new(entry: usize, cells: Range<usize>, glyph_max: Size, size: Size) -> Self {
        Self {
            entry,
            cells,
            glyph_max,
            size,
            bounds: Rect::ZERO,
        }
    }

    /// Index of the owning range in [`GlyphGrid::ranges`](crate::GlyphGrid::ranges).
    pub fn entry(&self) -> usize {
        self.entry
    }

    /// Indices of this row's cells.
    pub fn cells(&self) -> Range<usize> {
        self.cells.clone()
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; rows hold at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Settled glyph slot maxima, excluding spacing.
    pub fn glyph_max(&self) -> Size {
        self.glyph_max
    }

    /// Packed size, spacing included.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Places the cells left to right from `origin`; every cell spans the
    /// full row height. Returns the packed size.
    pub(crate) fn arrange<F>(
        &mut self,
        origin: Point,
        cells: &mut [GlyphCell],
        ctx: &RenderContext<F>,
    ) -> Size {
        let spacing = ctx.spacing();
        let mut x = origin.x;
        for cell in &mut cells[self.cells.clone()] {
            let width = cell.slot().width + spacing.horizontal;
            cell.arrange(Point::new(x, origin.y), Size::new(width, self.size.height));
            x += width;
        }
        self.bounds = Rect::from_origin_size(origin, self.size);
        self.size
    }

    pub(crate) fn draw<F, S>(
        &self,
        surface: &mut S,
        cells: &[GlyphCell],
        font: &F,
        ctx: &RenderContext<F>,
    ) where
        S: Surface<F> + ?Sized,
    {
        for cell in &cells[self.cells.clone()] {
            cell.draw(surface, font, ctx);
        }
    }

    /// Finds the cell under `point`, returning its index.
    ///
    /// Uniform-width rows compute the column directly; per-glyph rows scan.
    /// Returns `None` when `cells` does not cover this row.
    pub fn hit_test<F>(
        &self,
        point: Point,
        cells: &[GlyphCell],
        ctx: &RenderContext<F>,
    ) -> Option<usize> {
        if !self.bounds.contains(point) || self.cells.end > cells.len() {
            return None;
        }
        if ctx.policy().width.is_uniform() {
            let pitch = self.glyph_max.width + ctx.spacing().horizontal;
            if pitch <= 0.0 {
                return None;
            }
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "The offset is non-negative inside the bounds; truncation is floor."
            )]
            let column = ((point.x - self.bounds.x0) / pitch) as usize;
            (column < self.cells.len()).then(|| self.cells.start + column)
        } else {
            self.cells
                .clone()
                .find(|&i| cells[i].bounds().contains(point))
        }
    }
}

/// One entry of the row list.
#[derive(Clone, Debug, PartialEq)]
pub enum Row {
    /// A range label.
    Header(HeaderRow),
    /// Packed glyph cells.
    Content(ContentRow),
}

impl Row {
    /// Which kind of row this is.
    pub fn kind(&self) -> RowKind {
        match self {
            Self::Header(_) => RowKind::Header,
            Self::Content(_) => RowKind::Content,
        }
    }

    /// Index of the owning range entry.
    pub fn entry(&self) -> usize {
        match self {
            Self::Header(h) => h.entry,
            Self::Content(c) => c.entry,
        }
    }

    /// Size computed by layout.
    pub fn size(&self) -> Size {
        match self {
            Self::Header(h) => h.size,
            Self::Content(c) => c.size,
        }
    }

    /// Bounds from the last arrange.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Header(h) => h.bounds,
            Self::Content(c) => c.bounds,
        }
    }

    /// The content row, if this is one.
    pub fn as_content(&self) -> Option<&ContentRow> {
        match self {
            Self::Content(c) => Some(c),
            Self::Header(_) => None,
        }
    }

    pub(crate) fn arrange<F>(
        &mut self,
        origin: Point,
        cells: &mut [GlyphCell],
        ctx: &RenderContext<F>,
    ) -> Size {
        match self {
            Self::Header(h) => {
                h.arrange(origin);
                h.size
            }
            Self::Content(c) => c.arrange(origin, cells, ctx),
        }
    }

    pub(crate) fn draw<F, S>(&self, surface: &mut S, data: &RowData<'_, F>)
    where
        S: Surface<F> + ?Sized,
    {
        match self {
            Self::Header(h) => h.draw(surface, data.entries, data.header_font, data.ctx),
            Self::Content(c) => c.draw(surface, data.cells, data.item_font, data.ctx),
        }
    }

    /// Hit tests the row; returns the cell index for content rows.
    pub(crate) fn hit_test<F>(
        &self,
        point: Point,
        cells: &[GlyphCell],
        ctx: &RenderContext<F>,
    ) -> Option<usize> {
        match self {
            Self::Header(_) => None,
            Self::Content(c) => c.hit_test(point, cells, ctx),
        }
    }
}

/// Everything a row reads while painting.
pub(crate) struct RowData<'a, F> {
    pub(crate) cells: &'a [GlyphCell],
    pub(crate) entries: &'a [RangeEntry],
    pub(crate) header_font: &'a F,
    pub(crate) item_font: &'a F,
    pub(crate) ctx: &'a RenderContext<F>,
}

/// Result of [`GlyphGrid::hit_test`](crate::GlyphGrid::hit_test).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridHit {
    /// Row-list index, or `None` for the header band.
    pub row: Option<usize>,
    /// Kind of the row that was hit (the band counts as a header).
    pub kind: RowKind,
    /// Range of the row.
    pub range: RangeId,
    /// Code point of the glyph under the point, if any.
    pub code_point: Option<u32>,
}

impl GridHit {
    /// Returns `true` if a header row or the header band was hit.
    pub fn is_header(&self) -> bool {
        self.kind == RowKind::Header
    }
}
