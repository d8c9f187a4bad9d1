// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The grid controller: owns the catalog, rows, indices, and visible window
//! and runs the pipeline stages on demand.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::ops::Range;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size};

use crate::backend::{Surface, TextBackend};
use crate::cell::GlyphCell;
use crate::context::{ContextInput, RenderContext};
use crate::glyph::{Glyph, GlyphMetrics, RangeId};
use crate::invalidation::{Invalidation, Stage};
use crate::packer::RowPacker;
use crate::row::{GridHit, HeaderRow, RangeEntry, Row, RowData, RowKind};
use crate::style::{Color, FontSpec, SizingPolicy, Spacing};

type RepaintHandler = Box<dyn FnMut()>;

/// A scrollable grid of glyphs grouped under range headers.
///
/// Inputs (content, surface size, styles, scroll position, selection) only
/// record which pipeline stages are stale. The work happens lazily in
/// [`GlyphGrid::draw`] (or [`GlyphGrid::update`]), which runs each stale
/// stage once, in order:
///
/// 1. **Measure**: one backend measurement per glyph; builds cells and
///    per-range buckets.
/// 2. **Layout**: packs each bucket into rows and inserts header rows.
/// 3. **Arrange**: positions the rows of the visible window.
/// 4. **Draw**: paints the header band and the visible rows.
///
/// ## Example
///
/// ```rust
/// # use understory_glyph_grid::{Glyph, GlyphGrid, GlyphMetrics, DisplayList, RangeId, TextBackend, UnicodeRange, FontSpec};
/// # use kurbo::Rect;
/// # #[derive(Debug)]
/// # struct Mono;
/// # impl TextBackend for Mono {
/// #     type Font = f64;
/// #     fn load_font(&mut self, spec: &FontSpec) -> f64 { spec.size }
/// #     fn measure(&mut self, text: &str, size: &f64) -> GlyphMetrics {
/// #         let w = size * 0.6 * text.chars().count() as f64;
/// #         GlyphMetrics { advance: w, ascent: size * 0.8, descent: size * 0.2, ink: Rect::new(0.0, -size * 0.8, w, size * 0.2) }
/// #     }
/// # }
/// let latin = UnicodeRange::new(RangeId(0), "Basic Latin", 0x00, 0x7F);
/// let glyphs = (0x41..0x5B).map(|cp| Glyph::new(cp, "Mono", latin.clone()));
///
/// let mut grid = GlyphGrid::new(Mono);
/// grid.set_surface_size(200.0, 120.0);
/// grid.set_content(glyphs);
///
/// let mut list = DisplayList::new();
/// grid.draw(&mut list);
/// assert!(grid.row_count() > 1);
/// assert_eq!(grid.first_row(), 0);
/// ```
pub struct GlyphGrid<B: TextBackend> {
    backend: B,
    ctx: RenderContext<B::Font>,
    invalidation: Invalidation,
    repaint: Option<RepaintHandler>,

    content: Vec<Glyph>,
    cells: Vec<GlyphCell>,
    /// code point → index into `cells`
    cell_index: HashMap<u32, usize>,
    /// cell index → row-list index
    cell_rows: Vec<usize>,
    entries: Vec<RangeEntry>,
    range_index: HashMap<RangeId, usize>,
    rows: Vec<Row>,
    header_extent: f64,

    first_row: usize,
    /// rows arranged by the last arrange pass
    window: Range<usize>,
}

impl<B> core::fmt::Debug for GlyphGrid<B>
where
    B: TextBackend,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlyphGrid")
            .field("ctx", &self.ctx)
            .field("invalidation", &self.invalidation)
            .field("glyphs", &self.content.len())
            .field("cells", &self.cells.len())
            .field("ranges", &self.entries.len())
            .field("rows", &self.rows.len())
            .field("first_row", &self.first_row)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl<B: TextBackend> GlyphGrid<B> {
    /// Creates an empty grid measuring with `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            ctx: RenderContext::new(),
            invalidation: Invalidation::all(),
            repaint: None,
            content: Vec::new(),
            cells: Vec::new(),
            cell_index: HashMap::new(),
            cell_rows: Vec::new(),
            entries: Vec::new(),
            range_index: HashMap::new(),
            rows: Vec::new(),
            header_extent: 0.0,
            first_row: 0,
            window: 0..0,
        }
    }

    /// The text backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The text backend, mutably.
    ///
    /// Changing how the backend measures does not invalidate anything; call
    /// [`GlyphGrid::invalidate`] with [`Stage::Measure`] afterward if needed.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Current render context.
    pub fn context(&self) -> &RenderContext<B::Font> {
        &self.ctx
    }

    /// Pending pipeline stages.
    pub fn invalidation(&self) -> &Invalidation {
        &self.invalidation
    }

    /// Installs the callback used to ask the host for a repaint.
    ///
    /// It is called at most once per burst of invalidations; the burst ends
    /// when [`GlyphGrid::draw`] runs.
    pub fn set_repaint_handler(&mut self, handler: impl FnMut() + 'static) {
        self.repaint = Some(Box::new(handler));
    }

    /// Marks `stage` (and every finer stage) stale.
    pub fn invalidate(&mut self, stage: Stage) {
        if self.invalidation.invalidate(stage)
            && let Some(repaint) = self.repaint.as_mut()
        {
            repaint();
        }
    }

    /// Applies one context input, invalidating whatever it affects.
    pub fn apply(&mut self, input: ContextInput) {
        if let Some(stage) = self.ctx.apply(input) {
            self.invalidate(stage);
        }
    }

    // --- inputs ---

    /// Replaces the catalog.
    ///
    /// The glyph font follows the family of the first glyph. The window is
    /// reset to the top.
    pub fn set_content(&mut self, glyphs: impl IntoIterator<Item = Glyph>) {
        self.content = glyphs.into_iter().collect();
        if let Some(family) = self.content.first().map(|g| g.family.clone()) {
            self.apply(ContextInput::ItemFamily(family));
        }
        self.first_row = 0;
        self.invalidate(Stage::Measure);
    }

    /// The catalog as last given to [`GlyphGrid::set_content`].
    pub fn content(&self) -> &[Glyph] {
        &self.content
    }

    /// Sets the drawing surface size.
    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        self.apply(ContextInput::SurfaceSize(Size::new(width, height)));
    }

    /// Sets the header font.
    pub fn set_header_font(&mut self, font: FontSpec) {
        self.apply(ContextInput::HeaderFont(font));
    }

    /// Sets the header label color.
    pub fn set_header_color(&mut self, color: Color) {
        self.apply(ContextInput::HeaderColor(color));
    }

    /// Sets the header background color.
    pub fn set_header_background(&mut self, color: Color) {
        self.apply(ContextInput::HeaderBackground(color));
    }

    /// Sets the glyph font size.
    pub fn set_item_font_size(&mut self, size: f64) {
        self.apply(ContextInput::ItemFontSize(size));
    }

    /// Sets the glyph color.
    pub fn set_item_color(&mut self, color: Color) {
        self.apply(ContextInput::ItemColor(color));
    }

    /// Sets the selection outline color.
    pub fn set_selection_color(&mut self, color: Color) {
        self.apply(ContextInput::SelectionColor(color));
    }

    /// Sets the cell spacing.
    pub fn set_spacing(&mut self, spacing: Spacing) {
        self.apply(ContextInput::Spacing(spacing));
    }

    /// Sets the sizing policy.
    pub fn set_sizing_policy(&mut self, policy: SizingPolicy) {
        self.apply(ContextInput::SizingPolicy(policy));
    }

    /// Sets the text whose measured size is the minimum cell size.
    pub fn set_min_size_reference(&mut self, text: Option<&str>) {
        self.apply(ContextInput::MinSizeReference(text.map(Into::into)));
    }

    /// Selects the glyph with `code_point`, or clears the selection.
    ///
    /// Returns `false` (and changes nothing) for code points that are not in
    /// the measured catalog.
    pub fn select(&mut self, code_point: Option<u32>) -> bool {
        if let Some(cp) = code_point
            && !self.cell_index.contains_key(&cp)
        {
            tracing::trace!(code_point = cp, "ignoring selection of unknown glyph");
            return false;
        }
        self.apply(ContextInput::Selection(code_point));
        true
    }

    /// Selected code point.
    pub fn selected(&self) -> Option<u32> {
        self.ctx.selected()
    }

    // --- window ---

    /// Number of rows in the scrolling list.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All rows, in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// A single row.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Index of the first visible row.
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// Scrolls so that `row` is the first visible row, clamped to
    /// `0..=row_count`.
    pub fn set_first_row(&mut self, row: usize) {
        let row = row.min(self.rows.len());
        if row != self.first_row {
            self.first_row = row;
            self.invalidate(Stage::Arrange);
        }
    }

    /// Scrolls by `delta` rows.
    pub fn scroll_by(&mut self, delta: isize) {
        self.set_first_row(self.first_row.saturating_add_signed(delta));
    }

    /// Scrolls down by one window.
    pub fn page_down(&mut self) {
        let page = self.window.len().max(1);
        self.set_first_row(self.first_row.saturating_add(page));
    }

    /// Scrolls up by one window.
    pub fn page_up(&mut self) {
        let page = self.window.len().max(1);
        self.set_first_row(self.first_row.saturating_sub(page));
    }

    /// Rows arranged by the last pass.
    pub fn visible_rows(&self) -> Range<usize> {
        self.window.clone()
    }

    /// Index of the last visible row, as of the last pass.
    pub fn last_row(&self) -> Option<usize> {
        if self.window.is_empty() {
            None
        } else {
            Some(self.window.end - 1)
        }
    }

    /// Height of the header band and of every header row.
    pub fn header_extent(&self) -> f64 {
        self.header_extent
    }

    // --- ranges ---

    /// Ranges present in the catalog, in order.
    pub fn ranges(&self) -> &[RangeEntry] {
        &self.entries
    }

    /// Entry for `id`, if the range has any drawable glyph.
    pub fn range_entry(&self, id: RangeId) -> Option<&RangeEntry> {
        self.range_index.get(&id).map(|&i| &self.entries[i])
    }

    /// Scrolls to the start of range `id`.
    ///
    /// The first range scrolls to the top; any other range puts its first
    /// content row at the top. Unknown ranges are ignored and return `false`.
    pub fn jump_to_range(&mut self, id: RangeId) -> bool {
        let Some(&index) = self.range_index.get(&id) else {
            tracing::trace!(?id, "ignoring jump to unknown range");
            return false;
        };
        let entry = &self.entries[index];
        let target = if entry.previous.is_none() {
            0
        } else {
            entry.first_content_row
        };
        self.set_first_row(target);
        true
    }

    /// Range shown in the header band for the current window.
    pub fn header_band(&self) -> Option<&RangeEntry> {
        self.header_band_entry().map(|i| &self.entries[i])
    }

    fn header_band_entry(&self) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        match self.rows.get(self.first_row).or_else(|| self.rows.last()) {
            Some(Row::Content(row)) => Some(row.entry()),
            Some(Row::Header(row)) => {
                Some(self.entries[row.entry()].previous.unwrap_or(row.entry()))
            }
            None => Some(0),
        }
    }

    // --- glyph queries ---

    /// The measured cell for `code_point`.
    pub fn cell(&self, code_point: u32) -> Option<&GlyphCell> {
        self.cell_index.get(&code_point).map(|&i| &self.cells[i])
    }

    /// The measured glyph for `code_point`.
    pub fn glyph(&self, code_point: u32) -> Option<&Glyph> {
        self.cell(code_point).map(GlyphCell::glyph)
    }

    /// Row-list index of the row holding `code_point`.
    pub fn row_of_glyph(&self, code_point: u32) -> Option<usize> {
        let &cell = self.cell_index.get(&code_point)?;
        self.cell_rows.get(cell).copied()
    }

    /// Returns `true` if the glyph's row was arranged by the last pass.
    pub fn is_glyph_visible(&self, code_point: u32) -> bool {
        self.row_of_glyph(code_point)
            .is_some_and(|row| self.window.contains(&row))
    }

    /// Final bounds of a visible glyph.
    pub fn glyph_bounds(&self, code_point: u32) -> Option<Rect> {
        if !self.is_glyph_visible(code_point) {
            return None;
        }
        self.cell(code_point).map(GlyphCell::bounds)
    }

    /// Scrolls the glyph's row to the top unless it is already visible.
    ///
    /// Unknown code points are ignored and return `false`.
    pub fn scroll_to_glyph(&mut self, code_point: u32) -> bool {
        let Some(row) = self.row_of_glyph(code_point) else {
            return false;
        };
        if !self.window.contains(&row) {
            self.set_first_row(row);
        }
        true
    }

    // --- pointer ---

    /// Finds what lies under `point`, as of the last arrange.
    pub fn hit_test(&self, point: Point) -> Option<GridHit> {
        let band = self.header_band_entry()?;
        let surface = self.ctx.surface();
        if point.y >= 0.0
            && point.y < self.header_extent
            && point.x >= 0.0
            && point.x < surface.width
        {
            return Some(GridHit {
                row: None,
                kind: RowKind::Header,
                range: self.entries[band].range.id,
                code_point: None,
            });
        }
        let index = self
            .window
            .clone()
            .find(|&i| self.rows[i].bounds().contains(point))?;
        let row = &self.rows[index];
        let cell = row.hit_test(point, &self.cells, &self.ctx);
        Some(GridHit {
            row: Some(index),
            kind: row.kind(),
            range: self.entries[row.entry()].range.id,
            code_point: cell.map(|i| self.cells[i].code_point()),
        })
    }

    /// Handles a pointer press: selects the glyph under `point`, or jumps
    /// to the range of a header that was hit.
    pub fn press(&mut self, point: Point) -> Option<GridHit> {
        let hit = self.hit_test(point)?;
        match hit.code_point {
            Some(cp) => {
                self.select(Some(cp));
            }
            None if hit.is_header() => {
                self.jump_to_range(hit.range);
            }
            None => {}
        }
        Some(hit)
    }

    // --- pipeline ---

    /// Runs any stale measure, layout, and arrange stages without painting.
    pub fn update(&mut self) {
        if self.invalidation.should_run(Stage::Measure) {
            self.measure();
        }
        if self.invalidation.should_run(Stage::Layout) {
            self.layout();
        }
        if self.invalidation.should_run(Stage::Arrange) {
            self.arrange();
        }
    }

    /// Brings the pipeline up to date and paints into `surface`.
    ///
    /// Painting itself never changes the model, so drawing twice without an
    /// intervening input produces the same paint calls.
    pub fn draw<S>(&mut self, surface: &mut S)
    where
        S: Surface<B::Font> + ?Sized,
    {
        self.update();
        self.invalidation.should_run(Stage::Draw);

        let header_font = self.ctx.header_font(&mut self.backend);
        let item_font = self.ctx.item_font(&mut self.backend);
        let data = RowData {
            cells: &self.cells,
            entries: &self.entries,
            header_font: &header_font,
            item_font: &item_font,
            ctx: &self.ctx,
        };

        if let Some(entry) = self.header_band_entry() {
            let mut band = HeaderRow::new(
                entry,
                Size::new(self.ctx.surface().width, self.header_extent),
            );
            band.arrange(Point::ZERO);
            band.draw(surface, data.entries, data.header_font, data.ctx);
        }
        for row in &self.rows[self.window.clone()] {
            row.draw(surface, &data);
        }
    }

    fn measure(&mut self) {
        let font = self.ctx.item_font(&mut self.backend);
        let floor = match self.ctx.min_size_reference() {
            Some(text) => {
                let m = self.backend.measure(text, &font);
                if m.is_drawable() { m.size() } else { Size::ZERO }
            }
            None => Size::ZERO,
        };

        let mut cells = Vec::with_capacity(self.content.len());
        let mut cell_index = HashMap::with_capacity(self.content.len());
        let mut entries: Vec<RangeEntry> = Vec::new();
        let mut range_index = HashMap::new();
        let mut max = floor;
        let mut skipped = 0_usize;

        for glyph in &self.content {
            if cell_index.contains_key(&glyph.code_point) {
                skipped += 1;
                continue;
            }
            let Some(cell) = GlyphCell::measure(glyph.clone(), &font, &mut self.backend, floor)
            else {
                skipped += 1;
                continue;
            };
            if entries.last().is_none_or(|e| e.range.id != glyph.range.id) {
                // A range that reappears later opens a new bucket; jumps
                // resolve to its first occurrence.
                range_index.entry(glyph.range.id).or_insert(entries.len());
                entries.push(RangeEntry {
                    range: glyph.range.clone(),
                    cells: cells.len()..cells.len(),
                    previous: entries.len().checked_sub(1),
                    header_row: None,
                    first_content_row: 0,
                    label: GlyphMetrics::EMPTY,
                });
            }
            let own = cell.own_size();
            max = Size::new(max.width.max(own.width), max.height.max(own.height));
            cell_index.insert(glyph.code_point, cells.len());
            cells.push(cell);
            if let Some(entry) = entries.last_mut() {
                entry.cells.end = cells.len();
            }
        }

        tracing::debug!(
            glyphs = self.content.len(),
            cells = cells.len(),
            skipped,
            ranges = entries.len(),
            max_width = max.width,
            max_height = max.height,
            "measure"
        );

        self.ctx.set_glyph_extremes(floor, max);
        self.cells = cells;
        self.cell_index = cell_index;
        self.entries = entries;
        self.range_index = range_index;
        self.rows.clear();
        self.cell_rows.clear();
        self.window = 0..0;
    }

    fn layout(&mut self) {
        let header_font = self.ctx.header_font(&mut self.backend);
        let spacing = self.ctx.spacing();
        let surface_width = self.ctx.surface().width;

        let mut label_height: f64 = 0.0;
        for entry in &mut self.entries {
            entry.label = self.backend.measure(&entry.range.name, &header_font);
            label_height = label_height.max(entry.label.height());
        }
        self.header_extent = if self.entries.is_empty() {
            0.0
        } else {
            label_height + spacing.vertical
        };

        let mut rows = Vec::new();
        let mut cell_rows = alloc::vec![0; self.cells.len()];
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if index == 0 {
                entry.header_row = None;
            } else {
                entry.header_row = Some(rows.len());
                rows.push(Row::Header(HeaderRow::new(
                    index,
                    Size::new(surface_width, self.header_extent),
                )));
            }
            entry.first_content_row = rows.len();

            let mut packer = RowPacker::new(&self.ctx, entry.cells.start);
            for cell in entry.cells.clone() {
                if packer.try_add(&self.cells[cell]) {
                    cell_rows[cell] = rows.len();
                    continue;
                }
                rows.push(Row::Content(packer.finish(index, &mut self.cells)));
                packer = RowPacker::new(&self.ctx, cell);
                let accepted = packer.try_add(&self.cells[cell]);
                debug_assert!(accepted, "an empty row accepts any cell");
                cell_rows[cell] = rows.len();
            }
            if !packer.is_empty() {
                rows.push(Row::Content(packer.finish(index, &mut self.cells)));
            }
        }

        tracing::debug!(
            rows = rows.len(),
            ranges = self.entries.len(),
            surface_width,
            header_extent = self.header_extent,
            "layout"
        );

        self.rows = rows;
        self.cell_rows = cell_rows;
        self.first_row = 0;
        self.window = 0..0;
    }

    fn arrange(&mut self) {
        let height = self.ctx.surface().height;
        self.first_row = self.first_row.min(self.rows.len());
        let mut y = self.header_extent;
        let mut end = self.first_row;
        for row in &mut self.rows[self.first_row..] {
            let extent = row.size().height;
            // The first visible row is placed even when it alone overflows.
            if end > self.first_row && y + extent > height {
                break;
            }
            row.arrange(Point::new(0.0, y), &mut self.cells, &self.ctx);
            y += extent;
            end += 1;
        }
        self.window = self.first_row..end;
        tracing::debug!(first = self.first_row, end, "arrange");
    }
}
