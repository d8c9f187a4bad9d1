// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout and paint unit for a single glyph.

use kurbo::{Point, Rect, Size};

use crate::backend::{Surface, TextBackend};
use crate::context::RenderContext;
use crate::glyph::{Glyph, GlyphMetrics};
use crate::style::{HeightMode, WidthMode};

/// Inset of the selection outline from the cell bounds.
const SELECTION_INSET: f64 = 2.0;
/// Stroke width of the selection outline.
const SELECTION_STROKE: f64 = 2.0;

/// One glyph together with its measurement and, once arranged, its bounds.
#[derive(Clone, Debug)]
pub struct GlyphCell {
    glyph: Glyph,
    metrics: GlyphMetrics,
    /// Measured size, floored by the context's minimum glyph size.
    own: Size,
    /// Glyph slot settled by the row packer, excluding spacing.
    slot: Size,
    bounds: Rect,
}

impl GlyphCell {
    /// Measures `glyph` with `font`.
    ///
    /// Returns `None` for glyphs with nothing drawable, which are left out
    /// of the catalog.
    pub fn measure<B: TextBackend>(
        glyph: Glyph,
        font: &B::Font,
        backend: &mut B,
        floor: Size,
    ) -> Option<Self> {
        let metrics = backend.measure(&glyph.text, font);
        if !metrics.is_drawable() {
            return None;
        }
        let measured = metrics.size();
        let own = Size::new(
            measured.width.max(floor.width),
            measured.height.max(floor.height),
        );
        Some(Self {
            glyph,
            metrics,
            own,
            slot: own,
            bounds: Rect::ZERO,
        })
    }

    /// The glyph.
    pub fn glyph(&self) -> &Glyph {
        &self.glyph
    }

    /// Code point of the glyph.
    pub fn code_point(&self) -> u32 {
        self.glyph.code_point
    }

    /// Raw metrics reported by the backend.
    pub fn metrics(&self) -> &GlyphMetrics {
        &self.metrics
    }

    /// The glyph's own (floored) size, independent of any policy.
    pub fn own_size(&self) -> Size {
        self.own
    }

    /// Size this cell asks for under the context's sizing policy,
    /// excluding spacing.
    ///
    /// `Default` modes use the catalog-wide maximum; the other modes use
    /// the glyph's own size. Row-level widening happens in the packer.
    pub fn preferred_size<F>(&self, ctx: &RenderContext<F>) -> Size {
        let policy = ctx.policy();
        let max = ctx.max_glyph();
        let width = match policy.width {
            WidthMode::Default => max.width,
            WidthMode::RowMax | WidthMode::PerGlyph => self.own.width,
        };
        let height = match policy.height {
            HeightMode::Default => max.height,
            HeightMode::RowMax => self.own.height,
        };
        Size::new(width, height)
    }

    /// Glyph slot settled by the last layout, excluding spacing.
    pub fn slot(&self) -> Size {
        self.slot
    }

    pub(crate) fn set_slot(&mut self, slot: Size) {
        self.slot = slot;
    }

    /// Stores the final bounds `[origin, origin + size]`.
    pub fn arrange(&mut self, origin: Point, size: Size) {
        self.bounds = Rect::from_origin_size(origin, size);
    }

    /// Final bounds from the last arrange.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Paints the glyph's ink centered in its bounds, outlined when selected.
    ///
    /// Glyphs without ink extents are centered on their line box.
    pub fn draw<F, S>(&self, surface: &mut S, font: &F, ctx: &RenderContext<F>)
    where
        S: Surface<F> + ?Sized,
    {
        let center = self.bounds.center();
        let ink = self.metrics.ink;
        let x = center.x - ink.width() / 2.0 - ink.x0;
        let baseline = if ink.height() > 0.0 {
            center.y - ink.height() / 2.0 - ink.y0
        } else {
            center.y - self.metrics.height() / 2.0 + self.metrics.ascent
        };
        surface.draw_text(
            &self.glyph.text,
            font,
            ctx.item().color,
            Point::new(x, baseline),
        );
        if ctx.selected() == Some(self.glyph.code_point) {
            surface.stroke_rect(
                self.bounds.inset(-SELECTION_INSET),
                ctx.item().selection_color,
                SELECTION_STROKE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DisplayList, PaintCommand};
    use crate::context::ContextInput;
    use crate::style::SizingPolicy;
    use crate::testing::{TestBackend, TestFont, range};

    fn setup(backend: &mut TestBackend) -> (RenderContext<TestFont>, TestFont) {
        let mut ctx = RenderContext::new();
        let font = ctx.item_font(backend);
        (ctx, font)
    }

    #[test]
    fn zero_height_glyph_produces_no_cell() {
        let mut backend = TestBackend::new().with_metrics("\u{200B}", GlyphMetrics::EMPTY);
        let (_, font) = setup(&mut backend);
        let glyph = Glyph::new(0x200B, "Test Sans", range(0x20, "Punctuation"));
        assert!(GlyphCell::measure(glyph, &font, &mut backend, Size::ZERO).is_none());
    }

    #[test]
    fn preferred_size_follows_policy() {
        let mut backend = TestBackend::new().with_width("i", 4.0);
        let (mut ctx, font) = setup(&mut backend);
        let glyph = Glyph::new(u32::from('i'), "Test Sans", range(0, "Basic Latin"));
        let cell = GlyphCell::measure(glyph, &font, &mut backend, Size::ZERO).unwrap();
        ctx.set_glyph_extremes(Size::ZERO, Size::new(30.0, 40.0));

        assert_eq!(cell.preferred_size(&ctx), Size::new(30.0, 40.0));
        ctx.apply(ContextInput::SizingPolicy(SizingPolicy::new(
            WidthMode::PerGlyph,
            HeightMode::RowMax,
        )));
        assert_eq!(cell.preferred_size(&ctx), Size::new(4.0, 24.0));
        ctx.apply(ContextInput::SizingPolicy(SizingPolicy::new(
            WidthMode::RowMax,
            HeightMode::Default,
        )));
        assert_eq!(cell.preferred_size(&ctx), Size::new(4.0, 40.0));
    }

    #[test]
    fn floor_raises_small_glyphs() {
        let mut backend = TestBackend::new().with_width(".", 2.0);
        let (_, font) = setup(&mut backend);
        let glyph = Glyph::new(u32::from('.'), "Test Sans", range(0, "Basic Latin"));
        let cell = GlyphCell::measure(glyph, &font, &mut backend, Size::new(10.0, 5.0)).unwrap();
        assert_eq!(cell.own_size(), Size::new(10.0, 24.0));
    }

    #[test]
    fn draw_centers_glyph_and_outlines_selection() {
        let metrics = GlyphMetrics {
            advance: 10.0,
            ascent: 8.0,
            descent: 2.0,
            ink: Rect::new(1.0, -8.0, 9.0, 2.0),
        };
        let mut backend = TestBackend::new().with_metrics("A", metrics);
        let (mut ctx, font) = setup(&mut backend);
        let glyph = Glyph::new(0x41, "Test Sans", range(0, "Basic Latin"));
        let mut cell = GlyphCell::measure(glyph, &font, &mut backend, Size::ZERO).unwrap();
        cell.arrange(Point::new(100.0, 50.0), Size::new(20.0, 20.0));

        let mut list = DisplayList::new();
        cell.draw(&mut list, &font, &ctx);
        // Center (110, 60): x = 110 - 8/2 - 1, ink top = 60 - 5, baseline = 55 + 8.
        let texts: alloc::vec::Vec<_> = list.texts().collect();
        assert_eq!(texts, [("A", Point::new(105.0, 63.0))]);
        assert_eq!(list.commands().len(), 1);

        ctx.apply(ContextInput::Selection(Some(0x41)));
        list.clear();
        cell.draw(&mut list, &font, &ctx);
        assert_eq!(
            list.commands()[1],
            PaintCommand::StrokeRect {
                rect: Rect::new(102.0, 52.0, 118.0, 68.0),
                color: ctx.item().selection_color,
                width: 2.0,
            }
        );
    }

    #[test]
    fn draw_centers_ink_not_line_box() {
        // An x-height glyph: ink sits between the baseline and 8 above it.
        let metrics = GlyphMetrics {
            advance: 10.0,
            ascent: 10.0,
            descent: 4.0,
            ink: Rect::new(0.0, -8.0, 10.0, 0.0),
        };
        let mut backend = TestBackend::new().with_metrics("x", metrics);
        let (ctx, font) = setup(&mut backend);
        let glyph = Glyph::new(u32::from('x'), "Test Sans", range(0, "Basic Latin"));
        let mut cell = GlyphCell::measure(glyph, &font, &mut backend, Size::ZERO).unwrap();
        cell.arrange(Point::new(0.0, 50.0), Size::new(20.0, 20.0));

        let mut list = DisplayList::new();
        cell.draw(&mut list, &font, &ctx);
        // Ink spans 56..64 around the center at 60.
        let texts: alloc::vec::Vec<_> = list.texts().collect();
        assert_eq!(texts, [("x", Point::new(5.0, 64.0))]);
    }

    #[test]
    fn draw_without_ink_uses_line_box() {
        let metrics = GlyphMetrics {
            advance: 10.0,
            ascent: 10.0,
            descent: 4.0,
            ink: Rect::new(0.0, 0.0, 0.0, 0.0),
        };
        let mut backend = TestBackend::new().with_metrics(" ", metrics);
        let (ctx, font) = setup(&mut backend);
        let glyph = Glyph::new(0x20, "Test Sans", range(0, "Basic Latin"));
        let mut cell = GlyphCell::measure(glyph, &font, &mut backend, Size::ZERO).unwrap();
        cell.arrange(Point::new(0.0, 50.0), Size::new(20.0, 20.0));

        let mut list = DisplayList::new();
        cell.draw(&mut list, &font, &ctx);
        // Line box top = 60 - 7, baseline = 53 + 10.
        let texts: alloc::vec::Vec<_> = list.texts().collect();
        assert_eq!(texts, [(" ", Point::new(10.0, 63.0))]);
    }
}
