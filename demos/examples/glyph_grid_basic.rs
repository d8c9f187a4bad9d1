// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph grid basics: pack a small catalog, paint it, scroll, and hit test.
//!
//! This example shows how to:
//! - plug a text backend into `GlyphGrid`,
//! - record a frame into a `DisplayList`,
//! - jump between ranges and resolve pointer hits.
//!
//! Set `RUST_LOG=understory_glyph_grid=debug` to see each pipeline stage run.
//!
//! Run:
//! - `cargo run -p understory_demos --example glyph_grid_basic`

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_glyph_grid::{
    DisplayList, FontSpec, Glyph, GlyphGrid, GlyphMetrics, HeightMode, PaintCommand, RangeId,
    SizingPolicy, TextBackend, UnicodeRange, WidthMode,
};

/// A font handle: just the pixel size.
#[derive(Clone, Debug)]
struct MonoFont {
    size: f64,
}

/// Measures every character as 0.6em wide, except combining marks and
/// other zero-width characters.
#[derive(Debug, Default)]
struct MonoBackend;

impl TextBackend for MonoBackend {
    type Font = MonoFont;

    fn load_font(&mut self, spec: &FontSpec) -> MonoFont {
        MonoFont { size: spec.size }
    }

    fn measure(&mut self, text: &str, font: &MonoFont) -> GlyphMetrics {
        let columns = text
            .chars()
            .filter(|c| !matches!(*c as u32, 0x0300..=0x036F | 0x200B..=0x200D))
            .count();
        if columns == 0 {
            return GlyphMetrics::EMPTY;
        }
        let advance = font.size * 0.6 * columns as f64;
        let ascent = font.size * 0.8;
        let descent = font.size * 0.2;
        GlyphMetrics {
            advance,
            ascent,
            descent,
            ink: Rect::new(0.0, -ascent, advance, descent),
        }
    }
}

fn catalog() -> Vec<Glyph> {
    let latin = UnicodeRange::new(RangeId(0), "Basic Latin", 0x0000, 0x007F);
    let supplement = UnicodeRange::new(RangeId(1), "Latin-1 Supplement", 0x0080, 0x00FF);
    let greek = UnicodeRange::new(RangeId(2), "Greek and Coptic", 0x0370, 0x03FF);
    let marks = UnicodeRange::new(RangeId(3), "Combining Diacritical Marks", 0x0300, 0x036F);

    let mut glyphs = Vec::new();
    glyphs.extend((0x21..0x7F).map(|cp| Glyph::new(cp, "Mono", latin.clone())));
    glyphs.extend((0xA1..0x100).map(|cp| Glyph::new(cp, "Mono", supplement.clone())));
    // Zero-width marks measure empty and never reach the grid.
    glyphs.extend((0x300..0x310).map(|cp| Glyph::new(cp, "Mono", marks.clone())));
    glyphs.extend((0x391..0x3AA).map(|cp| Glyph::new(cp, "Mono", greek.clone())));
    glyphs
}

fn summarize(list: &DisplayList<MonoFont>) {
    let fills = list
        .commands()
        .iter()
        .filter(|c| matches!(c, PaintCommand::FillRect { .. }))
        .count();
    let texts: String = list.texts().map(|(t, _)| t).take(24).collect();
    println!(
        "  {} commands ({} fills), first texts: {texts}",
        list.commands().len(),
        fills
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut grid = GlyphGrid::new(MonoBackend);
    grid.set_surface_size(320.0, 240.0);
    grid.set_sizing_policy(SizingPolicy::new(WidthMode::RowMax, HeightMode::RowMax));
    grid.set_content(catalog());
    grid.set_repaint_handler(|| println!("(repaint requested)"));

    let mut list = DisplayList::new();
    grid.draw(&mut list);
    println!(
        "{} ranges, {} rows, visible {:?}",
        grid.ranges().len(),
        grid.row_count(),
        grid.visible_rows()
    );
    summarize(&list);

    // Jump to Greek; the header band follows the first visible row.
    grid.jump_to_range(RangeId(2));
    list.clear();
    grid.draw(&mut list);
    if let Some(band) = grid.header_band() {
        println!("band after jump: {}", band.range.name);
    }
    summarize(&list);

    // Click the middle of the first visible content row.
    let first = grid.visible_rows().start;
    if let Some(row) = grid.row(first) {
        let bounds = row.bounds();
        let point = Point::new(bounds.x0 + 20.0, bounds.center().y);
        if let Some(hit) = grid.press(point) {
            println!("hit at {point:?}: {hit:?}");
        }
    }
    println!("selected: {:?}", grid.selected().and_then(char::from_u32));

    list.clear();
    grid.draw(&mut list);
    summarize(&list);
}
