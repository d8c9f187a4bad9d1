// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_glyph_grid --heading-base-level=0

//! Understory Glyph Grid: a virtualized, range-grouped grid of glyphs.
//!
//! Understory Glyph Grid lays out a catalog of characters (for example every glyph a font
//! covers) as a scrollable grid, grouped under Unicode range headers. It is the layout and
//! paint engine behind a character-map style picker.
//!
//! - Packs glyphs into rows that fit the surface width under one of three sizing policies.
//! - Inserts a header row wherever the Unicode range changes, and keeps the current range
//!   pinned in a header band at the top of the surface.
//! - Only arranges and paints the rows that fit the surface height.
//! - Answers hit tests, range jumps, and glyph visibility queries.
//!
//! ## Pipeline and invalidation
//!
//! Work is split into four ordered stages: Measure, Layout, Arrange, and Draw.
//! Every input (content, surface size, fonts, colors, spacing, sizing policy, scroll position,
//! selection) invalidates the coarsest stage it affects, which implies every finer stage.
//! Nothing is recomputed until [`GlyphGrid::draw`] or [`GlyphGrid::update`] runs, and then
//! each stale stage runs exactly once. Changing a color repaints; changing the surface height
//! re-arranges; changing the width re-packs; changing the glyph font re-measures.
//!
//! A host can install [`GlyphGrid::set_repaint_handler`] to be told when a repaint is
//! needed. It is called at most once between two draws.
//!
//! ## Backends
//!
//! The crate does no text shaping or rasterization of its own.
//! - [`TextBackend`] loads font handles from a [`FontSpec`] and measures text.
//! - [`Surface`] receives fill, stroke, and text paint calls.
//! - [`DisplayList`] is a recording [`Surface`], handy for tests and for replaying frames.
//!
//! ## Sizing policies
//!
//! [`WidthMode`] and [`HeightMode`] pick how cell slots are sized:
//! - `Default`: every cell uses the largest glyph in the catalog, giving a uniform grid.
//! - `RowMax`: cells use the largest glyph in their row; a wider glyph widens the
//!   row retroactively, and the row is re-validated against the surface width.
//! - [`WidthMode::PerGlyph`]: each cell keeps its own width.
//!
//! An optional minimum-size reference text ([`GlyphGrid::set_min_size_reference`]) floors
//! every cell.
//!
//! ## API overview
//!
//! - [`GlyphGrid`]: the controller; owns the catalog, rows, and visible window.
//! - [`Glyph`], [`UnicodeRange`], [`RangeId`]: catalog entries.
//! - [`Row`], [`HeaderRow`], [`ContentRow`], [`RangeEntry`]: the packed row list.
//! - [`RenderContext`] and [`ContextInput`]: shared layout and paint state.
//! - [`Invalidation`], [`Stage`], [`Stages`]: staged invalidation.
//! - [`GridHit`]: result of [`GlyphGrid::hit_test`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod backend;
mod cell;
mod context;
mod glyph;
mod grid;
mod invalidation;
mod packer;
mod row;
mod style;

#[cfg(test)]
mod testing;

pub use backend::{DisplayList, PaintCommand, Surface, TextBackend};
pub use cell::GlyphCell;
pub use context::{ContextInput, HeaderStyle, ItemStyle, RenderContext};
pub use glyph::{Glyph, GlyphMetrics, RangeId, UnicodeRange};
pub use grid::GlyphGrid;
pub use invalidation::{Invalidation, Stage, Stages};
pub use packer::RowPacker;
pub use row::{ContentRow, GridHit, HeaderRow, RangeEntry, Row, RowKind};
pub use style::{Color, FontSpec, FontStyle, HeightMode, SizingPolicy, Spacing, WidthMode};
