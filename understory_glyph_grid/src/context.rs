// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render context: every style and geometry input the pipeline reads,
//! plus the font handles derived from them.

use alloc::sync::Arc;

use kurbo::Size;

use crate::backend::TextBackend;
use crate::invalidation::Stage;
use crate::style::{Color, FontSpec, FontStyle, SizingPolicy, Spacing};

/// Style of header rows and the header band.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderStyle {
    /// Label font.
    pub font: FontSpec,
    /// Label color.
    pub color: Color,
    /// Row background.
    pub background: Color,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self {
            font: FontSpec::new("sans-serif", 14.0).with_style(FontStyle::Bold),
            color: Color::rgb(0x20, 0x20, 0x20),
            background: Color::rgb(0xE8, 0xE8, 0xE8),
        }
    }
}

/// Style of glyph cells.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemStyle {
    /// Glyph size in logical pixels.
    pub size: f64,
    /// Glyph color.
    pub color: Color,
    /// Outline color of the selected cell.
    pub selection_color: Color,
}

impl Default for ItemStyle {
    fn default() -> Self {
        Self {
            size: 24.0,
            color: Color::BLACK,
            selection_color: Color::rgb(0x1E, 0x64, 0xC8),
        }
    }
}

/// One external input to the context.
///
/// Every variant has exactly one handler in [`RenderContext::apply`].
#[derive(Clone, Debug, PartialEq)]
pub enum ContextInput {
    /// Header font family, size, or style.
    HeaderFont(FontSpec),
    /// Header label color.
    HeaderColor(Color),
    /// Header background color.
    HeaderBackground(Color),
    /// Glyph font size.
    ItemFontSize(f64),
    /// Glyph font family (follows the catalog's font).
    ItemFamily(Arc<str>),
    /// Glyph color.
    ItemColor(Color),
    /// Selected-cell outline color.
    SelectionColor(Color),
    /// Cell spacing.
    Spacing(Spacing),
    /// Width/height sizing policy.
    SizingPolicy(SizingPolicy),
    /// Drawing surface size.
    SurfaceSize(Size),
    /// Selected code point.
    Selection(Option<u32>),
    /// Text whose measured size is the minimum cell size.
    MinSizeReference(Option<Arc<str>>),
}

/// Cached snapshot of everything the pipeline needs to measure and paint.
///
/// Inputs only change through [`RenderContext::apply`], which reports the
/// coarsest pipeline [`Stage`] the change invalidates. Font handles are
/// acquired lazily and dropped as soon as the input they derive from
/// changes.
#[derive(Clone, Debug)]
pub struct RenderContext<F> {
    header: HeaderStyle,
    item: ItemStyle,
    item_family: Arc<str>,
    spacing: Spacing,
    policy: SizingPolicy,
    surface: Size,
    max_glyph: Size,
    min_glyph: Size,
    min_size_reference: Option<Arc<str>>,
    selected: Option<u32>,
    header_font: Option<F>,
    item_font: Option<F>,
}

impl<F> Default for RenderContext<F> {
    fn default() -> Self {
        Self {
            header: HeaderStyle::default(),
            item: ItemStyle::default(),
            item_family: "sans-serif".into(),
            spacing: Spacing::default(),
            policy: SizingPolicy::default(),
            surface: Size::ZERO,
            max_glyph: Size::ZERO,
            min_glyph: Size::ZERO,
            min_size_reference: None,
            selected: None,
            header_font: None,
            item_font: None,
        }
    }
}

impl<F: Clone> RenderContext<F> {
    /// Creates a context with default styles and an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one input and returns the stage it invalidates, if any.
    ///
    /// Colors always repaint. Other inputs equal to the current value are
    /// ignored and return `None`.
    pub fn apply(&mut self, input: ContextInput) -> Option<Stage> {
        match input {
            ContextInput::HeaderFont(font) => {
                debug_assert!(font.size.is_finite(), "header font size must be finite");
                if self.header.font == font {
                    return None;
                }
                self.header.font = font;
                self.header_font = None;
                Some(Stage::Layout)
            }
            ContextInput::HeaderColor(color) => {
                self.header.color = color;
                Some(Stage::Draw)
            }
            ContextInput::HeaderBackground(color) => {
                self.header.background = color;
                Some(Stage::Draw)
            }
            ContextInput::ItemFontSize(size) => {
                debug_assert!(size.is_finite(), "item font size must be finite");
                if !replace(&mut self.item.size, size) {
                    return None;
                }
                self.item_font = None;
                Some(Stage::Measure)
            }
            ContextInput::ItemFamily(family) => {
                if self.item_family == family {
                    return None;
                }
                self.item_family = family;
                self.item_font = None;
                Some(Stage::Measure)
            }
            ContextInput::ItemColor(color) => {
                self.item.color = color;
                Some(Stage::Draw)
            }
            ContextInput::SelectionColor(color) => {
                self.item.selection_color = color;
                Some(Stage::Draw)
            }
            ContextInput::Spacing(spacing) => {
                debug_assert!(
                    spacing.horizontal >= 0.0 && spacing.vertical >= 0.0,
                    "spacing must be non-negative"
                );
                replace(&mut self.spacing, spacing).then_some(Stage::Layout)
            }
            ContextInput::SizingPolicy(policy) => {
                replace(&mut self.policy, policy).then_some(Stage::Layout)
            }
            ContextInput::SurfaceSize(size) => {
                debug_assert!(size.is_finite(), "surface size must be finite");
                let old = self.surface;
                if !replace(&mut self.surface, size) {
                    return None;
                }
                // Packing depends on the width; the window only on the height.
                if old.width == size.width {
                    Some(Stage::Arrange)
                } else {
                    Some(Stage::Layout)
                }
            }
            ContextInput::Selection(selected) => {
                replace(&mut self.selected, selected).then_some(Stage::Draw)
            }
            ContextInput::MinSizeReference(text) => {
                replace(&mut self.min_size_reference, text).then_some(Stage::Measure)
            }
        }
    }

    /// Returns the header font handle, acquiring it if needed.
    pub fn header_font<B>(&mut self, backend: &mut B) -> F
    where
        B: TextBackend<Font = F>,
    {
        match &self.header_font {
            Some(font) => font.clone(),
            None => {
                let font = backend.load_font(&self.header.font);
                self.header_font = Some(font.clone());
                font
            }
        }
    }

    /// Returns the glyph font handle, acquiring it if needed.
    pub fn item_font<B>(&mut self, backend: &mut B) -> F
    where
        B: TextBackend<Font = F>,
    {
        match &self.item_font {
            Some(font) => font.clone(),
            None => {
                let font = backend.load_font(&self.item_font_spec());
                self.item_font = Some(font.clone());
                font
            }
        }
    }

    /// Cached header font handle, if one has been acquired.
    pub fn cached_header_font(&self) -> Option<&F> {
        self.header_font.as_ref()
    }

    /// Cached glyph font handle, if one has been acquired.
    pub fn cached_item_font(&self) -> Option<&F> {
        self.item_font.as_ref()
    }
}

impl<F> RenderContext<F> {
    /// Header style.
    pub fn header(&self) -> &HeaderStyle {
        &self.header
    }

    /// Glyph style.
    pub fn item(&self) -> &ItemStyle {
        &self.item
    }

    /// Font spec used for glyphs.
    pub fn item_font_spec(&self) -> FontSpec {
        FontSpec::new(self.item_family.clone(), self.item.size)
    }

    /// Glyph font family.
    pub fn item_family(&self) -> &Arc<str> {
        &self.item_family
    }

    /// Cell spacing.
    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    /// Sizing policy.
    pub fn policy(&self) -> SizingPolicy {
        self.policy
    }

    /// Surface size.
    pub fn surface(&self) -> Size {
        self.surface
    }

    /// Largest glyph size over the whole catalog, as of the last measure.
    pub fn max_glyph(&self) -> Size {
        self.max_glyph
    }

    /// Minimum glyph size floor, as of the last measure.
    pub fn min_glyph(&self) -> Size {
        self.min_glyph
    }

    /// Text whose measured size is the minimum cell size.
    pub fn min_size_reference(&self) -> Option<&str> {
        self.min_size_reference.as_deref()
    }

    /// Selected code point.
    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    pub(crate) fn set_glyph_extremes(&mut self, min: Size, max: Size) {
        self.min_glyph = min;
        self.max_glyph = max;
    }
}

/// Stores `new` into `slot`; returns whether the value changed.
fn replace<T: PartialEq>(slot: &mut T, new: T) -> bool {
    if *slot == new {
        false
    } else {
        *slot = new;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{HeightMode, WidthMode};
    use crate::testing::TestBackend;

    fn ctx() -> RenderContext<crate::testing::TestFont> {
        RenderContext::new()
    }

    #[test]
    fn handler_table_maps_inputs_to_stages() {
        let cases = [
            (
                ContextInput::HeaderFont(FontSpec::new("serif", 20.0)),
                Stage::Layout,
            ),
            (ContextInput::HeaderColor(Color::WHITE), Stage::Draw),
            (ContextInput::HeaderBackground(Color::BLACK), Stage::Draw),
            (ContextInput::ItemFontSize(40.0), Stage::Measure),
            (ContextInput::ItemFamily("mono".into()), Stage::Measure),
            (ContextInput::ItemColor(Color::WHITE), Stage::Draw),
            (ContextInput::SelectionColor(Color::WHITE), Stage::Draw),
            (
                ContextInput::Spacing(Spacing {
                    horizontal: 1.0,
                    vertical: 1.0,
                }),
                Stage::Layout,
            ),
            (
                ContextInput::SizingPolicy(SizingPolicy::new(
                    WidthMode::PerGlyph,
                    HeightMode::RowMax,
                )),
                Stage::Layout,
            ),
            (
                ContextInput::SurfaceSize(Size::new(100.0, 100.0)),
                Stage::Layout,
            ),
            (ContextInput::Selection(Some(0x41)), Stage::Draw),
            (ContextInput::MinSizeReference(Some("0".into())), Stage::Measure),
        ];
        for (input, stage) in cases {
            let mut c = ctx();
            assert_eq!(c.apply(input.clone()), Some(stage), "{input:?}");
            let repeat = match input {
                ContextInput::HeaderColor(_)
                | ContextInput::HeaderBackground(_)
                | ContextInput::ItemColor(_)
                | ContextInput::SelectionColor(_) => Some(Stage::Draw),
                _ => None,
            };
            assert_eq!(c.apply(input.clone()), repeat, "repeat of {input:?}");
        }
    }

    #[test]
    fn equal_values_leave_stages_untouched() {
        let mut c = ctx();
        assert_eq!(c.apply(ContextInput::Spacing(Spacing::default())), None);
        assert_eq!(
            c.apply(ContextInput::SizingPolicy(SizingPolicy::default())),
            None
        );
        assert_eq!(c.apply(ContextInput::Selection(None)), None);
    }

    #[test]
    fn height_only_resize_is_arrange() {
        let mut c = ctx();
        c.apply(ContextInput::SurfaceSize(Size::new(100.0, 50.0)));
        assert_eq!(
            c.apply(ContextInput::SurfaceSize(Size::new(100.0, 80.0))),
            Some(Stage::Arrange)
        );
        assert_eq!(
            c.apply(ContextInput::SurfaceSize(Size::new(120.0, 80.0))),
            Some(Stage::Layout)
        );
    }

    #[test]
    fn stale_fonts_are_dropped_independently() {
        let mut backend = TestBackend::new();
        let mut c = ctx();
        let header = c.header_font(&mut backend);
        let item = c.item_font(&mut backend);
        assert_eq!(backend.loads(), 2);
        // Cached handles are reused.
        assert_eq!(c.header_font(&mut backend), header);
        assert_eq!(c.item_font(&mut backend), item);
        assert_eq!(backend.loads(), 2);

        c.apply(ContextInput::ItemFontSize(10.0));
        assert!(c.cached_item_font().is_none());
        assert!(c.cached_header_font().is_some());
        let item2 = c.item_font(&mut backend);
        assert_eq!(item2.size, 10.0);
        assert_eq!(backend.loads(), 3);

        c.apply(ContextInput::HeaderFont(FontSpec::new("serif", 9.0)));
        assert!(c.cached_header_font().is_none());
        assert!(c.cached_item_font().is_some());
    }

    #[test]
    fn cosmetic_inputs_keep_font_handles() {
        let mut backend = TestBackend::new();
        let mut c = ctx();
        c.header_font(&mut backend);
        c.item_font(&mut backend);
        c.apply(ContextInput::HeaderColor(Color::WHITE));
        c.apply(ContextInput::ItemColor(Color::WHITE));
        c.apply(ContextInput::Selection(Some(1)));
        assert!(c.cached_header_font().is_some());
        assert!(c.cached_item_font().is_some());
    }
}
