// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Staged dirty flags for the measure → layout → arrange → draw pipeline.

/// One stage of the grid pipeline, from coarsest to finest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Re-measure every glyph and rebuild cells and range buckets.
    Measure,
    /// Re-pack cells into rows and rebuild header rows.
    Layout,
    /// Re-position the rows of the visible window.
    Arrange,
    /// Repaint.
    Draw,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Self; 4] = [Self::Measure, Self::Layout, Self::Arrange, Self::Draw];

    /// The flag owned by this stage alone.
    pub const fn flag(self) -> Stages {
        match self {
            Self::Measure => Stages::MEASURE,
            Self::Layout => Stages::LAYOUT,
            Self::Arrange => Stages::ARRANGE,
            Self::Draw => Stages::DRAW,
        }
    }

    /// This stage plus every finer stage it forces.
    pub const fn implied(self) -> Stages {
        match self {
            Self::Measure => Stages::all(),
            Self::Layout => Stages::LAYOUT
                .union(Stages::ARRANGE)
                .union(Stages::DRAW),
            Self::Arrange => Stages::ARRANGE.union(Stages::DRAW),
            Self::Draw => Stages::DRAW,
        }
    }
}

bitflags::bitflags! {
    /// Set of pending pipeline stages.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Stages: u8 {
        /// See [`Stage::Measure`].
        const MEASURE = 0b0000_1000;
        /// See [`Stage::Layout`].
        const LAYOUT  = 0b0000_0100;
        /// See [`Stage::Arrange`].
        const ARRANGE = 0b0000_0010;
        /// See [`Stage::Draw`].
        const DRAW    = 0b0000_0001;
    }
}

/// Coalesces invalidations until the next pipeline pass.
///
/// Invalidating a stage also invalidates every finer stage. Each flag is
/// consumed by [`Invalidation::should_run`], so a stage runs at most once
/// per invalidation no matter how many inputs changed in between.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Invalidation {
    pending: Stages,
}

impl Invalidation {
    /// A tracker with nothing pending.
    pub const fn new() -> Self {
        Self {
            pending: Stages::empty(),
        }
    }

    /// A tracker with every stage pending.
    pub const fn all() -> Self {
        Self {
            pending: Stages::all(),
        }
    }

    /// Marks `stage` and every finer stage pending.
    ///
    /// Returns `true` when the host should request a repaint: that is, when
    /// no draw was pending yet. Repeated invalidations within one burst
    /// return `false`.
    pub fn invalidate(&mut self, stage: Stage) -> bool {
        let draw_was_pending = self.pending.contains(Stages::DRAW);
        self.pending |= stage.implied();
        tracing::trace!(?stage, pending = ?self.pending, "invalidate");
        !draw_was_pending
    }

    /// Reads and clears the flag of `stage`.
    pub fn should_run(&mut self, stage: Stage) -> bool {
        let flag = stage.flag();
        let run = self.pending.contains(flag);
        self.pending.remove(flag);
        run
    }

    /// Returns `true` if `stage` is pending, without clearing it.
    pub const fn is_pending(&self, stage: Stage) -> bool {
        self.pending.contains(stage.flag())
    }

    /// Returns `true` if nothing is pending.
    pub const fn is_clean(&self) -> bool {
        self.pending.is_empty()
    }

    /// The raw pending set.
    pub const fn pending(&self) -> Stages {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_forces_every_finer_stage_exactly_once() {
        let orders = [
            [Stage::Layout, Stage::Arrange, Stage::Draw],
            [Stage::Draw, Stage::Layout, Stage::Arrange],
            [Stage::Arrange, Stage::Draw, Stage::Layout],
        ];
        for order in orders {
            let mut inv = Invalidation::new();
            inv.invalidate(Stage::Measure);
            for stage in order {
                assert!(inv.should_run(stage), "{stage:?} should run once");
                assert!(!inv.should_run(stage), "{stage:?} should not run twice");
            }
            assert!(inv.should_run(Stage::Measure), "measure itself is pending");
            assert!(inv.is_clean(), "all flags consumed");
        }
    }

    #[test]
    fn finer_stage_does_not_force_coarser() {
        let mut inv = Invalidation::new();
        inv.invalidate(Stage::Arrange);
        assert!(!inv.is_pending(Stage::Measure));
        assert!(!inv.is_pending(Stage::Layout));
        assert!(inv.is_pending(Stage::Arrange));
        assert!(inv.is_pending(Stage::Draw));
    }

    #[test]
    fn repaint_requested_once_per_burst() {
        let mut inv = Invalidation::new();
        assert!(inv.invalidate(Stage::Draw), "first invalidation requests repaint");
        assert!(!inv.invalidate(Stage::Layout), "draw already pending");
        assert!(!inv.invalidate(Stage::Measure), "draw already pending");
        assert!(inv.should_run(Stage::Draw));
        assert!(inv.invalidate(Stage::Draw), "new burst after draw consumed");
    }

    #[test]
    fn implied_sets_are_nested() {
        for pair in Stage::ALL.windows(2) {
            let (coarse, fine) = (pair[0], pair[1]);
            assert!(
                coarse.implied().contains(fine.implied()),
                "{coarse:?} must imply {fine:?}"
            );
            assert!(!fine.implied().contains(coarse.flag()), "no upward implication");
        }
    }
}
