//! Update pipeline declaration: invalidation tags and the ordered steps
//! that each depend on a subset of them.

use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

use crate::item::ItemId;

/// What went stale since the last update.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumCount,
    EnumIter,
    Display,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Invalidation {
    /// Element width changed.
    Width,
    /// Items added, removed or replaced.
    Items,
    /// Resolved settings changed.
    Settings,
    /// Current position changed.
    Position,
}

/// Set of pending invalidation tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Invalidations(u8);

#[allow(missing_docs)]
impl Invalidations {
    pub fn insert(&mut self, tag: Invalidation) {
        self.0 |= 1 << tag as u8;
    }

    pub fn remove(&mut self, tag: Invalidation) {
        self.0 &= !(1 << tag as u8);
    }

    pub fn contains(self, tag: Invalidation) -> bool {
        self.0 & (1 << tag as u8) != 0
    }

    pub fn intersects(self, tags: &[Invalidation]) -> bool {
        tags.iter().any(|tag| self.contains(*tag))
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

/// Update steps in execution order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumCount,
    EnumIter,
    Display,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[allow(missing_docs)]
pub enum Step {
    MeasureWidth,
    CaptureCurrent,
    ClearClones,
    ItemWidths,
    GenerateClones,
    Coordinates,
    StageSize,
    SlotStyles,
    ClearStageStyle,
    ResetCurrent,
    Translate,
    MarkActive,
}

impl Step {
    /// Tags that make this step re-run.
    pub fn filter(self) -> &'static [Invalidation] {
        use Invalidation::*;
        match self {
            Step::MeasureWidth => &[Width, Settings],
            Step::CaptureCurrent => &[Width, Items, Settings],
            Step::ClearClones => &[Items, Settings],
            Step::ItemWidths => &[Width, Items, Settings],
            Step::GenerateClones => &[Items, Settings],
            Step::Coordinates => &[Width, Items, Settings],
            Step::StageSize => &[Width, Items, Settings],
            Step::SlotStyles => &[Width, Items, Settings],
            Step::ClearStageStyle => &[Items],
            Step::ResetCurrent => &[Width, Items, Settings],
            Step::Translate => &[Position],
            Step::MarkActive => &[Width, Position, Items, Settings],
        }
    }

    /// Whether any pending tag is in [`Step::filter`].
    pub fn should_run(self, pending: Invalidations) -> bool {
        pending.intersects(self.filter())
    }
}

/// Values handed from one step to a later one within a single pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct PipelineCache {
    /// Item under the current position before clones were rebuilt.
    pub current: Option<ItemId>,
    /// Grid cell width.
    pub grid_width: f32,
    /// Any item spans more than one cell.
    pub merge: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn position_only_runs_translate_and_mark_active() {
        let mut pending = Invalidations::default();
        pending.insert(Invalidation::Position);
        let steps: Vec<Step> =
            Step::iter().filter(|s| s.should_run(pending)).collect();
        assert_eq!(steps, vec![Step::Translate, Step::MarkActive]);
    }

    #[test]
    fn items_skip_measure_width() {
        let mut pending = Invalidations::default();
        pending.insert(Invalidation::Items);
        assert!(!Step::MeasureWidth.should_run(pending));
        assert!(Step::ClearStageStyle.should_run(pending));
        assert!(!Step::Translate.should_run(pending));
        pending.remove(Invalidation::Items);
        assert!(pending.is_empty());
    }
}
