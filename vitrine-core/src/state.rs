//! Reference-counted state tags.
//!
//! Tags are not exclusive: a carousel can be animating and resizing at the
//! same time. Each tag is a counter; entering increments it together with the
//! groups it implies, leaving decrements them.

use serde::Serialize;
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};
use tracing::warn;

/// Engine state flag.
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
    Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StateTag {
    /// Construction in progress.
    Initializing,
    /// Layout pass in progress.
    Refreshing,
    /// Stage transition running.
    Animating,
    /// Pointer drag engaged.
    Dragging,
    /// Debounced resize being applied.
    Resizing,
    /// No pending invalidations.
    Valid,
    /// Group: initializing, refreshing or animating.
    Busy,
    /// Group: dragging.
    Interacting,
}

impl StateTag {
    /// Groups raised alongside this tag.
    pub fn groups(self) -> &'static [StateTag] {
        match self {
            StateTag::Initializing
            | StateTag::Refreshing
            | StateTag::Animating => &[StateTag::Busy],
            StateTag::Dragging => &[StateTag::Interacting],
            _ => &[],
        }
    }
}

/// One counter per tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateTags {
    counts: [u32; StateTag::COUNT],
}

impl StateTags {
    /// Raises `tag` and its groups.
    pub fn enter(&mut self, tag: StateTag) {
        self.counts[tag as usize] += 1;
        for group in tag.groups() {
            self.counts[*group as usize] += 1;
        }
    }

    /// Lowers `tag` and its groups; an unmatched leave only warns.
    pub fn leave(&mut self, tag: StateTag) {
        for t in std::iter::once(&tag).chain(tag.groups()) {
            let count = &mut self.counts[*t as usize];
            if *count == 0 {
                warn!(tag = %t, "leave without matching enter");
            } else {
                *count -= 1;
            }
        }
    }

    /// Whether `tag` is raised.
    pub fn is(&self, tag: StateTag) -> bool {
        self.counts[tag as usize] > 0
    }

    /// Currently raised tags, in declaration order.
    pub fn active(&self) -> Vec<StateTag> {
        StateTag::iter().filter(|tag| self.is(*tag)).collect()
    }

    /// Lowers everything.
    pub fn clear(&mut self) {
        self.counts = [0; StateTag::COUNT];
    }
}
