//! Render model: the stage strip and one record per slot.
//!
//! Every setter counts as a style write, whether or not the value changed.
//! Hosts diff against their own tree; tests use the counter to check that a
//! pass without invalidations touches nothing.

use serde::Serialize;

use crate::item::ItemId;

/// Styles of the strip that holds every slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageStyle {
    /// Total strip width; `None` once cleared.
    pub width: Option<f32>,
    /// Padding on both ends.
    pub padding: f32,
    /// Horizontal translation.
    pub offset: f32,
    /// Transition length for the current offset change (ms).
    pub transition_ms: u64,
}

/// One rendered slot: an item or a clone of one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    /// Item shown.
    pub item: ItemId,
    /// Relative index of the item shown.
    pub index: usize,
    /// Loop clone rather than the item itself.
    pub cloned: bool,
    /// Fixed width, or `None` for natural (auto) width.
    pub width: Option<f32>,
    /// Trailing margin (leading in RTL).
    pub margin: f32,
    /// Inside the viewport.
    pub active: bool,
    /// The centered slot in center mode.
    pub center: bool,
}

impl Slot {
    /// Unsized, inactive slot.
    pub fn new(item: ItemId, index: usize, cloned: bool) -> Self {
        Self {
            item,
            index,
            cloned,
            width: None,
            margin: 0.0,
            active: false,
            center: false,
        }
    }
}

/// Stage style plus slots in absolute order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stage {
    style: StageStyle,
    slots: Vec<Slot>,
    #[serde(skip)]
    writes: u64,
}

impl Stage {
    /// Current stage style.
    pub fn style(&self) -> &StageStyle {
        &self.style
    }

    /// Slots in absolute order, clones included.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Shorthand for `style().offset`.
    pub fn offset(&self) -> f32 {
        self.style.offset
    }

    /// Style writes since construction.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub(crate) fn translate(&mut self, offset: f32, transition_ms: u64) {
        self.style.offset = offset;
        self.style.transition_ms = transition_ms;
        self.writes += 1;
    }

    pub(crate) fn set_size(&mut self, width: f32, padding: f32) {
        self.style.width = Some(width);
        self.style.padding = padding;
        self.writes += 1;
    }

    pub(crate) fn clear_style(&mut self) {
        self.style = StageStyle::default();
        self.writes += 1;
    }

    pub(crate) fn replace_slots(&mut self, slots: Vec<Slot>) {
        self.slots = slots;
        self.writes += 1;
    }

    pub(crate) fn size_slots(
        &mut self,
        mut width_of: impl FnMut(usize) -> Option<f32>,
        margin: f32,
    ) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.width = width_of(i);
            slot.margin = margin;
        }
        self.writes += 1;
    }

    pub(crate) fn mark(&mut self, active: &[usize], center: Option<usize>) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.active = active.binary_search(&i).is_ok();
            slot.center = center == Some(i);
        }
        self.writes += 1;
    }

    /// Absolute positions of active slots.
    pub fn active(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(i, _)| i)
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.style = StageStyle::default();
        self.slots.clear();
        self.writes += 1;
    }
}
