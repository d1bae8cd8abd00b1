//! Deferred image loading for the slots about to come into view.

use std::collections::{BTreeSet, HashSet};

use super::{Plugin, PluginContext};
use crate::carousel::Carousel;
use crate::events::{Event, Lifecycle, Payload, Property};
use crate::item::ItemId;
use crate::position;

/// Requests deferred image sources as slots come into view.
#[derive(Debug, Default)]
pub struct Lazy {
    loaded: HashSet<ItemId>,
    slots: BTreeSet<usize>,
    fresh: Vec<ItemId>,
}

impl Lazy {
    /// Nothing loaded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` has been requested.
    pub fn is_loaded(&self, id: ItemId) -> bool {
        self.loaded.contains(&id)
    }

    /// Absolute slots whose image has been requested since the slot layout
    /// last changed.
    pub fn loaded_slots(&self) -> &BTreeSet<usize> {
        &self.slots
    }

    /// Items loaded since the last call, in load order.
    pub fn take_loaded(&mut self) -> Vec<ItemId> {
        std::mem::take(&mut self.fresh)
    }

    fn load(&mut self, carousel: &Carousel, slot: usize) {
        self.slots.insert(slot);
        if let Some(id) = carousel.slot_item(slot)
            && self.loaded.insert(id)
        {
            self.fresh.push(id);
        }
    }

    /// Loads the window of slots that `base` brings into view.
    fn load_window(&mut self, carousel: &Carousel, base: usize) {
        let settings = carousel.settings();
        let items = carousel.len();
        let clones = carousel.clones().len();
        if items == 0 {
            return;
        }

        let mut n = if settings.center {
            settings.items.div_ceil(2) as isize
        } else {
            settings.items as isize
        };
        let mut i = if settings.center { -n } else { 0 };
        let mut position = base as isize + i;

        let eager = settings.lazy_load_eager as isize;
        if eager > 0 {
            n += eager;
            if settings.looping {
                position -= eager;
                n += 1;
            }
        }

        while i < n {
            i += 1;
            if let Some(relative) =
                position::relative(position, items, clones)
            {
                self.load(carousel, clones / 2 + relative);
                for slot in carousel.clones_of(Some(relative)) {
                    self.load(carousel, slot);
                }
            }
            position += 1;
        }
    }
}

impl Plugin for Lazy {
    fn name(&self) -> &'static str {
        "lazy"
    }

    fn on_event(&mut self, event: &Event, ctx: &mut PluginContext<'_>) {
        let carousel = ctx.carousel();
        match (event.kind, event.payload) {
            (Lifecycle::Changed, Payload::Settings)
            | (Lifecycle::Added | Lifecycle::Removed, _) => self.slots.clear(),
            _ => {}
        }
        if !carousel.settings().lazy_load {
            return;
        }

        let base = match (event.kind, event.payload) {
            (Lifecycle::Initialized, _) => carousel.current(),
            (Lifecycle::Change, payload)
                if payload.property() == Some(Property::Position) =>
            {
                payload.position()
            }
            _ => None,
        };
        if let Some(base) = base {
            self.load_window(carousel, base);
        }
    }

    fn destroy(&mut self) {
        self.slots.clear();
        self.fresh.clear();
    }
}
