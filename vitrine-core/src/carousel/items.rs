use tracing::debug;

use super::Carousel;
use crate::error::{CarouselError, Operation, RejectReason, Result};
use crate::events::{Lifecycle, Payload};
use crate::item::{Content, Item, ItemId};
use crate::pipeline::Invalidation;

impl Carousel {
    /// Inserts an item at a relative position (appends on `None`) and
    /// re-runs the pipeline. The item on screen stays on screen.
    pub fn add(
        &mut self,
        content: Content,
        position: Option<isize>,
    ) -> Result<ItemId> {
        self.ensure_alive(Operation::Add)?;
        let id = self.insert_item(content, position)?;
        self.update();
        self.drain_commands();
        Ok(id)
    }

    /// Removes the item at a relative position and re-runs the pipeline.
    pub fn remove(&mut self, position: isize) -> Result<ItemId> {
        self.ensure_alive(Operation::Remove)?;
        let id = self.remove_item(position)?;
        self.update();
        self.drain_commands();
        Ok(id)
    }

    /// Swaps the whole item list and restarts at `start_position`.
    pub fn replace(&mut self, contents: Vec<Content>) -> Result<()> {
        self.ensure_alive(Operation::Replace)?;
        self.replace_items(contents);
        self.update();
        self.drain_commands();
        Ok(())
    }

    pub(crate) fn insert_item(
        &mut self,
        content: Content,
        position: Option<isize>,
    ) -> Result<ItemId> {
        let index = match position {
            None => self.items.len(),
            Some(_) if self.items.is_empty() => 0,
            Some(p) => self.normalize(p, true).ok_or(CarouselError::rejected(
                Operation::Add,
                RejectReason::NoValidPosition,
            ))?,
        };

        let anchor = self.current.and_then(|c| self.slot_item(c));
        let id = self.ids.allocate();
        let payload = Payload::Item {
            id,
            position: index,
        };
        self.trigger(Lifecycle::Add, payload);
        self.items.insert(index, Item { id, content });
        self.reanchor(anchor);
        self.invalidate(Invalidation::Items);
        self.trigger(Lifecycle::Added, payload);
        debug!(%id, position = index, "item added");
        Ok(id)
    }

    pub(crate) fn remove_item(&mut self, position: isize) -> Result<ItemId> {
        if self.items.is_empty() {
            return Err(CarouselError::rejected(
                Operation::Remove,
                RejectReason::EmptyCarousel,
            ));
        }
        let index = self.normalize(position, true).ok_or(
            CarouselError::rejected(
                Operation::Remove,
                RejectReason::NoValidPosition,
            ),
        )?;

        let anchor = self.current.and_then(|c| self.slot_item(c));
        let id = self.items[index].id;
        let payload = Payload::Item {
            id,
            position: index,
        };
        self.trigger(Lifecycle::Remove, payload);
        self.items.remove(index);
        self.reanchor(anchor);
        self.invalidate(Invalidation::Items);
        self.trigger(Lifecycle::Removed, payload);
        debug!(%id, position = index, "item removed");
        Ok(id)
    }

    pub(crate) fn replace_items(&mut self, contents: Vec<Content>) {
        let mut items = Vec::with_capacity(contents.len());
        for content in contents {
            items.push(Item {
                id: self.ids.allocate(),
                content,
            });
        }
        self.items = items;
        self.clones.clear();

        if self.items.is_empty() {
            self.current = None;
        } else {
            let start = self.settings.start_position.index().unwrap_or(0);
            self.reset(start);
        }
        self.invalidate(Invalidation::Items);
    }

    /// Keeps the current position on the same item after the list shifted.
    fn reanchor(&mut self, anchor: Option<ItemId>) {
        if let Some(index) = anchor.and_then(|id| self.position_of(id)) {
            self.reset((self.clones.len() / 2 + index) as isize);
        }
    }
}
