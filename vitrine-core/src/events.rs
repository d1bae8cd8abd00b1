//! Lifecycle notifications and typed subscriber registration.

use serde::Serialize;
use std::fmt;
use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

use crate::item::ItemId;

/// Lifecycle event kinds. Present-tense kinds fire before the change and
/// may be prevented or redirected; past-tense kinds fire after it.
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
#[allow(missing_docs)]
pub enum Lifecycle {
    Initialize,
    Initialized,
    Change,
    Changed,
    Refresh,
    Refreshed,
    Resize,
    Resized,
    Drag,
    Dragged,
    Translate,
    Translated,
    Add,
    Added,
    Remove,
    Removed,
}

/// Property named by `Change`/`Changed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// Current position.
    Position,
    /// Resolved settings (breakpoint switch).
    Settings,
}

/// Data carried by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
#[allow(missing_docs)]
pub enum Payload {
    None,
    /// Absolute position being changed to (or translated to).
    Position { position: usize },
    Settings,
    /// Item added or removed at a relative position.
    Item { id: ItemId, position: usize },
}

impl Payload {
    /// Property this payload describes, for `Change`/`Changed`.
    pub fn property(&self) -> Option<Property> {
        match self {
            Payload::Position { .. } => Some(Property::Position),
            Payload::Settings => Some(Property::Settings),
            _ => None,
        }
    }

    /// Position carried by the payload, absolute or relative.
    pub fn position(&self) -> Option<usize> {
        match self {
            Payload::Position { position } | Payload::Item { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }
}

/// One delivered notification. Subscribers may mutate it to steer the
/// engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// What happened.
    pub kind: Lifecycle,
    /// Event data.
    pub payload: Payload,
    prevented: bool,
    position_override: Option<isize>,
}

impl Event {
    /// Fresh, not prevented.
    pub fn new(kind: Lifecycle, payload: Payload) -> Self {
        Self {
            kind,
            payload,
            prevented: false,
            position_override: None,
        }
    }

    /// Cancels the default action (honoured by `Resize`).
    pub fn prevent_default(&mut self) {
        self.prevented = true;
    }

    /// Whether a subscriber called [`Event::prevent_default`].
    pub fn is_default_prevented(&self) -> bool {
        self.prevented
    }

    /// Redirects a position `Change` to another absolute position.
    pub fn override_position(&mut self, position: isize) {
        self.position_override = Some(position);
    }

    /// Redirect requested by a subscriber.
    pub fn position_override(&self) -> Option<isize> {
        self.position_override
    }

    /// Shorthand for `payload.property()`.
    pub fn property(&self) -> Option<Property> {
        self.payload.property()
    }
}

/// Handle returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&mut Event)>;

struct Subscriber {
    id: SubscriptionId,
    kind: Lifecycle,
    callback: Callback,
}

/// Observer list plus per-kind suppression counters.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
    suppressed: [u32; Lifecycle::COUNT],
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("suppressed", &self.suppressed)
            .finish()
    }
}

impl EventBus {
    /// Registers `callback` for `kind`; callbacks run in registration order.
    pub fn subscribe<F>(
        &mut self,
        kind: Lifecycle,
        callback: F,
    ) -> SubscriptionId
    where
        F: FnMut(&mut Event) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            kind,
            callback: Box::new(callback),
        });
        id
    }

    /// Returns false when the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        before != self.subscribers.len()
    }

    /// Mutes `kinds` until a matching [`EventBus::release`]. Nests.
    pub fn suppress(&mut self, kinds: &[Lifecycle]) {
        for kind in kinds {
            self.suppressed[*kind as usize] += 1;
        }
    }

    /// Undoes one [`EventBus::suppress`].
    pub fn release(&mut self, kinds: &[Lifecycle]) {
        for kind in kinds {
            let count = &mut self.suppressed[*kind as usize];
            *count = count.saturating_sub(1);
        }
    }

    /// Whether `kind` is muted.
    pub fn is_suppressed(&self, kind: Lifecycle) -> bool {
        self.suppressed[kind as usize] > 0
    }

    /// Runs every subscriber registered for `event.kind`, in order.
    pub fn notify(&mut self, event: &mut Event) {
        for subscriber in &mut self.subscribers {
            if subscriber.kind == event.kind {
                (subscriber.callback)(event);
            }
        }
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// No subscribers.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Drops every subscriber and suppression.
    pub fn clear(&mut self) {
        self.subscribers.clear();
        self.suppressed = [0; Lifecycle::COUNT];
    }
}
