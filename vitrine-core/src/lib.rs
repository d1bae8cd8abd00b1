//! Headless carousel engine.
//!
//! The engine owns item layout, loop clones, position state, drag gesture
//! recognition and animated transitions. It has no DOM: the host feeds in
//! viewport sizes, pointer events and a clock, then reads back a render
//! model ([`Stage`]) of stage and slot styles.
//!
//! Plugins ([`plugins`]) attach at construction and react to lifecycle
//! events by queueing [`Command`]s.

/// Stage transitions.
pub mod animator;
/// The engine.
pub mod carousel;
/// Loop clone generation.
pub mod clones;
/// Interaction thresholds.
pub mod constants;
/// Engine errors.
pub mod error;
/// Lifecycle events.
pub mod events;
/// Pointer input.
pub mod gesture;
/// Items and their content.
pub mod item;
/// Widths and coordinates.
pub mod layout;
/// Invalidation tags and update steps.
pub mod pipeline;
/// Built-in plugins.
pub mod plugins;
/// Position arithmetic.
pub mod position;
/// Render model.
pub mod stage;
/// State tags.
pub mod state;

pub use animator::{Easing, SnapAnimator, Transition};
pub use carousel::{
    Carousel, CarouselBuilder, Snapshot, Viewport,
    commands::{CarouselKey, Command, CommandBus, Envelope, Target},
};
pub use error::{CarouselError, Operation, RejectReason, Result};
pub use events::{Event, Lifecycle, Payload, Property, SubscriptionId};
pub use gesture::{
    Direction, PointerButton, PointerEvent, PointerOutcome, PointerPhase,
    PointerSource,
};
pub use item::{Content, Item, ItemId};
pub use pipeline::{Invalidation, Step};
pub use stage::{Slot, Stage, StageStyle};
pub use state::StateTag;

pub use vitrine_config::{CarouselOptions, Settings, SettingsOverride};
