//! Observer plugins attached to a carousel at construction.
//!
//! A plugin sees a read-only view of the engine and answers by queueing
//! [`Command`]s; the engine runs them once the current call has finished.

/// Timed advance.
pub mod autoplay;
/// URL fragment sync.
pub mod hash;
/// Deferred image sources.
pub mod lazy;
/// Prev/next controls and dot pages.
pub mod navigation;

use std::any::Any;
use std::fmt;
use std::time::Instant;

use crate::carousel::Carousel;
use crate::carousel::commands::Command;
use crate::events::Event;

pub use autoplay::Autoplay;
pub use hash::Hash;
pub use lazy::Lazy;
pub use navigation::{Controls, Navigation, Navigator, Page};

/// Extension attached at construction. Every hook defaults to a no-op.
pub trait Plugin: Any + fmt::Debug {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Called for every lifecycle event, before subscribers see it.
    fn on_event(&mut self, _event: &Event, _ctx: &mut PluginContext<'_>) {}

    /// Returns true when the command was handled. The first plugin to
    /// handle a command stops the search.
    fn on_command(
        &mut self,
        _command: &Command,
        _ctx: &mut PluginContext<'_>,
    ) -> bool {
        false
    }

    /// Called from [`Carousel::tick`] with the host time.
    fn on_tick(&mut self, _now: Instant, _ctx: &mut PluginContext<'_>) {}

    /// Pointer entered or left the carousel element.
    fn on_hover(&mut self, _hovering: bool, _ctx: &mut PluginContext<'_>) {}

    /// Drop timers and any state tied to the carousel.
    fn destroy(&mut self) {}
}

/// What a plugin hook can see and do.
#[derive(Debug)]
pub struct PluginContext<'a> {
    carousel: &'a Carousel,
    commands: &'a mut Vec<Command>,
}

impl<'a> PluginContext<'a> {
    pub(crate) fn new(
        carousel: &'a Carousel,
        commands: &'a mut Vec<Command>,
    ) -> Self {
        Self { carousel, commands }
    }

    /// Read-only engine view.
    pub fn carousel(&self) -> &'a Carousel {
        self.carousel
    }

    /// Queues a command to run after the current engine call.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Latest host time.
    pub fn now(&self) -> Instant {
        self.carousel.now()
    }
}
