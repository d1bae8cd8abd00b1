//! Timed automatic `next`.

use std::time::{Duration, Instant};
use tracing::debug;

use vitrine_config::Settings;

use super::{Plugin, PluginContext};
use crate::carousel::commands::Command;
use crate::events::{Event, Lifecycle, Property};
use crate::state::StateTag;

/// Advances the carousel every `autoplay_timeout` while playing.
#[derive(Debug, Default)]
pub struct Autoplay {
    playing: bool,
    paused: bool,
    deadline: Option<Instant>,
    /// Interval and speed given by the last `Play`, overriding settings.
    timeout: Option<u64>,
    speed: Option<u64>,
}

impl Autoplay {
    /// Stopped until `autoplay` is set or a `Play` command arrives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Playing and not paused by hover or drag.
    pub fn is_playing(&self) -> bool {
        self.playing && !self.paused
    }

    /// Paused by hover or drag.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// When the next slide is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn interval(&self, settings: &Settings) -> Duration {
        Duration::from_millis(self.timeout.unwrap_or(settings.autoplay_timeout))
    }

    fn play(&mut self, now: Instant, settings: &Settings) {
        self.playing = true;
        self.paused = false;
        self.deadline = now.checked_add(self.interval(settings));
        debug!(deadline = ?self.deadline, "autoplay started");
    }

    fn stop(&mut self) {
        if self.playing {
            debug!("autoplay stopped");
        }
        self.playing = false;
        self.paused = false;
        self.deadline = None;
    }
}

impl Plugin for Autoplay {
    fn name(&self) -> &'static str {
        "autoplay"
    }

    fn on_event(&mut self, event: &Event, ctx: &mut PluginContext<'_>) {
        let settings = ctx.carousel().settings();
        match (event.kind, event.property()) {
            (Lifecycle::Initialized, _) if settings.autoplay => {
                self.play(ctx.now(), settings);
            }
            (Lifecycle::Changed, Some(Property::Settings)) => {
                if !settings.autoplay {
                    self.stop();
                } else if !self.playing {
                    self.play(ctx.now(), settings);
                }
            }
            _ => {}
        }
    }

    fn on_command(
        &mut self,
        command: &Command,
        ctx: &mut PluginContext<'_>,
    ) -> bool {
        match command {
            Command::Play { timeout, speed } => {
                self.timeout = *timeout;
                self.speed = *speed;
                self.play(ctx.now(), ctx.carousel().settings());
                true
            }
            Command::Stop => {
                self.stop();
                true
            }
            _ => false,
        }
    }

    fn on_tick(&mut self, now: Instant, ctx: &mut PluginContext<'_>) {
        if !self.is_playing() {
            return;
        }
        let Some(deadline) = self.deadline else {
            return;
        };
        if now < deadline {
            return;
        }

        let settings = ctx.carousel().settings();
        if !ctx.carousel().is(StateTag::Interacting) {
            let speed = self.speed.or(settings.autoplay_speed);
            ctx.push(Command::Next { speed });
        }
        self.deadline = now.checked_add(self.interval(settings));
    }

    fn on_hover(&mut self, hovering: bool, ctx: &mut PluginContext<'_>) {
        let settings = ctx.carousel().settings();
        if !settings.autoplay_hover_pause || !self.playing {
            return;
        }
        if hovering {
            self.paused = true;
            self.deadline = None;
        } else {
            self.play(ctx.now(), settings);
        }
    }

    fn destroy(&mut self) {
        self.stop();
    }
}
