//! Interaction scripts replayed against a headless carousel.
//!
//! A script is a JSON array of steps:
//!
//! ```json
//! [
//!   { "run": { "command": "next" } },
//!   { "wait": 600 },
//!   { "drag": { "from": 400, "to": 180 } },
//!   { "resize": 480 }
//! ]
//! ```

use std::{
    fs,
    path::Path,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use vitrine_core::plugins::{Controls, Navigation};
use vitrine_core::{
    Carousel, Command, PointerEvent, PointerPhase, Snapshot, Viewport,
};

/// Frame interval used to advance the clock during waits.
const FRAME_MS: u64 = 16;
/// Vertical pointer position used for scripted drags.
const POINTER_Y: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    /// Dispatch a carousel command.
    Run(Command),
    /// Advance the clock, ticking once per frame.
    Wait(u64),
    /// Apply a new viewport width immediately.
    Resize(f32),
    /// Mouse drag from one x coordinate to another.
    Drag { from: f32, to: f32 },
    Hover(bool),
}

pub fn read_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid script {}", path.display()))
}

/// Final state printed by `vitrinectl simulate`.
#[derive(Debug, Serialize)]
pub struct Report {
    pub snapshot: Snapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls: Option<Controls>,
    pub rejected: usize,
}

/// Drives a carousel through `steps` on a simulated clock.
pub struct Simulation {
    carousel: Carousel,
    now: Instant,
    rejected: usize,
}

impl Simulation {
    pub fn new(carousel: Carousel) -> Self {
        let now = carousel.now();
        Self {
            carousel,
            now,
            rejected: 0,
        }
    }

    pub fn run(&mut self, steps: &[ScriptStep]) {
        for (index, step) in steps.iter().enumerate() {
            debug!(index, ?step, "script step");
            self.apply(step);
        }
    }

    fn apply(&mut self, step: &ScriptStep) {
        match step {
            ScriptStep::Run(command) => {
                if let Err(err) = self.carousel.dispatch(command.clone()) {
                    warn!(command = command.name(), %err, "command rejected");
                    self.rejected += 1;
                }
            }
            ScriptStep::Wait(ms) => self.wait(*ms),
            ScriptStep::Resize(width) => {
                let changed = self.carousel.resize_now(Viewport::new(*width));
                debug!(width, changed, "viewport resized");
            }
            ScriptStep::Drag { from, to } => {
                for (phase, x) in [
                    (PointerPhase::Down, *from),
                    (PointerPhase::Move, *to),
                    (PointerPhase::Up, *to),
                ] {
                    let outcome = self.carousel.pointer(PointerEvent::mouse(
                        phase, x, POINTER_Y, self.now,
                    ));
                    debug!(?phase, x, ?outcome, "pointer");
                }
            }
            ScriptStep::Hover(hovering) => self.carousel.hover(*hovering),
        }
    }

    fn wait(&mut self, ms: u64) {
        let mut remaining = ms;
        while remaining > 0 {
            let frame = remaining.min(FRAME_MS);
            self.now += Duration::from_millis(frame);
            self.carousel.tick(self.now);
            remaining -= frame;
        }
    }

    pub fn report(&self) -> Report {
        Report {
            snapshot: self.carousel.snapshot(),
            controls: self
                .carousel
                .plugin::<Navigation>()
                .map(|nav| nav.controls().clone()),
            rejected: self.rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_read_from_json() {
        let steps: Vec<ScriptStep> = serde_json::from_str(
            r#"[
                { "run": { "command": "to", "position": 2 } },
                { "wait": 250 },
                { "drag": { "from": 400, "to": 180 } },
                { "resize": 480 },
                { "hover": true }
            ]"#,
        )
        .unwrap();
        assert_eq!(
            steps,
            vec![
                ScriptStep::Run(Command::To {
                    position: 2,
                    speed: None
                }),
                ScriptStep::Wait(250),
                ScriptStep::Drag {
                    from: 400.0,
                    to: 180.0
                },
                ScriptStep::Resize(480.0),
                ScriptStep::Hover(true),
            ]
        );
    }
}
