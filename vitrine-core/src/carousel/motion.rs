use std::time::Instant;

use super::Carousel;
use crate::animator::{self, Frame};
use crate::error::{CarouselError, Operation, RejectReason, Result};
use crate::events::{Lifecycle, Payload};
use crate::pipeline::Invalidation;
use crate::state::StateTag;

const TRANSLATE_EVENTS: [Lifecycle; 2] =
    [Lifecycle::Translate, Lifecycle::Translated];

impl Carousel {
    /// Moves to a relative position. `speed` is the per-item factor in ms;
    /// `None` uses `smart_speed` and `Some(0)` jumps.
    pub fn to(&mut self, position: isize, speed: Option<u64>) -> Result<()> {
        self.ensure_alive(Operation::To)?;
        let result = self.move_to(position, speed, Operation::To);
        self.drain_commands();
        result
    }

    /// Moves one position forward.
    pub fn next(&mut self, speed: Option<u64>) -> Result<()> {
        self.ensure_alive(Operation::Next)?;
        let result = self.step(1, speed, Operation::Next);
        self.drain_commands();
        result
    }

    /// Moves one position back.
    pub fn prev(&mut self, speed: Option<u64>) -> Result<()> {
        self.ensure_alive(Operation::Prev)?;
        let result = self.step(-1, speed, Operation::Prev);
        self.drain_commands();
        result
    }

    /// Sets the absolute current position, returning where it landed.
    ///
    /// Subscribers to the position `Change` may redirect it. Nothing moves
    /// until the next `update`.
    pub fn set_current(&mut self, position: isize) -> Result<usize> {
        self.ensure_alive(Operation::SetCurrent)?;
        let result = self.set_current_inner(position, Operation::SetCurrent);
        self.drain_commands();
        result
    }

    /// Host notification that the stage transition finished.
    pub fn transition_end(&mut self) {
        if self.destroyed {
            return;
        }
        self.finish_transition();
        self.drain_commands();
    }

    /// Current relative position, or the reason there is none.
    pub(crate) fn current_relative(
        &self,
        operation: Operation,
    ) -> Result<usize> {
        if self.items.is_empty() {
            return Err(CarouselError::rejected(
                operation,
                RejectReason::EmptyCarousel,
            ));
        }
        self.current
            .and_then(|current| self.relative(current))
            .ok_or(CarouselError::rejected(
                operation,
                RejectReason::NoValidPosition,
            ))
    }

    pub(crate) fn step(
        &mut self,
        delta: isize,
        speed: Option<u64>,
        operation: Operation,
    ) -> Result<()> {
        let relative = self.current_relative(operation)? as isize;
        self.move_to(relative + delta, speed, operation)
    }

    pub(crate) fn move_to(
        &mut self,
        position: isize,
        speed: Option<u64>,
        operation: Operation,
    ) -> Result<()> {
        let relative = self.current_relative(operation)? as isize;
        let mut current = self.current.unwrap_or_default() as isize;
        let n = self.items.len() as isize;
        let min = self.minimum(false) as isize;
        let mut max = self.maximum(false) as isize;

        let mut distance = position - relative;
        let direction = distance.signum();

        let target = if self.settings.looping {
            if !self.settings.rewind && 2 * distance.abs() > n {
                distance -= direction * n;
            }
            let mut target = current + distance;
            let revert = (target - min).rem_euclid(n) + min;
            // Jump to the twin slot first so the visible move stays short.
            if revert != target
                && revert - distance <= max
                && revert - distance > 0
            {
                current = revert - distance;
                target = revert;
                self.reset(current);
            }
            target
        } else if self.settings.rewind {
            max += 1;
            position.rem_euclid(max)
        } else {
            position.min(max).max(min)
        };

        self.speed = animator::duration(
            current,
            target,
            speed,
            self.settings.smart_speed,
        );
        self.set_current_inner(target, operation)?;
        if self.viewport.visible {
            self.update();
        }
        Ok(())
    }

    pub(crate) fn set_current_inner(
        &mut self,
        position: isize,
        operation: Operation,
    ) -> Result<usize> {
        if self.items.is_empty() {
            return Err(CarouselError::rejected(
                operation,
                RejectReason::EmptyCarousel,
            ));
        }
        let mut position = self.normalize(position, false).ok_or(
            CarouselError::rejected(operation, RejectReason::NoValidPosition),
        )?;

        if self.current != Some(position) {
            let change =
                self.trigger(Lifecycle::Change, Payload::Position { position });
            if let Some(redirect) = change
                .position_override()
                .and_then(|p| self.normalize(p, false))
            {
                position = redirect;
            }
            self.current = Some(position);
            self.invalidate(Invalidation::Position);
            self.trigger(Lifecycle::Changed, Payload::Position { position });
        }
        Ok(position)
    }

    /// Jumps to an absolute position without translate notifications.
    pub(crate) fn reset(&mut self, position: isize) {
        let Some(position) = self.normalize(position, false) else {
            return;
        };
        self.speed = 0;
        self.current = Some(position);
        self.events.suppress(&TRANSLATE_EVENTS);
        let coordinate = self.coordinate(position);
        self.animate(coordinate);
        self.events.release(&TRANSLATE_EVENTS);
    }

    pub(crate) fn position_payload(&self) -> Payload {
        self.current
            .map(|position| Payload::Position { position })
            .unwrap_or(Payload::None)
    }

    pub(crate) fn animate(&mut self, coordinate: f32) {
        if self.animator.is_active() {
            self.finish_transition();
        }

        let speed = self.speed;
        if speed > 0 {
            self.states.enter(StateTag::Animating);
            self.trigger(Lifecycle::Translate, self.position_payload());
            let from = self.stage.offset();
            self.animator.start(from, coordinate, speed, self.clock);
            if self.settings.transitions {
                self.stage.translate(coordinate, speed);
            }
        } else {
            self.stage.translate(coordinate, 0);
            self.trigger(Lifecycle::Translated, self.position_payload());
        }
    }

    /// Force-completes the running transition at its target.
    pub(crate) fn finish_transition(&mut self) {
        let Some(transition) = self.animator.cancel() else {
            return;
        };
        self.stage.translate(transition.to, 0);
        self.states.leave(StateTag::Animating);
        self.trigger(Lifecycle::Translated, self.position_payload());
    }

    pub(crate) fn advance_animation(&mut self, now: Instant) {
        if self.settings.transitions {
            if self
                .animator
                .transition()
                .is_some_and(|transition| transition.is_finished(now))
            {
                self.finish_transition();
            }
            return;
        }

        match self.animator.tick(now) {
            Some(Frame {
                offset,
                finished: true,
            }) => {
                self.stage.translate(offset, 0);
                self.states.leave(StateTag::Animating);
                self.trigger(Lifecycle::Translated, self.position_payload());
            }
            Some(frame) => self.stage.translate(frame.offset, 0),
            None => {}
        }
    }
}
