use tracing::trace;

use super::Carousel;
use crate::constants::drag::DECIDE_THRESHOLD_PX;
use crate::error::Operation;
use crate::events::{Lifecycle, Payload};
use crate::gesture::{
    Direction, DragState, Engagement, PointerButton, PointerEvent,
    PointerOutcome, PointerPhase, PointerSource,
};
use crate::layout::{Cmp, WidthKind, op};
use crate::pipeline::Invalidation;
use crate::state::StateTag;

impl Carousel {
    /// Feeds one pointer event into the gesture recognizer.
    pub fn pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        if self.destroyed {
            return PointerOutcome::Ignored;
        }
        self.clock = event.at;
        let outcome = match event.phase {
            PointerPhase::Down => self.pointer_down(&event),
            PointerPhase::Move => self.pointer_move(&event),
            PointerPhase::Up => self.pointer_up(&event),
            PointerPhase::Cancel => self.pointer_cancel(),
        };
        trace!(phase = ?event.phase, ?outcome, "pointer");
        self.drain_commands();
        outcome
    }

    fn pointer_down(&mut self, event: &PointerEvent) -> PointerOutcome {
        let enabled = match event.source {
            PointerSource::Mouse => self.settings.mouse_drag,
            PointerSource::Touch => self.settings.touch_drag,
        };
        if event.button == PointerButton::Secondary
            || !enabled
            || self.items.is_empty()
        {
            return PointerOutcome::Ignored;
        }

        if let Some(previous) = self.drag.take()
            && previous.engagement == Engagement::Dragging
        {
            self.states.leave(StateTag::Dragging);
        }

        // Freeze an in-flight transition where it is on screen.
        if self.states.is(StateTag::Animating) {
            let visual = self
                .animator
                .offset_at(event.at)
                .unwrap_or_else(|| self.stage.offset());
            self.animator.cancel();
            self.stage.translate(visual, 0);
            self.states.leave(StateTag::Animating);
            self.trigger(Lifecycle::Translated, self.position_payload());
            self.invalidate(Invalidation::Position);
        }

        self.speed = 0;
        self.drag = Some(DragState::new(
            event.source,
            event.at,
            event.point(),
            self.stage.offset(),
        ));
        PointerOutcome::Pressed
    }

    fn pointer_move(&mut self, event: &PointerEvent) -> PointerOutcome {
        let Some(mut drag) = self.drag else {
            return PointerOutcome::Ignored;
        };
        let delta = drag.delta(event.point());

        match drag.engagement {
            Engagement::Ignored => return PointerOutcome::Scrolling,
            Engagement::Undecided => {
                if delta.x.abs().max(delta.y.abs()) < DECIDE_THRESHOLD_PX {
                    return PointerOutcome::Pressed;
                }
                if delta.x.abs() > delta.y.abs()
                    && !self.states.is(StateTag::Busy)
                {
                    drag.engagement = Engagement::Dragging;
                    self.drag = Some(drag);
                    self.states.enter(StateTag::Dragging);
                    self.trigger(Lifecycle::Drag, Payload::None);
                } else {
                    drag.engagement = Engagement::Ignored;
                    self.drag = Some(drag);
                    return PointerOutcome::Scrolling;
                }
            }
            Engagement::Dragging => {}
        }

        let offset = self.drag_offset(drag.stage_start, delta.x);
        if let Some(drag) = self.drag.as_mut() {
            drag.stage_current = offset;
        }
        self.stage.translate(offset, 0);
        PointerOutcome::Dragging { offset }
    }

    /// Stage offset for a drag that moved `delta_x` (start minus now).
    fn drag_offset(&self, stage_start: f32, delta_x: f32) -> f32 {
        let stage = stage_start - delta_x;
        if self.settings.looping {
            let min = self.coordinate(self.minimum(false));
            let span = self.coordinate(self.maximum(false) + 1) - min;
            if span == 0.0 {
                return stage;
            }
            // Truncated remainder; the span is negative left-to-right.
            return ((stage - min) % span + span) % span + min;
        }

        let (lower, upper) = if self.settings.rtl {
            (self.maximum(false), self.minimum(false))
        } else {
            (self.minimum(false), self.maximum(false))
        };
        let pull = if self.settings.pull_drag {
            -delta_x * self.settings.pull_factor
        } else {
            0.0
        };
        stage
            .min(self.coordinate(lower) + pull)
            .max(self.coordinate(upper) + pull)
    }

    fn pointer_up(&mut self, event: &PointerEvent) -> PointerOutcome {
        let Some(drag) = self.drag.take() else {
            return PointerOutcome::Ignored;
        };
        let delta = drag.delta(event.point());
        let dragging = drag.engagement == Engagement::Dragging;
        let direction = Direction::of_release(delta.x, self.settings.rtl);

        let mut position = None;
        let mut click_suppressed = false;
        if (delta.x != 0.0 && dragging) || !self.states.is(StateTag::Valid) {
            click_suppressed = drag.suppresses_click(delta.x, event.at);
            if self.settings.free_drag {
                position = self.settle_in_place(drag.stage_current);
            } else {
                self.speed = self.settings.drag_end_speed();
                let pulled = if delta.x != 0.0 {
                    direction
                } else {
                    self.last_direction.unwrap_or_default()
                };
                let target =
                    self.closest(drag.stage_current, pulled).or(self.current);
                if let Some(target) = target {
                    position = self
                        .set_current_inner(
                            target as isize,
                            Operation::SetCurrent,
                        )
                        .ok();
                }
                self.invalidate(Invalidation::Position);
                self.update();
                self.last_direction = Some(direction);
            }
        }

        if dragging {
            self.states.leave(StateTag::Dragging);
            self.trigger(Lifecycle::Dragged, Payload::None);
        }

        PointerOutcome::Released {
            direction,
            click_suppressed,
            position,
        }
    }

    fn pointer_cancel(&mut self) -> PointerOutcome {
        let Some(drag) = self.drag.take() else {
            return PointerOutcome::Ignored;
        };
        if drag.engagement == Engagement::Dragging {
            self.speed = self.settings.drag_end_speed();
            self.invalidate(Invalidation::Position);
            self.update();
            self.states.leave(StateTag::Dragging);
            self.trigger(Lifecycle::Dragged, Payload::None);
        }
        PointerOutcome::Cancelled
    }

    /// Free drag: keep the stage where it was released and adopt the
    /// position under it. A release past the bounds of a non-looping
    /// carousel springs back onto the nearest bound.
    fn settle_in_place(&mut self, offset: f32) -> Option<usize> {
        if !self.settings.looping
            && let Some(bound) = self.clamp_to_bounds(offset)
        {
            self.speed = self.settings.drag_end_speed();
            let position = self
                .set_current_inner(bound as isize, Operation::SetCurrent)
                .ok();
            self.invalidate(Invalidation::Position);
            self.update();
            return position;
        }

        let target = self.containing(offset).or(self.current)?;
        let position = self
            .set_current_inner(target as isize, Operation::SetCurrent)
            .ok();
        self.invalidated.remove(Invalidation::Position);
        self.mark_active();
        self.update();
        position
    }

    /// Position whose span contains `offset`.
    fn containing(&self, offset: f32) -> Option<usize> {
        let rtl = self.settings.rtl;
        let coordinates = self.coordinates();
        let width = self.width(WidthKind::Default);
        coordinates.iter().enumerate().find_map(|(i, &c)| {
            let next = coordinates.get(i + 1).copied().unwrap_or(c - width);
            (op(offset, Cmp::Le, c, rtl) && op(offset, Cmp::Gt, next, rtl))
                .then_some(i)
        })
    }

    /// Snap target for a release at `offset` pulled in `direction`.
    ///
    /// Within `snap_tolerance` of a boundary the release snaps onto it;
    /// otherwise it moves to the next slot in the pull direction.
    pub fn closest(&self, offset: f32, direction: Direction) -> Option<usize> {
        let rtl = self.settings.rtl;
        let tolerance = self.settings.snap_tolerance;
        let width = self.width(WidthKind::Default);
        let coordinates = self.coordinates();

        let mut position = None;
        for (i, &value) in coordinates.iter().enumerate() {
            let next = coordinates.get(i + 1).copied().unwrap_or(value - width);
            if direction == Direction::Left
                && offset > value - tolerance
                && offset < value + tolerance
            {
                position = Some(i);
            } else if direction == Direction::Right
                && offset > value - width - tolerance
                && offset < value - width + tolerance
            {
                position = Some(i + 1);
            } else if op(offset, Cmp::Lt, value, rtl)
                && op(offset, Cmp::Gt, next, rtl)
            {
                position = Some(match direction {
                    Direction::Left => i + 1,
                    Direction::Right => i,
                });
            }
            if position.is_some() {
                break;
            }
        }

        if !self.settings.looping {
            position = self.clamp_to_bounds(offset).or(position);
        }
        position
    }

    fn clamp_to_bounds(&self, offset: f32) -> Option<usize> {
        let rtl = self.settings.rtl;
        let min = self.minimum(false);
        let max = self.maximum(false);
        if op(offset, Cmp::Gt, self.coordinate(min), rtl) {
            Some(min)
        } else if op(offset, Cmp::Lt, self.coordinate(max), rtl) {
            Some(max)
        } else {
            None
        }
    }
}
