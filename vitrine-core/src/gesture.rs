//! Unified pointer input and drag bookkeeping.

use std::time::{Duration, Instant};

use crate::constants::drag::{CLICK_SUPPRESS_DISTANCE_PX, CLICK_SUPPRESS_MS};

/// Input device; `mouse_drag` and `touch_drag` gate each one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// Pointer lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// Pressed button. Secondary presses never start a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub enum PointerButton {
    #[default]
    Primary,
    Auxiliary,
    Secondary,
}

/// Page coordinates in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[allow(missing_docs)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[allow(missing_docs)]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// `self - other`, per axis.
    pub fn difference(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Mouse and touch input folded into one shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Device.
    pub source: PointerSource,
    /// Step.
    pub phase: PointerPhase,
    /// Page X.
    pub x: f32,
    /// Page Y.
    pub y: f32,
    /// Button held; always primary for touch.
    pub button: PointerButton,
    /// Host time of the event.
    pub at: Instant,
}

impl PointerEvent {
    /// Primary-button event.
    pub fn new(
        source: PointerSource,
        phase: PointerPhase,
        x: f32,
        y: f32,
        at: Instant,
    ) -> Self {
        Self {
            source,
            phase,
            x,
            y,
            button: PointerButton::Primary,
            at,
        }
    }

    /// Primary mouse button event.
    pub fn mouse(phase: PointerPhase, x: f32, y: f32, at: Instant) -> Self {
        Self::new(PointerSource::Mouse, phase, x, y, at)
    }

    /// Touch event.
    pub fn touch(phase: PointerPhase, x: f32, y: f32, at: Instant) -> Self {
        Self::new(PointerSource::Touch, phase, x, y, at)
    }

    /// Same event with another button.
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Coordinates as a [`Point`].
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Which way the stage was pulled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Toward higher positions in LTR.
    Left,
    /// Toward lower positions in LTR.
    #[default]
    Right,
}

impl Direction {
    /// Direction of a release, `delta_x` being start minus end.
    pub fn of_release(delta_x: f32, rtl: bool) -> Self {
        if (delta_x > 0.0) ^ rtl {
            Direction::Left
        } else {
            Direction::Right
        }
    }
}

/// Whether a press turned into a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engagement {
    /// Movement still under the decision threshold.
    Undecided,
    /// Horizontal drag; the stage follows the pointer.
    Dragging,
    /// Vertical gesture or busy carousel; left to page scroll.
    Ignored,
}

/// Per-gesture record, alive from pointer-down to pointer-up or cancel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Device that started the gesture.
    pub source: PointerSource,
    /// Time of pointer-down.
    pub started_at: Instant,
    /// Pointer position at pointer-down.
    pub pointer: Point,
    /// Stage offset at pointer-down.
    pub stage_start: f32,
    /// Stage offset after the latest move.
    pub stage_current: f32,
    /// Drag decision so far.
    pub engagement: Engagement,
}

impl DragState {
    /// Undecided gesture starting at `pointer` with the stage at `stage`.
    pub fn new(
        source: PointerSource,
        started_at: Instant,
        pointer: Point,
        stage: f32,
    ) -> Self {
        Self {
            source,
            started_at,
            pointer,
            stage_start: stage,
            stage_current: stage,
            engagement: Engagement::Undecided,
        }
    }

    /// Start pointer minus `pointer`.
    pub fn delta(&self, pointer: Point) -> Point {
        self.pointer.difference(pointer)
    }

    /// Whether the click that follows this gesture should be swallowed.
    pub fn suppresses_click(&self, delta_x: f32, at: Instant) -> bool {
        delta_x.abs() > CLICK_SUPPRESS_DISTANCE_PX
            || at.saturating_duration_since(self.started_at)
                > Duration::from_millis(CLICK_SUPPRESS_MS)
    }
}

/// What a pointer event did to the carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// Filtered out: wrong button, input disabled, destroyed or no gesture.
    Ignored,
    /// Gesture recorded, direction not decided yet.
    Pressed,
    /// Gesture handed to page scroll.
    Scrolling,
    /// Stage follows the pointer.
    Dragging {
        /// New stage offset.
        offset: f32,
    },
    /// Gesture ended.
    Released {
        /// Pull direction of the release.
        direction: Direction,
        /// The host should swallow the click that follows. Only a release
        /// that moved the stage sets it.
        click_suppressed: bool,
        /// Position snapped to, if the release settled the carousel.
        position: Option<usize>,
    },
    /// Gesture aborted; the stage returned to the current position.
    Cancelled,
}
