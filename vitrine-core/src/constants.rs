//! Carousel engine constants
//!
//! Thresholds that are part of the interaction model rather than per-page
//! options. Tunable snapping values (`snap_tolerance`, `pull_factor`) live in
//! `Settings` instead.

/// Pointer gesture thresholds.
pub mod drag {
    /// Pointer travel (px) before a press is classified as drag or scroll.
    pub const DECIDE_THRESHOLD_PX: f32 = 1.0;
    /// Horizontal travel (px) beyond which the trailing click is suppressed.
    pub const CLICK_SUPPRESS_DISTANCE_PX: f32 = 3.0;
    /// Gesture duration (ms) beyond which the trailing click is suppressed.
    pub const CLICK_SUPPRESS_MS: u64 = 300;
}

/// Transition timing.
pub mod animation {
    /// Upper bound on the per-item speed multiplier for multi-item jumps.
    pub const MAX_DISTANCE_FACTOR: u64 = 6;
}

/// Clone generation.
pub mod clones {
    /// Smallest "view" the clone generator pads for.
    pub const MIN_VIEW: usize = 4;
}

/// Command queue and cross-widget bus.
pub mod commands {
    /// Queued commands executed per drain before the rest are dropped.
    pub const MAX_DRAIN: usize = 64;
    /// Default broadcast channel capacity.
    pub const BUS_CAPACITY: usize = 64;
}
