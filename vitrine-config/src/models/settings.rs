//! Resolved carousel settings and their partial (breakpoint) overrides.
//!
//! `Settings` and `SettingsOverride` are generated from one field list so a
//! new option cannot be added to one without the other.

use serde::{Deserialize, Serialize};

use super::values::{SlideBy, StartPosition};

macro_rules! settings_fields {
    ($( $(#[$meta:meta])* $field:ident : $ty:ty = $default:expr ),* $(,)?) => {
        /// Immutable-per-refresh settings snapshot: base options merged with
        /// the active responsive breakpoint override.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct Settings {
            $( $(#[$meta])* pub $field: $ty, )*
        }

        impl Default for Settings {
            fn default() -> Self {
                Self { $( $field: $default, )* }
            }
        }

        /// Partial settings applied on top of the base options at a
        /// breakpoint.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct SettingsOverride {
            $(
                $(#[$meta])*
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl Settings {
            /// Returns a copy with every field set in `overrides` replaced.
            pub fn merged(&self, overrides: &SettingsOverride) -> Settings {
                let mut out = self.clone();
                $(
                    if let Some(value) = &overrides.$field {
                        out.$field = value.clone();
                    }
                )*
                out
            }
        }

        impl SettingsOverride {
            /// True when the override changes nothing.
            pub fn is_empty(&self) -> bool {
                true $( && self.$field.is_none() )*
            }
        }
    };
}

settings_fields! {
    /// Number of items visible per page.
    items: u32 = 3,
    /// Infinite wrap-around using clones on both ends.
    #[serde(rename = "loop")]
    looping: bool = false,
    /// Center the current item instead of left-aligning it.
    center: bool = false,
    /// Jump back to the first item after the last (and vice versa).
    rewind: bool = false,
    /// Right-to-left layout; flips coordinate signs and comparisons.
    rtl: bool = false,
    /// Gap after each item (pixels).
    margin: f32 = 0.0,
    /// Padding on both stage ends (pixels).
    stage_padding: f32 = 0.0,
    /// Use each item's natural width instead of the grid width.
    auto_width: bool = false,
    /// Let items span several grid cells (`Content::merge`).
    merge: bool = false,
    /// Cap merged spans at `items`.
    merge_fit: bool = true,
    /// Position after items are (re)placed.
    start_position: StartPosition = StartPosition::Index(0),
    /// Mouse drags move the stage.
    mouse_drag: bool = true,
    /// Touch drags move the stage.
    touch_drag: bool = true,
    /// Elastic pull past the first/last item on non-looping carousels.
    pull_drag: bool = true,
    /// Leave the stage where the drag ended instead of snapping.
    free_drag: bool = false,
    /// Base transition speed per item (ms).
    smart_speed: u64 = 250,
    /// Snap speed after a drag (ms); falls back to `smart_speed`.
    drag_end_speed: Option<u64> = None,
    /// Debounce window for viewport resizes (ms).
    responsive_refresh_rate: u64 = 200,
    /// Distance (px) within which a drag release snaps onto a boundary.
    snap_tolerance: f32 = 30.0,
    /// Fraction of the drag distance applied as elastic pull at the bounds.
    pull_factor: f32 = 0.2,
    /// Host supports timed style transitions; false drives tweens via `tick`.
    transitions: bool = true,
    /// Show prev/next controls.
    nav: bool = false,
    /// Speed for prev/next (ms).
    nav_speed: Option<u64> = None,
    /// Show page dots.
    dots: bool = true,
    /// Items per dot; defaults to `items`.
    dots_each: Option<u32> = None,
    /// Speed for dot jumps (ms).
    dots_speed: Option<u64> = None,
    /// Step size of prev/next.
    slide_by: SlideBy = SlideBy::Items(1),
    /// Start playing on initialization.
    autoplay: bool = false,
    /// Interval between automatic slides (ms).
    autoplay_timeout: u64 = 5_000,
    /// Pause while the pointer is over the carousel.
    autoplay_hover_pause: bool = false,
    /// Speed for automatic slides (ms).
    autoplay_speed: Option<u64> = None,
    /// Defer `lazy_source` images until their slot is in view.
    lazy_load: bool = false,
    /// Extra items to preload past the visible window.
    lazy_load_eager: u32 = 0,
    /// Follow fragment changes and publish the current item hash.
    url_hash_listener: bool = false,
}

impl Settings {
    /// Speed used to settle after a drag.
    pub fn drag_end_speed(&self) -> u64 {
        self.drag_end_speed.unwrap_or(self.smart_speed)
    }

    /// Applies the invariants that some options impose on others.
    ///
    /// `auto_width` sizes items from their content, so grid padding and
    /// merged spans no longer mean anything.
    pub fn apply_option_logic(&mut self) {
        if self.auto_width {
            self.stage_padding = 0.0;
            self.merge = false;
        }
    }
}
