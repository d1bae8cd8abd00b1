//! Item widths, stage coordinates and the RTL-aware comparisons used by
//! snapping and active-slot detection.

use vitrine_config::Settings;

use crate::item::Item;

/// Which width of the carousel element to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthKind {
    /// Element width minus stage padding plus one margin.
    #[default]
    Default,
    /// Element width as measured.
    Inner,
    /// Element width as measured.
    Outer,
}

/// Element width for `kind`.
pub fn width(element_width: f32, settings: &Settings, kind: WidthKind) -> f32 {
    match kind {
        WidthKind::Inner | WidthKind::Outer => element_width,
        WidthKind::Default => {
            element_width - settings.stage_padding * 2.0 + settings.margin
        }
    }
}

/// Rounds to three decimals.
pub fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

/// Width of one grid cell.
pub fn grid_width(width: f32, settings: &Settings) -> f32 {
    round3(width / settings.items.max(1) as f32) - settings.margin
}

/// Cells an item spans under the current settings.
pub fn merge_span(item: &Item, settings: &Settings) -> u32 {
    if !settings.merge {
        return 1;
    }
    let span = item.content.merge.max(1);
    if settings.merge_fit {
        span.min(settings.items.max(1))
    } else {
        span
    }
}

/// Rendered width of every item, indexed by relative position.
pub fn item_widths(items: &[Item], grid: f32, settings: &Settings) -> Vec<f32> {
    items
        .iter()
        .map(|item| {
            if settings.auto_width {
                item.content.natural_width.unwrap_or(grid)
            } else {
                grid * merge_span(item, settings) as f32
            }
        })
        .collect()
}

/// Cumulative end offset of every slot.
///
/// `slot_widths` yields the width of the item shown in each slot, in stage
/// order. Offsets grow negative left-to-right and positive in RTL.
pub fn coordinates(
    slot_widths: impl IntoIterator<Item = f32>,
    margin: f32,
    rtl: bool,
) -> Vec<f32> {
    let sign = if rtl { 1.0 } else { -1.0 };
    let mut previous = 0.0;
    slot_widths
        .into_iter()
        .map(|w| {
            previous += (w + margin) * sign;
            previous
        })
        .collect()
}

/// Stage offset that brings `position` into view.
///
/// Left-aligned: the end offset of the previous slot. Centered: shifted so
/// the slot midpoint meets the viewport midpoint.
pub fn coordinate(
    coords: &[f32],
    position: usize,
    width: f32,
    settings: &Settings,
) -> f32 {
    let previous = |p: Option<usize>| {
        p.and_then(|p| coords.get(p)).copied().unwrap_or(0.0)
    };
    let value = if settings.center {
        let (multiplier, neighbour) = if settings.rtl {
            (-1.0, position.checked_add(1))
        } else {
            (1.0, position.checked_sub(1))
        };
        let own = coords.get(position).copied().unwrap_or(0.0);
        own + (width - own + previous(neighbour)) / 2.0 * multiplier
    } else {
        previous(position.checked_sub(1))
    };
    value.ceil()
}

/// Stage width for the given coordinates.
pub fn stage_width(coords: &[f32], settings: &Settings) -> f32 {
    let last = coords.last().copied().unwrap_or(0.0);
    last.abs().ceil() + settings.stage_padding * 2.0
}

/// Comparison operator, mirrored in RTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Lt,
    Gt,
    Le,
    Ge,
}

/// Compares two offsets in reading direction: in RTL `<` becomes `>`.
pub fn op(a: f32, cmp: Cmp, b: f32, rtl: bool) -> bool {
    match (cmp, rtl) {
        (Cmp::Lt, false) | (Cmp::Gt, true) => a < b,
        (Cmp::Gt, false) | (Cmp::Lt, true) => a > b,
        (Cmp::Le, false) | (Cmp::Ge, true) => a <= b,
        (Cmp::Ge, false) | (Cmp::Le, true) => a >= b,
    }
}
