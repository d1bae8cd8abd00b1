//! Absolute/relative position arithmetic.
//!
//! Absolute positions index the slot sequence (prepended clones, items,
//! appended clones). Relative positions index the items only.

/// Wraps an out-of-range position back into range.
///
/// `clones` is the total clone count; it is ignored for relative positions.
/// Positions inside `[0, items + clones)` pass through unchanged. Returns
/// `None` when there are no items.
pub fn normalize(
    position: isize,
    items: usize,
    clones: usize,
    relative: bool,
) -> Option<usize> {
    if items == 0 {
        return None;
    }
    let n = items as isize;
    let m = if relative { 0 } else { clones as isize };
    if position < 0 || position >= n + m {
        let half = m / 2;
        Some(((position - half).rem_euclid(n) + half) as usize)
    } else {
        Some(position as usize)
    }
}

/// Relative position of an absolute one.
pub fn relative(absolute: isize, items: usize, clones: usize) -> Option<usize> {
    normalize(absolute - (clones / 2) as isize, items, clones, true)
}

/// Lowest reachable position.
pub fn minimum(clones: usize, relative: bool) -> usize {
    if relative { 0 } else { clones / 2 }
}
