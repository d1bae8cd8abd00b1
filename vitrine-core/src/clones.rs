//! Loop clone generation.
//!
//! Clones are recorded in push order: append 0, prepend 0, append 1,
//! prepend 1, ... On the stage the prepended clones come first (the last one
//! pushed leftmost), then the real items, then the appended clones.

use vitrine_config::Settings;

use crate::constants::clones::MIN_VIEW;

/// Number of append/prepend pairs needed for `items` real items.
pub fn pair_count(items: usize, settings: &Settings) -> usize {
    if !settings.looping || items == 0 {
        return 0;
    }
    let view = (settings.items as usize * 2).max(MIN_VIEW);
    let size = items.div_ceil(2) * 2;
    let repeat = if settings.rewind { view } else { view.max(size) };
    repeat / 2
}

/// Real item index behind each clone, in push order.
pub fn generate(items: usize, settings: &Settings) -> Vec<usize> {
    let pairs = pair_count(items, settings);
    let mut clones = Vec::with_capacity(pairs * 2);
    for k in 0..pairs {
        let wrapped = k % items;
        clones.push(wrapped);
        clones.push(items - 1 - wrapped);
    }
    clones
}

/// Absolute slot of the clone recorded at `index` in push order.
fn slot_of(index: usize, items: usize, clone_count: usize) -> usize {
    let odd = clone_count / 2;
    let even = odd + items;
    if index % 2 == 0 {
        even + index / 2
    } else {
        odd - (index + 1) / 2
    }
}

/// Absolute slots holding clones of `item`, or of every item when `None`.
pub fn clones_of(
    item: Option<usize>,
    items: usize,
    clones: &[usize],
) -> Vec<usize> {
    clones
        .iter()
        .enumerate()
        .filter(|(_, source)| item.is_none_or(|wanted| **source == wanted))
        .map(|(index, _)| slot_of(index, items, clones.len()))
        .collect()
}

/// `(item index, cloned)` for every slot in stage order.
pub fn slot_sources(items: usize, clones: &[usize]) -> Vec<(usize, bool)> {
    let prepended = clones.iter().skip(1).step_by(2).rev();
    let appended = clones.iter().step_by(2);
    prepended
        .map(|source| (*source, true))
        .chain((0..items).map(|index| (index, false)))
        .chain(appended.map(|source| (*source, true)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looping(items: u32) -> Settings {
        Settings {
            looping: true,
            items,
            ..Settings::default()
        }
    }

    #[test]
    fn no_clones_without_loop_or_items() {
        assert!(generate(5, &Settings::default()).is_empty());
        assert!(generate(0, &looping(3)).is_empty());
    }

    #[test]
    fn pair_count_covers_view_and_item_count() {
        // view = max(3*2, 4) = 6; size = 6 for 5 items
        assert_eq!(pair_count(5, &looping(3)), 3);
        // 11 items round up to 12
        assert_eq!(pair_count(11, &looping(3)), 6);
        let rewind = Settings {
            rewind: true,
            ..looping(3)
        };
        assert_eq!(pair_count(11, &rewind), 3);
        assert_eq!(pair_count(1, &looping(1)), 2);
    }

    #[test]
    fn clones_alternate_append_and_prepend() {
        assert_eq!(generate(5, &looping(3)), vec![0, 4, 1, 3, 2, 2]);
        // fewer items than pairs wrap around
        assert_eq!(generate(2, &looping(1)), vec![0, 1, 1, 0]);
    }

    #[test]
    fn stage_order_puts_last_prepend_first() {
        let clones = generate(5, &looping(3));
        let order: Vec<usize> = slot_sources(5, &clones)
            .into_iter()
            .map(|(index, _)| index)
            .collect();
        assert_eq!(order, vec![2, 3, 4, 0, 1, 2, 3, 4, 0, 1, 2]);
    }

    #[test]
    fn clones_of_points_at_matching_slots() {
        let clones = generate(5, &looping(3));
        let sources = slot_sources(5, &clones);
        for item in 0..5 {
            for slot in clones_of(Some(item), 5, &clones) {
                assert_eq!(sources[slot], (item, true));
            }
        }
        assert_eq!(clones_of(Some(4), 5, &clones), vec![2]);
        assert_eq!(clones_of(None, 5, &clones).len(), 6);
    }
}
