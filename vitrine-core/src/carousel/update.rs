use strum::IntoEnumIterator;
use tracing::{trace, warn};

use super::Carousel;
use crate::clones;
use crate::layout::{self, Cmp, WidthKind, op};
use crate::pipeline::{PipelineCache, Step};
use crate::stage::Slot;
use crate::state::StateTag;

impl Carousel {
    /// Runs every pipeline step whose tags were invalidated since the last
    /// pass, then marks the carousel valid.
    pub fn update(&mut self) {
        if self.destroyed {
            return;
        }
        if self.updating {
            warn!("update requested during an update; ignoring");
            return;
        }
        self.updating = true;

        let mut cache = PipelineCache::default();
        for step in Step::iter() {
            if step.should_run(self.invalidated) {
                trace!(%step, "pipeline step");
                self.run_step(step, &mut cache);
            }
        }

        self.invalidated.clear();
        if !self.states.is(StateTag::Valid) {
            self.states.enter(StateTag::Valid);
        }
        self.updating = false;
    }

    fn run_step(&mut self, step: Step, cache: &mut PipelineCache) {
        match step {
            Step::MeasureWidth => self.width = self.viewport.element_width,
            Step::CaptureCurrent => {
                cache.current = self.current.and_then(|c| self.slot_item(c));
            }
            Step::ClearClones => self.clones.clear(),
            Step::ItemWidths => {
                let grid = layout::grid_width(
                    self.width(WidthKind::Default),
                    &self.settings,
                );
                self.widths =
                    layout::item_widths(&self.items, grid, &self.settings);
                cache.grid_width = grid;
                cache.merge = self
                    .items
                    .iter()
                    .any(|item| layout::merge_span(item, &self.settings) > 1);
            }
            Step::GenerateClones => {
                self.clones =
                    clones::generate(self.items.len(), &self.settings);
                let slots = clones::slot_sources(self.items.len(), &self.clones)
                    .into_iter()
                    .filter_map(|(index, cloned)| {
                        self.items
                            .get(index)
                            .map(|item| Slot::new(item.id, index, cloned))
                    })
                    .collect();
                self.stage.replace_slots(slots);
            }
            Step::Coordinates => {
                let widths = self.slot_widths();
                self.coordinates = layout::coordinates(
                    widths,
                    self.settings.margin,
                    self.settings.rtl,
                );
            }
            Step::StageSize => {
                let width =
                    layout::stage_width(&self.coordinates, &self.settings);
                self.stage.set_size(width, self.settings.stage_padding);
            }
            Step::SlotStyles => {
                let slots = self.stage.slots().len();
                let sizes: Vec<Option<f32>> = if self.settings.auto_width {
                    vec![None; slots]
                } else if cache.merge {
                    self.slot_widths().into_iter().map(Some).collect()
                } else {
                    vec![Some(cache.grid_width); slots]
                };
                self.stage.size_slots(
                    |i| sizes.get(i).copied().flatten(),
                    self.settings.margin,
                );
            }
            Step::ClearStageStyle => {
                if self.coordinates.is_empty() {
                    self.stage.clear_style();
                }
            }
            Step::ResetCurrent => {
                if self.items.is_empty() {
                    self.current = None;
                    return;
                }
                let anchored = cache
                    .current
                    .and_then(|id| self.position_of(id))
                    .map(|index| self.clones.len() / 2 + index)
                    .unwrap_or(0);
                let current = anchored
                    .min(self.maximum(false))
                    .max(self.minimum(false));
                self.reset(current as isize);
            }
            Step::Translate => {
                if let Some(current) = self.current {
                    let coordinate = self.coordinate(current);
                    self.animate(coordinate);
                }
            }
            Step::MarkActive => self.mark_active(),
        }
    }

    /// Width of the item shown in each slot, in stage order.
    fn slot_widths(&self) -> Vec<f32> {
        let slots = self.items.len() + self.clones.len();
        (0..slots)
            .map(|slot| {
                self.relative(slot)
                    .and_then(|r| self.widths.get(r))
                    .copied()
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Flags the slots inside the viewport and, in center mode, the slot at
    /// the current position.
    pub(crate) fn mark_active(&mut self) {
        let Some(current) = self.current else {
            self.stage.mark(&[], None);
            return;
        };

        let rtl = self.settings.rtl;
        let sign = if rtl { 1.0 } else { -1.0 };
        let padding = self.settings.stage_padding * 2.0;
        let begin = self.coordinate(current) + padding;
        let end = begin + self.width(WidthKind::Default) * sign;

        let mut active = Vec::new();
        for (i, coordinate) in self.coordinates.iter().enumerate() {
            let inner = i
                .checked_sub(1)
                .and_then(|p| self.coordinates.get(p))
                .copied()
                .unwrap_or(0.0);
            let outer = coordinate.abs() + padding * sign;
            if (op(inner, Cmp::Le, begin, rtl) && op(inner, Cmp::Gt, end, rtl))
                || (op(outer, Cmp::Lt, begin, rtl)
                    && op(outer, Cmp::Gt, end, rtl))
            {
                active.push(i);
            }
        }

        let center = self.settings.center.then_some(current);
        self.stage.mark(&active, center);
    }

    /// Highest reachable position.
    ///
    /// Looping carousels can reach the last real item. With `auto_width` or
    /// `merge` the bound is the first item from which the rest still fills
    /// the element. Otherwise the last full page starts at `n - items`.
    pub fn maximum(&self, relative: bool) -> usize {
        let n = self.items.len() as isize;
        let half = (self.clones.len() / 2) as isize;
        let settings = &self.settings;

        let mut maximum = if settings.looping {
            half + n - 1
        } else if settings.auto_width || settings.merge {
            self.fill_start()
        } else if settings.center {
            n - 1
        } else {
            n - settings.items as isize
        };

        if relative {
            maximum -= half;
        }
        maximum.max(0) as usize
    }

    fn fill_start(&self) -> isize {
        if self.widths.is_empty() {
            return 0;
        }
        let element = self.viewport.element_width;
        let margin = self.settings.margin;
        let mut i = self.widths.len() - 1;
        let mut filled = self.widths[i];
        loop {
            if i == 0 {
                return 0;
            }
            i -= 1;
            filled += self.widths[i] + margin;
            if filled > element {
                return i as isize + 1;
            }
        }
    }
}
