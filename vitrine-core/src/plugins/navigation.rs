//! Prev/next controls and page dots.

use serde::Serialize;
use std::time::Instant;

use vitrine_config::SlideBy;

use super::{Plugin, PluginContext};
use crate::carousel::Carousel;
use crate::error::{CarouselError, Operation, RejectReason, Result};
use crate::events::{Event, Lifecycle};
use crate::layout;

/// Consecutive relative positions behind one dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    /// First relative position.
    pub start: usize,
    /// Last relative position, inclusive.
    pub end: usize,
}

impl Page {
    /// Whether `position` (relative) is on this page.
    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Pages of the carousel. Page starts never pass the relative maximum.
pub fn pages(carousel: &Carousel) -> Vec<Page> {
    let settings = carousel.settings();
    let lower = carousel.clones().len() / 2;
    let upper = lower + carousel.len();
    let maximum = carousel.maximum(true);
    let size = if settings.center || settings.auto_width {
        1
    } else {
        settings.dots_each.unwrap_or(settings.items).max(1) as usize
    };

    let mut pages = Vec::new();
    let mut filled = 0;
    for i in lower..upper {
        if filled >= size || filled == 0 {
            let start = maximum.min(i - lower);
            pages.push(Page {
                start,
                end: i - lower + size - 1,
            });
            if start == maximum {
                break;
            }
            filled = 0;
        }
        filled += carousel
            .relative(i)
            .and_then(|r| carousel.item(r))
            .map_or(1, |item| layout::merge_span(item, settings) as usize);
    }
    pages
}

/// Index of the last page containing the current position.
fn current_page(pages: &[Page], carousel: &Carousel) -> Option<usize> {
    let relative = carousel.current().and_then(|c| carousel.relative(c))?;
    pages.iter().rposition(|page| page.contains(relative))
}

/// What the host should render for the navigation block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Controls {
    /// Prev/next block hidden: `nav` off or every item already visible.
    pub nav_disabled: bool,
    /// At the first position without loop or rewind.
    pub prev_disabled: bool,
    /// At the last position without loop or rewind.
    pub next_disabled: bool,
    /// Dots block hidden: `dots` off or every item already visible.
    pub dots_disabled: bool,
    /// One entry per dot.
    pub pages: Vec<Page>,
    /// Dot holding the current item.
    pub active_page: Option<usize>,
}

impl Controls {
    /// Controls for the carousel as it is now.
    pub fn of(carousel: &Carousel) -> Self {
        let settings = carousel.settings();
        let all_visible = carousel.len() <= settings.items as usize;
        let wraps = settings.looping || settings.rewind;
        let relative = carousel.current().and_then(|c| carousel.relative(c));
        let pages = pages(carousel);

        Self {
            nav_disabled: !settings.nav || all_visible,
            prev_disabled: !wraps
                && relative.is_none_or(|r| r <= carousel.minimum(true)),
            next_disabled: !wraps
                && relative.is_none_or(|r| r >= carousel.maximum(true)),
            dots_disabled: !settings.dots || all_visible,
            active_page: current_page(&pages, carousel),
            pages,
        }
    }
}

/// Keeps [`Controls`] in sync with the carousel.
#[derive(Debug, Default)]
pub struct Navigation {
    controls: Controls,
    stale: bool,
}

impl Navigation {
    /// Controls are computed on the first refresh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest controls.
    pub fn controls(&self) -> &Controls {
        &self.controls
    }
}

impl Plugin for Navigation {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn on_event(&mut self, event: &Event, ctx: &mut PluginContext<'_>) {
        match event.kind {
            Lifecycle::Initialized
            | Lifecycle::Refreshed
            | Lifecycle::Changed
            | Lifecycle::Translated => {
                self.controls = Controls::of(ctx.carousel());
                self.stale = false;
            }
            // Clones are rebuilt after these fire; redraw on the next tick.
            Lifecycle::Added | Lifecycle::Removed => self.stale = true,
            _ => {}
        }
    }

    fn on_tick(&mut self, _now: Instant, ctx: &mut PluginContext<'_>) {
        if self.stale {
            self.controls = Controls::of(ctx.carousel());
            self.stale = false;
        }
    }

    fn destroy(&mut self) {
        self.controls = Controls::default();
    }
}

/// Navigation-aware front for a carousel.
///
/// `next`/`prev` honour `slide_by` and default to `nav_speed`; `to_page`
/// jumps to a dot at `dots_speed`. `to` goes straight to the engine.
#[derive(Debug)]
pub struct Navigator<'a> {
    core: &'a mut Carousel,
}

impl<'a> Navigator<'a> {
    /// Wraps a carousel for one navigation call or several.
    pub fn new(core: &'a mut Carousel) -> Self {
        Self { core }
    }

    /// Moves forward by `slide_by`.
    pub fn next(&mut self, speed: Option<u64>) -> Result<()> {
        let target = self.successor(true, Operation::Next)?;
        let speed = speed.or(self.core.settings().nav_speed);
        self.core.to(target, speed)
    }

    /// Moves back by `slide_by`.
    pub fn prev(&mut self, speed: Option<u64>) -> Result<()> {
        let target = self.successor(false, Operation::Prev)?;
        let speed = speed.or(self.core.settings().nav_speed);
        self.core.to(target, speed)
    }

    /// Same as [`Carousel::to`].
    pub fn to(&mut self, position: isize, speed: Option<u64>) -> Result<()> {
        self.core.to(position, speed)
    }

    /// Moves to the start of a page; the index wraps.
    pub fn to_page(&mut self, index: isize, speed: Option<u64>) -> Result<()> {
        let pages = pages(self.core);
        if pages.is_empty() {
            return Err(CarouselError::rejected(
                Operation::ToPage,
                RejectReason::EmptyCarousel,
            ));
        }
        let page = pages[index.rem_euclid(pages.len() as isize) as usize];
        let speed = speed.or(self.core.settings().dots_speed);
        self.core.to(page.start as isize, speed)
    }

    /// The wrapped carousel.
    pub fn carousel(&mut self) -> &mut Carousel {
        self.core
    }

    fn successor(&self, forward: bool, operation: Operation) -> Result<isize> {
        let settings = self.core.settings();
        match settings.slide_by {
            SlideBy::Page => {
                let pages = pages(self.core);
                if pages.is_empty() {
                    return Err(CarouselError::rejected(
                        operation,
                        RejectReason::EmptyCarousel,
                    ));
                }
                let len = pages.len() as isize;
                let index = current_page(&pages, self.core)
                    .map_or(-1, |i| i as isize);
                let index = if forward { index + 1 } else { index - 1 };
                Ok(pages[index.rem_euclid(len) as usize].start as isize)
            }
            SlideBy::Items(by) => {
                let by = by.min(settings.items) as isize;
                let relative = self.core.current_relative(operation)? as isize;
                Ok(if forward { relative + by } else { relative - by })
            }
        }
    }
}
