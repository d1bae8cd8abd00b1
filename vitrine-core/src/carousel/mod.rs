//! Carousel engine: composition root for layout, clones, position state,
//! gestures, animation and plugins.
//!
//! All mutation happens synchronously inside engine calls. Plugin reactions
//! come back as [`Command`]s that are queued and run once the outer call has
//! finished, so no command re-enters the update pipeline.

/// Commands and the broadcast bus.
pub mod commands;
mod drag;
mod items;
mod motion;
mod update;

use serde::Serialize;
use std::any::Any;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

use vitrine_config::{
    Breakpoint, CarouselOptions, Settings, apply_guard_rails,
};

use crate::animator::{Easing, SnapAnimator};
use crate::clones;
use crate::constants::commands::MAX_DRAIN;
use crate::error::{CarouselError, Operation, RejectReason, Result};
use crate::events::{Event, EventBus, Lifecycle, Payload, SubscriptionId};
use crate::gesture::{Direction, DragState};
use crate::item::{Content, IdAllocator, Item, ItemId};
use crate::layout::{self, WidthKind};
use crate::pipeline::{Invalidation, Invalidations};
use crate::plugins::{Plugin, PluginContext};
use crate::position;
use crate::stage::Stage;
use crate::state::{StateTag, StateTags};

use commands::{CarouselKey, Command, CommandBus, Inbox};

/// Host-reported geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Viewport width used for breakpoint selection.
    pub width: f32,
    /// Width of the carousel element itself.
    pub element_width: f32,
    /// Hidden carousels defer layout until they are shown.
    pub visible: bool,
}

impl Viewport {
    /// A visible carousel spanning the whole viewport.
    pub fn new(width: f32) -> Self {
        Self {
            width,
            element_width: width,
            visible: true,
        }
    }

    /// Carousel element narrower than the viewport.
    pub fn with_element_width(mut self, element_width: f32) -> Self {
        self.element_width = element_width;
        self
    }

    /// Not rendered yet, for example inside a collapsed tab.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// One carousel instance: its items, position state, stage render model
/// and plugins. Built with [`CarouselBuilder`].
#[derive(Debug)]
pub struct Carousel {
    options: CarouselOptions,
    settings: Settings,
    breakpoint: Option<Breakpoint>,
    viewport: Viewport,
    /// Element width measured by the last pipeline pass.
    width: f32,

    items: Vec<Item>,
    ids: IdAllocator,
    clones: Vec<usize>,
    widths: Vec<f32>,
    coordinates: Vec<f32>,

    current: Option<usize>,
    speed: u64,
    states: StateTags,
    invalidated: Invalidations,
    updating: bool,

    stage: Stage,
    animator: SnapAnimator,
    drag: Option<DragState>,
    last_direction: Option<Direction>,

    events: EventBus,
    plugins: Vec<Box<dyn Plugin>>,
    commands: VecDeque<Command>,
    draining: bool,
    inbox: Option<Inbox>,

    resize_deadline: Option<Instant>,
    clock: Instant,
    destroyed: bool,
}

/// Collects items, plugins and wiring before the first layout pass.
#[derive(Debug)]
pub struct CarouselBuilder {
    options: CarouselOptions,
    viewport: Viewport,
    contents: Vec<Content>,
    plugins: Vec<Box<dyn Plugin>>,
    inbox: Option<Inbox>,
    clock: Option<Instant>,
    easing: Easing,
}

impl CarouselBuilder {
    /// Options are resolved against `viewport.width` on build.
    pub fn new(options: CarouselOptions, viewport: Viewport) -> Self {
        Self {
            options,
            viewport,
            contents: Vec::new(),
            plugins: Vec::new(),
            inbox: None,
            clock: None,
            easing: Easing::default(),
        }
    }

    /// Appends one item.
    pub fn item(mut self, content: Content) -> Self {
        self.contents.push(content);
        self
    }

    /// Appends items in order.
    pub fn items(
        mut self,
        contents: impl IntoIterator<Item = Content>,
    ) -> Self {
        self.contents.extend(contents);
        self
    }

    /// Attaches a plugin. Plugins see events in attach order.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Attaches already boxed plugins.
    pub fn plugins(mut self, plugins: Vec<Box<dyn Plugin>>) -> Self {
        self.plugins.extend(plugins);
        self
    }

    /// Receives commands broadcast on `bus` to `key` (or to everyone).
    pub fn listen(
        mut self,
        bus: &CommandBus,
        key: impl Into<CarouselKey>,
    ) -> Self {
        self.inbox = Some(bus.inbox(key.into()));
        self
    }

    /// Start time for the host clock; defaults to `Instant::now()`.
    pub fn clock(mut self, now: Instant) -> Self {
        self.clock = Some(now);
        self
    }

    /// Easing for tick-driven transitions.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Runs the guard rails, then initializes the carousel and lays it out
    /// unless the viewport is hidden.
    ///
    /// # Errors
    ///
    /// [`CarouselError::Options`] when the options fail the guard rails.
    pub fn build(self) -> Result<Carousel> {
        let warnings = apply_guard_rails(&self.options)?;
        for warning in &warnings.items {
            debug!(message = %warning.message, "carousel option warning");
        }

        let resolved = self.options.resolve(self.viewport.width);
        let mut carousel = Carousel {
            options: self.options,
            settings: resolved.settings,
            breakpoint: resolved.breakpoint,
            viewport: self.viewport,
            width: 0.0,
            items: Vec::new(),
            ids: IdAllocator::default(),
            clones: Vec::new(),
            widths: Vec::new(),
            coordinates: Vec::new(),
            current: None,
            speed: 0,
            states: StateTags::default(),
            invalidated: Invalidations::default(),
            updating: false,
            stage: Stage::default(),
            animator: SnapAnimator::new(self.easing),
            drag: None,
            last_direction: None,
            events: EventBus::default(),
            plugins: self.plugins,
            commands: VecDeque::new(),
            draining: false,
            inbox: self.inbox,
            resize_deadline: None,
            clock: self.clock.unwrap_or_else(Instant::now),
            destroyed: false,
        };
        carousel.initialize(self.contents);
        Ok(carousel)
    }
}

/// Serializable view of the engine state.
#[derive(Debug, Clone, Serialize)]
#[allow(missing_docs)]
pub struct Snapshot {
    pub breakpoint: Option<Breakpoint>,
    pub settings: Settings,
    pub viewport: Viewport,
    pub items: Vec<ItemId>,
    /// Relative index of each clone, in push order.
    pub clones: Vec<usize>,
    /// Absolute position.
    pub current: Option<usize>,
    pub relative: Option<usize>,
    pub minimum: usize,
    pub maximum: usize,
    pub coordinates: Vec<f32>,
    /// Absolute positions of the slots in view.
    pub active: Vec<usize>,
    pub states: Vec<StateTag>,
    pub stage: Stage,
}

impl Carousel {
    /// Same as [`CarouselBuilder::new`].
    pub fn builder(
        options: CarouselOptions,
        viewport: Viewport,
    ) -> CarouselBuilder {
        CarouselBuilder::new(options, viewport)
    }

    fn initialize(&mut self, contents: Vec<Content>) {
        self.setup();
        self.options_logic();
        self.states.enter(StateTag::Initializing);
        self.trigger(Lifecycle::Initialize, Payload::None);

        self.replace_items(contents);
        if self.viewport.visible {
            self.refresh_inner();
        } else {
            self.invalidate(Invalidation::Width);
        }

        self.states.leave(StateTag::Initializing);
        self.trigger(Lifecycle::Initialized, Payload::None);
        debug!(
            items = self.items.len(),
            breakpoint = ?self.breakpoint,
            "carousel initialized"
        );
        self.drain_commands();
    }

    /// Resolves the settings for the current viewport.
    fn setup(&mut self) {
        let resolved = self.options.resolve(self.viewport.width);
        self.trigger(Lifecycle::Change, Payload::Settings);
        self.breakpoint = resolved.breakpoint;
        self.settings = resolved.settings;
        self.invalidate(Invalidation::Settings);
        self.trigger(Lifecycle::Changed, Payload::Settings);
    }

    fn options_logic(&mut self) {
        self.settings.apply_option_logic();
    }

    /// Re-resolves settings and re-runs the pipeline.
    pub fn refresh(&mut self) -> Result<()> {
        self.ensure_alive(Operation::Refresh)?;
        self.refresh_inner();
        self.drain_commands();
        Ok(())
    }

    fn refresh_inner(&mut self) {
        self.states.enter(StateTag::Refreshing);
        self.trigger(Lifecycle::Refresh, Payload::None);
        self.setup();
        self.options_logic();
        self.update();
        self.states.leave(StateTag::Refreshing);
        self.trigger(Lifecycle::Refreshed, Payload::None);
    }

    /// Records a viewport change; the refresh runs once the viewport has
    /// been stable for `responsive_refresh_rate`.
    pub fn resize(&mut self, viewport: Viewport, now: Instant) {
        if self.destroyed {
            return;
        }
        self.clock = now;
        self.viewport = viewport;
        let rate = Duration::from_millis(self.settings.responsive_refresh_rate);
        self.resize_deadline = now.checked_add(rate).or(Some(now));
    }

    /// Applies a viewport change immediately. Returns whether a refresh ran.
    pub fn resize_now(&mut self, viewport: Viewport) -> bool {
        if self.destroyed {
            return false;
        }
        self.viewport = viewport;
        self.resize_deadline = None;
        let resized = self.on_resize();
        self.drain_commands();
        resized
    }

    fn on_resize(&mut self) -> bool {
        if self.items.is_empty()
            || self.width == self.viewport.element_width
            || !self.viewport.visible
        {
            trace!("resize skipped");
            return false;
        }

        self.states.enter(StateTag::Resizing);
        if self
            .trigger(Lifecycle::Resize, Payload::None)
            .is_default_prevented()
        {
            self.states.leave(StateTag::Resizing);
            return false;
        }

        self.invalidate(Invalidation::Width);
        self.refresh_inner();
        self.states.leave(StateTag::Resizing);
        self.trigger(Lifecycle::Resized, Payload::None);
        true
    }

    /// Advances the host clock: due resizes, tick-driven transitions and
    /// plugin timers.
    pub fn tick(&mut self, now: Instant) {
        if self.destroyed {
            return;
        }
        self.clock = now;

        if let Some(deadline) = self.resize_deadline
            && now >= deadline
        {
            self.resize_deadline = None;
            self.on_resize();
        }

        self.advance_animation(now);
        self.with_plugins(|plugin, ctx| plugin.on_tick(now, ctx));
        self.drain_commands();
    }

    /// Pointer entered (`true`) or left the carousel element.
    pub fn hover(&mut self, hovering: bool) {
        if self.destroyed {
            return;
        }
        self.with_plugins(|plugin, ctx| plugin.on_hover(hovering, ctx));
        self.drain_commands();
    }

    /// Tears the carousel down. Later inputs are ignored and commands are
    /// rejected.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        for plugin in &mut self.plugins {
            plugin.destroy();
        }
        self.plugins.clear();
        self.events.clear();
        self.stage.clear();
        self.animator.cancel();
        self.drag = None;
        self.clones.clear();
        self.widths.clear();
        self.coordinates.clear();
        self.commands.clear();
        self.inbox = None;
        self.resize_deadline = None;
        self.states.clear();
        self.invalidated.clear();
        self.destroyed = true;
        debug!("carousel destroyed");
    }

    /// Whether [`Carousel::destroy`] has run.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn ensure_alive(&self, operation: Operation) -> Result<()> {
        if self.destroyed {
            Err(CarouselError::rejected(operation, RejectReason::Destroyed))
        } else {
            Ok(())
        }
    }

    /// Marks part of the layout stale; the next `update` recomputes it.
    pub fn invalidate(&mut self, tag: Invalidation) {
        self.invalidated.insert(tag);
        if self.states.is(StateTag::Valid) {
            self.states.leave(StateTag::Valid);
        }
    }

    /// Registers `callback` for one lifecycle event kind. Callbacks may
    /// prevent or redirect the `*` (before) events.
    pub fn subscribe<F>(
        &mut self,
        kind: Lifecycle,
        callback: F,
    ) -> SubscriptionId
    where
        F: FnMut(&mut Event) + 'static,
    {
        self.events.subscribe(kind, callback)
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Notifies plugins, then subscribers. Suppressed kinds go nowhere.
    fn trigger(&mut self, kind: Lifecycle, payload: Payload) -> Event {
        let mut event = Event::new(kind, payload);
        if self.destroyed || self.events.is_suppressed(kind) {
            return event;
        }
        trace!(event = %kind, ?payload, "trigger");
        let seen = event.clone();
        self.with_plugins(|plugin, ctx| plugin.on_event(&seen, ctx));
        self.events.notify(&mut event);
        event
    }

    fn with_plugins<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut dyn Plugin, &mut PluginContext<'_>),
    {
        if self.plugins.is_empty() {
            return;
        }
        let mut plugins = std::mem::take(&mut self.plugins);
        let mut queued = Vec::new();
        {
            let mut ctx = PluginContext::new(self, &mut queued);
            for plugin in plugins.iter_mut() {
                f(plugin.as_mut(), &mut ctx);
            }
        }
        self.plugins = plugins;
        self.commands.extend(queued);
    }

    /// Runs queued commands. Nested drains return immediately so commands
    /// never re-enter each other.
    fn drain_commands(&mut self) {
        if self.draining {
            return;
        }
        self.draining = true;
        let mut executed = 0;
        while let Some(command) = self.commands.pop_front() {
            if executed == MAX_DRAIN {
                warn!(
                    dropped = self.commands.len() + 1,
                    "command queue limit reached; dropping the rest"
                );
                self.commands.clear();
                break;
            }
            executed += 1;
            if let Err(err) = self.execute(command) {
                debug!(%err, "queued command rejected");
            }
        }
        self.draining = false;
    }

    /// Attached plugin of type `T`.
    pub fn plugin<T: Plugin + 'static>(&self) -> Option<&T> {
        self.plugins.iter().find_map(|plugin| {
            (plugin.as_ref() as &dyn Any).downcast_ref::<T>()
        })
    }

    /// Attached plugin of type `T`, mutably.
    pub fn plugin_mut<T: Plugin + 'static>(&mut self) -> Option<&mut T> {
        self.plugins.iter_mut().find_map(|plugin| {
            (plugin.as_mut() as &mut dyn Any).downcast_mut::<T>()
        })
    }

    /// Options as constructed, before breakpoint resolution.
    pub fn options(&self) -> &CarouselOptions {
        &self.options
    }

    /// Settings for the current breakpoint.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Breakpoint the settings were resolved from.
    pub fn breakpoint(&self) -> Option<Breakpoint> {
        self.breakpoint
    }

    /// Last viewport the host reported.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Items in relative order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Item at a relative position.
    pub fn item(&self, relative: usize) -> Option<&Item> {
        self.items.get(relative)
    }

    /// Relative position of an item.
    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Number of items, clones excluded.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// No items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Relative index of each clone, in push order.
    pub fn clones(&self) -> &[usize] {
        &self.clones
    }

    /// Absolute slots holding clones of `item` (every clone when `None`).
    pub fn clones_of(&self, item: Option<usize>) -> Vec<usize> {
        clones::clones_of(item, self.items.len(), &self.clones)
    }

    /// Item shown in an absolute slot.
    pub fn slot_item(&self, position: usize) -> Option<ItemId> {
        self.relative(position)
            .and_then(|r| self.items.get(r))
            .map(|item| item.id)
    }

    /// Absolute current position; `None` while empty.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Relative position of an absolute one.
    pub fn relative(&self, position: usize) -> Option<usize> {
        position::relative(
            position as isize,
            self.items.len(),
            self.clones.len(),
        )
    }

    /// Wraps `position` into range; relative positions wrap over the items,
    /// absolute ones over items plus clones.
    pub fn normalize(&self, position: isize, relative: bool) -> Option<usize> {
        position::normalize(
            position,
            self.items.len(),
            self.clones.len(),
            relative,
        )
    }

    /// Lowest position navigation may reach.
    pub fn minimum(&self, relative: bool) -> usize {
        position::minimum(self.clones.len(), relative)
    }

    /// Element width for `kind`.
    pub fn width(&self, kind: WidthKind) -> f32 {
        layout::width(self.width, &self.settings, kind)
    }

    /// Item widths by relative position, from the last pipeline pass.
    pub fn item_widths(&self) -> &[f32] {
        &self.widths
    }

    /// Stage offset for an absolute position.
    pub fn coordinate(&self, position: usize) -> f32 {
        layout::coordinate(
            &self.coordinates,
            position,
            self.width(WidthKind::Default),
            &self.settings,
        )
    }

    /// Stage offset for every absolute position.
    pub fn coordinates(&self) -> Vec<f32> {
        (0..self.coordinates.len())
            .map(|p| self.coordinate(p))
            .collect()
    }

    /// Render model for the host.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Absolute positions of the slots in view.
    pub fn active_slots(&self) -> Vec<usize> {
        self.stage.active()
    }

    /// Whether `tag` is currently entered.
    pub fn is(&self, tag: StateTag) -> bool {
        self.states.is(tag)
    }

    /// Entered state tags.
    pub fn states(&self) -> Vec<StateTag> {
        self.states.active()
    }

    /// Speed of the pending or running transition (ms).
    pub fn speed(&self) -> u64 {
        self.speed
    }

    /// Latest host time seen by the engine.
    pub fn now(&self) -> Instant {
        self.clock
    }

    /// A pointer gesture is moving the stage.
    pub fn is_dragging(&self) -> bool {
        self.states.is(StateTag::Dragging)
    }

    /// Serializable copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            breakpoint: self.breakpoint,
            settings: self.settings.clone(),
            viewport: self.viewport,
            items: self.items.iter().map(|item| item.id).collect(),
            clones: self.clones.clone(),
            current: self.current,
            relative: self.current.and_then(|c| self.relative(c)),
            minimum: self.minimum(false),
            maximum: self.maximum(false),
            coordinates: self.coordinates(),
            active: self.active_slots(),
            states: self.states(),
            stage: self.stage.clone(),
        }
    }
}
