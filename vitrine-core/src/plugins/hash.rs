//! Links the current item to the host's URL fragment.

use tracing::debug;

use vitrine_config::StartPosition;

use super::{Plugin, PluginContext};
use crate::carousel::commands::Command;
use crate::events::{Event, Lifecycle, Property};

/// Keeps the URL fragment and the current item in step.
#[derive(Debug, Default)]
pub struct Hash {
    fragment: Option<String>,
}

impl Hash {
    /// `fragment` is the host's URL fragment without the leading `#`.
    pub fn new(fragment: Option<String>) -> Self {
        Self { fragment }
    }

    /// Fragment the host should show.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Jumps to the item whose hash matches the fragment.
    fn locate(&self, ctx: &mut PluginContext<'_>) {
        let Some(fragment) = self.fragment.as_deref() else {
            return;
        };
        let carousel = ctx.carousel();
        let Some(index) = carousel
            .items()
            .iter()
            .position(|item| item.content.hash.as_deref() == Some(fragment))
        else {
            debug!(fragment, "no item for fragment");
            return;
        };
        if Some(carousel.clones().len() / 2 + index) != carousel.current() {
            ctx.push(Command::To {
                position: index as isize,
                speed: Some(0),
            });
        }
    }
}

impl Plugin for Hash {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn on_event(&mut self, event: &Event, ctx: &mut PluginContext<'_>) {
        let carousel = ctx.carousel();
        match (event.kind, event.property()) {
            (Lifecycle::Initialized, _)
                if carousel.settings().start_position
                    == StartPosition::UrlHash =>
            {
                self.locate(ctx);
            }
            (Lifecycle::Changed, Some(Property::Position))
                if carousel.settings().url_hash_listener =>
            {
                let hash = carousel
                    .current()
                    .and_then(|c| carousel.relative(c))
                    .and_then(|r| carousel.item(r))
                    .and_then(|item| item.content.hash.clone());
                if hash.is_some() {
                    self.fragment = hash;
                }
            }
            _ => {}
        }
    }

    fn on_command(
        &mut self,
        command: &Command,
        ctx: &mut PluginContext<'_>,
    ) -> bool {
        let Command::Locate { fragment } = command else {
            return false;
        };
        self.fragment = Some(fragment.trim_start_matches('#').to_owned());
        self.locate(ctx);
        true
    }
}
