//! Engine commands and the cross-carousel broadcast bus.
//!
//! Any code holding a [`CommandBus`] can drive every carousel listening on
//! it, or one addressed by [`CarouselKey`], without a handle to the engine.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, trace, warn};

use super::Carousel;
use crate::constants::commands::BUS_CAPACITY;
use crate::error::{CarouselError, Operation, RejectReason, Result};
use crate::item::Content;

/// Engine operation as data. `speed` is in milliseconds; `None` uses the
/// configured speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "command", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[allow(missing_docs)]
pub enum Command {
    Next {
        speed: Option<u64>,
    },
    Prev {
        speed: Option<u64>,
    },
    /// Relative position.
    To {
        position: isize,
        speed: Option<u64>,
    },
    Add {
        content: Content,
        position: Option<isize>,
    },
    Remove {
        position: isize,
    },
    Replace {
        contents: Vec<Content>,
    },
    Refresh,
    Destroy,
    /// Autoplay: start, optionally with a new interval and speed.
    Play {
        timeout: Option<u64>,
        speed: Option<u64>,
    },
    /// Autoplay: stop.
    Stop,
    /// URL hash: the host fragment changed.
    Locate {
        fragment: String,
    },
}

impl Command {
    /// Snake-case tag, as used in JSON.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Operation reported when the command is rejected.
    pub fn operation(&self) -> Operation {
        match self {
            Command::Next { .. } => Operation::Next,
            Command::Prev { .. } => Operation::Prev,
            Command::To { .. } => Operation::To,
            Command::Add { .. } => Operation::Add,
            Command::Remove { .. } => Operation::Remove,
            Command::Replace { .. } => Operation::Replace,
            Command::Refresh => Operation::Refresh,
            Command::Destroy
            | Command::Play { .. }
            | Command::Stop
            | Command::Locate { .. } => Operation::Dispatch,
        }
    }
}

/// Bus address of one carousel, chosen by the host (`"hero"`,
/// `"gallery-2"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CarouselKey(String);

impl CarouselKey {
    /// Key from any string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CarouselKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for CarouselKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for CarouselKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which listeners a broadcast command is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every carousel on the bus.
    All,
    /// Only carousels listening under this key.
    Key(CarouselKey),
}

impl Target {
    /// Shorthand for [`Target::Key`].
    pub fn key(key: impl Into<CarouselKey>) -> Self {
        Target::Key(key.into())
    }

    /// Whether a carousel listening under `key` should run the command.
    pub fn matches(&self, key: &CarouselKey) -> bool {
        match self {
            Target::All => true,
            Target::Key(target) => target == key,
        }
    }
}

/// Message on the bus.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Who should run it.
    pub target: Target,
    /// What to run.
    pub command: Command,
}

/// Broadcast channel shared by every listening carousel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CommandBus {
    sender: broadcast::Sender<Envelope>,
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new(BUS_CAPACITY)
    }
}

impl CommandBus {
    /// Bus that keeps up to `capacity` unread commands per listener.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Sends a command; returns how many carousels will see it.
    pub fn broadcast(&self, target: Target, command: Command) -> usize {
        match self.sender.send(Envelope { target, command }) {
            Ok(receivers) => receivers,
            Err(_) => {
                trace!("command broadcast with no listeners");
                0
            }
        }
    }

    /// Carousels currently listening.
    pub fn listeners(&self) -> usize {
        self.sender.receiver_count()
    }

    pub(crate) fn inbox(&self, key: CarouselKey) -> Inbox {
        Inbox {
            key,
            receiver: self.sender.subscribe(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Inbox {
    key: CarouselKey,
    receiver: broadcast::Receiver<Envelope>,
}

impl Carousel {
    /// Runs one command, then whatever plugins queued in response.
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        let result = self.execute(command);
        self.drain_commands();
        result
    }

    /// Runs the bus commands addressed to this carousel. Returns how many
    /// succeeded.
    pub fn pump(&mut self) -> usize {
        let Some(inbox) = self.inbox.as_mut() else {
            return 0;
        };

        let mut received = Vec::new();
        loop {
            match inbox.receiver.try_recv() {
                Ok(envelope) => {
                    if envelope.target.matches(&inbox.key) {
                        received.push(envelope.command);
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, key = %inbox.key, "command bus lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }

        let mut executed = 0;
        for command in received {
            if self.destroyed {
                break;
            }
            if self.dispatch(command).is_ok() {
                executed += 1;
            }
        }
        executed
    }

    pub(super) fn execute(&mut self, command: Command) -> Result<()> {
        if self.destroyed {
            return Err(CarouselError::rejected(
                command.operation(),
                RejectReason::Destroyed,
            ));
        }
        debug!(command = command.name(), "execute");

        match command {
            Command::Next { speed } => self.step(1, speed, Operation::Next),
            Command::Prev { speed } => self.step(-1, speed, Operation::Prev),
            Command::To { position, speed } => {
                self.move_to(position, speed, Operation::To)
            }
            Command::Add { content, position } => {
                self.insert_item(content, position)?;
                self.update();
                Ok(())
            }
            Command::Remove { position } => {
                self.remove_item(position)?;
                self.update();
                Ok(())
            }
            Command::Replace { contents } => {
                self.replace_items(contents);
                self.update();
                Ok(())
            }
            Command::Refresh => {
                self.refresh_inner();
                Ok(())
            }
            Command::Destroy => {
                self.destroy();
                Ok(())
            }
            command @ (Command::Play { .. }
            | Command::Stop
            | Command::Locate { .. }) => {
                if !self.route_to_plugins(&command) {
                    debug!(
                        command = command.name(),
                        "no plugin handled command"
                    );
                }
                Ok(())
            }
        }
    }

    fn route_to_plugins(&mut self, command: &Command) -> bool {
        let mut handled = false;
        self.with_plugins(|plugin, ctx| {
            if !handled {
                handled = plugin.on_command(command, ctx);
            }
        });
        handled
    }
}
