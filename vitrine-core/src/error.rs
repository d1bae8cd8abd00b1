use strum::{Display, IntoStaticStr};
use thiserror::Error;
use vitrine_config::ConfigGuardRailError;

/// Public operation that produced a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[allow(missing_docs)]
pub enum Operation {
    To,
    Next,
    Prev,
    ToPage,
    SetCurrent,
    Add,
    Remove,
    Replace,
    Refresh,
    Dispatch,
}

/// Why a command was refused without touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// Navigation or removal on a carousel without items.
    #[error("the carousel has no items")]
    EmptyCarousel,
    /// Position outside every item and clone.
    #[error("the position does not resolve to an item")]
    NoValidPosition,
    /// Any call after `destroy`.
    #[error("the carousel has been destroyed")]
    Destroyed,
}

/// Engine error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CarouselError {
    /// A command was refused; state is unchanged.
    #[error("{operation} rejected: {reason}")]
    Rejected {
        /// Refused operation.
        operation: Operation,
        /// Why.
        reason: RejectReason,
    },
    /// Construction options failed the guard rails.
    #[error("invalid carousel options: {0}")]
    Options(#[from] ConfigGuardRailError),
}

impl CarouselError {
    /// Shorthand for [`CarouselError::Rejected`].
    pub fn rejected(operation: Operation, reason: RejectReason) -> Self {
        Self::Rejected { operation, reason }
    }

    /// The rejection reason, if this is a rejection.
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Self::Rejected { reason, .. } => Some(*reason),
            Self::Options(_) => None,
        }
    }
}

/// Engine result.
pub type Result<T, E = CarouselError> = std::result::Result<T, E>;
