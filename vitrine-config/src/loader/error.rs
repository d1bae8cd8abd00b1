use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ConfigGuardRailError;

/// Why options could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// Options file could not be read.
    #[error("failed to read carousel options from {}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// `.env` file missing or malformed.
    #[error("failed to read env file {}", path.display())]
    EnvFile {
        /// File that failed.
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
    /// `.toml` file that does not parse.
    #[error("invalid TOML carousel options in {origin}")]
    Toml {
        /// File path or variable name.
        origin: String,
        #[source]
        source: toml::de::Error,
    },
    /// `.json` file or inline JSON that does not parse.
    #[error("invalid JSON carousel options in {origin}")]
    Json {
        /// File path or variable name.
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    /// Neither TOML nor JSON; both parser messages are kept.
    #[error(
        "failed to parse carousel options {origin}: \
         toml error: {toml}; json error: {json}"
    )]
    Unrecognized {
        /// File path or caller-supplied label.
        origin: String,
        /// TOML parser message.
        toml: String,
        /// JSON parser message.
        json: String,
    },
    /// Parsed, but rejected by the guard rails.
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
}
