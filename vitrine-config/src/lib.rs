//! Shared configuration library for Vitrine carousels.
//!
//! This crate owns the option model (base settings plus responsive
//! breakpoint overrides), breakpoint resolution, file/env loading and the
//! guard rails that reject options the engine cannot honour. The engine and
//! the `vitrinectl` binary both consume it so there is a single source of
//! truth for defaults and validation rules.

/// Options loading from files and the environment.
pub mod loader;
/// Option model.
pub mod models;
/// Guard rails.
pub mod validation;

pub use loader::{
    CONFIG_JSON_ENV, CONFIG_PATH_ENV, ConfigLoad, ConfigLoader,
    ConfigLoaderOptions, ConfigSource, error::ConfigLoadError,
};
pub use models::{
    Breakpoint, CarouselOptions, ResolvedSettings, Settings, SettingsOverride,
    SlideBy, StartPosition,
};
pub use validation::{
    ConfigGuardRailError, ConfigWarning, ConfigWarnings, Scope,
    apply_guard_rails,
};
