/// Loader error type.
pub mod error;

use anyhow::Context;
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::models::CarouselOptions;
use crate::validation::{ConfigWarnings, apply_guard_rails};
use error::ConfigLoadError;

/// Path to a TOML or JSON options file.
pub const CONFIG_PATH_ENV: &str = "VITRINE_CONFIG_PATH";
/// Inline JSON options.
pub const CONFIG_JSON_ENV: &str = "VITRINE_CONFIG_JSON";

const DEFAULT_CANDIDATES: &[&str] = &[
    "vitrine.toml",
    "vitrine.json",
    "config/vitrine.toml",
    "config/vitrine.json",
];

/// Source that produced the carousel options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// Nothing found; built-in defaults.
    #[default]
    Default,
    /// File named by `$VITRINE_CONFIG_PATH`.
    EnvPath(PathBuf),
    /// JSON in `$VITRINE_CONFIG_JSON`.
    EnvInline,
    /// Explicit path or a default candidate file.
    File(PathBuf),
}

/// Where [`ConfigLoader`] looks beyond the built-in search order.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoaderOptions {
    /// Explicit options file; wins over every environment source.
    pub config_path: Option<PathBuf>,
    /// `.env` style file consulted before the process environment.
    pub env_file: Option<PathBuf>,
}

/// Loads options from an explicit path, the environment or a default file,
/// then runs the guard rails.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

/// Result of [`ConfigLoader::load`].
#[derive(Debug)]
pub struct ConfigLoad {
    /// Options that passed the guard rails.
    pub options: CarouselOptions,
    /// Where they came from.
    pub source: ConfigSource,
    /// Soft issues found by the guard rails.
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    /// Loader using the environment and default files only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader with an explicit path or `.env` file.
    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    /// Evaluation order:
    /// 1) `config_path`,
    /// 2) `$VITRINE_CONFIG_PATH` (TOML or JSON file),
    /// 3) `$VITRINE_CONFIG_JSON` (inline JSON),
    /// 4) `vitrine.toml`/`vitrine.json` in the working directory or `config/`,
    /// 5) defaults.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (options, source) = self.read_options()?;
        let warnings = apply_guard_rails(&options)?;
        for warning in &warnings.items {
            warn!(
                message = %warning.message,
                hint = ?warning.hint,
                "carousel option warning"
            );
        }
        debug!(
            ?source,
            breakpoints = options.responsive.len(),
            "carousel options loaded"
        );

        Ok(ConfigLoad {
            options,
            source,
            warnings,
        })
    }

    fn read_options(
        &self,
    ) -> Result<(CarouselOptions, ConfigSource), ConfigLoadError> {
        if let Some(path) = &self.options.config_path {
            let options = read_file(path)?;
            return Ok((options, ConfigSource::File(path.clone())));
        }

        let env_file = self.env_file_vars()?;
        let lookup = |key: &str| {
            env_file
                .get(key)
                .cloned()
                .or_else(|| env::var(key).ok())
                .filter(|value| !value.trim().is_empty())
        };

        if let Some(path_str) = lookup(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path_str);
            let options = read_file(&path)?;
            return Ok((options, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = lookup(CONFIG_JSON_ENV) {
            let options = serde_json::from_str(&raw).map_err(|source| {
                ConfigLoadError::Json {
                    origin: CONFIG_JSON_ENV.to_string(),
                    source,
                }
            })?;
            return Ok((options, ConfigSource::EnvInline));
        }

        if let Some(path) = find_default_file() {
            let options = read_file(&path)?;
            return Ok((options, ConfigSource::File(path)));
        }

        Ok((CarouselOptions::default(), ConfigSource::Default))
    }

    fn env_file_vars(
        &self,
    ) -> Result<HashMap<String, String>, ConfigLoadError> {
        let Some(path) = &self.options.env_file else {
            return Ok(HashMap::new());
        };
        let to_error = |source| ConfigLoadError::EnvFile {
            path: path.clone(),
            source,
        };

        let mut vars = HashMap::new();
        for entry in dotenvy::from_path_iter(path).map_err(to_error)? {
            let (key, value) = entry.map_err(to_error)?;
            vars.insert(key, value);
        }
        Ok(vars)
    }
}

impl CarouselOptions {
    /// Environment-driven load without guard rails or warnings; see
    /// [`ConfigLoader::load`] for the evaluation order.
    pub fn load_from_env() -> anyhow::Result<(Self, ConfigSource)> {
        let loader = ConfigLoader::new();
        let (options, source) = loader
            .read_options()
            .context("failed to load carousel options from the environment")?;
        Ok((options, source))
    }

    /// Reads one file; the extension picks the format.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        read_file(path).with_context(|| {
            format!("invalid carousel options {}", path.display())
        })
    }

    /// Parses TOML, falling back to JSON. `origin` labels errors.
    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> Result<Self, ConfigLoadError> {
        // Try TOML first, then JSON for convenience.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                ConfigLoadError::Unrecognized {
                    origin: origin.to_string(),
                    toml: toml_err.to_string(),
                    json: json_err.to_string(),
                }
            })
        })
    }
}

fn read_file(path: &Path) -> Result<CarouselOptions, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let origin = path.display().to_string();

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&contents)
            .map_err(|source| ConfigLoadError::Json { origin, source }),
        Some("toml") | Some("tml") => toml::from_str(&contents)
            .map_err(|source| ConfigLoadError::Toml { origin, source }),
        _ => CarouselOptions::parse_from_str(&contents, &origin),
    }
}

fn find_default_file() -> Option<PathBuf> {
    DEFAULT_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|path| path.exists())
        .map(|path| path.to_path_buf())
}
