use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::settings::{Settings, SettingsOverride};
use super::values::Breakpoint;

/// Construction options: base settings plus responsive overrides.
///
/// ```toml
/// items = 3
/// nav = true
///
/// [responsive.0]
/// items = 1
///
/// [responsive.600]
/// items = 3
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselOptions {
    /// Settings used below the first breakpoint.
    #[serde(flatten)]
    pub base: Settings,
    /// Overrides keyed by minimum viewport width.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub responsive: BTreeMap<Breakpoint, SettingsOverride>,
}

/// Settings resolved for one viewport width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSettings {
    /// Matched breakpoint, `None` when base options applied unmodified.
    pub breakpoint: Option<Breakpoint>,
    /// Base settings with the breakpoint merged on.
    pub settings: Settings,
}

impl From<Settings> for CarouselOptions {
    fn from(base: Settings) -> Self {
        Self {
            base,
            responsive: BTreeMap::new(),
        }
    }
}

impl CarouselOptions {
    /// Adds (or replaces) the override for `breakpoint`.
    pub fn with_breakpoint(
        mut self,
        breakpoint: u32,
        overrides: SettingsOverride,
    ) -> Self {
        self.responsive.insert(Breakpoint(breakpoint), overrides);
        self
    }

    /// The numerically largest breakpoint not wider than `viewport_width`.
    pub fn breakpoint_for(&self, viewport_width: f32) -> Option<Breakpoint> {
        self.responsive
            .keys()
            .copied()
            .filter(|bp| bp.width() <= viewport_width)
            .max()
    }

    /// Resolves the settings snapshot for a viewport width.
    pub fn resolve(&self, viewport_width: f32) -> ResolvedSettings {
        match self.breakpoint_for(viewport_width) {
            Some(bp) => {
                let settings = self
                    .responsive
                    .get(&bp)
                    .map(|overrides| self.base.merged(overrides))
                    .unwrap_or_else(|| self.base.clone());
                ResolvedSettings {
                    breakpoint: Some(bp),
                    settings,
                }
            }
            None => ResolvedSettings {
                breakpoint: None,
                settings: self.base.clone(),
            },
        }
    }
}
