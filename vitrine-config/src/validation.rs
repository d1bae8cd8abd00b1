use std::fmt;

use thiserror::Error;

use crate::models::{Breakpoint, CarouselOptions, Settings, SlideBy};

/// Which part of the options a guard rail fired on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The base settings.
    Base,
    /// A breakpoint merged onto the base.
    Breakpoint(Breakpoint),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Base => f.write_str("base options"),
            Scope::Breakpoint(bp) => write!(f, "breakpoint {bp}"),
        }
    }
}

/// Options the engine cannot honour.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigGuardRailError {
    #[error("{scope}: `items` must be at least 1")]
    ZeroItems { scope: Scope },
    #[error(
        "{scope}: `{field}` must be a finite, non-negative pixel value \
         (got {value})"
    )]
    InvalidPixels {
        scope: Scope,
        field: &'static str,
        value: f32,
    },
    #[error("{scope}: `snap_tolerance` must be positive (got {value})")]
    SnapTolerance { scope: Scope, value: f32 },
    #[error("{scope}: `pull_factor` must be within [0, 1] (got {value})")]
    PullFactor { scope: Scope, value: f32 },
    #[error("{scope}: `autoplay_timeout` must be positive")]
    AutoplayTimeout { scope: Scope },
    #[error("{scope}: `slide_by` must be at least 1")]
    ZeroSlideBy { scope: Scope },
    #[error("{scope}: `dots_each` must be at least 1")]
    ZeroDotsEach { scope: Scope },
}

/// Legal but suspicious option combination.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// What looks wrong.
    pub message: String,
    /// How to fix it, when there is an obvious fix.
    pub hint: Option<String>,
}

/// Warnings collected by [`apply_guard_rails`].
#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    /// In the order they were found.
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    /// Records a warning without a hint.
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    /// Records a warning with a suggested fix.
    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    /// No warnings were raised.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of warnings.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Validates the base options and every breakpoint (merged onto the base).
///
/// Hard failures return the first violation; soft issues are collected as
/// warnings for the caller to log or display.
pub fn apply_guard_rails(
    options: &CarouselOptions,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    check_settings(&options.base, Scope::Base, &mut warnings)?;
    for (bp, overrides) in &options.responsive {
        if overrides.is_empty() {
            warnings.push(format!("breakpoint {bp} overrides nothing"));
            continue;
        }
        let merged = options.base.merged(overrides);
        check_settings(&merged, Scope::Breakpoint(*bp), &mut warnings)?;
    }

    Ok(warnings)
}

fn check_settings(
    settings: &Settings,
    scope: Scope,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    if settings.items == 0 {
        return Err(ConfigGuardRailError::ZeroItems { scope });
    }
    check_pixels(scope, "margin", settings.margin)?;
    check_pixels(scope, "stage_padding", settings.stage_padding)?;

    if !(settings.snap_tolerance.is_finite() && settings.snap_tolerance > 0.0)
    {
        return Err(ConfigGuardRailError::SnapTolerance {
            scope,
            value: settings.snap_tolerance,
        });
    }
    if !(0.0..=1.0).contains(&settings.pull_factor) {
        return Err(ConfigGuardRailError::PullFactor {
            scope,
            value: settings.pull_factor,
        });
    }
    if settings.autoplay && settings.autoplay_timeout == 0 {
        return Err(ConfigGuardRailError::AutoplayTimeout { scope });
    }
    if settings.slide_by == SlideBy::Items(0) {
        return Err(ConfigGuardRailError::ZeroSlideBy { scope });
    }
    if settings.dots_each == Some(0) {
        return Err(ConfigGuardRailError::ZeroDotsEach { scope });
    }

    if settings.auto_width && (settings.merge || settings.stage_padding > 0.0)
    {
        warnings.push_with_hint(
            format!("{scope}: auto_width disables merge and stage_padding"),
            "remove merge/stage_padding or turn auto_width off",
        );
    }
    if settings.looping && settings.rewind {
        warnings.push_with_hint(
            format!(
                "{scope}: rewind disables shortest-path wrapping on looped \
                 carousels"
            ),
            "drop rewind unless hard wraps at the ends are intended",
        );
    }
    if settings.center && settings.items % 2 == 0 {
        warnings.push(format!(
            "{scope}: center with an even item count ({}) leaves the \
             current item off-center",
            settings.items
        ));
    }

    Ok(())
}

fn check_pixels(
    scope: Scope,
    field: &'static str,
    value: f32,
) -> Result<(), ConfigGuardRailError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigGuardRailError::InvalidPixels {
            scope,
            field,
            value,
        })
    }
}
