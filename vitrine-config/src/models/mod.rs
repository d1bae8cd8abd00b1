/// Options with responsive breakpoints.
pub mod options;
/// The flat settings record and its override.
pub mod settings;
/// Option value types.
pub mod values;

pub use options::{CarouselOptions, ResolvedSettings};
pub use settings::{Settings, SettingsOverride};
pub use values::{Breakpoint, SlideBy, StartPosition};
