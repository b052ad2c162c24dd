// ABOUTME: Main library module for the view-interpolate engine
// ABOUTME: Exports all core modules and provides the public API

pub mod cli;
pub mod interpolate;
pub mod scene;
pub mod state;
pub mod view;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use interpolate::{InterpolateError, InterpolationBinding, Interpolator, Scope};
pub use scene::{Scene, SceneInstance, SceneValidator};
pub use state::{Props, State};
pub use view::{Interpolate, Plugin, View, ViewError, ViewOptions, ViewType};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
