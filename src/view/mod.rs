// ABOUTME: Host view module for the interpolation engine
// ABOUTME: Exports view types, view instances, plugin composition and view errors

pub mod error;
pub mod plugin;
#[allow(clippy::module_inception)]
pub mod view;

pub use error::{Result, ViewError};
pub use plugin::{Interpolate, Plugin};
pub use view::{View, ViewOptions, ViewType};
