// ABOUTME: Error types for view types, instances and plugins
// ABOUTME: Defines configuration and lifecycle errors raised by the host view layer

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Interpolation is not installed on view type '{view_type}'")]
    InterpolationNotInstalled { view_type: String },

    #[error("Plugin '{plugin}' is already installed on view type '{view_type}'")]
    PluginAlreadyInstalled { plugin: String, view_type: String },

    #[error("View {view} has been destroyed")]
    Destroyed { view: String },

    #[error("Owner view {owner} has been destroyed")]
    OwnerDestroyed { owner: String },

    #[error("Interpolation error: {0}")]
    Interpolate(#[from] crate::interpolate::InterpolateError),
}

pub type Result<T> = std::result::Result<T, ViewError>;
