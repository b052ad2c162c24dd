// ABOUTME: Error types for scene documents
// ABOUTME: Defines loading errors and the validation errors reported for view trees

use thiserror::Error;

use crate::view::ViewError;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unknown view '{0}'")]
    UnknownView(String),

    #[error("Validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("View error: {0}")]
    ViewError(#[from] ViewError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Empty scene: no views defined")]
    EmptyScene,

    #[error("View '{view}' is owned by unknown view '{owner}'")]
    UnknownOwner { view: String, owner: String },

    #[error("Ownership cycle detected involving views: {views:?}")]
    OwnerCycle { views: Vec<String> },

    #[error("Binding #{index} refers to unknown view '{view}'")]
    UnknownBindingView { index: usize, view: String },

    #[error("Update #{index} refers to unknown view '{view}'")]
    UnknownUpdateView { index: usize, view: String },

    #[error("Template '{template}' on view '{view}' cannot be interpolated: {reason}")]
    UnresolvedBinding {
        view: String,
        template: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, SceneError>;
