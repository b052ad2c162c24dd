// ABOUTME: Scene module describing view trees in YAML
// ABOUTME: Exports scene parsing, ownership ordering, instantiation and validation

pub mod document;
pub mod error;
pub mod graph;
pub mod validation;

pub use document::{BindingSpec, FilterSet, Scene, SceneInstance, Update, ViewSpec};
pub use error::{Result, SceneError, ValidationError};
pub use graph::OwnerGraph;
pub use validation::{SceneValidator, ValidationReport};
