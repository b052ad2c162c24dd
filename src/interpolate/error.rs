// ABOUTME: Error types for template interpolation
// ABOUTME: Covers unresolvable placeholders and filter registry misuse

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpolateError {
    #[error(
        "Unable to interpolate '{identifier}' in view {view}: not found in the state of the view or any of its owners (properties are never interpolated)"
    )]
    UnresolvedIdentifier { identifier: String, view: String },

    #[error("Invalid filter name: '{0}'")]
    InvalidFilterName(String),
}

pub type Result<T> = std::result::Result<T, InterpolateError>;
