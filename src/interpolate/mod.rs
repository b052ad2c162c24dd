// ABOUTME: Interpolation engine module
// ABOUTME: Provides placeholder parsing, filters, scope resolution and reactive bindings

pub mod binding;
pub mod builtins;
pub mod error;
pub mod expression;
pub mod filters;
pub mod resolver;

pub use binding::{coerce_to_text, InterpolationBinding, Interpolator};
pub use error::{InterpolateError, Result};
pub use expression::{has_placeholders, ParsedTemplate, Placeholder, Segment};
pub use filters::FilterRegistry;
pub use resolver::{resolve, Resolved, Scope};
