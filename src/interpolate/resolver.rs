// ABOUTME: Scope resolution of template identifiers along an ownership chain
// ABOUTME: Walks state containers from a view up through its owners, never touching properties

use serde_json::Value;
use tracing::trace;

use crate::state::State;

/// A binding context that identifiers are resolved against.
///
/// Only the state container and the owner link are visible to resolution,
/// so properties can never leak into a template.
pub trait Scope: Sized {
    fn state(&self) -> State;

    fn owner(&self) -> Option<Self>;

    /// Human readable name used in error messages
    fn label(&self) -> String;
}

/// Result of a successful lookup.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub value: Value,
    /// The container that supplied the value
    pub source: State,
    /// Number of owner hops from the starting scope (0 = the scope itself)
    pub depth: usize,
}

/// Resolve `identifier` starting at `scope`; the closest state wins.
pub fn resolve<S: Scope>(identifier: &str, scope: &S) -> Option<Resolved> {
    let mut state = scope.state();
    let mut owner = scope.owner();
    let mut depth = 0;

    loop {
        if let Some(value) = state.get(identifier) {
            trace!("Resolved '{}' at depth {}", identifier, depth);
            return Some(Resolved {
                value,
                source: state,
                depth,
            });
        }

        let next = owner?;
        state = next.state();
        owner = next.owner();
        depth += 1;
    }
}
