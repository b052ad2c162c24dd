// ABOUTME: Filter registry mapping filter names to value transforms
// ABOUTME: One registry per interpolation configuration, shared by that configuration's views

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

use super::error::{InterpolateError, Result};
use super::expression::is_valid_name;

pub type FilterFn = Rc<dyn Fn(&Value) -> Value>;

#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: IndexMap<String, FilterFn>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a filter, replacing any previous filter with the same name
    pub fn register<F>(&mut self, name: &str, filter: F) -> Result<()>
    where
        F: Fn(&Value) -> Value + 'static,
    {
        if !is_valid_name(name) {
            return Err(InterpolateError::InvalidFilterName(name.to_string()));
        }

        if self.filters.insert(name.to_string(), Rc::new(filter)).is_some() {
            debug!("Replaced filter '{}'", name);
        } else {
            debug!("Registered filter '{}'", name);
        }
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<FilterFn> {
        self.filters.get(name).cloned()
    }

    /// Run a filter over `value`. Unknown filters pass the value through.
    pub fn apply(&self, name: &str, value: Value) -> Value {
        Self::run(self.get(name), name, value)
    }

    /// Run a filter already taken out of a registry, so callers can release
    /// their borrow of the registry before user code runs.
    pub(crate) fn run(filter: Option<FilterFn>, name: &str, value: Value) -> Value {
        match filter {
            Some(filter) => filter(&value),
            None => {
                warn!("Filter '{}' is not registered, passing value through", name);
                value
            }
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.filters.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}
