// ABOUTME: Binding manager that resolves, filters and composes templates
// ABOUTME: Creates reactive bindings that re-emit composed values when source state changes

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::builtins;
use super::error::{InterpolateError, Result};
use super::expression::{ParsedTemplate, Segment};
use super::filters::FilterRegistry;
use super::resolver::{resolve, Scope};
use crate::state::{State, SubscriptionId, WeakState};

pub type Callback = Rc<dyn Fn(&Value)>;

/// One interpolation configuration.
///
/// Every install of the interpolation plugin creates a new `Interpolator`
/// with its own [`FilterRegistry`]. Clones share that registry, which is how
/// all views of one type see the same filters.
#[derive(Clone, Default)]
pub struct Interpolator {
    registry: Rc<RefCell<FilterRegistry>>,
}

/// Identifier to container mapping captured when a binding is created.
struct Source<H> {
    identifier: String,
    state: H,
}

impl Interpolator {
    /// Create a configuration with an empty filter registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration preloaded with the built-in filters
    pub fn with_builtin_filters() -> Result<Self> {
        let interpolator = Self::new();
        builtins::register_builtins(&mut interpolator.registry.borrow_mut())?;
        Ok(interpolator)
    }

    pub fn filter<F>(&self, name: &str, filter: F) -> Result<()>
    where
        F: Fn(&Value) -> Value + 'static,
    {
        self.registry.borrow_mut().register(name, filter)
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.registry.borrow().has(name)
    }

    pub fn filter_names(&self) -> Vec<String> {
        self.registry.borrow().names()
    }

    /// Whether two configurations share one filter registry
    pub fn shares_registry_with(&self, other: &Interpolator) -> bool {
        Rc::ptr_eq(&self.registry, &other.registry)
    }

    /// One-shot interpolation: resolve, filter and compose without subscribing
    pub fn render<S: Scope>(&self, template: &str, scope: &S) -> Result<Value> {
        let parsed = ParsedTemplate::parse(template);
        let sources = resolve_sources(&parsed, scope)?;
        self.compose(&parsed, &scope.label(), |identifier| {
            lookup(sources.as_slice(), identifier).and_then(|state| state.get(identifier))
        })
    }

    /// Reactive interpolation.
    ///
    /// Fails before invoking `callback` if any identifier is unresolvable.
    /// Otherwise invokes `callback` once with the composed value, then again
    /// after every change of a source identifier in the container it was
    /// resolved from. The returned binding keeps the subscriptions alive
    /// until it is released or dropped.
    pub fn bind<S, F>(
        &self,
        template: &str,
        scope: &S,
        callback: F,
    ) -> Result<(Value, InterpolationBinding)>
    where
        S: Scope,
        F: Fn(&Value) + 'static,
    {
        let parsed = Rc::new(ParsedTemplate::parse(template));
        let sources = resolve_sources(&parsed, scope)?;
        let label = scope.label();

        let value = self.compose(&parsed, &label, |identifier| {
            lookup(sources.as_slice(), identifier).and_then(|state| state.get(identifier))
        })?;

        let callback: Callback = Rc::new(callback);
        callback(&value);

        // Handlers hold weak handles so a container never keeps itself alive
        // through its own subscriber list.
        let weak_sources: Rc<Vec<Source<WeakState>>> = Rc::new(
            sources
                .iter()
                .map(|source| Source {
                    identifier: source.identifier.clone(),
                    state: source.state.downgrade(),
                })
                .collect(),
        );

        let active = Rc::new(Cell::new(true));
        let mut subscriptions = Vec::with_capacity(sources.len());

        for source in &sources {
            let interpolator = self.clone();
            let parsed = Rc::clone(&parsed);
            let weak_sources = Rc::clone(&weak_sources);
            let callback = Rc::clone(&callback);
            let active = Rc::clone(&active);
            let label = label.clone();

            let id = source.state.subscribe(&source.identifier, move |key, _| {
                if !active.get() {
                    return;
                }

                debug!("State '{}' changed, re-evaluating '{}'", key, parsed.source());
                let recomposed = interpolator.compose(&parsed, &label, |identifier| {
                    lookup(weak_sources.as_slice(), identifier)
                        .and_then(WeakState::upgrade)
                        .and_then(|state| state.get(identifier))
                });

                match recomposed {
                    Ok(value) => callback(&value),
                    Err(e) => warn!("Skipping update of '{}': {}", parsed.source(), e),
                }
            });

            subscriptions.push((source.state.clone(), id));
        }

        let binding = InterpolationBinding {
            id: Uuid::new_v4(),
            template: parsed,
            subscriptions,
            active,
        };

        debug!(
            "Created binding {} for '{}' on view {} with {} subscription(s)",
            binding.id,
            binding.template(),
            label,
            binding.subscription_count()
        );

        Ok((value, binding))
    }

    fn compose<L>(&self, parsed: &ParsedTemplate, label: &str, lookup: L) -> Result<Value>
    where
        L: Fn(&str) -> Option<Value>,
    {
        let resolve_placeholder = |identifier: &str, filters: &[String]| -> Result<Value> {
            let value = lookup(identifier).ok_or_else(|| InterpolateError::UnresolvedIdentifier {
                identifier: identifier.to_string(),
                view: label.to_string(),
            })?;
            Ok(self.apply_filters(value, filters))
        };

        if parsed.is_bare() {
            if let Some(placeholder) = parsed.placeholders().next() {
                return resolve_placeholder(&placeholder.identifier, &placeholder.filters);
            }
        }

        let mut output = String::with_capacity(parsed.source().len());
        for segment in parsed.segments() {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Placeholder(placeholder) => {
                    let value = resolve_placeholder(&placeholder.identifier, &placeholder.filters)?;
                    output.push_str(&coerce_to_text(&value));
                }
            }
        }

        Ok(Value::String(output))
    }

    fn apply_filters(&self, value: Value, filters: &[String]) -> Value {
        filters.iter().fold(value, |value, name| {
            // Release the registry borrow before running user code
            let filter = self.registry.borrow().get(name);
            FilterRegistry::run(filter, name, value)
        })
    }
}

impl fmt::Debug for Interpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpolator")
            .field("registry", &*self.registry.borrow())
            .finish()
    }
}

fn resolve_sources<S: Scope>(parsed: &ParsedTemplate, scope: &S) -> Result<Vec<Source<State>>> {
    parsed
        .identifiers()
        .into_iter()
        .map(|identifier| {
            resolve(identifier, scope)
                .map(|resolved| Source {
                    identifier: identifier.to_string(),
                    state: resolved.source,
                })
                .ok_or_else(|| InterpolateError::UnresolvedIdentifier {
                    identifier: identifier.to_string(),
                    view: scope.label(),
                })
        })
        .collect()
}

fn lookup<'a, H>(sources: &'a [Source<H>], identifier: &str) -> Option<&'a H> {
    sources
        .iter()
        .find(|source| source.identifier == identifier)
        .map(|source| &source.state)
}

/// Text form of a value when spliced into a mixed template.
///
/// Strings are inserted verbatim, `null` becomes empty, arrays join their
/// elements with commas and objects render as compact JSON.
pub fn coerce_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(coerce_to_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Subscriptions created by one reactive `interpolate` call.
///
/// Releasing (or dropping) the binding unsubscribes from every container and
/// guarantees the callback never fires again, even for a notification that is
/// already being dispatched.
pub struct InterpolationBinding {
    id: Uuid,
    template: Rc<ParsedTemplate>,
    subscriptions: Vec<(State, SubscriptionId)>,
    active: Rc<Cell<bool>>,
}

impl InterpolationBinding {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn template(&self) -> &str {
        self.template.source()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Whether this binding observes `state`
    pub fn observes(&self, state: &State) -> bool {
        self.subscriptions.iter().any(|(s, _)| s.ptr_eq(state))
    }

    pub fn release(&mut self) {
        if !self.active.replace(false) {
            return;
        }

        for (state, id) in self.subscriptions.drain(..) {
            state.unsubscribe(id);
        }

        debug!("Released binding {} for '{}'", self.id, self.template.source());
    }
}

impl Drop for InterpolationBinding {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for InterpolationBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpolationBinding")
            .field("id", &self.id)
            .field("template", &self.template.source())
            .field("subscriptions", &self.subscriptions.len())
            .field("active", &self.active.get())
            .finish()
    }
}
