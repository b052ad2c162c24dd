// ABOUTME: View types and view instances that templates are bound against
// ABOUTME: Owns per-instance state, properties, owner links and binding lifecycle

use indexmap::IndexMap;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, info};
use uuid::Uuid;

use super::error::{Result, ViewError};
use super::plugin::Plugin;
use crate::interpolate::{InterpolationBinding, Interpolator, Scope};
use crate::state::{Props, State};

struct ViewTypeInner {
    name: String,
    plugins: RefCell<Vec<String>>,
    interpolator: RefCell<Option<Interpolator>>,
}

/// Factory for views. Plugins installed here apply to every instance.
#[derive(Clone)]
pub struct ViewType {
    inner: Rc<ViewTypeInner>,
}

impl ViewType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ViewTypeInner {
                name: name.into(),
                plugins: RefCell::new(Vec::new()),
                interpolator: RefCell::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Install a plugin. Each plugin can be installed once per view type.
    pub fn use_plugin<P: Plugin>(&self, plugin: P) -> Result<Self> {
        let plugin_name = plugin.name().to_string();

        if self.inner.plugins.borrow().contains(&plugin_name) {
            return Err(ViewError::PluginAlreadyInstalled {
                plugin: plugin_name,
                view_type: self.inner.name.clone(),
            });
        }

        plugin.install(self)?;
        self.inner.plugins.borrow_mut().push(plugin_name);
        Ok(self.clone())
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.inner.plugins.borrow().iter().any(|p| p == name)
    }

    pub(crate) fn set_interpolator(&self, interpolator: Interpolator) {
        *self.inner.interpolator.borrow_mut() = Some(interpolator);
    }

    pub fn interpolator(&self) -> Option<Interpolator> {
        self.inner.interpolator.borrow().clone()
    }

    fn require_interpolator(&self) -> Result<Interpolator> {
        self.interpolator()
            .ok_or_else(|| ViewError::InterpolationNotInstalled {
                view_type: self.inner.name.clone(),
            })
    }

    /// Register a filter shared by every view of this type
    pub fn filter<F>(&self, name: &str, filter: F) -> Result<()>
    where
        F: Fn(&Value) -> Value + 'static,
    {
        self.require_interpolator()?.filter(name, filter)?;
        Ok(())
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.interpolator()
            .is_some_and(|interpolator| interpolator.has_filter(name))
    }

    /// Create a view instance
    pub fn create(&self, options: ViewOptions) -> Result<View> {
        let owner = match options.owner {
            Some(owner) if owner.is_destroyed() => {
                return Err(ViewError::OwnerDestroyed {
                    owner: owner.label(),
                });
            }
            Some(owner) => Some(Rc::downgrade(&owner.inner)),
            None => None,
        };

        Ok(self.build(options.name, State::from_values(options.state), options.props, owner))
    }

    /// Create a view with empty state and no owner
    pub fn instance(&self) -> View {
        self.build(None, State::new(), IndexMap::new(), None)
    }

    fn build(
        &self,
        name: Option<String>,
        state: State,
        props: IndexMap<String, Value>,
        owner: Option<Weak<ViewInner>>,
    ) -> View {
        let view = View {
            inner: Rc::new(ViewInner {
                id: Uuid::new_v4(),
                name,
                view_type: self.clone(),
                state,
                props: Props::new(props),
                owner,
                bindings: RefCell::new(Vec::new()),
                destroyed: Cell::new(false),
            }),
        };

        debug!("Created view {} of type '{}'", view.label(), self.inner.name);
        view
    }

    pub fn ptr_eq(&self, other: &ViewType) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewType")
            .field("name", &self.inner.name)
            .field("plugins", &*self.inner.plugins.borrow())
            .finish()
    }
}

/// Options for [`ViewType::create`].
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub name: Option<String>,
    pub state: IndexMap<String, Value>,
    pub props: IndexMap<String, Value>,
    pub owner: Option<View>,
}

impl ViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_state(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.state.insert(key.into(), value.into());
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_owner(mut self, owner: &View) -> Self {
        self.owner = Some(owner.clone());
        self
    }
}

struct ViewInner {
    id: Uuid,
    name: Option<String>,
    view_type: ViewType,
    state: State,
    props: Props,
    owner: Option<Weak<ViewInner>>,
    bindings: RefCell<Vec<InterpolationBinding>>,
    destroyed: Cell<bool>,
}

/// A view instance: the binding context for templates.
///
/// The owner link is a weak back-reference fixed at creation, so a child never
/// keeps its owner alive and ownership can never form a cycle.
#[derive(Clone)]
pub struct View {
    inner: Rc<ViewInner>,
}

impl View {
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    pub fn view_type(&self) -> &ViewType {
        &self.inner.view_type
    }

    pub fn state(&self) -> &State {
        &self.inner.state
    }

    pub fn props(&self) -> &Props {
        &self.inner.props
    }

    /// The owning view, if it is still alive
    pub fn owner(&self) -> Option<View> {
        self.inner
            .owner
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| View { inner })
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.inner.view_type.has_filter(name)
    }

    /// Interpolate `template` once against the current state
    pub fn interpolate(&self, template: &str) -> Result<Value> {
        self.ensure_alive()?;
        let interpolator = self.inner.view_type.require_interpolator()?;
        Ok(interpolator.render(template, self)?)
    }

    /// Interpolate `template` and keep `callback` updated until the view is destroyed.
    ///
    /// The callback runs once before this returns. An unresolvable identifier
    /// is returned as an error here and the callback is never invoked.
    pub fn interpolate_with<F>(&self, template: &str, callback: F) -> Result<Value>
    where
        F: Fn(&Value) + 'static,
    {
        self.ensure_alive()?;
        let interpolator = self.inner.view_type.require_interpolator()?;
        let (value, mut binding) = interpolator.bind(template, self, callback)?;

        // The initial callback may have destroyed this view
        if self.is_destroyed() {
            debug!("View {} destroyed during initial callback", self.label());
            binding.release();
        } else {
            self.inner.bindings.borrow_mut().push(binding);
        }
        Ok(value)
    }

    pub fn binding_count(&self) -> usize {
        self.inner.bindings.borrow().len()
    }

    /// Release every binding of this view. Safe to call more than once.
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }

        let bindings = std::mem::take(&mut *self.inner.bindings.borrow_mut());
        info!("Destroying view {} ({} binding(s))", self.label(), bindings.len());
        drop(bindings);
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    pub fn ptr_eq(&self, other: &View) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.is_destroyed() {
            return Err(ViewError::Destroyed { view: self.label() });
        }
        Ok(())
    }
}

impl Scope for View {
    fn state(&self) -> State {
        self.inner.state.clone()
    }

    fn owner(&self) -> Option<Self> {
        View::owner(self)
    }

    fn label(&self) -> String {
        match &self.inner.name {
            Some(name) => format!("'{}'", name),
            None => format!("{}#{}", self.inner.view_type.name(), self.inner.id),
        }
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("view_type", &self.inner.view_type.name())
            .field("bindings", &self.binding_count())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
