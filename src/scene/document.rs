// ABOUTME: Scene document data structures, parsing and instantiation
// ABOUTME: Describes a view tree, its template bindings and a script of state updates

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

use super::error::{Result, SceneError, ValidationError};
use super::graph::OwnerGraph;
use crate::view::{Interpolate, View, ViewOptions, ViewType};

/// Which filters a scene's view type starts with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FilterSet {
    #[default]
    Builtin,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    pub description: Option<String>,
    pub filters: Option<FilterSet>,
    pub views: IndexMap<String, ViewSpec>,
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,
    #[serde(default)]
    pub updates: Vec<Update>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ViewSpec {
    pub owner: Option<String>,
    #[serde(default)]
    pub state: IndexMap<String, Value>,
    #[serde(default)]
    pub props: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BindingSpec {
    pub view: String,
    pub template: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Update {
    Set {
        view: String,
        key: String,
        value: Value,
    },
    Destroy {
        view: String,
    },
}

impl Update {
    pub fn view(&self) -> &str {
        match self {
            Update::Set { view, .. } | Update::Destroy { view } => view,
        }
    }
}

impl Scene {
    /// Parse scene from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SceneError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Parse scene from YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let scene: Scene = serde_yaml::from_str(content).map_err(SceneError::YamlError)?;
        scene.validate_structure()?;
        Ok(scene)
    }

    fn validate_structure(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SceneError::MissingField("name".to_string()));
        }

        if self.views.is_empty() {
            return Err(SceneError::ValidationError(ValidationError::EmptyScene));
        }

        Ok(())
    }

    pub fn view_names(&self) -> Vec<String> {
        self.views.keys().cloned().collect()
    }

    pub fn get_view(&self, name: &str) -> Option<&ViewSpec> {
        self.views.get(name)
    }

    /// Views that name `owner` as their owner
    pub fn owned_by(&self, owner: &str) -> Vec<String> {
        self.views
            .iter()
            .filter(|(_, spec)| spec.owner.as_deref() == Some(owner))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// View names ordered so that every owner precedes the views it owns
    pub fn creation_order(&self) -> std::result::Result<Vec<String>, ValidationError> {
        OwnerGraph::build(&self.views)?.creation_order()
    }

    /// Build the view tree using the scene's own filter set
    pub fn instantiate(&self) -> Result<SceneInstance> {
        self.instantiate_with(self.filters.unwrap_or_default())
    }

    /// Build the view tree with an explicit filter set
    pub fn instantiate_with(&self, filters: FilterSet) -> Result<SceneInstance> {
        let plugin = match filters {
            FilterSet::Builtin => Interpolate::with_builtin_filters(),
            FilterSet::None => Interpolate::new(),
        };
        let view_type = ViewType::new(self.name.clone()).use_plugin(plugin)?;

        let mut views: IndexMap<String, View> = IndexMap::new();
        for name in self.creation_order()? {
            let spec = &self.views[&name];

            let mut options = ViewOptions::new().with_name(name.clone());
            options.state = spec.state.clone();
            options.props = spec.props.clone();

            if let Some(owner_name) = &spec.owner {
                let owner = views
                    .get(owner_name)
                    .ok_or_else(|| SceneError::UnknownView(owner_name.clone()))?;
                options = options.with_owner(owner);
            }

            let view = view_type.create(options)?;
            debug!("Instantiated view '{}'", name);
            views.insert(name, view);
        }

        // Keep declaration order for callers iterating the instance
        let mut ordered = IndexMap::with_capacity(views.len());
        for name in self.views.keys() {
            if let Some(view) = views.swap_remove(name) {
                ordered.insert(name.clone(), view);
            }
        }

        info!("Instantiated scene '{}' with {} view(s)", self.name, ordered.len());

        Ok(SceneInstance {
            view_type,
            views: ordered,
        })
    }
}

/// Live views created from a [`Scene`].
#[derive(Debug)]
pub struct SceneInstance {
    view_type: ViewType,
    views: IndexMap<String, View>,
}

impl SceneInstance {
    pub fn view_type(&self) -> &ViewType {
        &self.view_type
    }

    pub fn view(&self, name: &str) -> Result<&View> {
        self.views
            .get(name)
            .ok_or_else(|| SceneError::UnknownView(name.to_string()))
    }

    pub fn views(&self) -> impl Iterator<Item = (&String, &View)> {
        self.views.iter()
    }

    /// One-shot interpolation of `template` against the named view
    pub fn render(&self, view: &str, template: &str) -> Result<Value> {
        Ok(self.view(view)?.interpolate(template)?)
    }

    /// Install a reactive binding described by the scene
    pub fn bind<F>(&self, binding: &BindingSpec, callback: F) -> Result<Value>
    where
        F: Fn(&Value) + 'static,
    {
        Ok(self
            .view(&binding.view)?
            .interpolate_with(&binding.template, callback)?)
    }

    /// Apply one scripted update
    pub fn apply(&self, update: &Update) -> Result<()> {
        match update {
            Update::Set { view, key, value } => {
                debug!("Setting '{}' on view '{}'", key, view);
                self.view(view)?.state().set(key.clone(), value.clone());
            }
            Update::Destroy { view } => {
                debug!("Destroying view '{}'", view);
                self.view(view)?.destroy();
            }
        }
        Ok(())
    }
}
