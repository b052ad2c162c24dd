// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides shared scene builders, temp environments and view fixtures

#![allow(dead_code)]

use serde_json::Value;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

use view_interpolate::view::{Interpolate, View, ViewOptions, ViewType};

pub struct TestSceneBuilder {
    name: String,
    filters: Option<String>,
    views: Vec<TestView>,
    bindings: Vec<(String, String)>,
    updates: Vec<String>,
}

pub struct TestView {
    pub name: String,
    pub owner: Option<String>,
    pub state: Vec<(String, String)>,
    pub props: Vec<(String, String)>,
}

impl TestSceneBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            filters: None,
            views: Vec::new(),
            bindings: Vec::new(),
            updates: Vec::new(),
        }
    }

    pub fn with_filters(mut self, filters: &str) -> Self {
        self.filters = Some(filters.to_string());
        self
    }

    pub fn add_view(mut self, name: &str, owner: Option<&str>) -> Self {
        self.views.push(TestView {
            name: name.to_string(),
            owner: owner.map(str::to_string),
            state: Vec::new(),
            props: Vec::new(),
        });
        self
    }

    /// Add a state entry to the most recently added view
    pub fn with_state(mut self, key: &str, value: &str) -> Self {
        if let Some(view) = self.views.last_mut() {
            view.state.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Add a property to the most recently added view
    pub fn with_prop(mut self, key: &str, value: &str) -> Self {
        if let Some(view) = self.views.last_mut() {
            view.props.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn add_binding(mut self, view: &str, template: &str) -> Self {
        self.bindings.push((view.to_string(), template.to_string()));
        self
    }

    pub fn add_set(mut self, view: &str, key: &str, value: &str) -> Self {
        self.updates.push(format!(
            "  - action: set\n    view: {}\n    key: {}\n    value: {}\n",
            view, key, value
        ));
        self
    }

    pub fn add_destroy(mut self, view: &str) -> Self {
        self.updates
            .push(format!("  - action: destroy\n    view: {}\n", view));
        self
    }

    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.generate_yaml())
    }

    pub fn generate_yaml(&self) -> String {
        let mut yaml = format!("name: {}\n", self.name);

        if let Some(filters) = &self.filters {
            yaml.push_str(&format!("filters: {}\n", filters));
        }

        yaml.push_str("\nviews:\n");
        for view in &self.views {
            yaml.push_str(&format!("  {}:\n", view.name));
            if let Some(owner) = &view.owner {
                yaml.push_str(&format!("    owner: {}\n", owner));
            }
            if !view.state.is_empty() {
                yaml.push_str("    state:\n");
                for (key, value) in &view.state {
                    yaml.push_str(&format!("      {}: {}\n", key, value));
                }
            }
            if !view.props.is_empty() {
                yaml.push_str("    props:\n");
                for (key, value) in &view.props {
                    yaml.push_str(&format!("      {}: {}\n", key, value));
                }
            }
            if view.owner.is_none() && view.state.is_empty() && view.props.is_empty() {
                yaml.push_str("    {}\n");
            }
        }

        if !self.bindings.is_empty() {
            yaml.push_str("\nbindings:\n");
            for (view, template) in &self.bindings {
                yaml.push_str(&format!("  - view: {}\n    template: \"{}\"\n", view, template));
            }
        }

        if !self.updates.is_empty() {
            yaml.push_str("\nupdates:\n");
            for update in &self.updates {
                yaml.push_str(update);
            }
        }

        yaml
    }
}

/// The grandparent -> parent -> child chain used throughout the suites
pub fn family_scene() -> TestSceneBuilder {
    TestSceneBuilder::new("family")
        .add_view("grandparent", None)
        .with_state("grandstate", "one")
        .with_prop("grandprop", "two")
        .add_view("parent", Some("grandparent"))
        .with_state("name", "Fred")
        .with_prop("model", "foo")
        .add_view("child", Some("parent"))
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn scene_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}.yaml", name))
    }

    pub fn create_scene_file(&self, name: &str, builder: &TestSceneBuilder) -> PathBuf {
        let scene_file = self.scene_file(name);
        builder
            .write_to_file(&scene_file)
            .expect("Failed to write scene file");
        scene_file
    }
}

/// A view type with the interpolation plugin and no filters
pub fn interpolating_type(name: &str) -> ViewType {
    ViewType::new(name)
        .use_plugin(Interpolate::new())
        .expect("Failed to install interpolation")
}

/// Grandparent, parent and child views matching [`family_scene`]
pub fn family(view_type: &ViewType) -> (View, View, View) {
    let grandparent = view_type
        .create(
            ViewOptions::new()
                .with_name("grandparent")
                .with_state("grandstate", "one")
                .with_prop("grandprop", "two"),
        )
        .expect("Failed to create grandparent");
    let parent = view_type
        .create(
            ViewOptions::new()
                .with_name("parent")
                .with_state("name", "Fred")
                .with_prop("model", "foo")
                .with_owner(&grandparent),
        )
        .expect("Failed to create parent");
    let child = view_type
        .create(ViewOptions::new().with_name("child").with_owner(&parent))
        .expect("Failed to create child");
    (grandparent, parent, child)
}

/// Callback that records every value it receives
pub fn recorder() -> (Rc<RefCell<Vec<Value>>>, impl Fn(&Value) + 'static) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, move |value: &Value| sink.borrow_mut().push(value.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_builder() {
        let yaml = family_scene()
            .add_binding("child", "{{name}}")
            .add_set("parent", "name", "Barney")
            .add_destroy("child")
            .generate_yaml();

        assert!(yaml.contains("name: family"));
        assert!(yaml.contains("    owner: grandparent"));
        assert!(yaml.contains("template: \"{{name}}\""));
        assert!(yaml.contains("action: destroy"));
    }

    #[test]
    fn test_environment_setup() {
        let env = TestEnvironment::new();
        assert!(env.path().exists());
        assert!(env.scene_file("test").to_string_lossy().contains("test.yaml"));
    }
}
