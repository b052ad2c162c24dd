// ABOUTME: Scene validation for ownership, bindings and update scripts
// ABOUTME: Reports errors and warnings without playing any updates

use std::collections::HashSet;
use tracing::debug;

use super::document::{FilterSet, Scene};
use super::error::{Result, ValidationError};
use crate::interpolate::ParsedTemplate;

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
    pub is_valid: bool,
}

pub struct SceneValidator {
    strict_mode: bool,
    filters: Option<FilterSet>,
}

impl SceneValidator {
    pub fn new() -> Self {
        Self {
            strict_mode: false,
            filters: None,
        }
    }

    /// Treat warnings as failures
    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Validate against this filter set instead of the scene's own
    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Validate a complete scene
    pub fn validate(&self, scene: &Scene) -> Result<ValidationReport> {
        let mut report = ValidationReport::new();

        self.validate_ownership(scene, &mut report);
        self.validate_references(scene, &mut report);

        // Templates can only be checked against a tree that builds
        if report.errors.is_empty() {
            self.validate_bindings(scene, &mut report)?;
        }

        self.check_unused_views(scene, &mut report);

        report.is_valid =
            report.errors.is_empty() && (!self.strict_mode || report.warnings.is_empty());
        debug!(
            "Validated scene '{}': {} error(s), {} warning(s)",
            scene.name,
            report.errors.len(),
            report.warnings.len()
        );
        Ok(report)
    }

    fn validate_ownership(&self, scene: &Scene, report: &mut ValidationReport) {
        if let Err(error) = scene.creation_order() {
            report.errors.push(error);
        }
    }

    fn validate_references(&self, scene: &Scene, report: &mut ValidationReport) {
        for (index, binding) in scene.bindings.iter().enumerate() {
            if !scene.views.contains_key(&binding.view) {
                report.errors.push(ValidationError::UnknownBindingView {
                    index,
                    view: binding.view.clone(),
                });
            }
        }

        for (index, update) in scene.updates.iter().enumerate() {
            if !scene.views.contains_key(update.view()) {
                report.errors.push(ValidationError::UnknownUpdateView {
                    index,
                    view: update.view().to_string(),
                });
            }
        }
    }

    /// Resolve every binding once against a fresh instance of the scene
    fn validate_bindings(&self, scene: &Scene, report: &mut ValidationReport) -> Result<()> {
        let filters = self.filters.or(scene.filters).unwrap_or_default();
        let instance = scene.instantiate_with(filters)?;

        for binding in &scene.bindings {
            let parsed = ParsedTemplate::parse(&binding.template);

            if !parsed.has_placeholders() {
                report.warnings.push(format!(
                    "Template '{}' on view '{}' has no placeholders",
                    binding.template, binding.view
                ));
            }

            for filter in parsed.filter_names() {
                if !instance.view_type().has_filter(filter) {
                    report.warnings.push(format!(
                        "Template '{}' uses unregistered filter '{}'",
                        binding.template, filter
                    ));
                }
            }

            if let Err(e) = instance.render(&binding.view, &binding.template) {
                report.errors.push(ValidationError::UnresolvedBinding {
                    view: binding.view.clone(),
                    template: binding.template.clone(),
                    reason: e.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Warn about views that no binding, update or child refers to
    fn check_unused_views(&self, scene: &Scene, report: &mut ValidationReport) {
        let mut referenced: HashSet<&str> = HashSet::new();
        referenced.extend(scene.bindings.iter().map(|b| b.view.as_str()));
        referenced.extend(scene.updates.iter().map(|u| u.view()));
        referenced.extend(scene.views.values().filter_map(|v| v.owner.as_deref()));

        for name in scene.views.keys() {
            if !referenced.contains(name.as_str()) {
                report
                    .warnings
                    .push(format!("View '{}' is never referenced", name));
            }
        }
    }
}

impl Default for SceneValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            is_valid: true,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(yaml: &str) -> Scene {
        Scene::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_valid_scene() {
        let scene = scene(
            r#"
name: ok
views:
  app:
    state: { title: Hello }
  child:
    owner: app
bindings:
  - view: child
    template: "{{ title | upper }}"
"#,
        );

        let report = SceneValidator::new().validate(&scene).unwrap();
        assert!(report.is_valid, "{:?}", report);
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_cycle_and_unknown_references() {
        let scene = scene(
            r#"
name: broken
views:
  a: { owner: b }
  b: { owner: a }
bindings:
  - view: ghost
    template: "{{x}}"
updates:
  - action: destroy
    view: phantom
"#,
        );

        let report = SceneValidator::new().validate(&scene).unwrap();
        assert!(!report.is_valid);
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, ValidationError::OwnerCycle { .. })));
        assert!(report.errors.contains(&ValidationError::UnknownBindingView {
            index: 0,
            view: "ghost".to_string()
        }));
        assert!(report.errors.contains(&ValidationError::UnknownUpdateView {
            index: 0,
            view: "phantom".to_string()
        }));
    }

    #[test]
    fn test_property_binding_is_an_error() {
        let scene = scene(
            r#"
name: props
views:
  app:
    props: { model: foo }
bindings:
  - view: app
    template: "{{model}}"
"#,
        );

        let report = SceneValidator::new().validate(&scene).unwrap();
        assert!(!report.is_valid);
        assert!(matches!(
            &report.errors[0],
            ValidationError::UnresolvedBinding { template, .. } if template == "{{model}}"
        ));
    }

    #[test]
    fn test_warnings_and_strict_mode() {
        let scene = scene(
            r#"
name: warn
views:
  app:
    state: { title: Hello }
  lonely: {}
bindings:
  - view: app
    template: "static text"
  - view: app
    template: "{{ title | shout }}"
"#,
        );

        let report = SceneValidator::new().validate(&scene).unwrap();
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 3);

        let strict = SceneValidator::new()
            .with_strict_mode(true)
            .validate(&scene)
            .unwrap();
        assert!(!strict.is_valid);
    }

    #[test]
    fn test_filter_override() {
        let scene = scene(
            r#"
name: filters
views:
  app:
    state: { title: Hello }
bindings:
  - view: app
    template: "{{ title | upper }}"
"#,
        );

        let report = SceneValidator::new()
            .with_filters(FilterSet::None)
            .validate(&scene)
            .unwrap();
        assert!(report.is_valid);
        assert_eq!(
            report.warnings,
            vec!["Template '{{ title | upper }}' uses unregistered filter 'upper'".to_string()]
        );
    }
}
