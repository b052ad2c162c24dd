// ABOUTME: Command implementations for the view-interpolate CLI
// ABOUTME: Handles execution of render, watch, validate, and init commands

use anyhow::Result;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

use super::args::Args;
use super::config::Config;
use crate::interpolate::coerce_to_text;
use crate::scene::{Scene, SceneValidator, Update};

/// Interpolate one template against a scene view and print the result
pub fn render_scene(
    scene_path: PathBuf,
    view: String,
    template: String,
    sets: Vec<String>,
    config: &Config,
) -> Result<()> {
    info!("Rendering against scene: {}", scene_path.display());

    let assignments = Args::parse_assignments(&sets)?;

    let scene = Scene::from_file(&scene_path)
        .map_err(|e| anyhow::anyhow!("Failed to load scene: {}", e))?;
    let instance = scene
        .instantiate_with(scene.filters.unwrap_or(config.default_filters()))
        .map_err(|e| anyhow::anyhow!("Failed to instantiate scene: {}", e))?;

    let target = instance.view(&view)?;
    for (key, value) in assignments {
        target.state().set(key, value);
    }

    let value = instance
        .render(&view, &template)
        .map_err(|e| anyhow::anyhow!("Interpolation failed: {}", e))?;

    println!("{}", format_value(&value, config.pretty_json));
    Ok(())
}

/// Bind every template of a scene, then play its updates
pub fn watch_scene(scene_path: PathBuf, config: &Config) -> Result<()> {
    info!("Watching scene: {}", scene_path.display());

    let scene = Scene::from_file(&scene_path)
        .map_err(|e| anyhow::anyhow!("Failed to load scene: {}", e))?;
    let instance = scene
        .instantiate_with(scene.filters.unwrap_or(config.default_filters()))
        .map_err(|e| anyhow::anyhow!("Failed to instantiate scene: {}", e))?;

    for binding in &scene.bindings {
        let view = binding.view.clone();
        let template = binding.template.clone();
        let pretty = config.pretty_json;

        instance
            .bind(binding, move |value| {
                println!("[{}] {} => {}", view, template, format_value(value, pretty));
            })
            .map_err(|e| {
                anyhow::anyhow!(
                    "Failed to bind '{}' on view '{}': {}",
                    binding.template,
                    binding.view,
                    e
                )
            })?;
    }

    for update in &scene.updates {
        match update {
            Update::Set { view, key, value } => {
                println!("-- set {}.{} = {}", view, key, value);
            }
            Update::Destroy { view } => println!("-- destroy {}", view),
        }
        instance.apply(update)?;
    }

    println!(
        "Scene '{}': {} binding(s), {} update(s)",
        scene.name,
        scene.bindings.len(),
        scene.updates.len()
    );
    info!("Watch completed");

    Ok(())
}

/// Validate a scene file
pub fn validate_scene(scene_path: PathBuf, strict: bool, config: &Config) -> Result<()> {
    info!("Validating scene: {}", scene_path.display());

    let scene = Scene::from_file(&scene_path)
        .map_err(|e| anyhow::anyhow!("Scene validation failed: {}", e))?;

    let report = SceneValidator::new()
        .with_strict_mode(strict)
        .with_filters(scene.filters.unwrap_or(config.default_filters()))
        .validate(&scene)
        .map_err(|e| anyhow::anyhow!("Scene validation failed: {}", e))?;

    for error in &report.errors {
        println!("✗ {}", error);
    }
    for warning in &report.warnings {
        println!("! {}", warning);
    }

    if !report.is_valid {
        return Err(anyhow::anyhow!(
            "Scene '{}' is invalid: {} error(s), {} warning(s)",
            scene.name,
            report.errors.len(),
            report.warnings.len()
        ));
    }

    println!("✓ Scene '{}' is valid", scene.name);
    println!("  Views: {}", scene.views.len());
    println!("  Bindings: {}", scene.bindings.len());
    println!("  Updates: {}", scene.updates.len());

    info!("Scene validation completed successfully");
    Ok(())
}

/// Write a starter scene file
pub fn init_scene(name: String, output_dir: PathBuf, _config: &Config) -> Result<()> {
    info!("Initializing scene '{}' in {}", name, output_dir.display());

    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)?;
    }

    let scene_file = output_dir.join(format!("{}.yaml", name));
    if scene_file.exists() {
        return Err(anyhow::anyhow!(
            "Scene file already exists: {}",
            scene_file.display()
        ));
    }

    std::fs::write(&scene_file, generate_scene_template(&name))?;
    println!("Created scene file: {}", scene_file.display());

    Ok(())
}

/// Strings print raw, everything else as JSON
fn format_value(value: &Value, pretty: bool) -> String {
    match value {
        Value::String(_) => coerce_to_text(value),
        _ if pretty => format!("{:#}", value),
        _ => value.to_string(),
    }
}

fn generate_scene_template(name: &str) -> String {
    format!(
        r#"name: {}
description: A starter scene with an owner chain

filters: builtin

views:
  app:
    state:
      title: Hello
  child:
    owner: app
    state:
      name: Fred
    props:
      model: foo

bindings:
  - view: child
    template: "{{{{ title }}}}, {{{{ name | upper }}}}"

updates:
  - action: set
    view: app
    key: title
    value: Goodbye
  - action: destroy
    view: child
"#,
        name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("plain"), false), "plain");
        assert_eq!(format_value(&json!([1, 2]), false), "[1,2]");
        assert_eq!(format_value(&json!({"a": 1}), true), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_generated_scene_is_valid() {
        let scene = Scene::from_yaml(&generate_scene_template("starter")).unwrap();
        let report = SceneValidator::new().validate(&scene).unwrap();
        assert!(report.is_valid, "{:?}", report);
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp_dir = tempdir().unwrap();
        let config = Config::default();

        init_scene("demo".to_string(), temp_dir.path().to_path_buf(), &config).unwrap();
        assert!(temp_dir.path().join("demo.yaml").exists());
        assert!(init_scene("demo".to_string(), temp_dir.path().to_path_buf(), &config).is_err());
    }
}
