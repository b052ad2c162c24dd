// ABOUTME: Integration tests for the CLI application
// ABOUTME: Tests command-line interface functionality end to end against scene files

use std::process::{Command, Output};

mod common;
use common::{family_scene, TestEnvironment, TestSceneBuilder};

fn run_cli(env: &TestEnvironment, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_view-interpolate"))
        .args(args)
        .current_dir(env.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_cli_help_command() {
    let env = TestEnvironment::new();
    let output = run_cli(&env, &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("view-interpolate"));
    assert!(stdout.contains("render"));
    assert!(stdout.contains("watch"));
}

#[test]
fn test_cli_version_command() {
    let env = TestEnvironment::new();
    let output = run_cli(&env, &["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_render() {
    let env = TestEnvironment::new();
    let scene = env.create_scene_file("family", &family_scene());

    let output = run_cli(
        &env,
        &[
            "render",
            scene.to_str().unwrap(),
            "--view",
            "child",
            "--template",
            "{{ name | upper }} of {{grandstate}}",
        ],
    );

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "FRED of one");
}

#[test]
fn test_cli_render_with_override() {
    let env = TestEnvironment::new();
    let scene = env.create_scene_file("family", &family_scene());

    let output = run_cli(
        &env,
        &[
            "render",
            scene.to_str().unwrap(),
            "--view",
            "parent",
            "--template",
            "{{names}}",
            "--set",
            r#"names=["Fred","Barney"]"#,
        ],
    );

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        r#"["Fred","Barney"]"#
    );
}

#[test]
fn test_cli_render_property_fails() {
    let env = TestEnvironment::new();
    let scene = env.create_scene_file("family", &family_scene());

    let output = run_cli(
        &env,
        &[
            "render",
            scene.to_str().unwrap(),
            "--view",
            "child",
            "--template",
            "{{model}}",
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("model"));
}

#[test]
fn test_cli_watch() {
    let env = TestEnvironment::new();
    let builder = family_scene()
        .add_binding("child", "{{grandstate}}")
        .add_set("grandparent", "grandstate", "foo")
        .add_destroy("child")
        .add_set("grandparent", "grandstate", "bar");
    let scene = env.create_scene_file("watch", &builder);

    let output = run_cli(&env, &["watch", scene.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[child] {{grandstate}} => one"));
    assert!(stdout.contains("[child] {{grandstate}} => foo"));
    assert!(!stdout.contains("=> bar"));
    assert!(stdout.contains("-- destroy child"));
}

#[test]
fn test_cli_validate() {
    let env = TestEnvironment::new();
    let scene = env.create_scene_file("valid", &family_scene().add_binding("child", "{{name}}"));

    let output = run_cli(&env, &["validate", scene.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Scene 'family' is valid"));
}

#[test]
fn test_cli_validate_rejects_cycle() {
    let env = TestEnvironment::new();
    let builder = TestSceneBuilder::new("cycle")
        .add_view("a", Some("b"))
        .add_view("b", Some("a"));
    let scene = env.create_scene_file("cycle", &builder);

    let output = run_cli(&env, &["validate", scene.to_str().unwrap()]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✗"));
}

#[test]
fn test_cli_validate_strict() {
    let env = TestEnvironment::new();
    let builder = family_scene().add_binding("child", "no placeholders here");
    let scene = env.create_scene_file("strict", &builder);

    let lenient = run_cli(&env, &["validate", scene.to_str().unwrap()]);
    assert!(lenient.status.success());

    let strict = run_cli(&env, &["validate", scene.to_str().unwrap(), "--strict"]);
    assert!(!strict.status.success());
}

#[test]
fn test_cli_init_writes_valid_scene() {
    let env = TestEnvironment::new();
    let output_dir = env.path().to_str().unwrap().to_string();

    let output = run_cli(&env, &["init", "starter", "--output-dir", &output_dir]);
    assert!(output.status.success());

    let created = env.scene_file("starter");
    assert!(created.exists());

    let validate = run_cli(&env, &["validate", created.to_str().unwrap()]);
    assert!(validate.status.success());
}
