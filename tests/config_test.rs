//! Integration tests for Settings loading with layered precedence.
//!
//! These tests run without a global config (temp directories only), so they
//! exercise the explicit `--config` layer on top of compiled defaults.

use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

use orgtree::application::ApplicationError;
use orgtree::config::Settings;
use orgtree::domain::HIT_RADIUS;

/// Tests in this binary share the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn load(explicit: Option<&Path>) -> Result<Settings, ApplicationError> {
    let _guard = env_lock();
    Settings::load(explicit)
}

// ============================================================
// Settings::load() with an explicit file
// ============================================================

#[test]
fn given_explicit_config_when_load_then_overrides_defaults() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("orgtree.toml");
    fs::write(
        &config_path,
        r#"
hit_radius = 35.5
default_document = "/srv/org/plan.json"
"#,
    )
    .unwrap();

    // Act
    let settings = load(Some(&config_path)).expect("load settings");

    // Assert
    assert_eq!(settings.hit_radius, 35.5);
    assert_eq!(
        settings.default_document.as_deref(),
        Some(std::path::Path::new("/srv/org/plan.json"))
    );
}

#[test]
fn given_partial_config_when_load_then_unspecified_fields_keep_defaults() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("orgtree.toml");
    fs::write(&config_path, "default_document = \"/tmp/x.json\"\n").unwrap();

    let settings = load(Some(&config_path)).unwrap();

    assert_eq!(settings.hit_radius, HIT_RADIUS);
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();

    let result = load(Some(&temp.path().join("nope.toml")));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("orgtree.toml");
    fs::write(&config_path, "hit_radius = [not a number").unwrap();

    let result = load(Some(&config_path));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_negative_radius_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("orgtree.toml");
    fs::write(&config_path, "hit_radius = -1.0\n").unwrap();

    let result = load(Some(&config_path));

    match result {
        Err(ApplicationError::Config { message }) => {
            assert!(message.contains("hit_radius"), "{message}")
        }
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn given_env_var_when_load_then_env_wins_over_file() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("orgtree.toml");
    fs::write(&config_path, "opener = \"from-file\"\n").unwrap();

    let result = {
        let _guard = env_lock();
        std::env::set_var("ORGTREE_OPENER", "from-env");
        let result = Settings::load(Some(&config_path));
        std::env::remove_var("ORGTREE_OPENER");
        result
    };

    assert_eq!(result.unwrap().opener, "from-env");
}

#[test]
fn given_unparsable_env_radius_when_load_then_config_error() {
    let result = {
        let _guard = env_lock();
        std::env::set_var("ORGTREE_HIT_RADIUS", "abc");
        let result = Settings::load(None);
        std::env::remove_var("ORGTREE_HIT_RADIUS");
        result
    };

    assert!(
        matches!(result, Err(ApplicationError::Config { .. })),
        "expected Config error, got {result:?}"
    );
}

#[test]
fn given_numeric_env_radius_when_load_then_used() {
    let result = {
        let _guard = env_lock();
        std::env::set_var("ORGTREE_HIT_RADIUS", "42.5");
        let result = Settings::load(None);
        std::env::remove_var("ORGTREE_HIT_RADIUS");
        result
    };

    assert_eq!(result.unwrap().hit_radius, 42.5);
}

// ============================================================
// Display helpers
// ============================================================

#[test]
fn given_template_when_parsed_then_valid_toml_with_no_active_settings() {
    let template = Settings::template();

    let parsed: toml::Table = toml::from_str(&template).unwrap();

    assert!(parsed.is_empty(), "template keys should be commented out");
    assert!(template.contains("hit_radius"));
}
