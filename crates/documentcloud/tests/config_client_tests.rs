//! Configuration and client construction tests.
//!
//! Tests actual behavior, not constants.

use documentcloud::client::DocumentCloud;
use documentcloud::config::Config;

// =============================================================================
// Config Behavior Tests
// =============================================================================

#[test]
fn test_config_default_is_anonymous() {
    let config = Config::default();
    assert!(!config.has_credentials());
}

#[test]
fn test_config_with_credentials() {
    let config = Config::new(Some("carolyn".to_string()), Some("hunter2".to_string()));
    assert!(config.has_credentials());
    assert_eq!(config.username.as_deref(), Some("carolyn"));
}

#[test]
fn test_config_clone_preserves_credentials() {
    let config = Config::new(Some("carolyn".to_string()), Some("hunter2".to_string()));
    let cloned = config.clone();
    assert_eq!(config.password, cloned.password);
}

// =============================================================================
// Client Behavior Tests
// =============================================================================

#[test]
fn test_client_creation_succeeds() {
    let client = DocumentCloud::new(Config::default());
    assert!(client.is_ok());
}

#[test]
fn test_client_reports_credential_status() {
    let client =
        DocumentCloud::new(Config::new(Some("u".to_string()), Some("p".to_string()))).unwrap();
    assert!(client.has_credentials());

    let anonymous = DocumentCloud::new(Config::default()).unwrap();
    assert!(!anonymous.has_credentials());
}

#[test]
fn test_client_debug_hides_password() {
    let client = DocumentCloud::new(Config::new(
        Some("carolyn".to_string()),
        Some("super-secret-password".to_string()),
    ))
    .unwrap();
    let debug = format!("{client:?}");
    // The password must NOT appear in debug output.
    assert!(!debug.contains("super-secret-password"));
    assert!(debug.contains("has_credentials"));
}

#[test]
fn test_client_is_cloneable() {
    let client = DocumentCloud::new(Config::default()).unwrap();
    let _cloned = client.clone();
    let _documents = client.documents();
    let _projects = client.projects();
}
