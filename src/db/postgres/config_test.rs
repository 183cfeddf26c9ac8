//! Tests for PostgreSQL configuration loading.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use serial_test::serial;

use super::{ConfigError, PgConfig};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn empty_environment_uses_defaults() {
    let config = PgConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, PgConfig::default());
    assert_eq!(config.port, 5432);
    assert_eq!(config.host, "localhost");
}

#[test]
fn reads_all_connection_variables() {
    let config = PgConfig::from_lookup(lookup(&[
        ("POSTGRES_HOST", "db.internal"),
        ("POSTGRES_PORT", "6543"),
        ("POSTGRES_USER", "api"),
        ("POSTGRES_PASSWORD", "s3cret"),
        ("POSTGRES_DB", "projects"),
        ("POSTGRES_MAX_CONNECTIONS", "4"),
        ("POSTGRES_ACQUIRE_TIMEOUT_SECS", "2"),
    ]))
    .unwrap();

    assert_eq!(config.host, "db.internal");
    assert_eq!(config.port, 6543);
    assert_eq!(config.user, "api");
    assert_eq!(config.password, "s3cret");
    assert_eq!(config.database, "projects");
    assert_eq!(config.max_connections, 4);
    assert_eq!(config.acquire_timeout, Duration::from_secs(2));
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let config = PgConfig::from_lookup(lookup(&[("POSTGRES_HOST", "  "), ("POSTGRES_PORT", "")]))
        .unwrap();
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 5432);
}

#[test]
fn non_numeric_port_is_rejected() {
    let err = PgConfig::from_lookup(lookup(&[("POSTGRES_PORT", "fifty")])).unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidNumber {
            key: "POSTGRES_PORT".to_string(),
            value: "fifty".to_string(),
        }
    );
}

#[test]
fn debug_output_redacts_password() {
    let config = PgConfig {
        password: "hunter2".to_string(),
        ..PgConfig::default()
    };
    let debug = format!("{:?}", config);
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("***"));
}

#[test]
#[serial]
fn from_env_reads_process_environment() {
    unsafe {
        env::set_var("POSTGRES_HOST", "env-host");
        env::set_var("POSTGRES_PORT", "15432");
    }

    let config = PgConfig::from_env().unwrap();
    assert_eq!(config.host, "env-host");
    assert_eq!(config.port, 15432);

    // Cleanup
    unsafe {
        env::remove_var("POSTGRES_HOST");
        env::remove_var("POSTGRES_PORT");
    }
}
