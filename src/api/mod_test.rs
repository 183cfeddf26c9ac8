use super::Config;
use serial_test::serial;
use std::env;
use std::net::{IpAddr, Ipv4Addr};

#[test]
fn test_config_default_binds_all_interfaces_on_8080() {
    let config = Config::default();
    assert_eq!(config.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    assert_eq!(config.port, 8080);
    assert_eq!(config.addr().to_string(), "0.0.0.0:8080");
}

#[test]
#[serial]
fn test_config_new_respects_env_vars() {
    unsafe {
        env::set_var("PROJECT_API_HOST", "127.0.0.1");
        env::set_var("PROJECT_API_PORT", "9090");
    }

    let config = Config::new();
    assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(config.port, 9090);

    // Cleanup
    unsafe {
        env::remove_var("PROJECT_API_HOST");
        env::remove_var("PROJECT_API_PORT");
    }
}

#[test]
#[serial]
fn test_config_new_ignores_invalid_port() {
    unsafe {
        env::set_var("PROJECT_API_PORT", "not-a-port");
    }

    let config = Config::new();
    assert_eq!(config.port, 8080);

    // Cleanup
    unsafe {
        env::remove_var("PROJECT_API_PORT");
    }
}

#[test]
#[serial]
fn test_config_precedence_cli_over_env() {
    // Precedence: CLI flag > env var > default
    unsafe {
        env::set_var("PROJECT_API_PORT", "9191");
    }

    let config = Config::new().with_port(7070);
    assert_eq!(config.port, 7070, "CLI flag should override env var");

    // Cleanup
    unsafe {
        env::remove_var("PROJECT_API_PORT");
    }
}
