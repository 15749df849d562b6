// Environment-driven configuration

use serial_test::serial;
use station_qa_rates::config::{Config, ConfigError};
use std::env;
use std::path::PathBuf;

const VARS: [&str; 6] = [
    "QA_INPUT_DIR",
    "QA_OUTPUT_DIR",
    "QA_STATION_LIST_DIR",
    "QA_WORKER_CONCURRENCY",
    "QA_OUTLIER_THRESHOLD",
    "QA_BREACH_THRESHOLD",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_env() {
    clear_env();
    let config = Config::from_env().unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.worker_concurrency, 4);
    assert_eq!(config.outlier_threshold, 5.0);
    assert_eq!(config.breach_threshold, None);
}

#[test]
#[serial]
fn test_env_overrides() {
    clear_env();
    env::set_var("QA_INPUT_DIR", "/srv/qa/in");
    env::set_var("QA_OUTPUT_DIR", "/srv/qa/out");
    env::set_var("QA_WORKER_CONCURRENCY", "12");
    env::set_var("QA_OUTLIER_THRESHOLD", "3.5");
    env::set_var("QA_BREACH_THRESHOLD", "1.0");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.input_dir, PathBuf::from("/srv/qa/in"));
    assert_eq!(config.output_dir, PathBuf::from("/srv/qa/out"));
    assert_eq!(config.station_list_dir, PathBuf::from("./data"));
    assert_eq!(config.worker_concurrency, 12);
    assert_eq!(config.outlier_threshold, 3.5);
    assert_eq!(config.breach_threshold, Some(1.0));
}

#[test]
#[serial]
fn test_invalid_number_is_rejected() {
    clear_env();
    env::set_var("QA_OUTLIER_THRESHOLD", "five");
    let result = Config::from_env();
    clear_env();

    match result {
        Err(ConfigError::Invalid { var, value }) => {
            assert_eq!(var, "QA_OUTLIER_THRESHOLD");
            assert_eq!(value, "five");
        }
        other => panic!("Expected invalid config, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_zero_concurrency_is_rejected() {
    clear_env();
    env::set_var("QA_WORKER_CONCURRENCY", "0");
    let result = Config::from_env();
    clear_env();
    assert!(matches!(result, Err(ConfigError::Invalid { var: "QA_WORKER_CONCURRENCY", .. })));
}
