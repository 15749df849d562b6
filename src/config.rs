use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::qa::outlier_detector::REPORT_OUTLIER_THRESHOLD;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub station_list_dir: PathBuf,
    pub worker_concurrency: usize,
    pub outlier_threshold: f64,
    /// Overrides the policy's own lost-rate breach threshold when set.
    pub breach_threshold: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_dir: PathBuf::from("./data"),
            output_dir: PathBuf::from("."),
            station_list_dir: PathBuf::from("./data"),
            worker_concurrency: 4,
            outlier_threshold: REPORT_OUTLIER_THRESHOLD,
            breach_threshold: None,
        }
    }
}

fn parse_var<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(None),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let worker_concurrency = parse_var::<usize>("QA_WORKER_CONCURRENCY")?
            .unwrap_or(defaults.worker_concurrency);
        if worker_concurrency == 0 {
            return Err(ConfigError::Invalid {
                var: "QA_WORKER_CONCURRENCY",
                value: "0".to_string(),
            });
        }

        Ok(Config {
            input_dir: env::var("QA_INPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_dir),
            output_dir: env::var("QA_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            station_list_dir: env::var("QA_STATION_LIST_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.station_list_dir),
            worker_concurrency,
            outlier_threshold: parse_var("QA_OUTLIER_THRESHOLD")?
                .unwrap_or(defaults.outlier_threshold),
            breach_threshold: parse_var("QA_BREACH_THRESHOLD")?,
        })
    }
}
