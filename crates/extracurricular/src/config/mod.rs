use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::store::{JsonFileStore, DEFAULT_BULK_STUDENTS};

/// Upper bound for generated seed students.
const MAX_SEED_STUDENTS: usize = 500;

/// Distinguishes runtime behavior for different stages of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("CLUB_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_file = env::var("CLUB_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data.json"));

        let seed_students = match env::var("CLUB_SEED_STUDENTS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|count| *count <= MAX_SEED_STUDENTS)
                .ok_or(ConfigError::InvalidSeedCount { value: raw })?,
            Err(_) => DEFAULT_BULK_STUDENTS,
        };

        let log_level = env::var("CLUB_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            storage: StorageConfig {
                data_file,
                seed_students,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where the dataset lives and how to seed it when absent.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_file: PathBuf,
    pub seed_students: usize,
}

impl StorageConfig {
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.data_file).with_seed_students(self.seed_students)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSeedCount { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSeedCount { value } => write!(
                f,
                "CLUB_SEED_STUDENTS must be a whole number up to {MAX_SEED_STUDENTS}, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
