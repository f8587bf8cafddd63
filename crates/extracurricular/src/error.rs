use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::enrollment::EnrollmentError;
use crate::registry::RegistryError;
use crate::store::StoreError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Store(StoreError),
    Enrollment(EnrollmentError),
    Lookup(RegistryError),
    Auth(AuthError),
    /// The credential table is empty after load; nobody can log in.
    NoCredentials,
    Forbidden { action: &'static str },
    Report(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Store(err) => write!(f, "save error: {}", err),
            AppError::Enrollment(err) => write!(f, "{}", err),
            AppError::Lookup(err) => write!(f, "{}", err),
            AppError::Auth(err) => write!(f, "login failed: {}", err),
            AppError::NoCredentials => {
                write!(f, "user data could not be loaded; application cannot start")
            }
            AppError::Forbidden { action } => {
                write!(f, "your role is not permitted to {}", action)
            }
            AppError::Report(err) => write!(f, "output error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Enrollment(err) => Some(err),
            AppError::Lookup(err) => Some(err),
            AppError::Auth(err) => Some(err),
            AppError::Report(err) => Some(&**err),
            AppError::NoCredentials | AppError::Forbidden { .. } => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<EnrollmentError> for AppError {
    fn from(value: EnrollmentError) -> Self {
        Self::Enrollment(value)
    }
}

impl From<RegistryError> for AppError {
    fn from(value: RegistryError) -> Self {
        Self::Lookup(value)
    }
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Report(Box::new(value))
    }
}
