//! # Application Error Type
//!
//! Every command returns `Result<_, AppError>`. Library errors are mapped
//! into a machine-readable code plus a message for the terminal.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError / CoreError ──┐                                        │
//! │  StoreError ───────────────────┼──► AppError { code, message }          │
//! │  RenderError ──────────────────┤        │                               │
//! │  ConfigError ──────────────────┘        ▼                               │
//! │                               stderr: "[NOT_FOUND] profile not found"   │
//! │                               exit code by ErrorCode                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use invoicer_core::{CoreError, ValidationError};
use invoicer_render::RenderError;
use invoicer_store::StoreError;

use crate::config::ConfigError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before any state changed
    ValidationError,

    /// Profile or history record does not exist
    NotFound,

    /// A file could not be read or written
    PersistenceError,

    /// Document could not be produced
    RenderError,

    /// Key rejected, or no usable license
    LicenseError,

    /// invoicer.toml unreadable or invalid
    ConfigError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::PersistenceError => "PERSISTENCE_ERROR",
            ErrorCode::RenderError => "RENDER_ERROR",
            ErrorCode::LicenseError => "LICENSE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Process exit status for this code.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::PersistenceError => 4,
            ErrorCode::RenderError => 5,
            ErrorCode::LicenseError => 6,
            ErrorCode::ConfigError => 7,
        }
    }
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn license(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::LicenseError, message)
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::PersistenceError, message)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProfileNotFound(id) => AppError::not_found("Profile", &id),
            CoreError::ItemNotFound(description) => AppError::not_found("Item", &description),
            CoreError::InvalidLicenseKey { account_type } => {
                AppError::license(format!("Invalid {} license key", account_type))
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            StoreError::Validation(e) => e.into(),
            StoreError::Domain(e) => e.into(),
            e @ (StoreError::Io { .. } | StoreError::Json { .. }) => {
                tracing::error!(error = %e, "Persistence failed");
                AppError::persistence(e.to_string())
            }
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        tracing::error!(error = %err, "Rendering failed");
        AppError::new(ErrorCode::RenderError, err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;
