//! Typed error handling for the user directory
//!
//! Trait seams ([`UserStore`](crate::core::UserStore), the mutation adapter, the
//! controller) return `anyhow::Result`, and the errors they raise are values of
//! [`DirectoryError`] so callers can downcast and match specific cases.
//!
//! # Error Categories
//!
//! - [`RecordError`]: a record the caller asked for does not exist or is malformed
//! - [`StoreError`]: the backing store could not be reached or rejected a request
//! - [`ConfigError`]: configuration parsing and validation
//! - [`ValidationError`]: form input and control input validation
//!
//! # Example
//!
//! ```rust,ignore
//! match controller.update(&id, form).await {
//!     Ok(record) => println!("Saved {}", record.id),
//!     Err(err) => match err.downcast_ref::<DirectoryError>() {
//!         Some(DirectoryError::Record(RecordError::NotFound { id })) => {
//!             println!("{} disappeared before the update", id);
//!         }
//!         _ => eprintln!("Other error: {}", err),
//!     },
//! }
//! ```

use crate::core::record::RecordId;
use serde::Serialize;
use std::fmt;

/// The main error type for the user directory
#[derive(Debug)]
pub enum DirectoryError {
    /// Record-level errors (lookups by identifier, decoding)
    Record(RecordError),

    /// Backing store errors (transport, unexpected status)
    Store(StoreError),

    /// Configuration errors
    Config(ConfigError),

    /// Validation errors
    Validation(ValidationError),
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::Record(e) => write!(f, "{}", e),
            DirectoryError::Store(e) => write!(f, "{}", e),
            DirectoryError::Config(e) => write!(f, "{}", e),
            DirectoryError::Validation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectoryError::Record(e) => Some(e),
            DirectoryError::Store(e) => Some(e),
            DirectoryError::Config(e) => Some(e),
            DirectoryError::Validation(e) => Some(e),
        }
    }
}

impl DirectoryError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DirectoryError::Record(e) => e.error_code(),
            DirectoryError::Store(e) => e.error_code(),
            DirectoryError::Config(_) => "CONFIG_ERROR",
            DirectoryError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// Whether the error came from talking to the backing store
    pub fn is_transport(&self) -> bool {
        matches!(self, DirectoryError::Store(_))
    }
}

// =============================================================================
// Record Errors
// =============================================================================

/// Errors related to individual records
#[derive(Debug)]
pub enum RecordError {
    /// No record with this identifier exists in the store
    NotFound { id: RecordId },

    /// The store returned a payload that is not a record
    Malformed { message: String },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::NotFound { id } => write!(f, "user with id '{}' not found", id),
            RecordError::Malformed { message } => write!(f, "Malformed user record: {}", message),
        }
    }
}

impl std::error::Error for RecordError {}

impl RecordError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RecordError::NotFound { .. } => "RECORD_NOT_FOUND",
            RecordError::Malformed { .. } => "RECORD_MALFORMED",
        }
    }
}

impl From<RecordError> for DirectoryError {
    fn from(err: RecordError) -> Self {
        DirectoryError::Record(err)
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors related to the backing store
#[derive(Debug)]
pub enum StoreError {
    /// The request never produced a response
    ConnectionError { backend: String, message: String },

    /// The store answered with a non-success status
    UnexpectedStatus {
        operation: String,
        status: u16,
        message: String,
    },

    /// The response body could not be decoded
    DecodeError { operation: String, message: String },

    /// In-process state could not be accessed
    Unavailable { backend: String, message: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StoreError::UnexpectedStatus {
                operation,
                status,
                message,
            } => {
                write!(f, "{} failed with status {}: {}", operation, status, message)
            }
            StoreError::DecodeError { operation, message } => {
                write!(f, "Failed to decode {} response: {}", operation, message)
            }
            StoreError::Unavailable { backend, message } => {
                write!(f, "Store '{}' is unavailable: {}", backend, message)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::ConnectionError { .. } => "STORE_CONNECTION_ERROR",
            StoreError::UnexpectedStatus { .. } => "STORE_UNEXPECTED_STATUS",
            StoreError::DecodeError { .. } => "STORE_DECODE_ERROR",
            StoreError::Unavailable { .. } => "STORE_UNAVAILABLE",
        }
    }
}

impl From<StoreError> for DirectoryError {
    fn from(err: StoreError) -> Self {
        DirectoryError::Store(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for DirectoryError {
    fn from(err: ConfigError) -> Self {
        DirectoryError::Config(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Form record is missing contract keys
    MissingFields { fields: Vec<String> },

    /// Search or sort control named a field outside the fixed inventory
    UnknownField { field: String },

    /// Page index outside its valid range
    InvalidPage { page: usize, message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::MissingFields { fields } => {
                write!(f, "Missing form fields: {}", fields.join(", "))
            }
            ValidationError::UnknownField { field } => {
                write!(f, "Unknown field: {}", field)
            }
            ValidationError::InvalidPage { page, message } => {
                write!(f, "Invalid page {}: {}", page, message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for DirectoryError {
    fn from(err: ValidationError) -> Self {
        DirectoryError::Validation(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<std::io::Error> for DirectoryError {
    fn from(err: std::io::Error) -> Self {
        DirectoryError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for DirectoryError {
    fn from(err: serde_yaml::Error) -> Self {
        DirectoryError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        DirectoryError::Record(RecordError::Malformed {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_display() {
        let err = RecordError::NotFound {
            id: RecordId::from("x9"),
        };
        assert!(err.to_string().contains("x9"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_directory_error_conversion() {
        let err: DirectoryError = RecordError::NotFound {
            id: RecordId::from("x9"),
        }
        .into();
        assert_eq!(err.error_code(), "RECORD_NOT_FOUND");
        assert!(!err.is_transport());
    }

    #[test]
    fn test_store_error_is_transport() {
        let err: DirectoryError = StoreError::UnexpectedStatus {
            operation: "list".to_string(),
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(err.is_transport());
        assert_eq!(err.error_code(), "STORE_UNEXPECTED_STATUS");
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_validation_error_multiple_fields() {
        let err = ValidationError::FieldErrors(vec![
            FieldValidationError::new("firstName", "required"),
            FieldValidationError::new("email", "invalid format"),
        ]);
        let display = err.to_string();
        assert!(display.contains("firstName"));
        assert!(display.contains("email"));
    }

    #[test]
    fn test_missing_fields_lists_every_key() {
        let err = ValidationError::MissingFields {
            fields: vec!["city".to_string(), "street".to_string()],
        };
        assert_eq!(err.to_string(), "Missing form fields: city, street");
    }

    #[test]
    fn test_invalid_page_display() {
        let err: DirectoryError = ValidationError::InvalidPage {
            page: 0,
            message: "pages start at 1".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.to_string(), "Invalid page 0: pages start at 1");
    }

    #[test]
    fn test_yaml_error_becomes_config_error() {
        let yaml_err = serde_yaml::from_str::<u32>("not: [a number").unwrap_err();
        let err: DirectoryError = yaml_err.into();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_anyhow_downcast_roundtrip() {
        let err = anyhow::Error::new(DirectoryError::from(RecordError::NotFound {
            id: RecordId::from("a1"),
        }));
        let typed = err.downcast_ref::<DirectoryError>();
        assert!(matches!(
            typed,
            Some(DirectoryError::Record(RecordError::NotFound { .. }))
        ));
    }
}
