use crate::schema::ValidationErrors;
use thiserror::Error;

/// Errors surfaced by catalog operations
#[derive(Error, Debug)]
pub enum CatalogError {
    /// One or more recipe invariants were violated
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A structured field (JSON array) could not be decoded
    #[error("{field}: {message}")]
    MalformedField { field: String, message: String },

    /// No recipe with this id, or the id is not a recipe id at all
    #[error("Recipe not found")]
    NotFound,

    /// SQLite failure
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    pub fn malformed(field: &str) -> Self {
        CatalogError::MalformedField {
            field: field.to_string(),
            message: format!("Invalid {} format", field),
        }
    }

    /// Field-keyed details for client-facing errors, if the error has any
    pub fn details(&self) -> Option<ValidationErrors> {
        match self {
            CatalogError::Validation(errors) => Some(errors.clone()),
            CatalogError::MalformedField { field, message } => {
                Some(ValidationErrors::single(field, message.clone()))
            }
            _ => None,
        }
    }

    /// True for failures caused by the caller rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CatalogError::Validation(_) | CatalogError::MalformedField { .. } | CatalogError::NotFound
        )
    }
}

impl From<ValidationErrors> for CatalogError {
    fn from(errors: ValidationErrors) -> Self {
        CatalogError::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
