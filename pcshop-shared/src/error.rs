//! Common error type for catalog and back-office operations
//!
//! Model functions return `sqlx::Error` directly, the way a thin data layer
//! should. The catalog query layer and the back-office write paths add two
//! conditions of their own (a missing resource and a rejected field value)
//! and wrap everything in [`CatalogError`].

/// Result alias for catalog and back-office operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Error type for catalog queries and back-office writes
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Requested resource does not exist (or is not visible, e.g. unavailable)
    #[error("{0} not found")]
    NotFound(String),

    /// A field value was rejected before reaching the database
    #[error("Invalid value for {field}: {message}")]
    Validation {
        /// Field name as it appears in the request body
        field: String,

        /// Human-readable reason
        message: String,
    },

    /// Requested page does not exist
    #[error(transparent)]
    Page(#[from] crate::catalog::pagination::PageError),

    /// Password hashing failed while creating or updating a user
    #[error(transparent)]
    Password(#[from] crate::auth::password::PasswordError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CatalogError {
    /// Shorthand for a [`CatalogError::NotFound`] naming the resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        CatalogError::NotFound(resource.into())
    }

    /// Shorthand for a [`CatalogError::Validation`]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
