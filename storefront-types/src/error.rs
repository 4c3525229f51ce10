//! Error types for the storefront pricing service.

/// Domain-level errors (business rule violations).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Invalid rate for {code}: {reason}")]
    InvalidRate { code: String, reason: String },

    #[error("Line item {0} has no price")]
    MissingPrice(String),

    #[error("Invalid quantity {quantity}: must be between 1 and {max}")]
    InvalidQuantity { quantity: u32, max: u32 },

    #[error("Line item not found: {0}")]
    LineItemNotFound(String),

    #[error("Amount overflow while computing {0}")]
    Overflow(&'static str),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Entity not found")]
    NotFound,
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UnsupportedCurrency(code) => AppError::UnsupportedCurrency(code),
            DomainError::ValidationError(msg) => AppError::BadRequest(msg),
            DomainError::LineItemNotFound(id) => {
                AppError::NotFound(format!("Line item not found: {}", id))
            }
            e => AppError::BadRequest(e.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => e.into(),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::Serialization(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_currency_maps_through() {
        let err: AppError = RepoError::Domain(DomainError::UnsupportedCurrency("JPY".into())).into();
        assert!(matches!(err, AppError::UnsupportedCurrency(code) if code == "JPY"));
    }

    #[test]
    fn test_database_error_is_internal() {
        let err: AppError = RepoError::Database("disk I/O error".into()).into();
        assert!(matches!(err, AppError::Internal(msg) if msg == "disk I/O error"));
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let err: AppError = DomainError::ValidationError("Rates must be a non-null object".into()).into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
