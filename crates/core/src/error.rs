use crate::checkout::CartError;
use crate::page_tree::TreeError;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Lookups by a public key such as a slug, access code or QR token.
    #[error("Entity not found: {entity} '{key}'")]
    NotFoundByKey { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TreeError> for CoreError {
    fn from(err: TreeError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Sold-out and exhausted promo codes are conflicts with current stock;
/// everything else is a bad request.
impl From<CartError> for CoreError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::QuotaExceeded { .. } | CartError::PromoExhausted(_) => {
                CoreError::Conflict(err.to_string())
            }
            _ => CoreError::Validation(err.to_string()),
        }
    }
}
