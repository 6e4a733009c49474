use super::value_objects::ValueObjectError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Invalid request: {0}")]
  InvalidRequest(String),

  #[error("Line items cannot be empty")]
  EmptyLineItems,

  #[error("Invoice number '{0}' already exists")]
  Collision(String),

  #[error("Invoice number transaction failed: {0}")]
  Transaction(String),

  #[error("Invoice not found: {0}")]
  InvoiceNotFound(String),

  #[error("Rendering failed: {0}")]
  Rendering(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl InvoiceError {
  /// Caller-input defects are never retried; everything else may be.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      InvoiceError::Validation(_) | InvoiceError::InvalidRequest(_) | InvoiceError::EmptyLineItems
    )
  }
}
