use async_trait::async_trait;

use super::entities::Invoice;
use super::errors::InvoiceError;
use super::value_objects::InvoiceNumber;

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError>;
  async fn find_by_number(
    &self,
    number: &InvoiceNumber,
  ) -> Result<Option<Invoice>, InvoiceError>;
  async fn count(&self) -> Result<i64, InvoiceError>;
  async fn find_all(&self) -> Result<Vec<Invoice>, InvoiceError>;
}

/// Atomic source of invoice sequence numbers.
///
/// Implementations must execute the counter upsert-and-increment and the
/// verification read of the invoice table as one atomic unit. A successful
/// call durably advances the counter even though the invoice record is
/// written later by the caller (identifier reservation); a failed call must
/// leave the counter untouched.
#[async_trait]
pub trait InvoiceNumberStore: Send + Sync {
  /// Increment the singleton counter (creating it at 1 when absent), derive
  /// the identifier, and verify no invoice with that identifier exists.
  ///
  /// Fails with [`InvoiceError::Collision`] when the derived identifier is
  /// already taken, rolling back the increment, and with
  /// [`InvoiceError::Transaction`] on persistence failures.
  async fn reserve_next(&self) -> Result<InvoiceNumber, InvoiceError>;
}

/// Rendering collaborator producing the invoice artifact.
///
/// The workflow only hands over the identifier and totals; layout and output
/// format belong to the implementation. Returns the path of the artifact.
#[async_trait]
pub trait InvoiceRenderer: Send + Sync {
  async fn render_invoice(&self, invoice: &Invoice) -> Result<String, InvoiceError>;
}
