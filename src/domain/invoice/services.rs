use std::sync::Arc;

use super::entities::{Invoice, InvoiceTotals, LineItem};
use super::errors::InvoiceError;
use super::ports::{InvoiceNumberStore, InvoiceRenderer, InvoiceRepository};
use super::value_objects::{ClientName, InvoiceNumber};

/// Invoice creation data
pub struct InvoiceDraft {
  pub client_name: ClientName,
  pub client_email: String,
  pub admin_signature: String,
  pub line_items: Vec<LineItem>,
}

/// Produces the next unique invoice identifier.
///
/// The primary path is the store's atomic reserve; when it fails for any
/// reason, including a collision abort, a single count-based fallback attempt
/// is made. The fallback is not atomic under contention and is best-effort;
/// a collision on the fallback path is fatal for the request.
pub struct InvoiceNumberAllocator {
  number_store: Arc<dyn InvoiceNumberStore>,
  invoice_repo: Arc<dyn InvoiceRepository>,
}

impl InvoiceNumberAllocator {
  pub fn new(
    number_store: Arc<dyn InvoiceNumberStore>,
    invoice_repo: Arc<dyn InvoiceRepository>,
  ) -> Self {
    Self {
      number_store,
      invoice_repo,
    }
  }

  pub async fn allocate(&self) -> Result<InvoiceNumber, InvoiceError> {
    match self.number_store.reserve_next().await {
      Ok(number) => Ok(number),
      Err(primary_err) => {
        tracing::warn!(
          error = %primary_err,
          "primary invoice number allocation failed, trying count-based fallback"
        );

        let count = self.invoice_repo.count().await?;
        let candidate = InvoiceNumber::from_sequence(count + 1);

        if self.invoice_repo.find_by_number(&candidate).await?.is_some() {
          return Err(InvoiceError::Collision(candidate.into_inner()));
        }

        Ok(candidate)
      }
    }
  }
}

pub struct InvoiceService {
  invoice_repo: Arc<dyn InvoiceRepository>,
  renderer: Arc<dyn InvoiceRenderer>,
  allocator: InvoiceNumberAllocator,
}

impl InvoiceService {
  pub fn new(
    invoice_repo: Arc<dyn InvoiceRepository>,
    number_store: Arc<dyn InvoiceNumberStore>,
    renderer: Arc<dyn InvoiceRenderer>,
  ) -> Self {
    let allocator = InvoiceNumberAllocator::new(number_store, invoice_repo.clone());
    Self {
      invoice_repo,
      renderer,
      allocator,
    }
  }

  /// Create an invoice: compute totals, reserve an identifier, render the
  /// artifact and persist the record.
  ///
  /// Totals are calculated before allocation so a rejected draft never
  /// consumes an identifier. Once allocation succeeds the identifier is
  /// reserved: the counter stays advanced even if a later step fails.
  pub async fn create_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, InvoiceError> {
    let totals = InvoiceTotals::calculate(&draft.line_items)?;

    let invoice_number = self.allocator.allocate().await?;

    let mut invoice = Invoice::new(
      invoice_number,
      draft.client_name,
      draft.client_email,
      draft.admin_signature,
      draft.line_items,
      totals,
    );

    let artifact_path = self.renderer.render_invoice(&invoice).await?;
    invoice.set_pdf_path(artifact_path);

    let created = self.invoice_repo.create(invoice).await?;

    tracing::info!(
      invoice_number = %created.invoice_number,
      total = %created.total,
      "invoice created"
    );

    Ok(created)
  }

  pub async fn get_invoice(&self, number: &InvoiceNumber) -> Result<Invoice, InvoiceError> {
    self
      .invoice_repo
      .find_by_number(number)
      .await?
      .ok_or_else(|| InvoiceError::InvoiceNotFound(number.value().to_string()))
  }

  pub async fn list_invoices(&self) -> Result<Vec<Invoice>, InvoiceError> {
    self.invoice_repo.find_all().await
  }
}
