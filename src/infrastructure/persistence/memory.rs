use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::invoice::{
  entities::{Invoice, InvoiceCounter},
  errors::InvoiceError,
  ports::{InvoiceNumberStore, InvoiceRepository},
  value_objects::InvoiceNumber,
};

struct StoreInner {
  counter: InvoiceCounter,
  invoices: Vec<Invoice>,
}

/// In-memory invoice store for tests and embedding.
///
/// A single mutex guards the counter and the record set, so the counter
/// increment and the verification read of `reserve_next` form one atomic
/// unit, matching the transactional guarantee of the Postgres adapter.
pub struct InMemoryInvoiceStore {
  inner: Mutex<StoreInner>,
}

impl InMemoryInvoiceStore {
  pub fn new() -> Self {
    Self {
      inner: Mutex::new(StoreInner {
        counter: InvoiceCounter::new(),
        invoices: Vec::new(),
      }),
    }
  }

  fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreInner>, InvoiceError> {
    self
      .inner
      .lock()
      .map_err(|_| InvoiceError::Transaction("store lock poisoned".to_string()))
  }

  /// Current counter value, for asserting rollback behaviour in tests.
  pub fn last_number(&self) -> Result<i64, InvoiceError> {
    Ok(self.lock()?.counter.last_number)
  }
}

impl Default for InMemoryInvoiceStore {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceStore {
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    let mut inner = self.lock()?;
    if inner
      .invoices
      .iter()
      .any(|existing| existing.invoice_number == invoice.invoice_number)
    {
      return Err(InvoiceError::Collision(
        invoice.invoice_number.value().to_string(),
      ));
    }
    inner.invoices.push(invoice.clone());
    Ok(invoice)
  }

  async fn find_by_number(
    &self,
    number: &InvoiceNumber,
  ) -> Result<Option<Invoice>, InvoiceError> {
    let inner = self.lock()?;
    Ok(
      inner
        .invoices
        .iter()
        .find(|invoice| invoice.invoice_number == *number)
        .cloned(),
    )
  }

  async fn count(&self) -> Result<i64, InvoiceError> {
    Ok(self.lock()?.invoices.len() as i64)
  }

  async fn find_all(&self) -> Result<Vec<Invoice>, InvoiceError> {
    let inner = self.lock()?;
    // Newest first, matching the Postgres adapter's ordering.
    Ok(inner.invoices.iter().rev().cloned().collect())
  }
}

#[async_trait]
impl InvoiceNumberStore for InMemoryInvoiceStore {
  async fn reserve_next(&self) -> Result<InvoiceNumber, InvoiceError> {
    let mut inner = self.lock()?;

    let tentative = inner.counter.last_number + 1;
    let number = InvoiceNumber::from_sequence(tentative);

    if inner
      .invoices
      .iter()
      .any(|invoice| invoice.invoice_number == number)
    {
      // Abort without committing the increment.
      return Err(InvoiceError::Collision(number.into_inner()));
    }

    inner.counter.last_number = tentative;
    Ok(number)
  }
}
