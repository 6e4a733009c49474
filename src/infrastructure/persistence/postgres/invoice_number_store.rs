use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::invoice::{
  errors::InvoiceError, ports::InvoiceNumberStore, value_objects::InvoiceNumber,
};

/// Postgres-backed atomic invoice number source.
///
/// The singleton counter row and the verification read share one
/// transaction. `INSERT .. ON CONFLICT .. DO UPDATE .. RETURNING` takes a row
/// lock on the counter, so concurrent callers serialize on the increment and
/// each observes a distinct `last_number`.
pub struct PostgresInvoiceNumberStore {
  pool: PgPool,
}

impl PostgresInvoiceNumberStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceNumberStore for PostgresInvoiceNumberStore {
  async fn reserve_next(&self) -> Result<InvoiceNumber, InvoiceError> {
    let mut tx = self
      .pool
      .begin()
      .await
      .map_err(|e| InvoiceError::Transaction(e.to_string()))?;

    let (last_number,): (i64,) = sqlx::query_as(
      r#"
            INSERT INTO invoice_counters (id, last_number)
            VALUES (1, 1)
            ON CONFLICT (id)
            DO UPDATE SET last_number = invoice_counters.last_number + 1
            RETURNING last_number
            "#,
    )
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| InvoiceError::Transaction(e.to_string()))?;

    let number = InvoiceNumber::from_sequence(last_number);

    // Verification read: counter and invoice table may have drifted.
    let (exists,): (bool,) =
      sqlx::query_as("SELECT EXISTS(SELECT 1 FROM invoices WHERE invoice_number = $1)")
        .bind(number.value())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| InvoiceError::Transaction(e.to_string()))?;

    if exists {
      tx.rollback()
        .await
        .map_err(|e| InvoiceError::Transaction(e.to_string()))?;
      return Err(InvoiceError::Collision(number.into_inner()));
    }

    // The commit durably advances the counter before any invoice row is
    // written: the identifier is reserved even if the caller fails later.
    tx.commit()
      .await
      .map_err(|e| InvoiceError::Transaction(e.to_string()))?;

    Ok(number)
  }
}
