use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::invoice::{
  entities::{Invoice, LineItem},
  errors::InvoiceError,
  ports::InvoiceRepository,
  value_objects::{ClientName, InvoiceNumber},
};

#[derive(Debug, FromRow)]
struct InvoiceRow {
  id: Uuid,
  invoice_number: String,
  client_name: String,
  client_email: String,
  line_items: String,
  subtotal: Decimal,
  total: Decimal,
  admin_signature: String,
  pdf_path: Option<String>,
  created_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
  type Error = InvoiceError;

  fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
    let invoice_number = InvoiceNumber::new(row.invoice_number)?;
    let client_name = ClientName::new(row.client_name)?;
    let line_items: Vec<LineItem> = serde_json::from_str(&row.line_items)
      .map_err(|e| InvoiceError::Internal(format!("Corrupt line items column: {}", e)))?;

    Ok(Invoice {
      id: row.id,
      invoice_number,
      client_name,
      client_email: row.client_email,
      line_items,
      subtotal: row.subtotal,
      total: row.total,
      admin_signature: row.admin_signature,
      pdf_path: row.pdf_path,
      created_at: row.created_at,
    })
  }
}

pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    let invoice_number_value = invoice.invoice_number.value().to_string();
    let line_items = serde_json::to_string(&invoice.line_items)
      .map_err(|e| InvoiceError::Internal(format!("Failed to serialize line items: {}", e)))?;

    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            INSERT INTO invoices (
                id, invoice_number, client_name, client_email, line_items,
                subtotal, total, admin_signature, pdf_path, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, invoice_number, client_name, client_email, line_items,
                      subtotal, total, admin_signature, pdf_path, created_at
            "#,
    )
    .bind(invoice.id)
    .bind(invoice.invoice_number.value())
    .bind(invoice.client_name.value())
    .bind(&invoice.client_email)
    .bind(line_items)
    .bind(invoice.subtotal)
    .bind(invoice.total)
    .bind(&invoice.admin_signature)
    .bind(invoice.pdf_path)
    .bind(invoice.created_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      if let sqlx::Error::Database(db_err) = &e {
        // PostgreSQL unique violation code
        if db_err.code().as_deref() == Some("23505")
          && db_err.constraint() == Some("invoices_invoice_number_unique")
        {
          return InvoiceError::Collision(invoice_number_value);
        }
      }
      InvoiceError::Database(e)
    })?;

    row.try_into()
  }

  async fn find_by_number(
    &self,
    number: &InvoiceNumber,
  ) -> Result<Option<Invoice>, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id, invoice_number, client_name, client_email, line_items,
                   subtotal, total, admin_signature, pdf_path, created_at
            FROM invoices
            WHERE invoice_number = $1
            "#,
    )
    .bind(number.value())
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn count(&self) -> Result<i64, InvoiceError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
      .fetch_one(&self.pool)
      .await?;

    Ok(count)
  }

  async fn find_all(&self) -> Result<Vec<Invoice>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id, invoice_number, client_name, client_email, line_items,
                   subtotal, total, admin_signature, pdf_path, created_at
            FROM invoices
            ORDER BY created_at DESC
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}
