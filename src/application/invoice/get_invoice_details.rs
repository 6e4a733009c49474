use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{Invoice, InvoiceError, InvoiceNumber, InvoiceService};

#[derive(Debug, Deserialize)]
pub struct GetInvoiceDetailsQuery {
  pub invoice_number: String,
}

#[derive(Debug, Serialize)]
pub struct InvoiceLineItemDto {
  pub name: String,
  pub quantity: Decimal,
  pub unit_price: Decimal,
  pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct InvoiceDetailsResponse {
  pub invoice_id: Uuid,
  pub invoice_number: String,
  pub client_name: String,
  pub client_email: String,
  pub line_items: Vec<InvoiceLineItemDto>,
  pub subtotal: Decimal,
  pub total: Decimal,
  pub pdf_path: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceDetailsResponse {
  fn from(invoice: Invoice) -> Self {
    let line_items = invoice
      .line_items
      .iter()
      .map(|item| InvoiceLineItemDto {
        name: item.name.clone(),
        quantity: item.quantity,
        unit_price: item.unit_price,
        amount: item.amount(),
      })
      .collect();

    Self {
      invoice_id: invoice.id,
      invoice_number: invoice.invoice_number.into_inner(),
      client_name: invoice.client_name.into_inner(),
      client_email: invoice.client_email,
      line_items,
      subtotal: invoice.subtotal,
      total: invoice.total,
      pdf_path: invoice.pdf_path,
      created_at: invoice.created_at,
    }
  }
}

pub struct GetInvoiceDetailsUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetInvoiceDetailsUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    query: GetInvoiceDetailsQuery,
  ) -> Result<InvoiceDetailsResponse, InvoiceError> {
    let number = InvoiceNumber::new(query.invoice_number)?;
    let invoice = self.invoice_service.get_invoice(&number).await?;
    Ok(invoice.into())
  }
}
