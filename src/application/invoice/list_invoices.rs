use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Serialize)]
pub struct InvoiceListItemDto {
  pub invoice_id: Uuid,
  pub invoice_number: String,
  pub client_name: String,
  pub total: Decimal,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ListInvoicesResponse {
  pub invoices: Vec<InvoiceListItemDto>,
}

pub struct ListInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self) -> Result<ListInvoicesResponse, InvoiceError> {
    let invoices = self
      .invoice_service
      .list_invoices()
      .await?
      .into_iter()
      .map(|invoice| InvoiceListItemDto {
        invoice_id: invoice.id,
        invoice_number: invoice.invoice_number.into_inner(),
        client_name: invoice.client_name.into_inner(),
        total: invoice.total,
        created_at: invoice.created_at,
      })
      .collect();

    Ok(ListInvoicesResponse { invoices })
  }
}
