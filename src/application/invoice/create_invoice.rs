use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::domain::invoice::{
  ClientName, InvoiceDraft, InvoiceError, InvoiceService, LineItem,
};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateInvoiceLineItemDto {
  #[validate(length(min = 1, max = 500, message = "Line item name is required"))]
  pub name: String,
  pub quantity: Decimal,
  pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceCommand {
  #[validate(length(min = 1, max = 255, message = "Client name is required"))]
  pub client_name: String,

  #[validate(email(message = "Valid client email is required"))]
  pub client_email: String,

  #[validate(length(min = 1, message = "Admin signature is required"))]
  pub admin_signature: String,

  #[validate(length(min = 1, message = "Items must be a non-empty array"), nested)]
  pub line_items: Vec<CreateInvoiceLineItemDto>,
}

#[derive(Debug, Serialize)]
pub struct CreateInvoiceResponse {
  pub invoice_id: uuid::Uuid,
  pub invoice_number: String,
  pub subtotal: Decimal,
  pub total: Decimal,
  pub pdf_path: Option<String>,
  pub created_at: DateTime<Utc>,
}

pub struct CreateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: CreateInvoiceCommand,
  ) -> Result<CreateInvoiceResponse, InvoiceError> {
    command
      .validate()
      .map_err(|e| InvoiceError::InvalidRequest(e.to_string()))?;

    let client_name = ClientName::new(command.client_name)?;

    let line_items: Vec<LineItem> = command
      .line_items
      .into_iter()
      .map(|item| LineItem::new(item.name, item.quantity, item.unit_price))
      .collect();

    let draft = InvoiceDraft {
      client_name,
      client_email: command.client_email,
      admin_signature: command.admin_signature,
      line_items,
    };

    let invoice = self.invoice_service.create_invoice(draft).await?;

    Ok(CreateInvoiceResponse {
      invoice_id: invoice.id,
      invoice_number: invoice.invoice_number.into_inner(),
      subtotal: invoice.subtotal,
      total: invoice.total,
      pdf_path: invoice.pdf_path,
      created_at: invoice.created_at,
    })
  }
}
