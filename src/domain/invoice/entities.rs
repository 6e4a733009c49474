use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::InvoiceError;
use super::value_objects::{ClientName, InvoiceNumber, ValueObjectError};

// Line Item - ordered position on an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
  pub name: String,
  pub quantity: Decimal,
  pub unit_price: Decimal,
}

impl LineItem {
  pub fn new(name: String, quantity: Decimal, unit_price: Decimal) -> Self {
    Self {
      name,
      quantity,
      unit_price,
    }
  }

  pub fn amount(&self) -> Decimal {
    self.quantity * self.unit_price
  }
}

// Invoice Totals - calculated, not persisted independently
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
  pub subtotal: Decimal,
  pub total: Decimal,
}

impl InvoiceTotals {
  /// Validate an ordered sequence of line items and compute totals.
  ///
  /// Every item must carry a non-empty name, a positive quantity and a
  /// strictly positive unit price. The subtotal is rounded to 2 decimal
  /// places half-away-from-zero; there is no tax or discount logic, so the
  /// total equals the subtotal. Pure and deterministic.
  pub fn calculate(line_items: &[LineItem]) -> Result<Self, InvoiceError> {
    if line_items.is_empty() {
      return Err(InvoiceError::EmptyLineItems);
    }

    for item in line_items {
      if item.name.trim().is_empty() {
        return Err(
          ValueObjectError::InvalidLineItemName("line item is missing a name".to_string()).into(),
        );
      }
      if item.quantity <= Decimal::ZERO {
        return Err(
          ValueObjectError::InvalidQuantity(format!(
            "item \"{}\" must have a positive quantity",
            item.name
          ))
          .into(),
        );
      }
      if item.unit_price <= Decimal::ZERO {
        return Err(
          ValueObjectError::InvalidUnitPrice(format!(
            "item \"{}\" must have a positive unit price",
            item.name
          ))
          .into(),
        );
      }
    }

    let subtotal = line_items
      .iter()
      .fold(Decimal::ZERO, |acc, item| acc + item.amount())
      .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Ok(Self {
      subtotal,
      total: subtotal,
    })
  }
}

/// Invoice Counter - singleton row acting as the sole source of the next
/// sequence value. Mutated only through the number store's atomic increment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceCounter {
  pub id: i32,
  pub last_number: i64,
}

impl InvoiceCounter {
  pub const SINGLETON_ID: i32 = 1;

  pub fn new() -> Self {
    Self {
      id: Self::SINGLETON_ID,
      last_number: 0,
    }
  }

  pub fn increment(&mut self) -> i64 {
    self.last_number += 1;
    self.last_number
  }
}

impl Default for InvoiceCounter {
  fn default() -> Self {
    Self::new()
  }
}

// Invoice - created once per allocation, never mutated afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
  pub id: Uuid,
  pub invoice_number: InvoiceNumber,
  pub client_name: ClientName,
  pub client_email: String,
  pub line_items: Vec<LineItem>,
  pub subtotal: Decimal,
  pub total: Decimal,
  pub admin_signature: String,
  pub pdf_path: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Invoice {
  pub fn new(
    invoice_number: InvoiceNumber,
    client_name: ClientName,
    client_email: String,
    admin_signature: String,
    line_items: Vec<LineItem>,
    totals: InvoiceTotals,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      invoice_number,
      client_name,
      client_email,
      line_items,
      subtotal: totals.subtotal,
      total: totals.total,
      admin_signature,
      pdf_path: None,
      created_at: Utc::now(),
    }
  }

  pub fn set_pdf_path(&mut self, path: String) {
    self.pdf_path = Some(path);
  }
}
