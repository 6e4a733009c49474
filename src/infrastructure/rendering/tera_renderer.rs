use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::path::PathBuf;
use tera::{Context, Tera};

use crate::domain::invoice::{
  entities::Invoice, errors::InvoiceError, ports::InvoiceRenderer,
};

const INVOICE_TEMPLATE: &str = include_str!("../../../templates/invoice.html");

#[derive(Serialize)]
struct RenderedLine {
  name: String,
  quantity: String,
  unit_price: String,
  amount: String,
}

/// Renders the invoice artifact as an HTML document in the output directory.
///
/// Kept deliberately small: the workflow treats rendering as an external
/// collaborator, and this adapter is the minimal byte-stream producer. A PDF
/// conversion step can be layered on top by the embedding application.
pub struct TeraInvoiceRenderer {
  templates: Tera,
  output_dir: PathBuf,
}

impl TeraInvoiceRenderer {
  pub fn new(output_dir: PathBuf) -> Result<Self, InvoiceError> {
    std::fs::create_dir_all(&output_dir).map_err(|e| {
      InvoiceError::Rendering(format!(
        "Failed to create output directory {}: {}",
        output_dir.display(),
        e
      ))
    })?;

    let mut templates = Tera::default();
    templates
      .add_raw_template("invoice.html", INVOICE_TEMPLATE)
      .map_err(|e| InvoiceError::Rendering(format!("Invalid invoice template: {}", e)))?;

    Ok(Self {
      templates,
      output_dir,
    })
  }

  fn money(amount: Decimal) -> String {
    amount
      .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
      .to_string()
  }
}

#[async_trait]
impl InvoiceRenderer for TeraInvoiceRenderer {
  async fn render_invoice(&self, invoice: &Invoice) -> Result<String, InvoiceError> {
    let line_items: Vec<RenderedLine> = invoice
      .line_items
      .iter()
      .map(|item| RenderedLine {
        name: item.name.clone(),
        quantity: item.quantity.to_string(),
        unit_price: Self::money(item.unit_price),
        amount: Self::money(item.amount()),
      })
      .collect();

    let mut context = Context::new();
    context.insert("invoice_number", invoice.invoice_number.value());
    context.insert("client_name", invoice.client_name.value());
    context.insert("client_email", &invoice.client_email);
    context.insert("line_items", &line_items);
    context.insert("subtotal", &Self::money(invoice.subtotal));
    context.insert("total", &Self::money(invoice.total));
    context.insert("admin_signature", &invoice.admin_signature);
    context.insert(
      "issued_at",
      &invoice.created_at.format("%Y-%m-%d").to_string(),
    );

    let html = self
      .templates
      .render("invoice.html", &context)
      .map_err(|e| InvoiceError::Rendering(e.to_string()))?;

    let filename = format!("{}.html", invoice.invoice_number.value());
    let path = self.output_dir.join(&filename);

    tokio::fs::write(&path, html).await.map_err(|e| {
      InvoiceError::Rendering(format!("Failed to write {}: {}", path.display(), e))
    })?;

    tracing::debug!(invoice_number = %invoice.invoice_number, path = %path.display(), "invoice artifact rendered");

    Ok(path.to_string_lossy().to_string())
  }
}
