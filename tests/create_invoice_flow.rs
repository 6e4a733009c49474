use rust_decimal_macros::dec;
use std::sync::Arc;

use invoicekit::application::invoice::{
  CreateInvoiceCommand, CreateInvoiceLineItemDto, CreateInvoiceUseCase, GetInvoiceDetailsQuery,
  GetInvoiceDetailsUseCase, ListInvoicesUseCase,
};
use invoicekit::domain::invoice::{InvoiceError, InvoiceRepository, InvoiceService};
use invoicekit::infrastructure::persistence::memory::InMemoryInvoiceStore;
use invoicekit::infrastructure::rendering::TeraInvoiceRenderer;

struct TestHarness {
  store: Arc<InMemoryInvoiceStore>,
  create: CreateInvoiceUseCase,
  get_details: GetInvoiceDetailsUseCase,
  list: ListInvoicesUseCase,
  _output_dir: tempfile::TempDir,
}

fn harness() -> TestHarness {
  let output_dir = tempfile::tempdir().expect("tempdir");
  let store = Arc::new(InMemoryInvoiceStore::new());
  let renderer =
    Arc::new(TeraInvoiceRenderer::new(output_dir.path().to_path_buf()).expect("renderer"));

  let service = Arc::new(InvoiceService::new(
    store.clone(),
    store.clone(),
    renderer,
  ));

  TestHarness {
    store,
    create: CreateInvoiceUseCase::new(service.clone()),
    get_details: GetInvoiceDetailsUseCase::new(service.clone()),
    list: ListInvoicesUseCase::new(service),
    _output_dir: output_dir,
  }
}

fn widget_and_gadget() -> Vec<CreateInvoiceLineItemDto> {
  vec![
    CreateInvoiceLineItemDto {
      name: "Widget".to_string(),
      quantity: dec!(2),
      unit_price: dec!(10.00),
    },
    CreateInvoiceLineItemDto {
      name: "Gadget".to_string(),
      quantity: dec!(1),
      unit_price: dec!(5.50),
    },
  ]
}

fn command(line_items: Vec<CreateInvoiceLineItemDto>) -> CreateInvoiceCommand {
  CreateInvoiceCommand {
    client_name: "Acme Corp".to_string(),
    client_email: "billing@acme.test".to_string(),
    admin_signature: "Jane Doe".to_string(),
    line_items,
  }
}

#[tokio::test]
async fn create_invoice_allocates_number_and_persists_totals() {
  let harness = harness();

  let response = harness
    .create
    .execute(command(widget_and_gadget()))
    .await
    .unwrap();

  assert_eq!(response.invoice_number, "INV-0001");
  assert_eq!(response.subtotal, dec!(25.50));
  assert_eq!(response.total, dec!(25.50));
  assert_eq!(harness.store.count().await.unwrap(), 1);

  let artifact = response.pdf_path.expect("artifact path");
  let html = std::fs::read_to_string(&artifact).expect("artifact readable");
  assert!(html.contains("INV-0001"));
  assert!(html.contains("Acme Corp"));
  assert!(html.contains("25.50"));
}

#[tokio::test]
async fn invalid_request_is_rejected_before_allocation() {
  let harness = harness();

  let err = harness.create.execute(command(Vec::new())).await.unwrap_err();
  assert!(matches!(err, InvoiceError::InvalidRequest(_)));

  let mut bad_email = command(widget_and_gadget());
  bad_email.client_email = "not-an-email".to_string();
  let err = harness.create.execute(bad_email).await.unwrap_err();
  assert!(matches!(err, InvoiceError::InvalidRequest(_)));

  // No identifier was consumed by the rejected requests.
  assert_eq!(harness.store.last_number().unwrap(), 0);
  let response = harness
    .create
    .execute(command(widget_and_gadget()))
    .await
    .unwrap();
  assert_eq!(response.invoice_number, "INV-0001");
}

#[tokio::test]
async fn calculator_failure_consumes_no_identifier() {
  let harness = harness();

  let items = vec![CreateInvoiceLineItemDto {
    name: "Widget".to_string(),
    quantity: dec!(0),
    unit_price: dec!(10.00),
  }];
  let err = harness.create.execute(command(items)).await.unwrap_err();
  assert!(matches!(err, InvoiceError::Validation(_)));
  assert!(err.to_string().contains("Widget"));

  assert_eq!(harness.store.last_number().unwrap(), 0);
  assert_eq!(harness.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn get_invoice_details_returns_persisted_record() {
  let harness = harness();
  harness
    .create
    .execute(command(widget_and_gadget()))
    .await
    .unwrap();

  let details = harness
    .get_details
    .execute(GetInvoiceDetailsQuery {
      invoice_number: "INV-0001".to_string(),
    })
    .await
    .unwrap();

  assert_eq!(details.client_name, "Acme Corp");
  assert_eq!(details.line_items.len(), 2);
  assert_eq!(details.line_items[0].amount, dec!(20.00));
  assert_eq!(details.total, dec!(25.50));

  let missing = harness
    .get_details
    .execute(GetInvoiceDetailsQuery {
      invoice_number: "INV-9999".to_string(),
    })
    .await
    .unwrap_err();
  assert!(matches!(missing, InvoiceError::InvoiceNotFound(_)));
}

#[tokio::test]
async fn list_invoices_returns_newest_first() {
  let harness = harness();

  for _ in 0..3 {
    harness
      .create
      .execute(command(widget_and_gadget()))
      .await
      .unwrap();
  }

  let listing = harness.list.execute().await.unwrap();
  let numbers: Vec<_> = listing
    .invoices
    .iter()
    .map(|item| item.invoice_number.as_str())
    .collect();

  assert_eq!(numbers, vec!["INV-0003", "INV-0002", "INV-0001"]);
}
