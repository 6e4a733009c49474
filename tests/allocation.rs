use async_trait::async_trait;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::sync::Arc;

use invoicekit::domain::invoice::{
  ClientName, Invoice, InvoiceError, InvoiceNumber, InvoiceNumberAllocator, InvoiceNumberStore,
  InvoiceRepository, InvoiceTotals, LineItem,
};
use invoicekit::infrastructure::persistence::memory::InMemoryInvoiceStore;

fn invoice_with_number(number: InvoiceNumber) -> Invoice {
  let items = vec![LineItem::new("Widget".to_string(), dec!(2), dec!(10.00))];
  let totals = InvoiceTotals::calculate(&items).unwrap();
  Invoice::new(
    number,
    ClientName::new("Acme Corp".to_string()).unwrap(),
    "billing@acme.test".to_string(),
    "Jane Doe".to_string(),
    items,
    totals,
  )
}

fn allocator(store: &Arc<InMemoryInvoiceStore>) -> InvoiceNumberAllocator {
  InvoiceNumberAllocator::new(store.clone(), store.clone())
}

/// Number store whose primary path always fails, forcing the fallback.
struct FailingNumberStore;

#[async_trait]
impl InvoiceNumberStore for FailingNumberStore {
  async fn reserve_next(&self) -> Result<InvoiceNumber, InvoiceError> {
    Err(InvoiceError::Transaction(
      "simulated persistence failure".to_string(),
    ))
  }
}

#[tokio::test]
async fn sequential_allocations_are_monotonic_and_unique() {
  let store = Arc::new(InMemoryInvoiceStore::new());
  let allocator = allocator(&store);

  let mut numbers = Vec::new();
  for _ in 0..5 {
    numbers.push(allocator.allocate().await.unwrap().into_inner());
  }

  assert_eq!(
    numbers,
    vec!["INV-0001", "INV-0002", "INV-0003", "INV-0004", "INV-0005"]
  );
}

#[tokio::test]
async fn concurrent_allocations_yield_distinct_identifiers() {
  let store = Arc::new(InMemoryInvoiceStore::new());
  let allocator = Arc::new(allocator(&store));

  let mut handles = Vec::new();
  for _ in 0..8 {
    let allocator = allocator.clone();
    handles.push(tokio::spawn(
      async move { allocator.allocate().await },
    ));
  }

  let mut numbers = HashSet::new();
  for handle in handles {
    let number = handle.await.unwrap().unwrap();
    numbers.insert(number.into_inner());
  }

  assert_eq!(numbers.len(), 8);
  assert_eq!(store.last_number().unwrap(), 8);
}

#[tokio::test]
async fn primary_collision_falls_back_to_count_based_scheme() {
  let store = Arc::new(InMemoryInvoiceStore::new());
  // An invoice exists that the counter has never issued: the tables drifted.
  store
    .create(invoice_with_number(InvoiceNumber::from_sequence(1)))
    .await
    .unwrap();

  let allocator = allocator(&store);
  let number = allocator.allocate().await.unwrap();

  // Fallback: count(1) + 1.
  assert_eq!(number.value(), "INV-0002");
  // The aborted primary path must not leave the counter advanced.
  assert_eq!(store.last_number().unwrap(), 0);
}

#[tokio::test]
async fn aborted_primary_path_leaves_counter_consistent_for_next_caller() {
  let store = Arc::new(InMemoryInvoiceStore::new());
  store
    .create(invoice_with_number(InvoiceNumber::from_sequence(1)))
    .await
    .unwrap();

  let allocator = allocator(&store);

  let first = allocator.allocate().await.unwrap();
  assert_eq!(first.value(), "INV-0002");
  store.create(invoice_with_number(first)).await.unwrap();

  // Second caller: primary still collides on INV-0001, fallback advances
  // with the grown record set.
  let second = allocator.allocate().await.unwrap();
  assert_eq!(second.value(), "INV-0003");
}

#[tokio::test]
async fn transaction_failure_uses_fallback_once() {
  let store = Arc::new(InMemoryInvoiceStore::new());
  let allocator = InvoiceNumberAllocator::new(Arc::new(FailingNumberStore), store.clone());

  let number = allocator.allocate().await.unwrap();
  assert_eq!(number.value(), "INV-0001");
}

#[tokio::test]
async fn fallback_collision_is_fatal() {
  let store = Arc::new(InMemoryInvoiceStore::new());
  // One record whose number equals count + 1: the fallback candidate
  // collides and there is no further retry.
  store
    .create(invoice_with_number(InvoiceNumber::from_sequence(2)))
    .await
    .unwrap();

  let allocator = InvoiceNumberAllocator::new(Arc::new(FailingNumberStore), store.clone());
  let err = allocator.allocate().await.unwrap_err();

  match err {
    InvoiceError::Collision(number) => assert_eq!(number, "INV-0002"),
    other => panic!("expected collision, got {other}"),
  }
}
