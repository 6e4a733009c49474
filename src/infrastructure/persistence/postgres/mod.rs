pub mod invoice_number_store;
pub mod invoice_repository;

pub use invoice_number_store::PostgresInvoiceNumberStore;
pub use invoice_repository::PostgresInvoiceRepository;

/// Apply the embedded migrations to the given pool.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), sqlx::migrate::MigrateError> {
  sqlx::migrate!("./migrations").run(pool).await
}
