pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Invoice, InvoiceCounter, InvoiceTotals, LineItem};
pub use errors::InvoiceError;
pub use ports::{InvoiceNumberStore, InvoiceRenderer, InvoiceRepository};
pub use services::{InvoiceDraft, InvoiceNumberAllocator, InvoiceService};
pub use value_objects::{ClientName, InvoiceNumber, ValueObjectError};
