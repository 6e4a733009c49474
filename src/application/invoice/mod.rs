pub mod create_invoice;
pub mod get_invoice_details;
pub mod list_invoices;

pub use create_invoice::{
  CreateInvoiceCommand, CreateInvoiceLineItemDto, CreateInvoiceResponse, CreateInvoiceUseCase,
};
pub use get_invoice_details::{
  GetInvoiceDetailsQuery, GetInvoiceDetailsUseCase, InvoiceDetailsResponse, InvoiceLineItemDto,
};
pub use list_invoices::{InvoiceListItemDto, ListInvoicesResponse, ListInvoicesUseCase};
