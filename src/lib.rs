pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod invoice;
pub mod logging;
pub mod public;
pub mod store;

pub use client::{
    register_client, search_clients, summarize_client, update_client, Client, ClientChanges,
    ClientSummary, NewClient,
};
pub use config::{CatalogItem, Config, InvoiceSettings};
pub use error::{MissingField, Result, TallyError, ValidationError};
pub use invoice::{
    calculate_totals, format_invoice_number, resolve_status, Invoice, InvoiceStatus,
    InvoiceTotals, LineItem, LineItemKind, StatusDates, UnitType,
};
pub use public::{public_invoice, PublicInvoice};
pub use store::{FileStore, MemoryStore, Repository};
