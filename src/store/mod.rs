//! Storage for clients and invoices.
//!
//! Callers get a [`Repository`] handed to them; nothing in the crate keeps
//! global state.

mod file;
mod memory;
mod state;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use state::State;

use crate::client::Client;
use crate::error::{Result, TallyError};
use crate::invoice::Invoice;

pub trait Repository {
    fn list_clients(&self) -> Result<Vec<Client>>;

    fn list_invoices(&self) -> Result<Vec<Invoice>>;

    fn get_invoice_by_token(&self, token: &str) -> Result<Option<Invoice>>;

    /// Reserve the next invoice sequence number for `year`. Each call hands
    /// out a new number.
    fn next_invoice_sequence(&mut self, year: i32) -> Result<u32>;

    /// Last sequence number handed out for `year`, 0 if none yet.
    fn current_invoice_sequence(&self, year: i32) -> Result<u32>;

    /// Insert or replace a client by id.
    fn save_client(&mut self, client: Client) -> Result<()>;

    /// Insert or replace an invoice by id.
    fn save_invoice(&mut self, invoice: Invoice) -> Result<()>;

    fn get_client(&self, id: &str) -> Result<Client> {
        self.list_clients()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| TallyError::ClientNotFound(id.to_string()))
    }

    /// Look an invoice up by id or invoice number.
    fn get_invoice(&self, reference: &str) -> Result<Invoice> {
        self.list_invoices()?
            .into_iter()
            .find(|i| i.id == reference || i.invoice_number == reference)
            .ok_or_else(|| TallyError::InvoiceNotFound(reference.to_string()))
    }
}
