use super::{Repository, State};
use crate::client::Client;
use crate::error::Result;
use crate::invoice::Invoice;

/// Repository kept entirely in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    state: State,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: State) -> Self {
        Self { state }
    }

    pub fn into_state(self) -> State {
        self.state
    }
}

impl Repository for MemoryStore {
    fn list_clients(&self) -> Result<Vec<Client>> {
        Ok(self.state.clients.clone())
    }

    fn list_invoices(&self) -> Result<Vec<Invoice>> {
        Ok(self.state.invoices.clone())
    }

    fn get_invoice_by_token(&self, token: &str) -> Result<Option<Invoice>> {
        Ok(self.state.invoices.iter().find(|i| i.token == token).cloned())
    }

    fn next_invoice_sequence(&mut self, year: i32) -> Result<u32> {
        Ok(self.state.next_sequence(year))
    }

    fn current_invoice_sequence(&self, year: i32) -> Result<u32> {
        Ok(self.state.last_sequence(year))
    }

    fn save_client(&mut self, client: Client) -> Result<()> {
        self.state.upsert_client(client);
        Ok(())
    }

    fn save_invoice(&mut self, invoice: Invoice) -> Result<()> {
        self.state.upsert_invoice(invoice);
        Ok(())
    }
}
