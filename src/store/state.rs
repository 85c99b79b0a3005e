use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::client::Client;
use crate::invoice::Invoice;

/// Everything the stores persist
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct State {
    /// Last issued invoice sequence, per year
    #[serde(default)]
    pub sequences: BTreeMap<String, u32>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

impl State {
    /// Issue the next sequence number for `year`. Numbering restarts at 1
    /// each year.
    pub fn next_sequence(&mut self, year: i32) -> u32 {
        let last = self.sequences.entry(year.to_string()).or_insert(0);
        *last += 1;
        *last
    }

    pub fn last_sequence(&self, year: i32) -> u32 {
        self.sequences.get(&year.to_string()).copied().unwrap_or(0)
    }

    pub fn upsert_client(&mut self, client: Client) {
        match self.clients.iter_mut().find(|c| c.id == client.id) {
            Some(existing) => *existing = client,
            None => self.clients.push(client),
        }
    }

    pub fn upsert_invoice(&mut self, invoice: Invoice) {
        match self.invoices.iter_mut().find(|i| i.id == invoice.id) {
            Some(existing) => *existing = invoice,
            None => self.invoices.push(invoice),
        }
    }
}
