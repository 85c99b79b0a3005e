use std::fs;
use std::path::{Path, PathBuf};

use super::{Repository, State};
use crate::client::Client;
use crate::error::{Result, TallyError};
use crate::invoice::Invoice;

const STATE_FILE: &str = "state.toml";

/// Repository backed by `state.toml` in the config directory.
///
/// The whole file is rewritten after every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: State,
}

impl FileStore {
    /// Load state.toml from `dir`, starting empty if it does not exist yet
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(STATE_FILE);
        let state = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content).map_err(|e| TallyError::ConfigParse {
                path: path.clone(),
                source: e,
            })?
        } else {
            State::default()
        };

        tracing::debug!(
            path = %path.display(),
            clients = state.clients.len(),
            invoices = state.invoices.len(),
            "opened state file"
        );
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `next` to disk and only then make it the live state, so a
    /// failed write leaves the store as it was.
    fn commit(&mut self, next: State) -> Result<()> {
        let content = toml::to_string_pretty(&next).map_err(|e| TallyError::StateWrite {
            path: self.path.clone(),
            source: e,
        })?;
        fs::write(&self.path, content)?;
        self.state = next;
        tracing::trace!(path = %self.path.display(), "state saved");
        Ok(())
    }
}

impl Repository for FileStore {
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
        let mut next = self.state.clone();
        let seq = next.next_sequence(year);
        self.commit(next)?;
        Ok(seq)
    }

    fn current_invoice_sequence(&self, year: i32) -> Result<u32> {
        Ok(self.state.last_sequence(year))
    }

    fn save_client(&mut self, client: Client) -> Result<()> {
        let mut next = self.state.clone();
        next.upsert_client(client);
        self.commit(next)
    }

    fn save_invoice(&mut self, invoice: Invoice) -> Result<()> {
        let mut next = self.state.clone();
        next.upsert_invoice(invoice);
        self.commit(next)
    }
}
