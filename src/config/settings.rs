use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub business: Business,
    #[serde(default)]
    pub invoice: InvoiceSettings,
}

/// The business issuing invoices
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Business {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct InvoiceSettings {
    pub currency: String,
    pub currency_symbol: String,
    /// Days between issue date and due date for new invoices
    pub due_days: u32,
    /// Prefix for shareable links; the token path is appended to it
    pub share_base_url: String,
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        Self {
            currency: "SGD".to_string(),
            currency_symbol: "S$".to_string(),
            due_days: 30,
            share_base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl InvoiceSettings {
    /// Public link for an invoice token.
    pub fn share_url(&self, token: &str) -> String {
        format!("{}/i/{}", self.share_base_url.trim_end_matches('/'), token)
    }
}
