use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Config directory not found at {0}. Run 'tally init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write state file {path}: {source}")]
    StateWrite {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Client '{0}' already exists")]
    DuplicateClient(String),

    #[error("Invalid client: {0}")]
    InvalidClient(String),

    #[error("Item '{0}' not found in items.toml")]
    ItemNotFound(String),

    #[error("Invoice '{0}' not found")]
    InvoiceNotFound(String),

    #[error("Invalid invoice index '{0}'. Use 'tally list' to see available invoices.")]
    InvalidInvoiceIndex(String),

    #[error("No invoice is shared under token '{0}'")]
    TokenNotFound(String),

    #[error("Invalid line '{input}': {reason}")]
    InvalidLine { input: String, reason: String },

    #[error("Invalid quantity '{qty}' for item '{item}': {reason}")]
    InvalidQuantity {
        item: String,
        qty: String,
        reason: String,
    },

    #[error("Invalid amount '{0}'. Expected a non-negative decimal number")]
    InvalidAmount(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid status '{0}'. Use draft, pending, paid, overdue or cancelled.")]
    InvalidStatus(String),

    #[error("No invoice numbers left for {year}: the yearly sequence stops at 9999")]
    SequenceExhausted { year: i32 },

    #[error("Issue year {0} cannot be used in an invoice number. Expected a year from 1000 to 9999")]
    InvalidInvoiceYear(i32),

    #[error("Cannot {action} invoice {invoice}: it is {status}")]
    InvalidTransition {
        invoice: String,
        status: String,
        action: &'static str,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TallyError>;

/// A required invoice field that was left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Client,
    LineItems,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingField::Client => f.write_str("client"),
            MissingField::LineItems => f.write_str("at least one billable line item"),
        }
    }
}

/// Raised when an invoice is missing the fields it needs before it can be
/// saved or sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub missing: Vec<MissingField>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.missing.iter().map(|m| m.to_string()).collect();
        write!(f, "Invoice is missing: {}", fields.join(", "))
    }
}
