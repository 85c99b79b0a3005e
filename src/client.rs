use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};
use crate::invoice::{Invoice, InvoiceStatus};
use crate::store::Repository;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a client
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl NewClient {
    /// Validate the input and build the client record.
    pub fn into_client(self, now: DateTime<Utc>) -> Result<Client> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(TallyError::InvalidClient("name is required".to_string()));
        }
        let email = self.email.trim().to_string();
        if !email.contains('@') {
            return Err(TallyError::InvalidClient(format!(
                "'{email}' is not an email address"
            )));
        }

        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => slugify(&name),
        };
        if id.is_empty() {
            return Err(TallyError::InvalidClient(
                "could not derive an id from the name, pass one explicitly".to_string(),
            ));
        }

        Ok(Client {
            id,
            name,
            email,
            company: non_empty(self.company),
            address: non_empty(self.address),
            phone: non_empty(self.phone),
            notes: non_empty(self.notes),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Validate and store a new client. Ids must be unique.
pub fn register_client<R: Repository + ?Sized>(
    repo: &mut R,
    new: NewClient,
    now: DateTime<Utc>,
) -> Result<Client> {
    let client = new.into_client(now)?;
    if repo.list_clients()?.iter().any(|c| c.id == client.id) {
        return Err(TallyError::DuplicateClient(client.id));
    }
    repo.save_client(client.clone())?;
    tracing::info!(client = %client.id, "client registered");
    Ok(client)
}

/// Changes to a client. `None` keeps the current value; an empty string
/// clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct ClientChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Apply `changes` to an existing client, validating name and email again.
/// The id and creation time never change.
pub fn update_client<R: Repository + ?Sized>(
    repo: &mut R,
    id: &str,
    changes: ClientChanges,
    now: DateTime<Utc>,
) -> Result<Client> {
    let existing = repo.get_client(id)?;
    let created_at = existing.created_at;

    let mut client = NewClient {
        id: Some(existing.id),
        name: changes.name.unwrap_or(existing.name),
        email: changes.email.unwrap_or(existing.email),
        company: changes.company.or(existing.company),
        address: changes.address.or(existing.address),
        phone: changes.phone.or(existing.phone),
        notes: changes.notes.or(existing.notes),
    }
    .into_client(now)?;
    client.created_at = created_at;

    repo.save_client(client.clone())?;
    tracing::info!(client = %client.id, "client updated");
    Ok(client)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lowercase, dash-separated id derived from a display name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Case-insensitive search over name, email and company.
/// A blank query matches every client.
pub fn search_clients<'a>(clients: &'a [Client], query: &str) -> Vec<&'a Client> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return clients.iter().collect();
    }

    clients
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&query)
                || c.email.to_lowercase().contains(&query)
                || c
                    .company
                    .as_deref()
                    .is_some_and(|company| company.to_lowercase().contains(&query))
        })
        .collect()
}

/// Billing figures derived from a client's invoices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientSummary {
    pub total_billed: Decimal,
    pub last_invoice_date: Option<NaiveDate>,
    pub invoice_count: usize,
}

/// Summarize a client's invoices.
///
/// Drafts and cancelled invoices were never billed, so they do not count
/// towards `total_billed`; every invoice counts for `last_invoice_date`.
pub fn summarize_client(client_id: &str, invoices: &[Invoice], today: NaiveDate) -> ClientSummary {
    let owned: Vec<&Invoice> = invoices.iter().filter(|i| i.client_id == client_id).collect();

    let total_billed = owned
        .iter()
        .filter(|i| {
            !matches!(
                i.status(today),
                InvoiceStatus::Draft | InvoiceStatus::Cancelled
            )
        })
        .map(|i| i.totals().total)
        .sum();

    ClientSummary {
        total_billed,
        last_invoice_date: owned.iter().map(|i| i.issue_date).max(),
        invoice_count: owned.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{LineItem, UnitType};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap()
    }

    fn client(name: &str, email: &str, company: Option<&str>) -> Client {
        NewClient {
            name: name.to_string(),
            email: email.to_string(),
            company: company.map(str::to_string),
            ..NewClient::default()
        }
        .into_client(now())
        .unwrap()
    }

    fn invoice(client_id: &str, issued: (i32, u32, u32), amount: Decimal) -> Invoice {
        let issue_date = NaiveDate::from_ymd_opt(issued.0, issued.1, issued.2).unwrap();
        Invoice {
            id: format!("{client_id}-{issued:?}"),
            invoice_number: "2025-0001".to_string(),
            client_id: client_id.to_string(),
            issue_date,
            due_date: issue_date + chrono::Duration::days(30),
            notes: None,
            token: "t".to_string(),
            created_at: now(),
            updated_at: now(),
            sent_at: Some(now()),
            paid_at: None,
            cancelled_at: None,
            line_items: vec![LineItem::item("Work", dec!(1), UnitType::Fixed, amount, 1)],
        }
    }

    #[test]
    fn id_is_slug_of_name() {
        let c = client("Acme Holdings, Pte. Ltd.", "ap@acme.test", None);
        assert_eq!(c.id, "acme-holdings-pte-ltd");
    }

    #[test]
    fn rejects_bad_email_and_blank_name() {
        let bad_email = NewClient {
            name: "Acme".to_string(),
            email: "nobody".to_string(),
            ..NewClient::default()
        };
        assert!(bad_email.into_client(now()).is_err());

        let blank = NewClient {
            name: "  ".to_string(),
            email: "a@b.c".to_string(),
            ..NewClient::default()
        };
        assert!(blank.into_client(now()).is_err());
    }

    #[test]
    fn register_rejects_duplicate_ids() {
        let mut store = crate::store::MemoryStore::new();
        let new = NewClient {
            name: "Acme".to_string(),
            email: "ap@acme.test".to_string(),
            ..NewClient::default()
        };
        register_client(&mut store, new.clone(), now()).unwrap();
        let err = register_client(&mut store, new, now()).unwrap_err();
        assert!(matches!(err, TallyError::DuplicateClient(id) if id == "acme"));
        assert_eq!(store.list_clients().unwrap().len(), 1);
    }

    #[test]
    fn update_keeps_id_and_created_at() {
        let mut store = crate::store::MemoryStore::new();
        let new = NewClient {
            name: "Acme".to_string(),
            email: "ap@acme.test".to_string(),
            company: Some("Acme Holdings".to_string()),
            phone: Some("+65 6000 0000".to_string()),
            ..NewClient::default()
        };
        register_client(&mut store, new, now()).unwrap();

        let later = now() + chrono::Duration::days(3);
        let changes = ClientChanges {
            name: Some("Acme Global".to_string()),
            company: Some(String::new()),
            ..ClientChanges::default()
        };
        let updated = update_client(&mut store, "acme", changes, later).unwrap();

        assert_eq!(updated.id, "acme");
        assert_eq!(updated.name, "Acme Global");
        assert_eq!(updated.email, "ap@acme.test");
        assert_eq!(updated.company, None);
        assert_eq!(updated.phone.as_deref(), Some("+65 6000 0000"));
        assert_eq!(updated.created_at, now());
        assert_eq!(updated.updated_at, later);
        assert_eq!(store.get_client("acme").unwrap(), updated);
        assert_eq!(store.list_clients().unwrap().len(), 1);
    }

    #[test]
    fn update_validates_and_requires_existing_client() {
        let mut store = crate::store::MemoryStore::new();
        let new = NewClient {
            name: "Acme".to_string(),
            email: "ap@acme.test".to_string(),
            ..NewClient::default()
        };
        register_client(&mut store, new, now()).unwrap();

        let bad = ClientChanges {
            email: Some("not-an-email".to_string()),
            ..ClientChanges::default()
        };
        let err = update_client(&mut store, "acme", bad, now()).unwrap_err();
        assert!(matches!(err, TallyError::InvalidClient(_)));
        assert_eq!(store.get_client("acme").unwrap().email, "ap@acme.test");

        let err = update_client(&mut store, "ghost", ClientChanges::default(), now()).unwrap_err();
        assert!(matches!(err, TallyError::ClientNotFound(_)));
    }

    #[test]
    fn search_matches_name_email_and_company() {
        let clients = vec![
            client("Acme", "ap@acme.test", None),
            client("Jane Tan", "jane@studio.sg", Some("Lumen Studio")),
            client("Bob", "bob@example.com", None),
        ];
        assert_eq!(search_clients(&clients, "").len(), 3);
        assert_eq!(search_clients(&clients, "ACME")[0].name, "Acme");
        assert_eq!(search_clients(&clients, "lumen")[0].name, "Jane Tan");
        assert_eq!(search_clients(&clients, "example.com")[0].name, "Bob");
        assert!(search_clients(&clients, "zzz").is_empty());
    }

    #[test]
    fn summary_skips_drafts_and_cancelled() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let mut draft = invoice("acme", (2025, 4, 20), dec!(999));
        draft.sent_at = None;
        let mut cancelled = invoice("acme", (2025, 4, 25), dec!(500));
        cancelled.cancelled_at = Some(now());
        let invoices = vec![
            invoice("acme", (2025, 3, 1), dec!(100)),
            invoice("acme", (2025, 4, 1), dec!(250.50)),
            invoice("other", (2025, 4, 30), dec!(1000)),
            draft,
            cancelled,
        ];

        let summary = summarize_client("acme", &invoices, today);
        assert_eq!(summary.total_billed, dec!(350.50));
        assert_eq!(
            summary.last_invoice_date,
            NaiveDate::from_ymd_opt(2025, 4, 25)
        );
        assert_eq!(summary.invoice_count, 4);
    }

    #[test]
    fn summary_of_client_without_invoices() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let summary = summarize_client("nobody", &[], today);
        assert_eq!(summary.total_billed, Decimal::ZERO);
        assert_eq!(summary.last_invoice_date, None);
    }
}
