use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::line_item::{sorted_by_position, LineItem, LineItemKind};
use super::status::{resolve_status, InvoiceStatus, StatusDates};
use super::totals::{calculate_totals, InvoiceTotals};
use crate::error::{MissingField, Result, TallyError, ValidationError};

/// A stored invoice. Status and totals are derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub client_id: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Opaque key for the public view
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl Invoice {
    pub fn status_dates(&self) -> StatusDates {
        StatusDates {
            due_date: self.due_date,
            sent_at: self.sent_at,
            paid_at: self.paid_at,
            cancelled_at: self.cancelled_at,
        }
    }

    pub fn status(&self, today: NaiveDate) -> InvoiceStatus {
        resolve_status(&self.status_dates(), today)
    }

    pub fn totals(&self) -> InvoiceTotals {
        calculate_totals(&self.line_items)
    }

    pub fn sorted_line_items(&self) -> Vec<&LineItem> {
        sorted_by_position(&self.line_items)
    }

    /// Check the fields an invoice needs before it can go out: a client and
    /// at least one line that is not a section header.
    pub fn validate_for_send(&self) -> std::result::Result<(), ValidationError> {
        self.check_required(|li| li.kind != LineItemKind::Section)
    }

    /// Stricter check used when an invoice is created or edited. A discount
    /// alone does not make an invoice; it needs a regular item.
    pub fn validate_for_save(&self) -> std::result::Result<(), ValidationError> {
        self.check_required(|li| li.kind == LineItemKind::Item)
    }

    fn check_required(
        &self,
        billable: impl Fn(&LineItem) -> bool,
    ) -> std::result::Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.client_id.trim().is_empty() {
            missing.push(MissingField::Client);
        }
        if !self.line_items.iter().any(billable) {
            missing.push(MissingField::LineItems);
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// Replace the line items, adopting them into this invoice.
    pub fn set_line_items(&mut self, mut items: Vec<LineItem>, now: DateTime<Utc>) -> Result<()> {
        self.ensure_editable("edit", now)?;
        for item in &mut items {
            item.invoice_id = self.id.clone();
        }
        self.line_items = items;
        self.updated_at = now;
        Ok(())
    }

    pub fn ensure_editable(&self, action: &'static str, now: DateTime<Utc>) -> Result<()> {
        let status = self.status(now.date_naive());
        match status {
            InvoiceStatus::Paid | InvoiceStatus::Cancelled => Err(self.transition_error(status, action)),
            _ => Ok(()),
        }
    }

    /// Mark the invoice as sent to the client.
    pub fn send(&mut self, now: DateTime<Utc>) -> Result<()> {
        let status = self.status(now.date_naive());
        if self.sent_at.is_some() || !matches!(status, InvoiceStatus::Draft | InvoiceStatus::Overdue)
        {
            return Err(self.transition_error(status, "send"));
        }
        self.validate_for_send()?;
        self.sent_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    pub fn mark_paid(&mut self, paid_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
        let status = self.status(now.date_naive());
        if matches!(status, InvoiceStatus::Paid | InvoiceStatus::Cancelled) {
            return Err(self.transition_error(status, "mark paid"));
        }
        self.paid_at = Some(paid_at);
        self.updated_at = now;
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<()> {
        let status = self.status(now.date_naive());
        if matches!(status, InvoiceStatus::Paid | InvoiceStatus::Cancelled) {
            return Err(self.transition_error(status, "cancel"));
        }
        self.cancelled_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    fn transition_error(&self, status: InvoiceStatus, action: &'static str) -> TallyError {
        TallyError::InvalidTransition {
            invoice: self.invoice_number.clone(),
            status: status.to_string(),
            action,
        }
    }
}
