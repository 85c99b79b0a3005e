use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TallyError;

/// Lifecycle stage of an invoice, always derived from its dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 5] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Pending,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
        InvoiceStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Cancelled => "Cancelled",
        }
    }

    /// Long-form description for screen readers and verbose output.
    pub fn description(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Invoice is in draft status and has not been sent",
            InvoiceStatus::Pending => "Invoice has been sent and is awaiting payment",
            InvoiceStatus::Paid => "Invoice has been paid in full",
            InvoiceStatus::Overdue => "Invoice payment is past due date",
            InvoiceStatus::Cancelled => "Invoice has been cancelled and is no longer active",
        }
    }

    /// Whether the client may still pay this invoice.
    pub fn is_payable(&self) -> bool {
        matches!(self, InvoiceStatus::Pending | InvoiceStatus::Overdue)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InvoiceStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TallyError::InvalidStatus(s.to_string()))
    }
}

/// The facts a status is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDates {
    pub due_date: NaiveDate,
    pub sent_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Derive the status as of `today`.
///
/// Cancellation beats payment, payment beats the due date, and a passed due
/// date beats having been sent. The due date itself is not yet overdue.
pub fn resolve_status(dates: &StatusDates, today: NaiveDate) -> InvoiceStatus {
    if dates.cancelled_at.is_some() {
        InvoiceStatus::Cancelled
    } else if dates.paid_at.is_some() {
        InvoiceStatus::Paid
    } else if dates.due_date < today {
        InvoiceStatus::Overdue
    } else if dates.sent_at.is_some() {
        InvoiceStatus::Pending
    } else {
        InvoiceStatus::Draft
    }
}
