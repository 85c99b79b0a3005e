//! Dashboard figures: money metrics, recent invoices, activity feed and
//! status filter counts.

use chrono::{DateTime, Datelike, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::client::Client;
use crate::invoice::{Invoice, InvoiceStatus};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardMetrics {
    /// Pending plus overdue
    pub total_outstanding: Decimal,
    pub total_paid_this_month: Decimal,
    pub total_paid_ytd: Decimal,
    pub overdue_amount: Decimal,
    pub overdue_count: usize,
}

pub fn compute_metrics(invoices: &[Invoice], now: DateTime<Utc>) -> DashboardMetrics {
    let today = now.date_naive();
    let mut metrics = DashboardMetrics::default();

    for invoice in invoices {
        let total = invoice.totals().total;
        match invoice.status(today) {
            InvoiceStatus::Pending => metrics.total_outstanding += total,
            InvoiceStatus::Overdue => {
                metrics.total_outstanding += total;
                metrics.overdue_amount += total;
                metrics.overdue_count += 1;
            }
            InvoiceStatus::Paid => {
                if let Some(paid_at) = invoice.paid_at {
                    if paid_at.year() == now.year() {
                        metrics.total_paid_ytd += total;
                        if paid_at.month() == now.month() {
                            metrics.total_paid_this_month += total;
                        }
                    }
                }
            }
            InvoiceStatus::Draft | InvoiceStatus::Cancelled => {}
        }
    }

    metrics
}

/// Newest invoices first, by creation time.
pub fn recent_invoices(invoices: &[Invoice], limit: usize) -> Vec<&Invoice> {
    let mut sorted: Vec<&Invoice> = invoices.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    InvoiceCreated,
    InvoiceSent,
    InvoicePaid,
    InvoiceOverdue,
    ClientCreated,
}

impl ActivityKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ActivityKind::InvoiceCreated => "file-text",
            ActivityKind::InvoiceSent => "send",
            ActivityKind::InvoicePaid => "check-circle",
            ActivityKind::InvoiceOverdue => "alert-circle",
            ActivityKind::ClientCreated => "user-plus",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::InvoiceCreated => "Created",
            ActivityKind::InvoiceSent => "Sent",
            ActivityKind::InvoicePaid => "Paid",
            ActivityKind::InvoiceOverdue => "Overdue",
            ActivityKind::ClientCreated => "New client",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedKind {
    Invoice,
    Client,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub id: String,
    pub kind: ActivityKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub related_id: String,
    pub related_kind: RelatedKind,
}

/// Build the activity feed from invoice and client history, newest first.
///
/// An invoice becomes overdue at the start of the day after its due date.
pub fn recent_activity(
    clients: &[Client],
    invoices: &[Invoice],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<Activity> {
    let names: HashMap<&str, &str> = clients
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();
    let today = now.date_naive();
    let mut events = Vec::new();

    for invoice in invoices {
        let number = &invoice.invoice_number;
        let client = names
            .get(invoice.client_id.as_str())
            .copied()
            .unwrap_or(invoice.client_id.as_str());
        let event = |kind: ActivityKind, timestamp: DateTime<Utc>, description: String| Activity {
            id: format!("{}-{}", invoice.id, kind.icon()),
            kind,
            description,
            timestamp,
            related_id: invoice.id.clone(),
            related_kind: RelatedKind::Invoice,
        };

        events.push(event(
            ActivityKind::InvoiceCreated,
            invoice.created_at,
            format!("Invoice #{number} created for {client}"),
        ));
        if let Some(sent_at) = invoice.sent_at {
            events.push(event(
                ActivityKind::InvoiceSent,
                sent_at,
                format!("Invoice #{number} sent to {client}"),
            ));
        }
        if let Some(paid_at) = invoice.paid_at {
            events.push(event(
                ActivityKind::InvoicePaid,
                paid_at,
                format!("Payment received for invoice #{number}"),
            ));
        }
        if invoice.status(today) == InvoiceStatus::Overdue {
            let became_overdue = (invoice.due_date + Duration::days(1))
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc());
            if let Some(timestamp) = became_overdue {
                events.push(event(
                    ActivityKind::InvoiceOverdue,
                    timestamp,
                    format!("Invoice #{number} is overdue"),
                ));
            }
        }
    }

    events.extend(clients.iter().map(|c| Activity {
        id: format!("{}-user-plus", c.id),
        kind: ActivityKind::ClientCreated,
        description: format!("New client {} added", c.name),
        timestamp: c.created_at,
        related_id: c.id.clone(),
        related_kind: RelatedKind::Client,
    }));

    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events.truncate(limit);
    events
}

/// One entry of the status filter tabs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOption {
    /// `None` selects every invoice
    pub value: Option<InvoiceStatus>,
    pub label: &'static str,
    pub count: usize,
}

pub fn status_filter_options(invoices: &[Invoice], now: DateTime<Utc>) -> Vec<FilterOption> {
    let today = now.date_naive();
    let mut counts: HashMap<InvoiceStatus, usize> = HashMap::new();
    for invoice in invoices {
        *counts.entry(invoice.status(today)).or_default() += 1;
    }

    let mut options = vec![FilterOption {
        value: None,
        label: "All",
        count: invoices.len(),
    }];
    options.extend(InvoiceStatus::ALL.into_iter().map(|status| FilterOption {
        value: Some(status),
        label: status.label(),
        count: counts.get(&status).copied().unwrap_or(0),
    }));
    options
}

pub fn filter_by_status(
    invoices: &[Invoice],
    status: Option<InvoiceStatus>,
    now: DateTime<Utc>,
) -> Vec<&Invoice> {
    let today = now.date_naive();
    invoices
        .iter()
        .filter(|i| status.map_or(true, |s| i.status(today) == s))
        .collect()
}
