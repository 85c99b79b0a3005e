//! Read-only invoice view for clients who hold the share token.

use chrono::NaiveDate;
use serde::Serialize;

use crate::client::Client;
use crate::error::{Result, TallyError};
use crate::invoice::{Invoice, InvoiceStatus, InvoiceTotals};
use crate::store::Repository;

/// Everything the public page shows about one invoice
#[derive(Debug, Clone, Serialize)]
pub struct PublicInvoice {
    pub invoice: Invoice,
    pub client: Client,
    pub status: InvoiceStatus,
    pub totals: InvoiceTotals,
    pub is_paid: bool,
    pub can_pay: bool,
}

/// Look up the invoice shared under `token`. The token is the only
/// credential checked.
pub fn public_invoice<R: Repository + ?Sized>(
    repo: &R,
    token: &str,
    today: NaiveDate,
) -> Result<PublicInvoice> {
    let invoice = repo
        .get_invoice_by_token(token)?
        .ok_or_else(|| TallyError::TokenNotFound(token.to_string()))?;
    let client = repo.get_client(&invoice.client_id)?;
    let status = invoice.status(today);

    tracing::debug!(invoice = %invoice.invoice_number, %status, "public invoice viewed");
    Ok(PublicInvoice {
        totals: invoice.totals(),
        is_paid: status == InvoiceStatus::Paid,
        can_pay: status.is_payable(),
        status,
        client,
        invoice,
    })
}
