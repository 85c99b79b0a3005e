use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use super::document::Invoice;
use super::line_item::{LineItem, UnitType};
use super::number::{format_invoice_number, MAX_SEQUENCE, MAX_YEAR, MIN_YEAR};
use crate::config::{CatalogItem, InvoiceSettings};
use crate::error::{Result, TallyError};
use crate::store::Repository;

/// Input for creating an invoice
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub client_id: String,
    pub issue_date: NaiveDate,
    /// Defaults to `issue_date + due_days`
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub line_items: Vec<LineItem>,
}

/// Changes to an existing invoice. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct InvoiceEdit {
    pub line_items: Option<Vec<LineItem>>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Parse one `--line` argument into a line item.
///
/// Accepted forms:
/// - `<catalog-key>:<qty>` e.g. `consulting:8`
/// - `section:<title>`
/// - `discount:<description>:<amount>`
/// - `custom:<description>:<qty>:<unit>:<price>`
pub fn parse_line_input(
    input: &str,
    catalog: &HashMap<String, CatalogItem>,
    position: i32,
) -> Result<LineItem> {
    let invalid = |reason: &str| TallyError::InvalidLine {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let (head, rest) = input
        .split_once(':')
        .ok_or_else(|| invalid("expected 'item:quantity', 'section:...' or 'discount:...'"))?;

    match head {
        "section" => {
            let title = rest.trim();
            if title.is_empty() {
                return Err(invalid("section title is empty"));
            }
            Ok(LineItem::section(title, position))
        }
        "discount" => {
            let (description, amount) = rest
                .rsplit_once(':')
                .ok_or_else(|| invalid("expected 'discount:description:amount'"))?;
            let amount = parse_amount(amount)?;
            Ok(LineItem::discount(description.trim(), amount, position))
        }
        "custom" => {
            let parts: Vec<&str> = rest.rsplitn(4, ':').collect();
            let [price, unit, qty, description] = parts.as_slice() else {
                return Err(invalid(
                    "expected 'custom:description:quantity:unit:price'",
                ));
            };
            let description = description.trim();
            let quantity = parse_quantity(description, qty)?;
            let unit = UnitType::from_str(unit).map_err(|e| invalid(e.as_str()))?;
            let price = parse_amount(price)?;
            Ok(LineItem::item(description, quantity, unit, price, position))
        }
        key => {
            let quantity = parse_quantity(key, rest)?;
            let item = catalog
                .get(key)
                .ok_or_else(|| TallyError::ItemNotFound(key.to_string()))?;
            Ok(LineItem::item(
                item.description.clone(),
                quantity,
                item.unit,
                item.rate,
                position,
            ))
        }
    }
}

/// Parse every `--line` argument, numbering positions in input order.
pub fn parse_line_inputs(
    inputs: &[String],
    catalog: &HashMap<String, CatalogItem>,
) -> Result<Vec<LineItem>> {
    inputs
        .iter()
        .zip(1..)
        .map(|(input, position)| parse_line_input(input, catalog, position))
        .collect()
}

fn parse_quantity(item: &str, qty: &str) -> Result<Decimal> {
    let quantity = Decimal::from_str(qty.trim()).map_err(|_| TallyError::InvalidQuantity {
        item: item.to_string(),
        qty: qty.to_string(),
        reason: "must be a number".to_string(),
    })?;

    if quantity <= Decimal::ZERO {
        return Err(TallyError::InvalidQuantity {
            item: item.to_string(),
            qty: qty.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok(quantity)
}

/// Parse a non-negative money amount
pub fn parse_amount(value: &str) -> Result<Decimal> {
    match Decimal::from_str(value.trim()) {
        Ok(amount) if amount >= Decimal::ZERO => Ok(amount),
        _ => Err(TallyError::InvalidAmount(value.to_string())),
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| TallyError::InvalidDate(value.to_string()))
}

/// Renumber positions 1..n, keeping the current position order.
fn normalize_positions(items: &mut [LineItem]) {
    items.sort_by_key(|i| i.position);
    for (item, position) in items.iter_mut().zip(1..) {
        item.position = position;
    }
}

/// Create and store a new draft invoice.
///
/// The invoice must name an existing client and carry at least one
/// regular item. Its number is reserved only after validation passes, and
/// creation fails once the year has used all 9999 numbers.
pub fn create_invoice<R: Repository + ?Sized>(
    repo: &mut R,
    new: NewInvoice,
    settings: &InvoiceSettings,
    now: DateTime<Utc>,
) -> Result<Invoice> {
    let id = uuid::Uuid::new_v4().to_string();
    let due_date = new
        .due_date
        .unwrap_or_else(|| new.issue_date + Duration::days(i64::from(settings.due_days)));

    let mut line_items = new.line_items;
    normalize_positions(&mut line_items);
    for item in &mut line_items {
        item.invoice_id = id.clone();
    }

    let mut invoice = Invoice {
        id,
        invoice_number: String::new(),
        client_id: new.client_id.trim().to_string(),
        issue_date: new.issue_date,
        due_date,
        notes: new.notes.filter(|n| !n.trim().is_empty()),
        token: uuid::Uuid::new_v4().simple().to_string(),
        created_at: now,
        updated_at: now,
        sent_at: None,
        paid_at: None,
        cancelled_at: None,
        line_items,
    };

    invoice.validate_for_save()?;
    repo.get_client(&invoice.client_id)?;

    let year = invoice.issue_date.year();
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(TallyError::InvalidInvoiceYear(year));
    }
    let seq = repo.next_invoice_sequence(year)?;
    if seq > MAX_SEQUENCE {
        return Err(TallyError::SequenceExhausted { year });
    }
    invoice.invoice_number = format_invoice_number(year, seq);
    repo.save_invoice(invoice.clone())?;

    tracing::info!(
        invoice = %invoice.invoice_number,
        client = %invoice.client_id,
        total = %invoice.totals().total,
        "invoice created"
    );
    Ok(invoice)
}

/// Apply an edit to an open invoice.
pub fn update_invoice<R: Repository + ?Sized>(
    repo: &mut R,
    reference: &str,
    edit: InvoiceEdit,
    now: DateTime<Utc>,
) -> Result<Invoice> {
    let mut invoice = repo.get_invoice(reference)?;
    invoice.ensure_editable("edit", now)?;

    if let Some(mut items) = edit.line_items {
        normalize_positions(&mut items);
        invoice.set_line_items(items, now)?;
    }
    if let Some(due_date) = edit.due_date {
        invoice.due_date = due_date;
    }
    if let Some(notes) = edit.notes {
        invoice.notes = Some(notes).filter(|n| !n.trim().is_empty());
    }
    invoice.validate_for_save()?;
    invoice.updated_at = now;

    repo.save_invoice(invoice.clone())?;
    tracing::info!(invoice = %invoice.invoice_number, "invoice updated");
    Ok(invoice)
}

pub fn send_invoice<R: Repository + ?Sized>(
    repo: &mut R,
    reference: &str,
    now: DateTime<Utc>,
) -> Result<Invoice> {
    let mut invoice = repo.get_invoice(reference)?;
    invoice.send(now)?;
    repo.save_invoice(invoice.clone())?;
    tracing::info!(invoice = %invoice.invoice_number, "invoice sent");
    Ok(invoice)
}

pub fn mark_invoice_paid<R: Repository + ?Sized>(
    repo: &mut R,
    reference: &str,
    paid_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Invoice> {
    let mut invoice = repo.get_invoice(reference)?;
    invoice.mark_paid(paid_at, now)?;
    repo.save_invoice(invoice.clone())?;
    tracing::info!(invoice = %invoice.invoice_number, "invoice marked paid");
    Ok(invoice)
}

pub fn cancel_invoice<R: Repository + ?Sized>(
    repo: &mut R,
    reference: &str,
    now: DateTime<Utc>,
) -> Result<Invoice> {
    let mut invoice = repo.get_invoice(reference)?;
    invoice.cancel(now)?;
    repo.save_invoice(invoice.clone())?;
    tracing::info!(invoice = %invoice.invoice_number, "invoice cancelled");
    Ok(invoice)
}
