use rust_decimal::Decimal;
use serde::Serialize;

use super::line_item::{LineItem, LineItemKind};

/// Totals derived from an invoice's line items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub total_discount: Decimal,
    pub total: Decimal,
}

/// Reduce line items into subtotal, discount and total.
///
/// Sections contribute nothing. Items missing a quantity or price count as
/// zero. Discounts always reduce the total, whichever sign they were stored
/// with. The total is not clamped at zero.
pub fn calculate_totals(items: &[LineItem]) -> InvoiceTotals {
    let mut subtotal = Decimal::ZERO;
    let mut total_discount = Decimal::ZERO;

    for item in items {
        match item.kind {
            LineItemKind::Item => subtotal += item.line_total(),
            LineItemKind::Discount => total_discount += item.line_total(),
            LineItemKind::Section => {}
        }
    }

    InvoiceTotals {
        subtotal,
        total_discount,
        total: subtotal + total_discount,
    }
}
