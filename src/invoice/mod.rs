mod document;
mod line_item;
mod number;
mod status;
mod totals;
mod workflow;

pub use document::Invoice;
pub use line_item::{next_position, sorted_by_position, LineItem, LineItemKind, UnitType};
pub use number::{format_invoice_number, parse_invoice_number, MAX_SEQUENCE};
pub use status::{resolve_status, InvoiceStatus, StatusDates};
pub use totals::{calculate_totals, InvoiceTotals};
pub use workflow::{
    cancel_invoice, create_invoice, mark_invoice_paid, parse_amount, parse_date,
    parse_line_input, parse_line_inputs, send_invoice, update_invoice, InvoiceEdit, NewInvoice,
};
