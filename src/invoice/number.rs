/// Highest sequence a year can issue while keeping four digits
pub const MAX_SEQUENCE: u32 = 9999;
pub const MIN_YEAR: i32 = 1000;
pub const MAX_YEAR: i32 = 9999;

/// Format an invoice number as `YYYY-NNNN`
pub fn format_invoice_number(year: i32, sequence: u32) -> String {
    format!("{:04}-{:04}", year, sequence)
}

/// Split an invoice number back into `(year, sequence)`.
pub fn parse_invoice_number(number: &str) -> Option<(i32, u32)> {
    let (year, seq) = number.split_once('-')?;
    if year.len() != 4 || seq.len() < 4 {
        return None;
    }
    if !year.bytes().chain(seq.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((year.parse().ok()?, seq.parse().ok()?))
}
