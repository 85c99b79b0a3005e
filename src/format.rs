//! Display formatting for money, dates and timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Format money with thousands separators and two decimals, e.g. `S$1,234.56`.
/// The sign goes before the symbol: `-S$10.00`.
pub fn format_currency(amount: Decimal, currency_symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let plain = format!("{:.2}", rounded.abs());
    let (whole, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    format!(
        "{}{}{}.{}",
        if negative { "-" } else { "" },
        currency_symbol,
        group_digits(whole),
        frac
    )
}

/// Insert a comma every three digits from the right
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

/// `15 Jan 2025`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Human-readable age of `then` relative to `now`, e.g. "3 hours ago".
/// Future timestamps read as "Just now".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "Just now".to_string();
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return ago(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return ago(hours, "hour");
    }
    let days = hours / 24;
    if days < 7 {
        return ago(days, "day");
    }
    let weeks = days / 7;
    if weeks < 4 {
        return ago(weeks, "week");
    }
    let months = (days / 30).max(1);
    if months < 12 {
        return ago(months, "month");
    }
    ago((days / 365).max(1), "year")
}

fn ago(n: i64, unit: &str) -> String {
    format!("{n} {unit}{} ago", if n == 1 { "" } else { "s" })
}

/// Cut `text` to at most `max_len` characters, ending in "..." when cut.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
