use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a line on the invoice represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    Item,
    Section,
    Discount,
}

/// Billing unit for regular items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    #[serde(alias = "hour")]
    Hours,
    #[serde(alias = "day")]
    Days,
    #[serde(alias = "item")]
    Items,
    #[serde(alias = "unit")]
    Units,
    #[serde(alias = "flat")]
    Fixed,
}

impl UnitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Hours => "hours",
            UnitType::Days => "days",
            UnitType::Items => "items",
            UnitType::Units => "units",
            UnitType::Fixed => "fixed",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitType {
    type Err = String;

    /// Accepts both the plural names and the singular forms used in
    /// catalog files ("hour", "day", "flat").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hours" | "hour" => Ok(UnitType::Hours),
            "days" | "day" => Ok(UnitType::Days),
            "items" | "item" => Ok(UnitType::Items),
            "units" | "unit" => Ok(UnitType::Units),
            "fixed" | "flat" => Ok(UnitType::Fixed),
            other => Err(format!("unknown unit type '{other}'")),
        }
    }
}

/// One row of an invoice.
///
/// Only `Item` rows carry a quantity and unit type. `Discount` rows keep
/// their amount in `unit_price` as a negative number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub invoice_id: String,
    #[serde(rename = "type")]
    pub kind: LineItemKind,
    pub description: String,
    pub position: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<UnitType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
}

impl LineItem {
    pub fn item(
        description: impl Into<String>,
        quantity: Decimal,
        unit_type: UnitType,
        unit_price: Decimal,
        position: i32,
    ) -> Self {
        Self {
            id: new_line_id(),
            invoice_id: String::new(),
            kind: LineItemKind::Item,
            description: description.into(),
            position,
            quantity: Some(quantity),
            unit_type: Some(unit_type),
            unit_price: Some(unit_price),
        }
    }

    pub fn section(title: impl Into<String>, position: i32) -> Self {
        Self {
            id: new_line_id(),
            invoice_id: String::new(),
            kind: LineItemKind::Section,
            description: title.into(),
            position,
            quantity: None,
            unit_type: None,
            unit_price: None,
        }
    }

    /// Builds a discount row. The amount may be given as a magnitude; it is
    /// always stored negative.
    pub fn discount(description: impl Into<String>, amount: Decimal, position: i32) -> Self {
        Self {
            id: new_line_id(),
            invoice_id: String::new(),
            kind: LineItemKind::Discount,
            description: description.into(),
            position,
            quantity: None,
            unit_type: None,
            unit_price: Some(-amount.abs()),
        }
    }

    /// Amount this row contributes to the invoice total.
    pub fn line_total(&self) -> Decimal {
        match self.kind {
            LineItemKind::Item => {
                self.quantity.unwrap_or_default() * self.unit_price.unwrap_or_default()
            }
            LineItemKind::Section => Decimal::ZERO,
            LineItemKind::Discount => -self.unit_price.unwrap_or_default().abs(),
        }
    }
}

fn new_line_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Position to give the next row appended to `items`.
pub fn next_position(items: &[LineItem]) -> i32 {
    items.iter().map(|i| i.position).max().map_or(1, |max| max + 1)
}

/// Returns the rows ordered by position. Rows sharing a position keep their
/// relative order.
pub fn sorted_by_position(items: &[LineItem]) -> Vec<&LineItem> {
    let mut sorted: Vec<&LineItem> = items.iter().collect();
    sorted.sort_by_key(|i| i.position);
    sorted
}
