use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::invoice::UnitType;

/// A reusable billable item from items.toml
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogItem {
    pub description: String,
    pub rate: Decimal,
    pub unit: UnitType,
}
