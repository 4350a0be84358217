use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceCatalogEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: Decimal,
    #[serde(default)]
    pub price_max: Option<Decimal>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_currency() -> String {
    "RON".to_string()
}

fn default_color() -> String {
    "#2563eb".to_string()
}

impl ServiceCatalogEntry {
    /// Duration must be positive and a price range must not be inverted.
    pub fn is_well_formed(&self) -> bool {
        self.duration_minutes > 0 && self.price_max.map_or(true, |max| max >= self.price)
    }

    /// `50 RON`, or `50-70 RON` for a price range.
    pub fn price_label(&self) -> String {
        let price = self.price.normalize();
        match self.price_max {
            Some(max) if max > self.price => {
                format!("{price}-{} {}", max.normalize(), self.currency)
            }
            _ => format!("{price} {}", self.currency),
        }
    }
}
