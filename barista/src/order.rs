use rust_decimal::prelude::ToPrimitive;
use serde::Serializer;
use serde_derive::{Deserialize, Serialize};

use crate::catalog::Price;

// The backend reads prices as JSON numbers: whole amounts stay integers.
fn price_number<S: Serializer>(price: &Price, serializer: S) -> Result<S::Ok, S::Error> {
    let price = price.normalize();
    match price.to_i64() {
        Some(whole) if price.scale() == 0 => serializer.serialize_i64(whole),
        _ => serializer.serialize_f64(price.to_f64().unwrap_or_default()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub name: String,
    pub size: String,
    // Line total including additions
    #[serde(serialize_with = "price_number")]
    pub price: Price,
    pub additions: Vec<String>,
    pub comment: String,
}

/// Body of `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub user_id: i64,
    pub items: Vec<OrderLine>,
    #[serde(serialize_with = "price_number")]
    pub total: Price,
    pub delivery_time: String,
    pub order_comment: String,
}

/// Reply to `POST /order`. A missing `success` counts as a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl OrderReceipt {
    pub fn failure_reason(&self) -> &str {
        self.error.as_deref().unwrap_or("Неизвестная ошибка")
    }
}
