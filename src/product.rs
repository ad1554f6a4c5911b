//! Product records consumed by the variable resolver.
//!
//! Products are external data (synced from an ERP by the surrounding
//! application); this crate only reads them. Absent string fields
//! deserialize to empty strings so resolution never produces a literal
//! `"undefined"`.

use serde::{Deserialize, Serialize};

/// One product record supplying substitution values at print time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub description: String,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            ..Default::default()
        }
    }
}
