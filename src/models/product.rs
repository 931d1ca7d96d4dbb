//! Product models.

use std::fmt;

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Server-assigned product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a raw identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Product record as returned by the catalogue endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Free-text description.
    pub description: Option<String>,

    /// Category label.
    pub category: Option<String>,

    /// Current selling price per unit.
    pub price: Decimal,

    /// Purchase cost per unit.
    pub cost_price: Option<Decimal>,

    /// Units currently in stock.
    pub stock_quantity: i64,

    /// Stock level below which the product counts as low stock.
    pub min_stock_level: i64,

    /// Unit of sale, e.g. `"pcs"` or `"kg"`.
    pub unit: String,

    /// Barcode, when one is registered.
    pub barcode: Option<String>,

    /// Expiry date for perishables.
    pub expiry_date: Option<Date>,

    /// Lifecycle status reported by the server.
    pub status: String,

    /// Whether stock is at or below the minimum level.
    pub is_low_stock: bool,

    /// Whether the expiry date is near.
    pub is_expiring_soon: bool,

    /// Server-formatted creation timestamp.
    pub created_at: String,

    /// Server-formatted last-update timestamp.
    pub updated_at: String,
}

/// Request body for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    /// Display name.
    pub name: String,

    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Category label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Selling price per unit.
    pub price: Decimal,

    /// Purchase cost per unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Decimal>,

    /// Opening stock.
    pub stock_quantity: i64,

    /// Low-stock threshold; the server applies its default when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock_level: Option<i64>,

    /// Unit of sale; the server applies its default when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Barcode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,

    /// Expiry date for perishables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<Date>,
}

/// Partial update for a product; unset fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Category label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Selling price per unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,

    /// Purchase cost per unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Decimal>,

    /// Stock on hand.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,

    /// Low-stock threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock_level: Option<i64>,

    /// Unit of sale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Barcode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,

    /// Expiry date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<Date>,
}
