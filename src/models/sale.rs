//! Sale models.
//!
//! The checkout request deliberately carries only `(productId, quantity,
//! discount)` per line; the server is the source of truth for pricing at
//! transaction time, and the `Sale` it returns is authoritative over
//! anything computed client-side.

use std::fmt;

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{customer::CustomerId, page::SortOrder, product::ProductId};

/// Server-assigned sale identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(String);

impl SaleId {
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

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SaleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Payment method accepted at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash payment.
    #[default]
    Cash,

    /// UPI transfer.
    Upi,

    /// Card payment.
    Card,

    /// Full amount deferred to the customer's credit (udhaar) balance.
    Credit,

    /// Part paid now, remainder deferred to credit.
    Partial,
}

impl PaymentMethod {
    /// Every accepted payment method, in display order.
    pub const ALL: [Self; 5] = [Self::Cash, Self::Upi, Self::Card, Self::Credit, Self::Partial];

    /// Wire value, e.g. `"CASH"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Upi => "UPI",
            Self::Card => "CARD",
            Self::Credit => "CREDIT",
            Self::Partial => "PARTIAL",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finalized line of a completed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    /// Product sold.
    pub product_id: ProductId,

    /// Product name at transaction time.
    pub product_name: String,

    /// Units sold.
    pub quantity: u32,

    /// Unit price the server charged.
    pub unit_price: Decimal,

    /// Per-unit discount the server granted.
    pub discount: Decimal,

    /// Final total for the line.
    pub line_total: Decimal,
}

/// Customer snapshot embedded in a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleCustomer {
    /// Customer display name.
    pub name: String,
}

/// Completed sale as returned by the sales endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Server-assigned identifier.
    pub id: SaleId,

    /// Server-assigned bill number.
    pub bill_number: String,

    /// Customer the sale was recorded against, absent for walk-ins.
    pub customer: Option<SaleCustomer>,

    /// Customer display name, absent for walk-ins.
    pub customer_name: Option<String>,

    /// Finalized line items.
    pub items: Vec<SaleItem>,

    /// Sum of line prices before discount.
    pub subtotal: Decimal,

    /// Total discount granted.
    pub discount_amount: Decimal,

    /// Tax charged.
    pub tax_amount: Decimal,

    /// Final amount owed.
    pub total_amount: Decimal,

    /// Amount the customer paid at the till.
    pub amount_paid: Decimal,

    /// Amount deferred to the customer's credit balance.
    pub credit_amount: Decimal,

    /// Payment method used.
    pub payment_method: PaymentMethod,

    /// Settlement status reported by the server.
    pub payment_status: String,

    /// Free-text note attached at checkout.
    pub notes: Option<String>,

    /// Server-formatted creation timestamp.
    pub created_at: String,

    /// Server-formatted last-update timestamp.
    pub updated_at: String,
}

impl Sale {
    /// Display name of the customer, falling back through the embedded
    /// snapshot to the walk-in label.
    #[must_use]
    pub fn customer_display(&self) -> &str {
        self.customer_name
            .as_deref()
            .or_else(|| self.customer.as_ref().map(|customer| customer.name.as_str()))
            .unwrap_or("Walk-in Customer")
    }
}

/// One requested line of a checkout submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineRequest {
    /// Product to sell.
    pub product_id: ProductId,

    /// Units to sell.
    pub quantity: u32,

    /// Per-unit discount asked for.
    pub discount: Decimal,
}

/// Request body for `POST /sales`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    /// Customer to record the sale against; omitted for walk-ins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,

    /// Requested lines.
    pub items: Vec<SaleLineRequest>,

    /// Payment method.
    pub payment_method: PaymentMethod,

    /// Amount tendered.
    pub amount_paid: Decimal,

    /// Free-text note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Query parameters for the sales listing, adding an inclusive date range
/// to the shared pagination parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleListQuery {
    /// Earliest sale date to include.
    pub start_date: Option<Date>,

    /// Latest sale date to include.
    pub end_date: Option<Date>,

    /// Zero-based page index.
    pub page: u32,

    /// Page size.
    pub size: u32,

    /// Field to sort by; the endpoint defaults to creation time.
    pub sort_by: Option<String>,

    /// Sort direction; the endpoint defaults to descending.
    pub sort_order: Option<SortOrder>,
}

impl Default for SaleListQuery {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            page: 0,
            size: 20,
            sort_by: None,
            sort_order: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn sale_json() -> &'static str {
        r#"
            {
                "id": "sal-784",
                "billNumber": "BILL-2026-000784",
                "customer": { "name": "Ramesh Kumar" },
                "customerName": "Ramesh Kumar",
                "items": [
                    {
                        "productId": "prd-001",
                        "productName": "Toor Dal 1kg",
                        "quantity": 2,
                        "unitPrice": 165.5,
                        "discount": 5.5,
                        "lineTotal": 320.0
                    }
                ],
                "subtotal": 331.0,
                "discountAmount": 11.0,
                "taxAmount": 0,
                "totalAmount": 320.0,
                "amountPaid": 320.0,
                "creditAmount": 0,
                "paymentMethod": "UPI",
                "paymentStatus": "PAID",
                "notes": null,
                "createdAt": "2026-02-11T12:03:44",
                "updatedAt": "2026-02-11T12:03:44"
            }
        "#
    }

    #[test]
    fn sale_decodes_server_json() -> TestResult {
        let sale: Sale = serde_json::from_str(sale_json())?;

        assert_eq!(sale.bill_number, "BILL-2026-000784");
        assert_eq!(sale.payment_method, PaymentMethod::Upi);
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items.first().map(|item| item.quantity), Some(2));
        assert_eq!(sale.total_amount, Decimal::from(320));
        assert_eq!(sale.customer_display(), "Ramesh Kumar");

        Ok(())
    }

    #[test]
    fn walk_in_sale_has_fallback_display_name() -> TestResult {
        let mut sale: Sale = serde_json::from_str(sale_json())?;

        sale.customer = None;
        sale.customer_name = None;

        assert_eq!(sale.customer_display(), "Walk-in Customer");

        Ok(())
    }

    #[test]
    fn walk_in_request_omits_customer_id() -> TestResult {
        let request = SaleRequest {
            customer_id: None,
            items: vec![SaleLineRequest {
                product_id: ProductId::from("prd-001"),
                quantity: 2,
                discount: Decimal::ZERO,
            }],
            payment_method: PaymentMethod::Cash,
            amount_paid: Decimal::from(331),
            notes: None,
        };

        let json = serde_json::to_value(&request)?;

        assert_eq!(
            json,
            serde_json::json!({
                "items": [
                    { "productId": "prd-001", "quantity": 2, "discount": 0.0 }
                ],
                "paymentMethod": "CASH",
                "amountPaid": 331.0
            })
        );

        Ok(())
    }

    #[test]
    fn payment_methods_use_screaming_snake_wire_values() -> TestResult {
        for method in PaymentMethod::ALL {
            let encoded = serde_json::to_string(&method)?;

            assert_eq!(encoded, format!("\"{}\"", method.as_str()));
        }

        let decoded: PaymentMethod = serde_json::from_str("\"PARTIAL\"")?;

        assert_eq!(decoded, PaymentMethod::Partial);

        Ok(())
    }
}
