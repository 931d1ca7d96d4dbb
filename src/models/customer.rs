//! Customer models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Server-assigned customer identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
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

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CustomerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Customer record as returned by the customer endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Server-assigned identifier.
    pub id: CustomerId,

    /// Display name.
    pub name: String,

    /// Phone number.
    pub phone: Option<String>,

    /// Email address.
    pub email: Option<String>,

    /// Postal address.
    pub address: Option<String>,

    /// Outstanding credit (udhaar) owed by the customer.
    pub credit_balance: Decimal,

    /// Maximum credit the store extends to this customer.
    pub credit_limit: Decimal,

    /// Accumulated loyalty points.
    pub loyalty_points: i64,

    /// Number of completed purchases.
    pub total_purchases: i64,

    /// Lifetime amount spent.
    pub total_spent: Decimal,

    /// Lifecycle status reported by the server.
    pub status: String,

    /// Server-formatted creation timestamp.
    pub created_at: String,

    /// Server-formatted last-update timestamp.
    pub updated_at: String,
}

/// Request body for creating a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    /// Display name.
    pub name: String,

    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Postal address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Credit limit; the server applies its default when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<Decimal>,
}

/// Partial update for a customer; unset fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Postal address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Credit limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn customer_decodes_server_json() -> TestResult {
        let json = r#"
            {
                "id": "cst-031",
                "name": "Ramesh Kumar",
                "phone": "9876543210",
                "email": null,
                "address": "12 Gandhi Road",
                "creditBalance": 450.0,
                "creditLimit": 2000,
                "loyaltyPoints": 120,
                "totalPurchases": 34,
                "totalSpent": 15230.5,
                "status": "ACTIVE",
                "createdAt": "2025-06-14T09:30:00",
                "updatedAt": "2026-02-01T17:45:10"
            }
        "#;

        let customer: Customer = serde_json::from_str(json)?;

        assert_eq!(customer.id, CustomerId::from("cst-031"));
        assert_eq!(customer.credit_balance, Decimal::from(450));
        assert_eq!(customer.credit_limit, Decimal::from(2000));
        assert!(customer.email.is_none());

        Ok(())
    }

    #[test]
    fn new_customer_omits_unset_fields() -> TestResult {
        let request = NewCustomer {
            name: "Sita Devi".to_string(),
            phone: Some("9123456780".to_string()),
            email: None,
            address: None,
            credit_limit: None,
        };

        let json = serde_json::to_value(&request)?;

        assert_eq!(
            json,
            serde_json::json!({ "name": "Sita Devi", "phone": "9123456780" })
        );

        Ok(())
    }
}
