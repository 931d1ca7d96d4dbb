//! Credit (udhaar) ledger models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    customer::{Customer, CustomerId},
    sale::SaleId,
};

/// Direction of a credit ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditTransactionType {
    /// Credit extended during a sale.
    CreditTaken,

    /// Payment received against outstanding credit.
    PaymentMade,
}

/// One entry in a customer's credit ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditTransaction {
    /// Server-assigned identifier.
    pub id: String,

    /// Customer whose balance changed.
    pub customer_id: CustomerId,

    /// Customer display name.
    pub customer_name: String,

    /// Sale that created the entry, when it came from a checkout.
    pub sale_id: Option<SaleId>,

    /// Whether credit was taken or paid back.
    pub transaction_type: CreditTransactionType,

    /// Amount of the entry.
    pub amount: Decimal,

    /// Customer balance before the entry.
    pub balance_before: Decimal,

    /// Customer balance after the entry.
    pub balance_after: Decimal,

    /// Method used for a payment entry.
    pub payment_method: Option<String>,

    /// Free-text note.
    pub notes: Option<String>,

    /// Server-formatted creation timestamp.
    pub created_at: String,
}

/// Payment method accepted when settling credit.
///
/// A distinct, smaller enumeration than the checkout methods: credit cannot
/// be settled with more credit, and bank transfers are accepted here only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditPaymentMethod {
    /// Cash payment.
    #[default]
    Cash,

    /// UPI transfer.
    Upi,

    /// Card payment.
    Card,

    /// Direct bank transfer.
    BankTransfer,
}

impl CreditPaymentMethod {
    /// Every accepted settlement method, in display order.
    pub const ALL: [Self; 4] = [Self::Cash, Self::Upi, Self::Card, Self::BankTransfer];

    /// Wire value, e.g. `"BANK_TRANSFER"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Upi => "UPI",
            Self::Card => "CARD",
            Self::BankTransfer => "BANK_TRANSFER",
        }
    }
}

impl std::fmt::Display for CreditPaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for `POST /credit/payment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditPayment {
    /// Customer settling credit.
    pub customer_id: CustomerId,

    /// Amount being paid back.
    pub amount: Decimal,

    /// Settlement method.
    pub payment_method: CreditPaymentMethod,

    /// Free-text note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Response to a recorded credit payment: the ledger entry plus the
/// customer's refreshed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditPaymentReceipt {
    /// Ledger entry the payment created.
    pub transaction: CreditTransaction,

    /// Customer record with the updated balance.
    pub customer: Customer,
}
