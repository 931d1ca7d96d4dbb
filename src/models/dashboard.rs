//! Dashboard models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::product::Product;

/// Today's sales figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySales {
    /// Total value of today's sales.
    pub total_amount: Decimal,

    /// Number of bills issued today.
    pub bills_count: u64,

    /// Value settled in cash.
    pub cash_sales: Decimal,

    /// Value deferred to credit.
    pub credit_sales: Decimal,

    /// Value settled over UPI.
    pub upi_sales: Decimal,

    /// Value settled by card.
    pub card_sales: Decimal,
}

/// Outstanding credit across all customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditOutstanding {
    /// Total credit outstanding.
    pub total_amount: Decimal,

    /// Customers carrying a balance.
    pub customers_count: u64,

    /// Largest single outstanding balance.
    pub largest_outstanding: Decimal,
}

/// Inventory health summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    /// Products currently active.
    pub active_products: u64,

    /// Products at or below their low-stock threshold.
    pub low_stock_count: u64,

    /// Products fully out of stock.
    pub out_of_stock_count: u64,

    /// Total value of stock on hand.
    pub total_value: Decimal,
}

/// Customer base summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    /// All registered customers.
    pub total: u64,

    /// Customers marked active.
    pub active_customers: u64,

    /// Customers registered in the last seven days.
    pub new_this_week: u64,
}

/// Stock and expiry alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAlerts {
    /// Products running low.
    pub low_stock_products: Vec<Product>,

    /// Products expiring soon.
    pub expiring_products: Vec<Product>,
}

/// Complete dashboard payload from `GET /dashboard`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    /// Today's sales figures.
    pub today_sales: TodaySales,

    /// Outstanding credit summary.
    pub credit_outstanding: CreditOutstanding,

    /// Inventory health summary.
    pub inventory: InventorySummary,

    /// Customer base summary.
    pub customers: CustomerSummary,

    /// Stock and expiry alerts.
    pub alerts: DashboardAlerts,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn dashboard_decodes_server_json() -> TestResult {
        let json = r#"
            {
                "todaySales": {
                    "totalAmount": 5230.5,
                    "billsCount": 17,
                    "cashSales": 3000.0,
                    "creditSales": 1230.5,
                    "upiSales": 800.0,
                    "cardSales": 200.0
                },
                "creditOutstanding": {
                    "totalAmount": 15400.0,
                    "customersCount": 23,
                    "largestOutstanding": 2000.0
                },
                "inventory": {
                    "activeProducts": 312,
                    "lowStockCount": 9,
                    "outOfStockCount": 2,
                    "totalValue": 184230.0
                },
                "customers": {
                    "total": 140,
                    "activeCustomers": 97,
                    "newThisWeek": 4
                },
                "alerts": {
                    "lowStockProducts": [],
                    "expiringProducts": []
                }
            }
        "#;

        let dashboard: DashboardData = serde_json::from_str(json)?;

        assert_eq!(dashboard.today_sales.bills_count, 17);
        assert_eq!(dashboard.inventory.low_stock_count, 9);
        assert_eq!(
            dashboard.credit_outstanding.total_amount,
            Decimal::from(15400)
        );
        assert!(dashboard.alerts.low_stock_products.is_empty());

        Ok(())
    }
}
