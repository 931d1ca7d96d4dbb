//! Credit ledger service.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;

use crate::{
    api::{ApiClient, error::ApiError},
    models::{
        credit::{CreditPayment, CreditPaymentReceipt, CreditTransaction},
        customer::{Customer, CustomerId},
        page::Page,
    },
};

/// Credit ledger service backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpCreditService {
    client: ApiClient,
}

impl HttpCreditService {
    /// Create a service on top of the given client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CreditService for HttpCreditService {
    async fn record_payment(
        &self,
        payment: CreditPayment,
    ) -> Result<CreditPaymentReceipt, ApiError> {
        self.client.post("/credit/payment", &payment).await
    }

    async fn customer_history(
        &self,
        customer: &CustomerId,
    ) -> Result<Vec<CreditTransaction>, ApiError> {
        self.client.get(&format!("/credit/customer/{customer}")).await
    }

    async fn transactions(&self, page: u32, size: u32) -> Result<Page<CreditTransaction>, ApiError> {
        let params = [("page", page.to_string()), ("size", size.to_string())];

        self.client.get_with("/credit/transactions", &params).await
    }

    async fn outstanding_accounts(&self) -> Result<Vec<Customer>, ApiError> {
        self.client.get("/credit/outstanding").await
    }

    async fn total_outstanding(&self) -> Result<Decimal, ApiError> {
        self.client.get("/credit/total").await
    }
}

#[automock]
#[async_trait]
pub trait CreditService: Send + Sync {
    /// Record a payment against a customer's credit balance.
    async fn record_payment(
        &self,
        payment: CreditPayment,
    ) -> Result<CreditPaymentReceipt, ApiError>;

    /// Credit history for a single customer.
    async fn customer_history(
        &self,
        customer: &CustomerId,
    ) -> Result<Vec<CreditTransaction>, ApiError>;

    /// The full credit ledger, paginated.
    async fn transactions(&self, page: u32, size: u32)
    -> Result<Page<CreditTransaction>, ApiError>;

    /// Customers with credit outstanding.
    async fn outstanding_accounts(&self) -> Result<Vec<Customer>, ApiError>;

    /// Total credit outstanding across all customers.
    async fn total_outstanding(&self) -> Result<Decimal, ApiError>;
}
