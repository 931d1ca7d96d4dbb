//! Customers service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    api::{ApiClient, error::ApiError},
    models::{
        customer::{Customer, CustomerId, CustomerPatch, NewCustomer},
        page::{ListQuery, Page, SortOrder},
    },
};

/// Customers service backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpCustomersService {
    client: ApiClient,
}

impl HttpCustomersService {
    /// Create a service on top of the given client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CustomersService for HttpCustomersService {
    async fn list(&self, query: ListQuery) -> Result<Page<Customer>, ApiError> {
        self.client
            .get_with("/customers", &list_params(&query))
            .await
    }

    async fn get(&self, id: &CustomerId) -> Result<Customer, ApiError> {
        self.client.get(&format!("/customers/{id}")).await
    }

    async fn create(&self, customer: NewCustomer) -> Result<Customer, ApiError> {
        self.client.post("/customers", &customer).await
    }

    async fn update(&self, id: &CustomerId, patch: CustomerPatch) -> Result<Customer, ApiError> {
        self.client.put(&format!("/customers/{id}"), &patch).await
    }

    async fn delete(&self, id: &CustomerId) -> Result<(), ApiError> {
        self.client.delete(&format!("/customers/{id}")).await
    }

    async fn with_credit(&self) -> Result<Vec<Customer>, ApiError> {
        self.client.get("/customers/with-credit").await
    }

    async fn top(&self, page: u32, size: u32) -> Result<Page<Customer>, ApiError> {
        let params = [("page", page.to_string()), ("size", size.to_string())];

        self.client.get_with("/customers/top", &params).await
    }
}

#[automock]
#[async_trait]
pub trait CustomersService: Send + Sync {
    /// List customers, filtered and paginated by `query`.
    async fn list(&self, query: ListQuery) -> Result<Page<Customer>, ApiError>;

    /// Retrieve a single customer.
    async fn get(&self, id: &CustomerId) -> Result<Customer, ApiError>;

    /// Create a new customer.
    async fn create(&self, customer: NewCustomer) -> Result<Customer, ApiError>;

    /// Apply changes to an existing customer.
    async fn update(&self, id: &CustomerId, patch: CustomerPatch) -> Result<Customer, ApiError>;

    /// Delete a customer.
    async fn delete(&self, id: &CustomerId) -> Result<(), ApiError>;

    /// Customers carrying an outstanding credit balance.
    async fn with_credit(&self) -> Result<Vec<Customer>, ApiError>;

    /// Customers ranked by how much they have spent.
    async fn top(&self, page: u32, size: u32) -> Result<Page<Customer>, ApiError>;
}

fn list_params(query: &ListQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("size", query.size.to_string()),
        (
            "sortBy",
            query.sort_by.as_deref().unwrap_or("name").to_string(),
        ),
        (
            "sortOrder",
            query
                .sort_order
                .unwrap_or(SortOrder::Asc)
                .as_str()
                .to_string(),
        ),
    ];

    if let Some(search) = &query.search {
        params.push(("search", search.clone()));
    }

    params
}
