//! Sales service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    api::{ApiClient, error::ApiError},
    models::{
        page::{Page, SortOrder},
        sale::{Sale, SaleId, SaleListQuery, SaleRequest},
    },
};

/// Sales service backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpSalesService {
    client: ApiClient,
}

impl HttpSalesService {
    /// Create a service on top of the given client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SalesService for HttpSalesService {
    async fn create(&self, sale: SaleRequest) -> Result<Sale, ApiError> {
        self.client.post("/sales", &sale).await
    }

    async fn list(&self, query: SaleListQuery) -> Result<Page<Sale>, ApiError> {
        self.client.get_with("/sales", &list_params(&query)).await
    }

    async fn get(&self, id: &SaleId) -> Result<Sale, ApiError> {
        self.client.get(&format!("/sales/{id}")).await
    }

    async fn by_bill(&self, bill_number: &str) -> Result<Sale, ApiError> {
        self.client.get(&format!("/sales/bill/{bill_number}")).await
    }

    async fn today(&self) -> Result<Vec<Sale>, ApiError> {
        self.client.get("/sales/today").await
    }
}

#[automock]
#[async_trait]
pub trait SalesService: Send + Sync {
    /// Record a completed sale.
    async fn create(&self, sale: SaleRequest) -> Result<Sale, ApiError>;

    /// List past sales, filtered and paginated by `query`.
    async fn list(&self, query: SaleListQuery) -> Result<Page<Sale>, ApiError>;

    /// Retrieve a single sale.
    async fn get(&self, id: &SaleId) -> Result<Sale, ApiError>;

    /// Retrieve a sale by its bill number.
    async fn by_bill(&self, bill_number: &str) -> Result<Sale, ApiError>;

    /// Sales recorded today.
    async fn today(&self) -> Result<Vec<Sale>, ApiError>;
}

fn list_params(query: &SaleListQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("size", query.size.to_string()),
        (
            "sortBy",
            query.sort_by.as_deref().unwrap_or("createdAt").to_string(),
        ),
        (
            "sortOrder",
            query
                .sort_order
                .unwrap_or(SortOrder::Desc)
                .as_str()
                .to_string(),
        ),
    ];

    if let Some(start_date) = query.start_date {
        params.push(("startDate", start_date.to_string()));
    }

    if let Some(end_date) = query.end_date {
        params.push(("endDate", end_date.to_string()));
    }

    params
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn default_query_sorts_by_creation_time_descending() {
        let params = list_params(&SaleListQuery::default());

        assert_eq!(
            params,
            vec![
                ("page", "0".to_string()),
                ("size", "20".to_string()),
                ("sortBy", "createdAt".to_string()),
                ("sortOrder", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn date_range_is_sent_in_iso_form() {
        let query = SaleListQuery {
            start_date: Some(date(2026, 8, 1)),
            end_date: Some(date(2026, 8, 21)),
            ..SaleListQuery::default()
        };

        let params = list_params(&query);

        assert!(
            params.contains(&("startDate", "2026-08-01".to_string())),
            "expected startDate, got {params:?}"
        );
        assert!(
            params.contains(&("endDate", "2026-08-21".to_string())),
            "expected endDate, got {params:?}"
        );
    }
}
