//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    api::{ApiClient, error::ApiError},
    models::{
        page::{ListQuery, Page, SortOrder},
        product::{NewProduct, Product, ProductId, ProductPatch},
    },
};

/// Products service backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpProductsService {
    client: ApiClient,
}

impl HttpProductsService {
    /// Create a service on top of the given client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductsService for HttpProductsService {
    async fn list(&self, query: ListQuery) -> Result<Page<Product>, ApiError> {
        self.client
            .get_with("/products", &list_params(&query))
            .await
    }

    async fn get(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.client.get(&format!("/products/{id}")).await
    }

    async fn by_barcode(&self, barcode: &str) -> Result<Product, ApiError> {
        self.client.get(&format!("/products/barcode/{barcode}")).await
    }

    async fn create(&self, product: NewProduct) -> Result<Product, ApiError> {
        self.client.post("/products", &product).await
    }

    async fn update(&self, id: &ProductId, patch: ProductPatch) -> Result<Product, ApiError> {
        self.client.put(&format!("/products/{id}"), &patch).await
    }

    async fn delete(&self, id: &ProductId) -> Result<(), ApiError> {
        self.client.delete(&format!("/products/{id}")).await
    }

    async fn low_stock(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get("/products/low-stock").await
    }

    async fn expiring(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get("/products/expiring").await
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// List products, filtered and paginated by `query`.
    async fn list(&self, query: ListQuery) -> Result<Page<Product>, ApiError>;

    /// Retrieve a single product.
    async fn get(&self, id: &ProductId) -> Result<Product, ApiError>;

    /// Retrieve the product carrying the given barcode.
    async fn by_barcode(&self, barcode: &str) -> Result<Product, ApiError>;

    /// Create a new product.
    async fn create(&self, product: NewProduct) -> Result<Product, ApiError>;

    /// Apply changes to an existing product.
    async fn update(&self, id: &ProductId, patch: ProductPatch) -> Result<Product, ApiError>;

    /// Delete a product.
    async fn delete(&self, id: &ProductId) -> Result<(), ApiError>;

    /// Products at or below their minimum stock level.
    async fn low_stock(&self) -> Result<Vec<Product>, ApiError>;

    /// Products whose expiry date is coming up.
    async fn expiring(&self) -> Result<Vec<Product>, ApiError>;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_sorts_by_name_ascending() {
        let params = list_params(&ListQuery::default());

        assert_eq!(
            params,
            vec![
                ("page", "0".to_string()),
                ("size", "20".to_string()),
                ("sortBy", "name".to_string()),
                ("sortOrder", "asc".to_string()),
            ]
        );
    }

    #[test]
    fn search_text_is_passed_through() {
        let params = list_params(&ListQuery::search("rice"));

        assert!(
            params.contains(&("search", "rice".to_string())),
            "expected a search parameter, got {params:?}"
        );
    }

    #[test]
    fn explicit_sort_overrides_the_default() {
        let query = ListQuery {
            sort_by: Some("price".to_string()),
            sort_order: Some(SortOrder::Desc),
            ..ListQuery::default()
        };

        let params = list_params(&query);

        assert!(
            params.contains(&("sortBy", "price".to_string())),
            "expected sortBy=price, got {params:?}"
        );
        assert!(
            params.contains(&("sortOrder", "desc".to_string())),
            "expected sortOrder=desc, got {params:?}"
        );
    }
}
