//! Dashboard service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    api::{ApiClient, error::ApiError},
    models::dashboard::DashboardData,
};

/// Dashboard service backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpDashboardService {
    client: ApiClient,
}

impl HttpDashboardService {
    /// Create a service on top of the given client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DashboardService for HttpDashboardService {
    async fn dashboard(&self) -> Result<DashboardData, ApiError> {
        self.client.get("/dashboard").await
    }
}

#[automock]
#[async_trait]
pub trait DashboardService: Send + Sync {
    /// The combined store overview: today's sales, credit outstanding,
    /// inventory health, customer statistics, and alert lists.
    async fn dashboard(&self) -> Result<DashboardData, ApiError>;
}
