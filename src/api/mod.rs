//! HTTP client for the kirana-store backend.
//!
//! All services share one [`ApiClient`], which attaches the bearer token
//! from the session store, unwraps the backend's response envelope, and
//! clears the stored session when the backend answers 401.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::{config::Config, session::SessionStore};

pub mod auth;
pub mod credit;
pub mod customers;
pub mod dashboard;
pub mod error;
pub mod products;
pub mod sales;

pub use auth::{AuthService, HttpAuthService};
pub use credit::{CreditService, HttpCreditService};
pub use customers::{CustomersService, HttpCustomersService};
pub use dashboard::{DashboardService, HttpDashboardService};
pub use error::ApiError;
pub use products::{HttpProductsService, ProductsService};
pub use sales::{HttpSalesService, SalesService};

/// Limit on any single backend request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client shared by all backend services.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(config: &Config, session: SessionStore) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// The session store this client reads bearer tokens from.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.send(self.http.get(self.url(path))).await?;

        decode_payload(&body)
    }

    pub(crate) async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let body = self.send(self.http.get(self.url(path)).query(query)).await?;

        decode_payload(&body)
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = self.send(self.http.post(self.url(path)).json(body)).await?;

        decode_payload(&body)
    }

    pub(crate) async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = self.send(self.http.put(self.url(path)).json(body)).await?;

        decode_payload(&body)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let body = self.send(self.http.delete(self.url(path))).await?;

        ensure_accepted(&body)
    }

    /// Send the request and return the response body.
    ///
    /// A 401 clears the stored session before reporting
    /// [`ApiError::Unauthorized`]; any other non-success status is reported
    /// with the message from the response body.
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            if let Err(error) = self.session.clear() {
                warn!(%error, "stored session could not be cleared");
            }

            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        Ok(body)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Standard wrapper most backend endpoints put around their payload.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Decode a response body, unwrapping the envelope when present.
///
/// Endpoints that answer with a bare payload are decoded as-is.
fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    match serde_json::from_str::<Envelope<T>>(body) {
        Ok(Envelope {
            success: true,
            data: Some(data),
            ..
        }) => Ok(data),
        Ok(Envelope {
            success: true,
            data: None,
            message,
        }) => Err(ApiError::Rejected(
            message.unwrap_or_else(|| "response carried no data".to_string()),
        )),
        Ok(Envelope {
            success: false,
            message,
            ..
        }) => Err(ApiError::Rejected(
            message.unwrap_or_else(|| "request rejected".to_string()),
        )),
        Err(_) => Ok(serde_json::from_str(body)?),
    }
}

/// Check a body from an endpoint that carries no payload, e.g. a delete.
fn ensure_accepted(body: &str) -> Result<(), ApiError> {
    match serde_json::from_str::<Envelope<serde_json::Value>>(body) {
        Ok(Envelope {
            success: false,
            message,
            ..
        }) => Err(ApiError::Rejected(
            message.unwrap_or_else(|| "request rejected".to_string()),
        )),
        _ => Ok(()),
    }
}

fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::models::product::Product;

    use super::*;

    #[test]
    fn payload_is_unwrapped_from_envelope() -> TestResult {
        let body = r#"{
            "success": true,
            "message": "Product retrieved",
            "data": {
                "id": "p-1",
                "name": "Basmati Rice 1kg",
                "price": 165.5,
                "stockQuantity": 40,
                "minStockLevel": 10,
                "unit": "bag",
                "status": "ACTIVE",
                "isLowStock": false,
                "isExpiringSoon": false,
                "createdAt": "2026-01-05T09:00:00Z",
                "updatedAt": "2026-01-05T09:00:00Z"
            }
        }"#;

        let product: Product = decode_payload(body)?;

        assert_eq!(product.name, "Basmati Rice 1kg");

        Ok(())
    }

    #[test]
    fn unsuccessful_envelope_is_rejected_with_its_message() {
        let body = r#"{"success": false, "message": "Insufficient stock"}"#;

        let result: Result<Product, ApiError> = decode_payload(body);

        assert!(
            matches!(result, Err(ApiError::Rejected(message)) if message == "Insufficient stock"),
            "expected Rejected with backend message"
        );
    }

    #[test]
    fn successful_envelope_without_data_is_rejected() {
        let body = r#"{"success": true}"#;

        let result: Result<Product, ApiError> = decode_payload(body);

        assert!(
            matches!(result, Err(ApiError::Rejected(_))),
            "expected Rejected, got {result:?}"
        );
    }

    #[test]
    fn bare_payload_decodes_without_envelope() -> TestResult {
        let total: Decimal = decode_payload("1250.75")?;

        assert_eq!(total, "1250.75".parse::<Decimal>()?);

        Ok(())
    }

    #[test]
    fn bare_list_decodes_without_envelope() -> TestResult {
        let values: Vec<u32> = decode_payload("[1, 2, 3]")?;

        assert_eq!(values, vec![1, 2, 3]);

        Ok(())
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let result: Result<Product, ApiError> = decode_payload("not json");

        assert!(
            matches!(result, Err(ApiError::Decode(_))),
            "expected Decode, got {result:?}"
        );
    }

    #[test]
    fn accepted_without_payload_passes() -> TestResult {
        ensure_accepted(r#"{"success": true, "message": "Product deleted"}"#)?;
        ensure_accepted("")?;

        Ok(())
    }

    #[test]
    fn rejected_without_payload_fails() {
        let result = ensure_accepted(r#"{"success": false, "message": "Product not found"}"#);

        assert!(
            matches!(result, Err(ApiError::Rejected(message)) if message == "Product not found"),
            "expected Rejected with backend message"
        );
    }

    #[test]
    fn error_message_prefers_the_body() {
        let message = error_message(
            r#"{"success": false, "message": "Barcode already in use"}"#,
            StatusCode::CONFLICT,
        );

        assert_eq!(message, "Barcode already in use");
    }

    #[test]
    fn error_message_falls_back_to_the_status_reason() {
        let message = error_message("<html>offline</html>", StatusCode::BAD_GATEWAY);

        assert_eq!(message, "Bad Gateway");
    }
}
