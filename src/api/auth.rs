//! Authentication service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    api::{ApiClient, error::ApiError},
    models::user::{AuthResponse, Credentials, Registration},
    session::Session,
};

/// Authentication service backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    client: ApiClient,
}

impl HttpAuthService {
    /// Create a service on top of the given client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn persist(&self, response: &AuthResponse) -> Result<(), ApiError> {
        self.client.session().store(Session {
            token: response.token.clone(),
            user: response.user.clone(),
        })?;

        Ok(())
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, credentials: Credentials) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = self.client.post("/auth/login", &credentials).await?;

        self.persist(&response)?;

        Ok(response)
    }

    async fn register(&self, registration: Registration) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = self.client.post("/auth/register", &registration).await?;

        self.persist(&response)?;

        Ok(response)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.client.session().clear()?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Log in and persist the session for later commands.
    async fn login(&self, credentials: Credentials) -> Result<AuthResponse, ApiError>;

    /// Create an account and persist the session for later commands.
    async fn register(&self, registration: Registration) -> Result<AuthResponse, ApiError>;

    /// Forget the stored session. The backend keeps no session state, so
    /// this is purely local.
    async fn logout(&self) -> Result<(), ApiError>;
}
