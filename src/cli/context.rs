//! Shared state threaded through every command.

use anyhow::{Context as _, Result, anyhow};
use kirana::{
    api::{
        ApiClient, HttpAuthService, HttpCreditService, HttpCustomersService, HttpDashboardService,
        HttpProductsService, HttpSalesService,
    },
    cache::QueryCache,
    config::Config,
    models::user::User,
    session::SessionStore,
};

use crate::cli::output::Output;

/// Everything a command needs: the terminal writer, the login session, the
/// query cache, and one service per backend area.
#[derive(Debug)]
pub struct Context {
    /// Terminal writer.
    pub output: Output,

    /// Persisted login session.
    pub session: SessionStore,

    /// Cached backend views, invalidated by writes.
    pub cache: QueryCache,

    /// Authentication endpoints.
    pub auth: HttpAuthService,

    /// Product catalogue endpoints.
    pub products: HttpProductsService,

    /// Customer endpoints.
    pub customers: HttpCustomersService,

    /// Sales endpoints.
    pub sales: HttpSalesService,

    /// Credit ledger endpoints.
    pub credit: HttpCreditService,

    /// Dashboard endpoint.
    pub dashboard: HttpDashboardService,
}

impl Context {
    /// Wire up the services for the configured backend.
    pub fn new(config: &Config) -> Result<Self> {
        let session =
            SessionStore::open(&config.session_file).context("could not open the session store")?;
        let client =
            ApiClient::new(config, session.clone()).context("could not build the API client")?;

        Ok(Self {
            output: Output::new(),
            session,
            cache: QueryCache::new(),
            auth: HttpAuthService::new(client.clone()),
            products: HttpProductsService::new(client.clone()),
            customers: HttpCustomersService::new(client.clone()),
            sales: HttpSalesService::new(client.clone()),
            credit: HttpCreditService::new(client.clone()),
            dashboard: HttpDashboardService::new(client),
        })
    }

    /// The logged-in user, or an error telling the operator to log in.
    pub fn require_login(&self) -> Result<User> {
        self.session
            .user()
            .ok_or_else(|| anyhow!("not logged in, run `kirana login` first"))
    }
}
