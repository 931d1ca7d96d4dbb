//! Query cache with tag-based invalidation.
//!
//! Server responses are cached under their route plus canonicalized query
//! parameters, and every entry carries the named data views it belongs to.
//! Invalidation is driven by an explicit dependency table from mutations to
//! tags, never by automatic dependency tracking.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

/// Named data view a cached response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Product catalogue views.
    Products,

    /// Customer views.
    Customers,

    /// Sales history views.
    Sales,

    /// Credit ledger views.
    Credit,

    /// The dashboard view.
    Dashboard,
}

impl Tag {
    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Customers => "customers",
            Self::Sales => "sales",
            Self::Credit => "credit",
            Self::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State-changing calls that invalidate cached data views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// A checkout completed.
    SaleCompleted,

    /// A credit payment was recorded.
    CreditPaymentRecorded,

    /// A product was created, updated, or deleted.
    ProductChanged,

    /// A customer was created, updated, or deleted.
    CustomerChanged,
}

impl Mutation {
    /// The data views each mutation invalidates.
    ///
    /// A completed sale touches stock, customer statistics, and the
    /// dashboard figures alongside the sales history itself; a credit
    /// payment moves customer balances and the dashboard; catalogue edits
    /// touch only their own view.
    #[must_use]
    pub const fn invalidates(self) -> &'static [Tag] {
        match self {
            Self::SaleCompleted => &[Tag::Sales, Tag::Products, Tag::Customers, Tag::Dashboard],
            Self::CreditPaymentRecorded => &[Tag::Credit, Tag::Customers, Tag::Dashboard],
            Self::ProductChanged => &[Tag::Products],
            Self::CustomerChanged => &[Tag::Customers],
        }
    }
}

/// Key identifying one cached response: the route plus its canonicalized
/// query parameters. Parameter order does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    route: String,
    params: BTreeMap<String, String>,
}

impl CacheKey {
    /// Key for a route with no query parameters.
    #[must_use]
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            params: BTreeMap::new(),
        }
    }

    /// Key for a route with query parameters.
    #[must_use]
    pub fn with_params(route: impl Into<String>, params: &[(&str, String)]) -> Self {
        Self {
            route: route.into(),
            params: params
                .iter()
                .map(|(name, value)| ((*name).to_string(), value.clone()))
                .collect(),
        }
    }

    /// The route component of the key.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.route)?;

        for (index, (name, value)) in self.params.iter().enumerate() {
            let separator = if index == 0 { '?' } else { '&' };

            write!(f, "{separator}{name}={value}")?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Entry {
    tags: Vec<Tag>,
    value: serde_json::Value,
}

/// In-memory response cache shared across a session's commands.
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<CacheKey, Entry>>>,
}

impl QueryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached response, decoding it into `T`.
    ///
    /// An entry that no longer decodes as `T` counts as a miss.
    #[must_use]
    pub fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let value = self.lock().get(key).map(|entry| entry.value.clone())?;

        serde_json::from_value(value).ok()
    }

    /// Store a response under `key`, tagged with the data views it belongs
    /// to. A value that cannot be encoded is skipped with a warning; the
    /// cache never fails a read path.
    pub fn insert<T: Serialize>(&self, key: CacheKey, tags: &[Tag], value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.lock().insert(
                    key,
                    Entry {
                        tags: tags.to_vec(),
                        value,
                    },
                );
            }
            Err(error) => warn!(%key, %error, "response not cached"),
        }
    }

    /// Serve `key` from the cache, or run `fetch` and cache its result.
    ///
    /// # Errors
    ///
    /// Returns whatever error `fetch` produced; nothing is cached then.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: CacheKey,
        tags: &[Tag],
        fetch: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.lookup(&key) {
            debug!(%key, "cache hit");
            return Ok(hit);
        }

        let fetched = fetch().await?;

        self.insert(key, tags, &fetched);

        Ok(fetched)
    }

    /// Drop every entry tagged with a data view the mutation invalidates.
    pub fn invalidate(&self, mutation: Mutation) {
        let stale = mutation.invalidates();

        self.lock()
            .retain(|_, entry| !entry.tags.iter().any(|tag| stale.contains(tag)));

        debug!(?mutation, "cache invalidated");
    }

    /// Drop every entry. Used on login and logout, when all cached views
    /// may belong to another account.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use testresult::TestResult;

    use super::*;

    fn seeded_cache() -> QueryCache {
        let cache = QueryCache::new();

        cache.insert(
            CacheKey::new("/products"),
            &[Tag::Products],
            &"products-page",
        );
        cache.insert(
            CacheKey::new("/customers"),
            &[Tag::Customers],
            &"customers-page",
        );
        cache.insert(CacheKey::new("/sales"), &[Tag::Sales], &"sales-page");
        cache.insert(
            CacheKey::new("/credit/transactions"),
            &[Tag::Credit],
            &"ledger",
        );
        cache.insert(
            CacheKey::new("/dashboard"),
            &[Tag::Dashboard],
            &"dashboard",
        );

        cache
    }

    fn cached_routes(cache: &QueryCache) -> Vec<&'static str> {
        [
            "/products",
            "/customers",
            "/sales",
            "/credit/transactions",
            "/dashboard",
        ]
        .into_iter()
        .filter(|route| cache.lookup::<String>(&CacheKey::new(*route)).is_some())
        .collect()
    }

    #[test]
    fn lookup_returns_inserted_value() {
        let cache = QueryCache::new();
        let key = CacheKey::with_params("/products", &[("page", "0".to_string())]);

        cache.insert(key.clone(), &[Tag::Products], &vec![1, 2, 3]);

        assert_eq!(cache.lookup::<Vec<i32>>(&key), Some(vec![1, 2, 3]));
    }

    #[test]
    fn key_ignores_parameter_order() {
        let forward = CacheKey::with_params(
            "/products",
            &[("page", "0".to_string()), ("size", "20".to_string())],
        );
        let backward = CacheKey::with_params(
            "/products",
            &[("size", "20".to_string()), ("page", "0".to_string())],
        );

        assert_eq!(forward, backward);
    }

    #[test]
    fn different_params_are_different_keys() {
        let cache = QueryCache::new();

        cache.insert(
            CacheKey::with_params("/products", &[("page", "0".to_string())]),
            &[Tag::Products],
            &"page-zero",
        );

        let other = CacheKey::with_params("/products", &[("page", "1".to_string())]);

        assert_eq!(cache.lookup::<String>(&other), None);
    }

    #[test]
    fn sale_completed_invalidates_its_dependent_views() {
        let cache = seeded_cache();

        cache.invalidate(Mutation::SaleCompleted);

        assert_eq!(cached_routes(&cache), vec!["/credit/transactions"]);
    }

    #[test]
    fn credit_payment_invalidates_its_dependent_views() {
        let cache = seeded_cache();

        cache.invalidate(Mutation::CreditPaymentRecorded);

        assert_eq!(cached_routes(&cache), vec!["/products", "/sales"]);
    }

    #[test]
    fn product_change_invalidates_only_products() {
        let cache = seeded_cache();

        cache.invalidate(Mutation::ProductChanged);

        assert_eq!(
            cached_routes(&cache),
            vec!["/customers", "/sales", "/credit/transactions", "/dashboard"]
        );
    }

    #[test]
    fn customer_change_invalidates_only_customers() {
        let cache = seeded_cache();

        cache.invalidate(Mutation::CustomerChanged);

        assert_eq!(
            cached_routes(&cache),
            vec!["/products", "/sales", "/credit/transactions", "/dashboard"]
        );
    }

    #[test]
    fn multi_tagged_entry_invalidates_on_any_tag() {
        let cache = QueryCache::new();
        let key = CacheKey::new("/customers/top");

        cache.insert(key.clone(), &[Tag::Customers, Tag::Dashboard], &"top");
        cache.invalidate(Mutation::CreditPaymentRecorded);

        assert_eq!(cache.lookup::<String>(&key), None);
    }

    #[test]
    fn clear_drops_everything() {
        let cache = seeded_cache();

        cache.clear();

        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn get_or_fetch_fetches_once() -> TestResult {
        let cache = QueryCache::new();
        let key = CacheKey::new("/dashboard");
        let mut fetches = 0_u32;

        for _ in 0..3 {
            let value: Result<String, Infallible> = cache
                .get_or_fetch(key.clone(), &[Tag::Dashboard], || {
                    fetches += 1;
                    async { Ok("payload".to_string()) }
                })
                .await;

            assert_eq!(value?, "payload");
        }

        assert_eq!(fetches, 1, "later reads should be served from the cache");

        Ok(())
    }

    #[tokio::test]
    async fn get_or_fetch_does_not_cache_failures() {
        let cache = QueryCache::new();
        let key = CacheKey::new("/dashboard");

        let result: Result<String, &str> = cache
            .get_or_fetch(key.clone(), &[Tag::Dashboard], || async { Err("offline") })
            .await;

        assert_eq!(result, Err("offline"));
        assert!(cache.is_empty());
    }
}
