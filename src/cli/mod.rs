//! Terminal commands.

use kirana::{
    cache::CacheKey,
    models::page::{ListQuery, Page},
};

pub mod auth;
pub mod context;
pub mod credit;
pub mod customers;
pub mod dashboard;
pub mod output;
pub mod pos;
pub mod products;
pub mod sales;

/// Cache key for a paginated listing, capturing every parameter that
/// changes the response.
pub(crate) fn list_cache_key(route: &str, query: &ListQuery) -> CacheKey {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("size", query.size.to_string()),
    ];

    if let Some(search) = &query.search {
        params.push(("search", search.clone()));
    }

    if let Some(sort_by) = &query.sort_by {
        params.push(("sortBy", sort_by.clone()));
    }

    if let Some(order) = query.sort_order {
        params.push(("sortOrder", order.as_str().to_string()));
    }

    CacheKey::with_params(route, &params)
}

/// One-line paging footer for list views.
pub(crate) fn page_line<T>(page: &Page<T>) -> String {
    format!(
        "Page {} of {} ({} records)",
        page.number.saturating_add(1),
        page.total_pages.max(1),
        page.total_elements
    )
}

/// The date half of a server timestamp such as `2026-02-11T12:03:44`.
pub(crate) fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}
