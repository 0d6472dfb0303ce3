//! Faceted catalog search.
//!
//! A [`SearchQuery`] arrives as raw query-string values. It is normalized
//! into [`SearchParams`] (a [`ProductFilter`], a [`SortOrder`] and a page
//! window) and executed against a [`ProductRepository`]. Malformed facet
//! values never fail the request; they simply do not constrain it.

use futures_util::future::try_join4;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    filter::{active, DistinctField, Facet, PriceBucket, ProductFilter, SortOrder},
    models::ListedProduct,
    repository::ProductRepository,
};
use crate::db::StoreError;

/// Raw search parameters, as found in the URL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub query: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<String>,
    pub rating: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Normalized search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub filter: ProductFilter,
    pub sort: SortOrder,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
}

impl SearchParams {
    /// `pageSize` falls back to `default_page_size` and is capped at
    /// `max_page_size`.
    pub fn from_query(query: &SearchQuery, default_page_size: usize, max_page_size: usize) -> Self {
        let rating = active(query.rating.as_deref())
            .and_then(|r| r.trim().parse::<f64>().ok())
            .filter(|r| r.is_finite());

        let filter = ProductFilter::new()
            .and_maybe(active(query.query.as_deref()).map(Facet::name_contains))
            .and_maybe(active(query.category.as_deref()).map(|c| Facet::Category(c.into())))
            .and_maybe(active(query.brand.as_deref()).map(|b| Facet::Brand(b.into())))
            .and_maybe(rating.map(Facet::MinRating))
            .and_maybe(
                active(query.price.as_deref())
                    .and_then(PriceBucket::parse)
                    .map(Facet::Price),
            );

        let page = query
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        let page_size = query
            .page_size
            .as_deref()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|s| *s >= 1)
            .unwrap_or(default_page_size)
            .clamp(1, max_page_size.max(1));

        Self {
            filter,
            sort: SortOrder::parse(query.sort.as_deref()),
            page,
            page_size,
        }
    }

    pub fn skip(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// One page of search results plus the catalog-wide facet values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub products: Vec<ListedProduct>,
    pub count_products: u64,
    pub page: usize,
    pub pages: u64,
    pub categories: Vec<String>,
    pub brands: Vec<String>,
}

/// Runs a search.
///
/// The four reads are independent and run concurrently; they are not a
/// consistent snapshot, so a concurrent catalog write may make `pages`
/// disagree with the returned page. Categories and brands ignore the filter.
/// Pages past the end come back empty with the count still reported.
pub async fn search(
    repo: &dyn ProductRepository,
    params: &SearchParams,
) -> Result<SearchResult, StoreError> {
    debug!(
        "Searching catalog: {} facet(s), sort {:?}, page {} of size {}",
        params.filter.facets().len(),
        params.sort,
        params.page,
        params.page_size
    );

    let (categories, brands, products, count_products) = try_join4(
        repo.distinct(DistinctField::Category),
        repo.distinct(DistinctField::Brand),
        repo.find(&params.filter, params.sort, params.skip(), params.page_size),
        repo.count(&params.filter),
    )
    .await?;

    Ok(SearchResult {
        products: products.into_iter().map(ListedProduct::from).collect(),
        count_products,
        page: params.page,
        pages: count_products.div_ceil(params.page_size as u64),
        categories,
        brands,
    })
}
