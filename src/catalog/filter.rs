//! Facet predicates and sort orders for catalog queries.
//!
//! Each selected facet contributes one [`Facet`] predicate; a
//! [`ProductFilter`] is the conjunction of its facets, so an empty filter
//! matches every product.

use std::cmp::Ordering;

use serde::Serialize;

use super::models::Product;

/// Literal facet value meaning "no constraint".
pub const ANY: &str = "all";

/// Price buckets offered by the search page, keyed by `"min-max"`.
pub const PRICE_BUCKETS: [(&str, &str); 5] = [
    ("$1 to $50", "1-50"),
    ("$51 to $100", "51-100"),
    ("$101 to $250", "101-250"),
    ("$251 to $500", "251-500"),
    ("$501 to $1000", "501-1000"),
];

/// Minimum-star options offered by the search page.
pub const RATING_FLOORS: [u8; 5] = [1, 2, 3, 4, 5];

/// Returns the facet value when it constrains anything, `None` for absent,
/// empty or `"all"`.
pub fn active(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ANY)
}

/// An inclusive `[min, max]` price range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBucket {
    pub min: f64,
    pub max: f64,
}

impl PriceBucket {
    /// Parses a `"min-max"` key. Anything that is not two numbers yields `None`.
    pub fn parse(key: &str) -> Option<Self> {
        let (min, max) = key.split_once('-')?;
        let min = min.trim().parse::<f64>().ok()?;
        let max = max.trim().parse::<f64>().ok()?;
        if min.is_nan() || max.is_nan() {
            return None;
        }
        Some(Self { min, max })
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// One facet constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Facet {
    /// Case-insensitive substring match on the product name. Stored lowercased.
    NameContains(String),
    Category(String),
    Brand(String),
    MinRating(f64),
    Price(PriceBucket),
}

impl Facet {
    pub fn name_contains(text: &str) -> Self {
        Facet::NameContains(text.to_lowercase())
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Facet::NameContains(text) => product.name.to_lowercase().contains(text.as_str()),
            Facet::Category(category) => product.category == *category,
            Facet::Brand(brand) => product.brand == *brand,
            Facet::MinRating(floor) => product.rating >= *floor,
            Facet::Price(bucket) => bucket.contains(product.price),
        }
    }
}

/// Conjunction of facets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    facets: Vec<Facet>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, facet: Facet) -> Self {
        self.facets.push(facet);
        self
    }

    /// Adds `facet` when present; `None` contributes nothing.
    pub fn and_maybe(self, facet: Option<Facet>) -> Self {
        match facet {
            Some(facet) => self.and(facet),
            None => self,
        }
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.facets.iter().all(|f| f.matches(product))
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Featured products first.
    Featured,
    /// Price ascending.
    Lowest,
    /// Price descending.
    Highest,
    /// Rating descending.
    TopRated,
    /// `createdAt` descending.
    Newest,
    /// Reverse insertion order (most recently inserted document first).
    /// Not the same as [`SortOrder::Newest`]: it follows storage order, not
    /// the creation timestamp.
    #[default]
    Default,
}

impl SortOrder {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("featured") => Self::Featured,
            Some("lowest") => Self::Lowest,
            Some("highest") => Self::Highest,
            Some("toprated") => Self::TopRated,
            Some("newest") => Self::Newest,
            _ => Self::Default,
        }
    }

    /// Sorts products that are given in insertion order. Ties keep insertion order.
    pub fn apply(&self, products: &mut [Product]) {
        match self {
            Self::Featured => products.sort_by(|a, b| b.is_featured.cmp(&a.is_featured)),
            Self::Lowest => products.sort_by(|a, b| cmp_f64(a.price, b.price)),
            Self::Highest => products.sort_by(|a, b| cmp_f64(b.price, a.price)),
            Self::TopRated => products.sort_by(|a, b| cmp_f64(b.rating, a.rating)),
            Self::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            Self::Default => products.reverse(),
        }
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Product fields whose distinct values feed the facet lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctField {
    Category,
    Brand,
}

impl DistinctField {
    pub fn value<'a>(&self, product: &'a Product) -> &'a str {
        match self {
            DistinctField::Category => &product.category,
            DistinctField::Brand => &product.brand,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::ProductFields;

    fn product(name: &str, price: f64, rating: f64) -> Product {
        let mut p = Product::new(ProductFields {
            name: name.into(),
            slug: name.to_lowercase().replace(' ', "-"),
            category: "Shirts".into(),
            image: String::new(),
            price,
            brand: "Nike".into(),
            count_in_stock: 1,
            description: String::new(),
            is_featured: false,
        });
        p.rating = rating;
        p
    }

    #[test]
    fn test_price_bucket_parse() {
        assert_eq!(
            PriceBucket::parse("51-100"),
            Some(PriceBucket {
                min: 51.0,
                max: 100.0
            })
        );
        assert_eq!(PriceBucket::parse("abc"), None);
        assert_eq!(PriceBucket::parse("10-"), None);
        assert_eq!(PriceBucket::parse("x-20"), None);
    }

    #[test]
    fn test_price_bucket_is_inclusive() {
        let bucket = PriceBucket::parse("51-100").unwrap();
        assert!(bucket.contains(51.0));
        assert!(bucket.contains(100.0));
        assert!(!bucket.contains(50.0));
        assert!(!bucket.contains(101.0));
    }

    #[test]
    fn test_active_treats_all_and_empty_as_unconstrained() {
        assert_eq!(active(None), None);
        assert_eq!(active(Some("")), None);
        assert_eq!(active(Some("all")), None);
        assert_eq!(active(Some("Shirts")), Some("Shirts"));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(ProductFilter::new().matches(&product("Anything", 1.0, 0.0)));
    }

    #[test]
    fn test_filter_is_conjunction() {
        let shirt = product("Slim Shirt", 75.0, 4.5);
        let filter = ProductFilter::new()
            .and(Facet::name_contains("SHIRT"))
            .and(Facet::MinRating(4.0));
        assert!(filter.matches(&shirt));

        let filter = filter.and(Facet::Brand("Adidas".into()));
        assert!(!filter.matches(&shirt));
    }

    #[test]
    fn test_sort_lowest_and_default() {
        let mut products = vec![
            product("a", 98.0, 0.0),
            product("b", 50.0, 0.0),
            product("c", 75.0, 0.0),
        ];

        let mut by_price = products.clone();
        SortOrder::Lowest.apply(&mut by_price);
        let prices: Vec<f64> = by_price.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![50.0, 75.0, 98.0]);

        SortOrder::Default.apply(&mut products);
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_parse_falls_back_to_default() {
        assert_eq!(SortOrder::parse(Some("toprated")), SortOrder::TopRated);
        assert_eq!(SortOrder::parse(Some("all")), SortOrder::Default);
        assert_eq!(SortOrder::parse(Some("bogus")), SortOrder::Default);
        assert_eq!(SortOrder::parse(None), SortOrder::Default);
    }
}
