//! Product search over the adapter contract.

use serde::{Deserialize, Serialize};

use crate::adapter::{AdapterError, StoreAdapter};
use crate::catalog::{ProductListParams, StockStatus};

/// Kind of entity a search result points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchResultKind {
    Product,
    Category,
    Post,
}

/// A single search hit, shaped for direct rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Entity id, stringified.
    pub id: String,
    /// What the hit is.
    #[serde(rename = "type")]
    pub kind: SearchResultKind,
    /// Display title.
    pub title: String,
    /// Short excerpt, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Canonical URL.
    pub url: String,
    /// Thumbnail URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Price, for product hits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

/// Options for [`search_products`].
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Free-text query.
    pub query: String,
    /// Maximum hits to return.
    pub limit: u32,
    /// Restrict to a category.
    pub category: Option<String>,
    /// Lower price bound, inclusive.
    pub min_price: Option<f64>,
    /// Upper price bound, inclusive.
    pub max_price: Option<f64>,
    /// Only in-stock products.
    pub in_stock_only: bool,
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: 10,
            category: None,
            min_price: None,
            max_price: None,
            in_stock_only: false,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_min_price(mut self, min: f64) -> Self {
        self.min_price = Some(min);
        self
    }

    pub fn with_max_price(mut self, max: f64) -> Self {
        self.max_price = Some(max);
        self
    }

    pub fn in_stock_only(mut self) -> Self {
        self.in_stock_only = true;
        self
    }

    fn matches(&self, product: &crate::catalog::Product) -> bool {
        if self.in_stock_only && product.stock_status != StockStatus::InStock {
            return false;
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            let price = crate::cart::parse_price(&product.price);
            if self.min_price.is_some_and(|min| price < min) {
                return false;
            }
            if self.max_price.is_some_and(|max| price > max) {
                return false;
            }
        }
        true
    }
}

/// A page of search hits plus the query that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total: usize,
    pub query: String,
}

/// Search products through the adapter's listing endpoint.
///
/// Built over `products().list` rather than the optional search capability so
/// it works against every adapter.
pub async fn search_products(
    adapter: &dyn StoreAdapter,
    options: &SearchOptions,
) -> Result<SearchResponse, AdapterError> {
    let params = ProductListParams {
        search: Some(options.query.clone()),
        per_page: Some(options.limit),
        category: options.category.clone(),
        ..Default::default()
    };

    let products = adapter.products().list(&params).await?;

    let results: Vec<SearchResult> = products
        .into_iter()
        .filter(|p| options.matches(p))
        .map(|p| SearchResult {
            id: p.id.clone(),
            kind: SearchResultKind::Product,
            title: p.name.clone(),
            excerpt: p.short_description.clone(),
            url: p.permalink.clone().unwrap_or_else(|| format!("/product/{}", p.slug)),
            image: p.images.first().map(|i| i.src.clone()),
            price: Some(p.price.clone()),
        })
        .collect();

    Ok(SearchResponse {
        total: results.len(),
        results,
        query: options.query.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::adapter::{CategoriesApi, ProductsApi};
    use crate::catalog::{Category, Product};

    struct FixtureProducts(Vec<Product>);

    #[async_trait]
    impl ProductsApi for FixtureProducts {
        async fn list(&self, _params: &ProductListParams) -> Result<Vec<Product>, AdapterError> {
            Ok(self.0.clone())
        }

        async fn get_by_id(&self, id: &str) -> Result<Product, AdapterError> {
            Err(AdapterError::NotFound {
                context: format!("Failed to get product {id}"),
            })
        }

        async fn get_by_slug(&self, _slug: &str) -> Result<Option<Product>, AdapterError> {
            Ok(None)
        }
    }

    struct FixtureCategories;

    #[async_trait]
    impl CategoriesApi for FixtureCategories {
        async fn list(&self) -> Result<Vec<Category>, AdapterError> {
            Ok(Vec::new())
        }

        async fn get_by_slug(&self, _slug: &str) -> Result<Option<Category>, AdapterError> {
            Ok(None)
        }
    }

    struct FixtureAdapter {
        products: FixtureProducts,
        categories: FixtureCategories,
    }

    impl FixtureAdapter {
        fn with_products(products: Vec<Product>) -> Self {
            Self {
                products: FixtureProducts(products),
                categories: FixtureCategories,
            }
        }
    }

    impl StoreAdapter for FixtureAdapter {
        fn name(&self) -> &str {
            "fixture"
        }

        fn products(&self) -> &dyn ProductsApi {
            &self.products
        }

        fn categories(&self) -> &dyn CategoriesApi {
            &self.categories
        }
    }

    #[test]
    fn test_result_kind_serializes_as_type() {
        let hit = SearchResult {
            id: "1".to_string(),
            kind: SearchResultKind::Product,
            title: "Mug".to_string(),
            excerpt: None,
            url: "/product/mug".to_string(),
            image: None,
            price: Some("9.99".to_string()),
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["type"], "product");
    }

    fn product(price: &str) -> crate::catalog::Product {
        crate::catalog::Product {
            id: "1".to_string(),
            slug: "product-1".to_string(),
            name: "Product 1".to_string(),
            description: None,
            short_description: None,
            price: price.to_string(),
            regular_price: None,
            sale_price: None,
            on_sale: false,
            images: Vec::new(),
            categories: Vec::new(),
            tags: None,
            stock_status: StockStatus::InStock,
            stock_quantity: None,
            sku: None,
            weight: None,
            dimensions: None,
            attributes: None,
            variations: None,
            average_rating: None,
            rating_count: None,
            permalink: None,
            date_created: None,
            date_modified: None,
        }
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let product = product("15.00");

        let options = SearchOptions::new("x").with_min_price(15.0).with_max_price(15.0);
        assert!(options.matches(&product));

        let options = SearchOptions::new("x").with_min_price(15.01);
        assert!(!options.matches(&product));

        let options = SearchOptions::new("x").with_max_price(14.99);
        assert!(!options.matches(&product));
    }

    #[test]
    fn test_options_builder_defaults() {
        let options = SearchOptions::new("mug");
        assert_eq!(options.limit, 10);
        assert!(!options.in_stock_only);

        let options = SearchOptions::new("mug").with_limit(5).in_stock_only();
        assert_eq!(options.limit, 5);
        assert!(options.in_stock_only);
    }

    #[tokio::test]
    async fn test_search_products_filters_and_shapes_hits() {
        let cheap = product("5.00");
        let mut costly = product("50.00");
        costly.id = "2".to_string();
        costly.slug = "product-2".to_string();
        let mut gone = product("5.00");
        gone.id = "3".to_string();
        gone.stock_status = StockStatus::OutOfStock;
        let adapter = FixtureAdapter::with_products(vec![cheap, costly, gone]);

        let options = SearchOptions::new("product")
            .with_max_price(20.0)
            .in_stock_only();
        let response = search_products(&adapter, &options).await.unwrap();

        assert_eq!(response.query, "product");
        assert_eq!(response.total, 1);
        assert_eq!(response.results[0].id, "1");
        assert_eq!(response.results[0].kind, SearchResultKind::Product);
        // No permalink, so the URL falls back to the slug route.
        assert_eq!(response.results[0].url, "/product/product-1");
        assert_eq!(response.results[0].price.as_deref(), Some("5.00"));
    }
}
