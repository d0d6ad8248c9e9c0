//! WooCommerce REST API adapter for StoreForge.
//!
//! Talks to a WooCommerce store over `wp-json/wc/v3` with consumer-key basic
//! auth and implements the mandatory product/category capabilities plus
//! free-text search. Server-side cart, hosted checkout and blog are not
//! exposed by this adapter.

mod wire;

use std::sync::Arc;

use async_trait::async_trait;

use forge_commerce::adapter::{
    AdapterConfig, AdapterError, CategoriesApi, ProductsApi, SearchApi, StoreAdapter,
};
use forge_commerce::catalog::{Category, Product, ProductListParams};
use forge_commerce::search::{SearchResult, SearchResultKind};
use forge_data::{ClientRequestBuilder, FetchClient, FetchError, HttpTransport};

use wire::{WooCategory, WooProduct};

/// WooCommerce REST API version this adapter speaks.
const API_VERSION: &str = "wc/v3";

/// Page size used when listing all categories.
const CATEGORIES_PAGE_SIZE: u32 = 100;

/// Page size used for free-text search.
const SEARCH_PAGE_SIZE: u32 = 20;

/// Authenticated client shared by the capability implementations.
struct WooClient {
    client: FetchClient,
    consumer_key: String,
    consumer_secret: String,
}

impl WooClient {
    fn get(&self, path: &str) -> ClientRequestBuilder {
        self.client
            .get(path)
            .basic_auth(&self.consumer_key, Some(&self.consumer_secret))
    }
}

/// Translate a transport-level failure into an adapter error, composing the
/// failing operation's context string.
fn classify(error: FetchError, context: &str) -> AdapterError {
    match error {
        FetchError::Http { status, message } => AdapterError::Upstream {
            context: context.to_string(),
            status,
            message: extract_upstream_message(&message),
        },
        FetchError::Connection(message) | FetchError::Request(message) => AdapterError::Network {
            context: context.to_string(),
            message,
        },
        other => AdapterError::Other {
            context: context.to_string(),
            message: other.to_string(),
        },
    }
}

/// WooCommerce error bodies are JSON with a `message` field; use it when
/// present, otherwise fall back to the raw body.
fn extract_upstream_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

struct WooProducts {
    client: Arc<WooClient>,
}

#[async_trait]
impl ProductsApi for WooProducts {
    async fn list(&self, params: &ProductListParams) -> Result<Vec<Product>, AdapterError> {
        const CONTEXT: &str = "Failed to list products";

        let mut request = self
            .client
            .get("/products")
            .query("page", params.effective_page())
            .query("per_page", params.effective_per_page());

        if let Some(category) = &params.category {
            request = request.query("category", category);
        }
        if let Some(tag) = &params.tag {
            request = request.query("tag", tag);
        }
        if let Some(search) = &params.search {
            request = request.query("search", search);
        }
        if let Some(orderby) = params.orderby {
            request = request.query("orderby", orderby.as_str());
        }
        if let Some(order) = params.order {
            request = request.query("order", order.as_str());
        }
        if let Some(on_sale) = params.on_sale {
            request = request.query("on_sale", on_sale);
        }
        if let Some(featured) = params.featured {
            request = request.query("featured", featured);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify(e, CONTEXT))?
            .error_for_status()
            .map_err(|e| classify(e, CONTEXT))?;

        let products: Vec<WooProduct> =
            response.json().map_err(|e| classify(e, CONTEXT))?;
        Ok(products.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Product, AdapterError> {
        let context = format!("Failed to get product {id}");

        let response = self
            .client
            .get(&format!("/products/{id}"))
            .send()
            .await
            .map_err(|e| classify(e, &context))?;

        if response.status == 404 {
            return Err(AdapterError::NotFound { context });
        }
        let response = response
            .error_for_status()
            .map_err(|e| classify(e, &context))?;

        let product: WooProduct = response.json().map_err(|e| classify(e, &context))?;
        Ok(product.into())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, AdapterError> {
        let context = format!("Failed to get product by slug: {slug}");

        let response = self
            .client
            .get("/products")
            .query("slug", slug)
            .send()
            .await
            .map_err(|e| classify(e, &context))?
            .error_for_status()
            .map_err(|e| classify(e, &context))?;

        let mut products: Vec<WooProduct> =
            response.json().map_err(|e| classify(e, &context))?;
        if products.is_empty() {
            return Ok(None);
        }
        // Slugs are unique in practice; take the first if the backend
        // returns several.
        Ok(Some(products.remove(0).into()))
    }
}

struct WooCategories {
    client: Arc<WooClient>,
}

#[async_trait]
impl CategoriesApi for WooCategories {
    async fn list(&self) -> Result<Vec<Category>, AdapterError> {
        const CONTEXT: &str = "Failed to list categories";

        let response = self
            .client
            .get("/products/categories")
            .query("per_page", CATEGORIES_PAGE_SIZE)
            .send()
            .await
            .map_err(|e| classify(e, CONTEXT))?
            .error_for_status()
            .map_err(|e| classify(e, CONTEXT))?;

        let categories: Vec<WooCategory> =
            response.json().map_err(|e| classify(e, CONTEXT))?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, AdapterError> {
        let context = format!("Failed to get category by slug: {slug}");

        let response = self
            .client
            .get("/products/categories")
            .query("slug", slug)
            .send()
            .await
            .map_err(|e| classify(e, &context))?
            .error_for_status()
            .map_err(|e| classify(e, &context))?;

        let mut categories: Vec<WooCategory> =
            response.json().map_err(|e| classify(e, &context))?;
        if categories.is_empty() {
            return Ok(None);
        }
        Ok(Some(categories.remove(0).into()))
    }
}

struct WooSearch {
    client: Arc<WooClient>,
}

#[async_trait]
impl SearchApi for WooSearch {
    async fn query(&self, text: &str) -> Result<Vec<SearchResult>, AdapterError> {
        let context = format!("Failed to search for: {text}");

        let response = self
            .client
            .get("/products")
            .query("search", text)
            .query("per_page", SEARCH_PAGE_SIZE)
            .send()
            .await
            .map_err(|e| classify(e, &context))?
            .error_for_status()
            .map_err(|e| classify(e, &context))?;

        let products: Vec<WooProduct> =
            response.json().map_err(|e| classify(e, &context))?;
        Ok(products
            .into_iter()
            .map(|woo| {
                let product: Product = woo.into();
                SearchResult {
                    id: product.id,
                    kind: SearchResultKind::Product,
                    title: product.name,
                    excerpt: product.short_description,
                    url: product.permalink.unwrap_or_default(),
                    image: product.images.first().map(|i| i.src.clone()),
                    price: Some(product.price),
                }
            })
            .collect())
    }
}

/// The WooCommerce adapter.
pub struct WooAdapter {
    name: String,
    products: WooProducts,
    categories: WooCategories,
    search: WooSearch,
}

impl WooAdapter {
    /// Build an adapter from configuration.
    ///
    /// Endpoint, consumer key and consumer secret are all required; a
    /// missing credential is a startup failure, not something to discover on
    /// the first request.
    pub fn from_config(
        config: &AdapterConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, AdapterError> {
        if config.endpoint.is_empty() {
            return Err(AdapterError::Config(
                "WooCommerce adapter requires an endpoint".to_string(),
            ));
        }
        let keys = config.keys.as_ref().ok_or_else(|| {
            AdapterError::Config(
                "WooCommerce adapter requires consumer_key and consumer_secret".to_string(),
            )
        })?;
        let (consumer_key, consumer_secret) = match (&keys.consumer_key, &keys.consumer_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                (key.clone(), secret.clone())
            }
            _ => {
                return Err(AdapterError::Config(
                    "WooCommerce adapter requires consumer_key and consumer_secret".to_string(),
                ))
            }
        };

        let base_url = format!(
            "{}/wp-json/{API_VERSION}",
            config.endpoint.trim_end_matches('/')
        );
        tracing::debug!(endpoint = %base_url, "woocommerce adapter configured");

        let client = Arc::new(WooClient {
            client: FetchClient::new(transport).with_base_url(base_url),
            consumer_key,
            consumer_secret,
        });

        Ok(Self {
            name: "woo-rest".to_string(),
            products: WooProducts {
                client: Arc::clone(&client),
            },
            categories: WooCategories {
                client: Arc::clone(&client),
            },
            search: WooSearch { client },
        })
    }
}

impl StoreAdapter for WooAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn products(&self) -> &dyn ProductsApi {
        &self.products
    }

    fn categories(&self) -> &dyn CategoriesApi {
        &self.categories
    }

    fn search(&self) -> Option<&dyn SearchApi> {
        Some(&self.search)
    }
}
