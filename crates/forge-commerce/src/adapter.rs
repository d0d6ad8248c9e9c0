//! The adapter contract every backend integration satisfies.
//!
//! An adapter exposes a small set of capability APIs. Products and categories
//! are mandatory; search, cart, checkout and blog are optional, and callers
//! must check for presence before invoking them.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blog::Post;
use crate::cart::{Cart, CartAddItem};
use crate::catalog::{Category, Product, ProductListParams};
use crate::checkout::CheckoutPayload;
use crate::search::SearchResult;

/// Errors produced at the adapter boundary.
///
/// Every variant composes the failing operation's context with the original
/// failure text so the caller can log a meaningful root cause. Lookups that
/// legitimately have no match return `Ok(None)` instead of erroring; only
/// id-based lookups are exceptional on absence.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The backend answered with an HTTP error status.
    #[error("{context}: [{status}] {message}")]
    Upstream {
        context: String,
        status: u16,
        message: String,
    },

    /// No response from the backend at all.
    #[error("{context}: Network error - {message}")]
    Network { context: String, message: String },

    /// An id-based lookup found nothing upstream.
    #[error("{context}: not found")]
    NotFound { context: String },

    /// Anything else, wrapped with context.
    #[error("{context}: {message}")]
    Other { context: String, message: String },

    /// The adapter was constructed from incomplete configuration.
    #[error("Adapter configuration error: {0}")]
    Config(String),
}

impl AdapterError {
    /// HTTP status of the upstream failure, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AdapterError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error represents an absent resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdapterError::NotFound { .. })
    }
}

/// Credentials for backends that authenticate with a key pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdapterKeys {
    /// Consumer key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_key: Option<String>,
    /// Consumer secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_secret: Option<String>,
}

/// Configuration for constructing an adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Adapter implementation name (e.g. "woo-rest").
    #[serde(default)]
    pub name: String,
    /// Backend base URL.
    #[serde(default)]
    pub endpoint: String,
    /// Optional credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<AdapterKeys>,
    /// Free-form adapter-specific options.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub options: HashMap<String, serde_json::Value>,
}

/// Product operations. Mandatory capability.
#[async_trait]
pub trait ProductsApi: Send + Sync {
    /// List products with pagination and optional filters.
    async fn list(&self, params: &ProductListParams) -> Result<Vec<Product>, AdapterError>;

    /// Fetch a product by id. Fails with [`AdapterError::NotFound`] when the
    /// id does not exist upstream.
    async fn get_by_id(&self, id: &str) -> Result<Product, AdapterError>;

    /// Fetch a product by slug. `Ok(None)` when nothing matches; the first
    /// result wins when the backend returns several.
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, AdapterError>;
}

/// Category operations. Mandatory capability.
#[async_trait]
pub trait CategoriesApi: Send + Sync {
    /// List all categories.
    async fn list(&self) -> Result<Vec<Category>, AdapterError>;

    /// Fetch a category by slug, `Ok(None)` when nothing matches.
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, AdapterError>;
}

/// Free-text search. Optional capability.
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn query(&self, text: &str) -> Result<Vec<SearchResult>, AdapterError>;
}

/// Server-side cart operations. Optional capability.
#[async_trait]
pub trait CartApi: Send + Sync {
    async fn get(&self) -> Result<Cart, AdapterError>;
    async fn add(&self, item: &CartAddItem) -> Result<Cart, AdapterError>;
    async fn update(&self, item_key: &str, quantity: u32) -> Result<Cart, AdapterError>;
    async fn remove(&self, item_key: &str) -> Result<Cart, AdapterError>;
    async fn clear(&self) -> Result<Cart, AdapterError>;
}

/// Hosted checkout. Optional capability.
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    /// Build the URL the customer is redirected to for checkout.
    async fn checkout_url(&self, payload: &CheckoutPayload) -> Result<String, AdapterError>;
}

/// Blog content. Optional capability.
#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<Post>, AdapterError>;
    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, AdapterError>;
}

/// The contract a backend integration exposes to the rest of the framework.
///
/// The mandatory capabilities are plain accessors; the optional ones default
/// to `None`, meaning the instance does not support them.
pub trait StoreAdapter: Send + Sync {
    /// Adapter implementation name.
    fn name(&self) -> &str;

    /// Product operations.
    fn products(&self) -> &dyn ProductsApi;

    /// Category operations.
    fn categories(&self) -> &dyn CategoriesApi;

    /// Free-text search, when supported.
    fn search(&self) -> Option<&dyn SearchApi> {
        None
    }

    /// Server-side cart, when supported.
    fn cart(&self) -> Option<&dyn CartApi> {
        None
    }

    /// Hosted checkout, when supported.
    fn checkout(&self) -> Option<&dyn CheckoutApi> {
        None
    }

    /// Blog content, when supported.
    fn blog(&self) -> Option<&dyn BlogApi> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_message_composition() {
        let err = AdapterError::Upstream {
            context: "Failed to list products".to_string(),
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to list products: [503] Service Unavailable"
        );
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_network_error_message_composition() {
        let err = AdapterError::Network {
            context: "Failed to get product 7".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to get product 7: Network error - connection refused"
        );
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_not_found_classification() {
        let err = AdapterError::NotFound {
            context: "Failed to get product 999".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!AdapterError::Config("x".to_string()).is_not_found());
    }

    #[test]
    fn test_adapter_config_deserializes_partial_shapes() {
        // Missing fields default rather than fail; validation is a separate
        // concern handled by the config layer.
        let config: AdapterConfig = serde_json::from_str("{}").unwrap();
        assert!(config.name.is_empty());
        assert!(config.endpoint.is_empty());
        assert!(config.keys.is_none());
    }
}
