//! Backend-agnostic commerce types and the adapter contract for StoreForge.
//!
//! This crate defines the shapes every storefront module works with:
//!
//! - **Catalog**: products, categories, tags, list parameters
//! - **Adapter**: the capability contract every backend integration satisfies
//! - **Cart**: a persisted client-side cart store
//! - **Checkout**: hosted-checkout URL construction
//! - **Search**: a product search helper built over the adapter
//!
//! Modules never talk to a backend's REST or GraphQL surface directly; they
//! go through a [`StoreAdapter`], which translates backend payloads into the
//! types defined here.

pub mod adapter;
pub mod blog;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;

pub use adapter::{AdapterConfig, AdapterError, StoreAdapter};
pub use catalog::{
    Category, OrderBy, Product, ProductListParams, SortOrder, StockStatus, Tag,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::adapter::{
        AdapterConfig, AdapterError, BlogApi, CartApi, CategoriesApi, CheckoutApi, ProductsApi,
        SearchApi, StoreAdapter,
    };
    pub use crate::blog::{Author, Post};
    pub use crate::cart::{CartError, CartLine, CartStorage, CartStore, MemoryStorage};
    pub use crate::catalog::{
        Category, CategoryImage, OrderBy, Product, ProductAttribute, ProductImage,
        ProductListParams, SortOrder, StockStatus, Tag,
    };
    pub use crate::checkout::{CheckoutPrefill, CheckoutRequest};
    pub use crate::search::{search_products, SearchOptions, SearchResponse, SearchResult};
}
