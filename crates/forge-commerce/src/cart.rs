//! Cart types and the persisted client-side cart store.
//!
//! Two cart shapes exist on purpose. [`Cart`]/[`CartItem`] mirror a backend's
//! server-side cart for adapters that support one. [`CartStore`] is the
//! client-side cart: lines keyed by product id, persisted as a single
//! serialized list under one fixed storage key, with totals recomputed on
//! every mutation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;

/// Storage key for the persisted cart. Fixed; changing it orphans carts.
pub const CART_STORAGE_KEY: &str = "storeforge_cart";

/// A server-side cart as reported by a backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub subtotal: String,
    pub total: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<String>,
    pub currency: String,
    pub item_count: u32,
}

/// A line in a server-side cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Backend line key.
    pub key: String,
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<String>,
    pub quantity: u32,
    pub name: String,
    pub price: String,
    pub subtotal: String,
    pub total: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

/// Request to add an item to a server-side cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAddItem {
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<String>,
    pub quantity: u32,
}

/// Errors from the persisted cart store.
#[derive(Error, Debug)]
pub enum CartError {
    #[error("Failed to persist cart: {0}")]
    Persist(String),

    #[error("Failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One line of the client-side cart: a product snapshot plus a quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

/// Key-value persistence for the cart store.
///
/// The store reads the whole cart once at construction and rewrites it after
/// every mutation. Implementations map onto whatever the host environment
/// offers (browser local storage, a file, an in-memory map in tests).
pub trait CartStorage: Send + Sync {
    /// Read the raw value for a key, `None` when absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Write the raw value for a key.
    fn set(&mut self, key: &str, value: &str) -> Result<(), CartError>;
}

impl<S: CartStorage + ?Sized> CartStorage for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CartError> {
        (**self).set(key, value)
    }
}

/// In-memory storage, the default for tests and server-side rendering.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: std::collections::HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CartError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The persisted client-side cart.
pub struct CartStore<S: CartStorage> {
    storage: S,
    lines: Vec<CartLine>,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the cart, reading any persisted state. An unreadable or corrupt
    /// blob falls back to an empty cart rather than failing the session.
    pub fn open(storage: S) -> Self {
        let lines = storage
            .get(CART_STORAGE_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { storage, lines }
    }

    /// Add `quantity` of a product, merging into an existing line.
    pub fn add(&mut self, product: Product, quantity: u32) -> Result<(), CartError> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity += quantity;
        } else {
            self.lines.push(CartLine { product, quantity });
        }
        self.persist()
    }

    /// Remove a product's line entirely.
    pub fn remove(&mut self, product_id: &str) -> Result<(), CartError> {
        self.lines.retain(|l| l.product.id != product_id);
        self.persist()
    }

    /// Set a line's quantity; zero removes the line.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove(product_id);
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product_id) {
            line.quantity = quantity;
        }
        self.persist()
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.lines.clear();
        self.persist()
    }

    /// Current cart lines.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Subtotal across all lines, formatted as `$x.xx`. Non-numeric
    /// characters in prices are stripped before parsing.
    pub fn subtotal(&self) -> String {
        let total: f64 = self
            .lines
            .iter()
            .map(|l| parse_price(&l.product.price) * f64::from(l.quantity))
            .sum();
        format!("${:.2}", total)
    }

    fn persist(&mut self) -> Result<(), CartError> {
        let raw = serde_json::to_string(&self.lines)?;
        self.storage.set(CART_STORAGE_KEY, &raw)
    }
}

/// Strip currency symbols and parse the remainder, zero on failure.
pub(crate) fn parse_price(price: &str) -> f64 {
    let cleaned: String = price
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StockStatus;

    fn product(id: &str, price: &str) -> Product {
        Product {
            id: id.to_string(),
            slug: format!("product-{id}"),
            name: format!("Product {id}"),
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
    fn test_add_merges_existing_line() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add(product("1", "10.00"), 1).unwrap();
        cart.add(product("1", "10.00"), 2).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_subtotal_recomputed_per_mutation() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add(product("1", "10.00"), 2).unwrap();
        assert_eq!(cart.subtotal(), "$20.00");

        cart.add(product("2", "$5.50"), 1).unwrap();
        assert_eq!(cart.subtotal(), "$25.50");

        cart.remove("1").unwrap();
        assert_eq!(cart.subtotal(), "$5.50");
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add(product("1", "10.00"), 2).unwrap();
        cart.set_quantity("1", 0).unwrap();
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn test_persists_under_fixed_key_and_reloads() {
        let mut storage = MemoryStorage::new();
        {
            let mut cart = CartStore::open(&mut storage);
            cart.add(product("9", "3.00"), 4).unwrap();
        }
        assert!(storage.get(CART_STORAGE_KEY).is_some());

        let cart = CartStore::open(&mut storage);
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.lines()[0].product.id, "9");
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_empty() {
        let mut storage = MemoryStorage::new();
        storage.set(CART_STORAGE_KEY, "not json").unwrap();
        let cart = CartStore::open(storage);
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn test_unparseable_price_counts_as_zero() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add(product("1", "call us"), 1).unwrap();
        assert_eq!(cart.subtotal(), "$0.00");
    }
}
