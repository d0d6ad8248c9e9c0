//! Catalog types shared by every backend adapter.
//!
//! All identifiers are strings: backends that hand out numeric ids stringify
//! them at the mapping boundary. Price, weight and dimension fields stay
//! decimal-formatted strings exactly as the backend reports them.

use serde::{Deserialize, Serialize};

/// Stock availability for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    /// Product is in stock.
    #[default]
    #[serde(rename = "instock")]
    InStock,
    /// Product is out of stock.
    #[serde(rename = "outofstock")]
    OutOfStock,
    /// Product can be ordered but will ship later.
    #[serde(rename = "onbackorder")]
    OnBackorder,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "instock",
            StockStatus::OutOfStock => "outofstock",
            StockStatus::OnBackorder => "onbackorder",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "instock" => Some(StockStatus::InStock),
            "outofstock" => Some(StockStatus::OutOfStock),
            "onbackorder" => Some(StockStatus::OnBackorder),
            _ => None,
        }
    }

    /// Whether the product can be added to a cart.
    pub fn is_purchasable(&self) -> bool {
        !matches!(self, StockStatus::OutOfStock)
    }
}

/// A product image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductImage {
    /// Backend image id, stringified.
    pub id: String,
    /// Image URL.
    pub src: String,
    /// Alt text for accessibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Image name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A product attribute (e.g. Size: Large).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductAttribute {
    /// Backend attribute id.
    pub id: i64,
    /// Attribute name.
    pub name: String,
    /// Selected option value.
    pub option: String,
}

/// Physical dimensions, decimal-formatted strings as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    pub length: String,
    pub width: String,
    pub height: String,
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier, stringified.
    pub id: String,
    /// URL-friendly slug.
    pub slug: String,
    /// Product name.
    pub name: String,
    /// Full description (may contain HTML).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Short description for listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// Current price, decimal-formatted.
    pub price: String,
    /// Regular (non-sale) price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_price: Option<String>,
    /// Sale price, when on sale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<String>,
    /// Whether the product is currently on sale.
    pub on_sale: bool,
    /// Product images.
    pub images: Vec<ProductImage>,
    /// Categories this product belongs to.
    pub categories: Vec<Category>,
    /// Tags for filtering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    /// Stock availability.
    pub stock_status: StockStatus,
    /// Units in stock, when tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    /// Stock keeping unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Weight, decimal-formatted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    /// Physical dimensions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    /// Product attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<ProductAttribute>>,
    /// Variation ids, stringified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variations: Option<Vec<String>>,
    /// Average rating; absent when the backend reports none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    /// Number of ratings; absent when zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u32>,
    /// Canonical URL on the backend storefront.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    /// Creation date as reported by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    /// Last modification date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
}

impl Product {
    /// Whether the product can currently be purchased.
    pub fn is_purchasable(&self) -> bool {
        self.stock_status.is_purchasable()
    }

    /// First image, if any.
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.first()
    }
}

/// A category image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryImage {
    /// Backend image id, stringified.
    pub id: String,
    /// Image URL.
    pub src: String,
    /// Alt text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique category identifier, stringified.
    pub id: String,
    /// URL-friendly slug.
    pub slug: String,
    /// Category name.
    pub name: String,
    /// Category description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<CategoryImage>,
    /// Parent category id, stringified; absent for top-level categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Number of products in the category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Canonical URL on the backend storefront.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
}

/// A product tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Unique tag identifier, stringified.
    pub id: String,
    /// URL-friendly slug.
    pub slug: String,
    /// Tag name.
    pub name: String,
    /// Tag description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of products carrying the tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// Sort field for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    Date,
    Title,
    Price,
    Popularity,
    Rating,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Date => "date",
            OrderBy::Title => "title",
            OrderBy::Price => "price",
            OrderBy::Popularity => "popularity",
            OrderBy::Rating => "rating",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Parameters for listing products. Everything is optional; adapters apply
/// page 1 and 10 per page when unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductListParams {
    /// Page number, 1-based.
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
    /// Filter by category id or slug.
    pub category: Option<String>,
    /// Filter by tag id or slug.
    pub tag: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
    /// Sort field.
    pub orderby: Option<OrderBy>,
    /// Sort direction.
    pub order: Option<SortOrder>,
    /// Only on-sale products.
    pub on_sale: Option<bool>,
    /// Only featured products.
    pub featured: Option<bool>,
}

impl ProductListParams {
    /// Default page when unset.
    pub const DEFAULT_PAGE: u32 = 1;
    /// Default page size when unset.
    pub const DEFAULT_PER_PAGE: u32 = 10;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_order(mut self, orderby: OrderBy, order: SortOrder) -> Self {
        self.orderby = Some(orderby);
        self.order = Some(order);
        self
    }

    pub fn on_sale_only(mut self) -> Self {
        self.on_sale = Some(true);
        self
    }

    /// Effective page, applying the default.
    pub fn effective_page(&self) -> u32 {
        self.page.unwrap_or(Self::DEFAULT_PAGE)
    }

    /// Effective page size, applying the default.
    pub fn effective_per_page(&self) -> u32 {
        self.per_page.unwrap_or(Self::DEFAULT_PER_PAGE)
    }
}
