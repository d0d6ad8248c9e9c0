//! Raw WooCommerce REST payload shapes and their mapping into the internal
//! catalog types.
//!
//! The wire structs deserialize WooCommerce JSON verbatim (snake_case,
//! numeric ids). Mapping stringifies ids, drops zero ratings, and renames
//! fields onto the internal camelCase contract.

use serde::Deserialize;

use forge_commerce::catalog::{
    Category, CategoryImage, Dimensions, Product, ProductAttribute, ProductImage, StockStatus,
    Tag,
};

#[derive(Debug, Deserialize)]
pub(crate) struct WooImage {
    pub id: i64,
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WooCategoryRef {
    pub id: i64,
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WooTag {
    pub id: i64,
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WooAttribute {
    pub id: i64,
    pub name: String,
    pub option: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WooDimensions {
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WooProduct {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub regular_price: Option<String>,
    #[serde(default)]
    pub sale_price: Option<String>,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    pub images: Vec<WooImage>,
    #[serde(default)]
    pub categories: Vec<WooCategoryRef>,
    #[serde(default)]
    pub tags: Option<Vec<WooTag>>,
    #[serde(default)]
    pub stock_status: StockStatus,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub dimensions: Option<WooDimensions>,
    #[serde(default)]
    pub attributes: Option<Vec<WooAttribute>>,
    #[serde(default)]
    pub variations: Option<Vec<i64>>,
    /// Decimal-formatted string, "0.00" when unrated.
    #[serde(default)]
    pub average_rating: String,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_modified: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WooCategoryImage {
    #[serde(default)]
    pub id: Option<i64>,
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WooCategory {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<WooCategoryImage>,
    /// 0 means top-level.
    #[serde(default)]
    pub parent: i64,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub permalink: Option<String>,
}

impl From<WooImage> for ProductImage {
    fn from(image: WooImage) -> Self {
        ProductImage {
            id: image.id.to_string(),
            src: image.src,
            alt: image.alt,
            name: image.name,
        }
    }
}

impl From<WooCategoryRef> for Category {
    fn from(cat: WooCategoryRef) -> Self {
        Category {
            id: cat.id.to_string(),
            slug: cat.slug,
            name: cat.name,
            description: None,
            image: None,
            parent: None,
            count: None,
            permalink: None,
        }
    }
}

impl From<WooTag> for Tag {
    fn from(tag: WooTag) -> Self {
        Tag {
            id: tag.id.to_string(),
            slug: tag.slug,
            name: tag.name,
            description: None,
            count: None,
        }
    }
}

impl From<WooProduct> for Product {
    fn from(woo: WooProduct) -> Self {
        // "0.00" and unparseable strings both mean "unrated".
        let average_rating = woo
            .average_rating
            .parse::<f64>()
            .ok()
            .filter(|rating| *rating != 0.0);
        let rating_count = (woo.rating_count > 0).then_some(woo.rating_count);

        Product {
            id: woo.id.to_string(),
            slug: woo.slug,
            name: woo.name,
            description: woo.description,
            short_description: woo.short_description,
            price: woo.price,
            regular_price: woo.regular_price,
            sale_price: woo.sale_price,
            on_sale: woo.on_sale,
            images: woo.images.into_iter().map(Into::into).collect(),
            categories: woo.categories.into_iter().map(Into::into).collect(),
            tags: woo
                .tags
                .map(|tags| tags.into_iter().map(Into::into).collect()),
            stock_status: woo.stock_status,
            stock_quantity: woo.stock_quantity,
            sku: woo.sku,
            weight: woo.weight,
            dimensions: woo.dimensions.map(|d| Dimensions {
                length: d.length,
                width: d.width,
                height: d.height,
            }),
            attributes: woo.attributes.map(|attrs| {
                attrs
                    .into_iter()
                    .map(|attr| ProductAttribute {
                        id: attr.id,
                        name: attr.name,
                        option: attr.option,
                    })
                    .collect()
            }),
            variations: woo
                .variations
                .map(|ids| ids.into_iter().map(|id| id.to_string()).collect()),
            average_rating,
            rating_count,
            permalink: woo.permalink,
            date_created: woo.date_created,
            date_modified: woo.date_modified,
        }
    }
}

impl From<WooCategory> for Category {
    fn from(woo: WooCategory) -> Self {
        Category {
            id: woo.id.to_string(),
            slug: woo.slug,
            name: woo.name,
            description: woo.description,
            image: woo.image.map(|image| CategoryImage {
                id: image.id.map(|id| id.to_string()).unwrap_or_default(),
                src: image.src,
                alt: image.alt,
            }),
            parent: (woo.parent != 0).then(|| woo.parent.to_string()),
            count: woo.count,
            permalink: woo.permalink,
        }
    }
}
