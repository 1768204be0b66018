//! Request bodies for the catalog API's `POST /api/v1/...` endpoints.

use serde::Serialize;
use shopdata_core::{ColorOption, NormalizedProduct, SpecGroup, SpecItem};
use shopdata_normalize::slugify;

/// Body of `POST /api/v1/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub slug: String,
    pub brand: String,
    pub category_id: i64,
    pub price: u64,
    pub price_old: u64,
    pub discount: String,
    pub thumbnail_image: String,
    pub is_published: bool,
}

impl CreateProductRequest {
    /// Builds the payload for `product`.
    ///
    /// A missing brand falls back to the first word of the name.
    #[must_use]
    pub fn from_product(product: &NormalizedProduct, category_id: i64) -> Self {
        let name = product.display_name().trim().to_owned();
        let brand = if product.brand.trim().is_empty() {
            name.split_whitespace().next().unwrap_or_default().to_owned()
        } else {
            product.brand.clone()
        };

        Self {
            slug: slugify(&name),
            brand,
            category_id,
            price: product.price.numeric,
            price_old: product.price_old.numeric,
            discount: product.discount.clone(),
            thumbnail_image: product.thumbnail().to_owned(),
            is_published: true,
            name,
        }
    }
}

/// Body of `POST /api/v1/product-colors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColorRequest {
    pub product_id: i64,
    pub name: String,
    pub slug: String,
    pub hex_color: String,
}

impl CreateColorRequest {
    /// Returns `None` when the color has no hex value to submit.
    #[must_use]
    pub fn from_color(product_id: i64, color: &ColorOption) -> Option<Self> {
        let hex_color = color.hex_color.trim();
        if hex_color.is_empty() {
            return None;
        }
        Some(Self {
            product_id,
            name: color.name.clone(),
            slug: slugify(&color.name),
            hex_color: hex_color.to_owned(),
        })
    }
}

/// Body of `POST /api/v1/product-images`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateImageRequest {
    pub product_id: i64,
    pub url: String,
}

/// Body of `POST /api/v1/product-specifications`. List values are sent as
/// one comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpecificationRequest {
    pub product_id: i64,
    pub group_name: String,
    pub label: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl CreateSpecificationRequest {
    #[must_use]
    pub fn from_item(product_id: i64, group: &SpecGroup, item: &SpecItem) -> Self {
        Self {
            product_id,
            group_name: group.category.clone(),
            label: item.label.clone(),
            value: item.value.to_joined(),
            kind: item.value.kind().to_owned(),
        }
    }
}
