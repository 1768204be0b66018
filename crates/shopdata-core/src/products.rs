use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A product scraped from a storefront, with every monetary, spec, color and
/// image field in structured form.
///
/// Every field defaults when absent so processed files written by older runs
/// (or by hand) can still be read back for reporting and upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizedProduct {
    /// Source key for keyed-map inputs (e.g. the scraper's product slug).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name from product-list inputs.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Page title from keyed-map inputs.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub brand: String,
    pub price: Money,
    pub price_old: Money,
    /// Discount label exactly as scraped, e.g. `"-12%"`.
    pub discount: String,
    /// Direct thumbnail URL, when the source provides one.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub color: String,
    pub specifications: Vec<SpecGroup>,
    pub storage_options: Vec<StorageOption>,
    pub color_options: Vec<ColorOption>,
    pub images: ImageSet,
    pub timestamp: FormattedTimestamp,
    pub summary: ProductSummary,
}

impl NormalizedProduct {
    /// The name to publish: `name` when set, otherwise `title`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.title
        } else {
            &self.name
        }
    }

    /// Thumbnail URL: the direct `image` field, else the first gallery URL.
    #[must_use]
    pub fn thumbnail(&self) -> &str {
        if self.image.is_empty() {
            self.images.urls.first().map_or("", String::as_str)
        } else {
            &self.image
        }
    }

    /// `true` when either the current or the old price parsed to a non-zero value.
    #[must_use]
    pub fn has_price(&self) -> bool {
        self.price.numeric > 0 || self.price_old.numeric > 0
    }
}

/// A price as scraped plus its integer value in the smallest display unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Money {
    /// Original text, e.g. `"1.234.567₫"`.
    pub value: String,
    /// Currency glyph, `"₫"` for every non-empty price.
    pub currency: String,
    /// First digit run after stripping grouping punctuation; `0` when absent.
    pub numeric: u64,
}

/// One titled group of specification rows, e.g. `"Màn hình"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecGroup {
    pub category: String,
    pub items: Vec<SpecItem>,
    /// Always equal to `items.len()`.
    pub item_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecItem {
    /// Label trimmed, with trailing colons removed; inner colons are kept.
    pub label: String,
    pub value: SpecValue,
    /// `"array"` when `value` is a list, `"string"` otherwise.
    #[serde(rename = "type")]
    pub kind: String,
}

/// A specification value: either a single string or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Text(String),
    List(Vec<String>),
}

impl Default for SpecValue {
    fn default() -> Self {
        SpecValue::Text(String::new())
    }
}

impl SpecValue {
    /// The `type` tag written next to the value.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SpecValue::Text(_) => "string",
            SpecValue::List(_) => "array",
        }
    }

    /// Flattens the value for APIs that only accept text; lists are joined
    /// with `", "`.
    #[must_use]
    pub fn to_joined(&self) -> String {
        match self {
            SpecValue::Text(s) => s.clone(),
            SpecValue::List(items) => items.join(", "),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorOption {
    pub name: String,
    pub is_active: bool,
    pub color_code: String,
    pub product_code: String,
    /// Inline CSS copied from the swatch, e.g. `"background:#1A2B3C;"`.
    pub color_style: String,
    /// First `#RRGGBB` token in `color_style`, or empty.
    pub hex_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageOption {
    pub option: String,
    pub is_active: bool,
    /// `option` with the `GB`/`TB` suffix removed.
    pub capacity: String,
    /// `"GB"`, `"TB"` or empty.
    pub unit: String,
}

/// Buckets a gallery URL can be sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageCategory {
    Slider,
    Product,
    Kit,
    Other,
}

impl ImageCategory {
    pub const ALL: [ImageCategory; 4] = [
        ImageCategory::Slider,
        ImageCategory::Product,
        ImageCategory::Kit,
        ImageCategory::Other,
    ];
}

/// Product gallery with URLs grouped by [`ImageCategory`].
///
/// `categories` is empty when the gallery is empty, and carries all four
/// buckets (possibly empty) otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSet {
    pub count: usize,
    pub urls: Vec<String>,
    pub categories: BTreeMap<ImageCategory, Vec<String>>,
}

impl ImageSet {
    /// URLs in the given bucket, or an empty slice.
    #[must_use]
    pub fn bucket(&self, category: ImageCategory) -> &[String] {
        self.categories.get(&category).map_or(&[], Vec::as_slice)
    }
}

/// A scrape timestamp decomposed for display. Derived fields are empty when
/// `raw` could not be parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattedTimestamp {
    pub raw: String,
    /// `dd/mm/yyyy HH:MM:SS`
    pub formatted: String,
    /// `dd/mm/yyyy`
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

/// Per-product counts derived at normalization time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSummary {
    pub spec_count: usize,
    pub storage_count: usize,
    pub color_count: usize,
    pub image_count: usize,
    pub has_discount: bool,
    pub has_old_price: bool,
}
