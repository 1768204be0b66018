//! Extraction of flat per-product records from raw scraper output.
//!
//! ## Observed raw shapes
//!
//! ### Keyed map (phones)
//! A top-level object keyed by product slug. Each entry looks like
//! `{"data": {"title", "price", "priceOld", "discount", "specifications",
//! "storageOptions", "colorOptions", "images"}, "timestamp": "..."}`. The key
//! becomes the record `id`; `timestamp` sits next to `data`, not inside it.
//!
//! ### Product list (tablets, laptops, smartwatches)
//! `{"success": true, "data": {"total": N, "products": [...]}}`. Each product
//! carries listing fields (`name`, `brand`, `price`, `priceOld`, `discount`,
//! `image`, `color`) and optionally a `detail` object from the product page
//! with `title`, `price`, `priceOld`, `specifications`, `colorOptions` and
//! `images`.
//!
//! Scraped values are not reliably typed: prices have been seen as strings,
//! numbers and `null`. Scalars are coerced to text and anything else
//! degrades to an empty value.

use serde::Serialize;
use serde_json::{Map, Value};

/// Raw scraper output, classified once at extraction entry.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Object of `id -> {data, timestamp}` entries.
    KeyedMap(Map<String, Value>),
    /// The `data.products` array of a product-list document.
    ProductList(Vec<Value>),
    /// Anything else; carries a short description of what was found.
    Unrecognized(String),
}

impl RawInput {
    /// Classifies a parsed JSON document.
    ///
    /// An object whose `data` member is an object holding a `products` array
    /// is a product list; any other object is a keyed map.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                let is_product_list = map
                    .get("data")
                    .and_then(|d| d.get("products"))
                    .is_some_and(Value::is_array);
                if is_product_list {
                    match map.remove("data") {
                        Some(Value::Object(mut data)) => match data.remove("products") {
                            Some(Value::Array(products)) => RawInput::ProductList(products),
                            _ => RawInput::Unrecognized("data.products is not an array".into()),
                        },
                        _ => RawInput::Unrecognized("data is not an object".into()),
                    }
                } else {
                    RawInput::KeyedMap(map)
                }
            }
            other => RawInput::Unrecognized(format!("top-level {}", json_type_name(&other))),
        }
    }
}

/// A single product pulled out of raw input with fields flattened but not
/// yet normalized. Nested lists keep their raw JSON form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub brand: String,
    pub price: String,
    pub price_old: String,
    pub discount: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub color: String,
    pub specifications: Vec<Value>,
    pub storage_options: Vec<Value>,
    pub color_options: Vec<Value>,
    pub images: Vec<String>,
    pub timestamp: String,
}

/// Result of [`extract_records`]: the records that could be read and the
/// number of entries skipped as malformed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub records: Vec<ExtractedRecord>,
    pub skipped: usize,
}

/// Extracts flat records from either raw shape.
///
/// Never fails: malformed entries are logged at `warn` and counted in
/// [`Extraction::skipped`], and an unrecognized document yields no records.
#[must_use]
pub fn extract_records(input: RawInput) -> Extraction {
    let extraction = match input {
        RawInput::KeyedMap(map) => extract_keyed_map(map),
        RawInput::ProductList(products) => extract_product_list(products),
        RawInput::Unrecognized(found) => {
            tracing::error!(found = %found, "unrecognized raw product document; nothing extracted");
            Extraction::default()
        }
    };

    tracing::info!(
        extracted = extraction.records.len(),
        skipped = extraction.skipped,
        "extraction finished"
    );
    extraction
}

fn extract_keyed_map(map: Map<String, Value>) -> Extraction {
    let mut extraction = Extraction::default();

    for (key, entry) in map {
        let entry = match entry {
            Value::Object(entry) => entry,
            other => {
                tracing::warn!(id = %key, found = json_type_name(&other), "skipping entry: not an object");
                extraction.skipped += 1;
                continue;
            }
        };
        let data = match entry.get("data") {
            Some(Value::Object(data)) => data,
            Some(other) => {
                tracing::warn!(id = %key, found = json_type_name(other), "skipping entry: data is not an object");
                extraction.skipped += 1;
                continue;
            }
            None => {
                tracing::warn!(id = %key, "skipping entry: no data field");
                extraction.skipped += 1;
                continue;
            }
        };

        extraction.records.push(ExtractedRecord {
            id: Some(key),
            name: text_field(data, "name"),
            title: text_field(data, "title"),
            brand: text_field(data, "brand"),
            price: text_field(data, "price"),
            price_old: text_field(data, "priceOld"),
            discount: text_field(data, "discount"),
            image: text_field(data, "image"),
            color: text_field(data, "color"),
            specifications: array_field(data, "specifications"),
            storage_options: array_field(data, "storageOptions"),
            color_options: array_field(data, "colorOptions"),
            images: string_list_field(data, "images"),
            timestamp: text_field(&entry, "timestamp"),
        });
    }

    extraction
}

fn extract_product_list(products: Vec<Value>) -> Extraction {
    let mut extraction = Extraction::default();

    for (index, product) in products.into_iter().enumerate() {
        let product = match product {
            Value::Object(product) => product,
            other => {
                tracing::warn!(index, found = json_type_name(&other), "skipping product: not an object");
                extraction.skipped += 1;
                continue;
            }
        };

        let mut record = ExtractedRecord {
            id: Some(text_field(&product, "id")).filter(|id| !id.is_empty()),
            name: text_field(&product, "name"),
            brand: text_field(&product, "brand"),
            price: text_field(&product, "price"),
            price_old: text_field(&product, "priceOld"),
            discount: text_field(&product, "discount"),
            image: text_field(&product, "image"),
            color: text_field(&product, "color"),
            specifications: array_field(&product, "specifications"),
            storage_options: array_field(&product, "storageOptions"),
            color_options: array_field(&product, "colorOptions"),
            images: string_list_field(&product, "images"),
            timestamp: text_field(&product, "timestamp"),
            ..ExtractedRecord::default()
        };

        match product.get("detail") {
            Some(Value::Object(detail)) => apply_detail(&mut record, detail),
            Some(Value::Null) | None => {}
            Some(other) => {
                tracing::debug!(index, found = json_type_name(other), "ignoring non-object detail");
            }
        }

        extraction.records.push(record);
    }

    extraction
}

/// Overlays product-page detail onto listing fields. Non-empty detail
/// values win; empty ones leave the listing value in place.
fn apply_detail(record: &mut ExtractedRecord, detail: &Map<String, Value>) {
    let overlay_text = |target: &mut String, key: &str| {
        let value = text_field(detail, key);
        if !value.is_empty() {
            *target = value;
        }
    };
    overlay_text(&mut record.name, "title");
    overlay_text(&mut record.price, "price");
    overlay_text(&mut record.price_old, "priceOld");
    overlay_text(&mut record.timestamp, "timestamp");

    let overlay_list = |target: &mut Vec<Value>, key: &str| {
        let value = array_field(detail, key);
        if !value.is_empty() {
            *target = value;
        }
    };
    overlay_list(&mut record.specifications, "specifications");
    overlay_list(&mut record.storage_options, "storageOptions");
    overlay_list(&mut record.color_options, "colorOptions");

    let images = string_list_field(detail, "images");
    if !images.is_empty() {
        record.images = images;
    }
}

/// Reads `key` as text: strings pass through, numbers and booleans are
/// rendered, anything else is empty.
pub(crate) fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).map(scalar_text).unwrap_or_default()
}

pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn array_field(obj: &Map<String, Value>, key: &str) -> Vec<Value> {
    match obj.get(key) {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

fn string_list_field(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn keyed_fixture() -> Value {
        json!({
            "iphone-16-pro-max": {
                "data": {
                    "title": "iPhone 16 Pro Max 256GB",
                    "price": "30.990.000₫",
                    "priceOld": "34.990.000₫",
                    "discount": "-11%",
                    "specifications": [{ "category": "Màn hình", "items": [] }],
                    "storageOptions": [{ "option": "256GB", "isActive": true }],
                    "colorOptions": [{ "name": "Titan Sa Mạc", "colorStyle": "background:#C2A58B" }],
                    "images": ["https://cdn.example.vn/ip16-1-.jpg", 42]
                },
                "timestamp": "2024-10-01T08:30:00Z"
            },
            "broken-entry": { "data": "oops" },
            "no-data": { "timestamp": "2024-10-01T08:30:00Z" },
            "not-an-object": 7
        })
    }

    fn list_fixture() -> Value {
        json!({
            "success": true,
            "data": {
                "total": 3,
                "products": [
                    {
                        "name": "Galaxy Tab S9 FE",
                        "brand": "Samsung",
                        "price": "9.490.000₫",
                        "priceOld": "",
                        "image": "https://cdn.example.vn/tab-s9.jpg",
                        "detail": {
                            "title": "Samsung Galaxy Tab S9 FE WiFi 6GB 128GB",
                            "price": "8.990.000₫",
                            "priceOld": "",
                            "specifications": [{ "category": "Màn hình", "items": [] }],
                            "colorOptions": [{ "name": "Xám" }],
                            "images": ["https://cdn.example.vn/tab-s9-Slider.jpg"]
                        }
                    },
                    "garbage",
                    { "name": "iPad Air M2", "price": 16990000 }
                ]
            }
        })
    }

    #[test]
    fn from_value_detects_product_list() {
        let input = RawInput::from_value(list_fixture());
        assert!(matches!(input, RawInput::ProductList(ref p) if p.len() == 3));
    }

    #[test]
    fn from_value_detects_keyed_map() {
        let input = RawInput::from_value(keyed_fixture());
        assert!(matches!(input, RawInput::KeyedMap(ref m) if m.len() == 4));
    }

    #[test]
    fn from_value_keyed_map_with_data_key_but_no_products() {
        let input = RawInput::from_value(json!({ "data": { "title": "x" } }));
        assert!(matches!(input, RawInput::KeyedMap(_)));
    }

    #[test]
    fn from_value_rejects_non_object() {
        let input = RawInput::from_value(json!([1, 2, 3]));
        assert!(matches!(input, RawInput::Unrecognized(ref s) if s.contains("array")));
    }

    #[test]
    fn unrecognized_input_extracts_nothing() {
        let extraction = extract_records(RawInput::Unrecognized("top-level string".into()));
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.skipped, 0);
    }

    #[test]
    fn keyed_map_extracts_valid_entries_and_counts_skips() {
        let extraction = extract_records(RawInput::from_value(keyed_fixture()));
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.skipped, 3);

        let record = &extraction.records[0];
        assert_eq!(record.id.as_deref(), Some("iphone-16-pro-max"));
        assert_eq!(record.title, "iPhone 16 Pro Max 256GB");
        assert_eq!(record.price, "30.990.000₫");
        assert_eq!(record.price_old, "34.990.000₫");
        assert_eq!(record.timestamp, "2024-10-01T08:30:00Z");
        assert_eq!(record.specifications.len(), 1);
        assert_eq!(record.storage_options.len(), 1);
        // Non-string image entries are dropped.
        assert_eq!(record.images, vec!["https://cdn.example.vn/ip16-1-.jpg"]);
    }

    #[test]
    fn keyed_map_records_follow_file_order() {
        let raw: Value = serde_json::from_str(
            r#"{
                "zeta": {"data": {"title": "Zeta"}},
                "alpha": {"data": {"title": "Alpha"}},
                "mid": {"data": {"title": "Mid"}}
            }"#,
        )
        .unwrap();
        let extraction = extract_records(RawInput::from_value(raw));
        let ids: Vec<_> = extraction
            .records
            .iter()
            .map(|r| r.id.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(ids, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn product_list_detail_overrides_listing_fields() {
        let extraction = extract_records(RawInput::from_value(list_fixture()));
        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.skipped, 1);

        let tab = &extraction.records[0];
        assert_eq!(tab.name, "Samsung Galaxy Tab S9 FE WiFi 6GB 128GB");
        assert_eq!(tab.brand, "Samsung");
        assert_eq!(tab.price, "8.990.000₫");
        assert_eq!(tab.price_old, "");
        assert_eq!(tab.image, "https://cdn.example.vn/tab-s9.jpg");
        assert_eq!(tab.color_options.len(), 1);
        assert_eq!(tab.images, vec!["https://cdn.example.vn/tab-s9-Slider.jpg"]);
        assert!(tab.id.is_none());
    }

    #[test]
    fn product_list_without_detail_uses_listing_and_coerces_numbers() {
        let extraction = extract_records(RawInput::from_value(list_fixture()));
        let ipad = &extraction.records[1];
        assert_eq!(ipad.name, "iPad Air M2");
        assert_eq!(ipad.price, "16990000");
        assert!(ipad.specifications.is_empty());
        assert!(ipad.images.is_empty());
    }

    #[test]
    fn extracted_record_serializes_camel_case() {
        let extraction = extract_records(RawInput::from_value(keyed_fixture()));
        let json = serde_json::to_value(&extraction.records[0]).unwrap();
        assert!(json.get("priceOld").is_some());
        assert!(json.get("colorOptions").is_some());
        assert!(json.get("name").is_none());
    }
}
