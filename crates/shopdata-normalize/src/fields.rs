//! Field-level transforms from [`ExtractedRecord`] to [`NormalizedProduct`].
//!
//! Each transform is total: missing or mistyped input yields the zero value
//! of the output structure, never an error.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Map, Value};
use shopdata_core::{
    ColorOption, FormattedTimestamp, ImageCategory, ImageSet, NormalizedProduct, ProductSummary,
    SpecGroup, SpecItem, SpecValue, StorageOption,
};

use crate::extract::{scalar_text, text_field, ExtractedRecord};
use crate::text::{extract_hex_color, parse_price};

/// Filename markers the storefront uses for numbered product shots.
const PRODUCT_SHOT_MARKERS: [&str; 5] = ["-1-", "-2-", "-3-", "-4-", "-5-"];

/// Normalizes one extracted record.
#[must_use]
pub fn process_record(record: ExtractedRecord) -> NormalizedProduct {
    let summary = ProductSummary {
        spec_count: record.specifications.len(),
        storage_count: record.storage_options.len(),
        color_count: record.color_options.len(),
        image_count: record.images.len(),
        has_discount: !record.discount.is_empty(),
        has_old_price: !record.price_old.is_empty(),
    };

    NormalizedProduct {
        id: record.id,
        price: parse_price(&record.price),
        price_old: parse_price(&record.price_old),
        specifications: process_specifications(&record.specifications),
        storage_options: process_storage_options(&record.storage_options),
        color_options: process_color_options(&record.color_options),
        images: process_images(&record.images),
        timestamp: format_timestamp(&record.timestamp),
        name: record.name,
        title: record.title,
        brand: record.brand,
        discount: record.discount,
        image: record.image,
        color: record.color,
        summary,
    }
}

/// Normalizes every record, preserving input order.
#[must_use]
pub fn process_records(records: Vec<ExtractedRecord>) -> Vec<NormalizedProduct> {
    records.into_iter().map(process_record).collect()
}

/// Normalizes raw specification groups.
///
/// Labels lose their trailing colon and surrounding whitespace; values are
/// passed through as text or as a list of text, tagged accordingly.
/// Non-object groups and items are dropped.
#[must_use]
pub fn process_specifications(specs: &[Value]) -> Vec<SpecGroup> {
    specs
        .iter()
        .filter_map(Value::as_object)
        .map(|group| {
            let items: Vec<SpecItem> = match group.get("items") {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(process_spec_item)
                    .collect(),
                _ => Vec::new(),
            };
            SpecGroup {
                category: text_field(group, "category"),
                item_count: items.len(),
                items,
            }
        })
        .collect()
}

fn process_spec_item(item: &Map<String, Value>) -> SpecItem {
    let label = text_field(item, "label")
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_owned();
    let value = match item.get("value") {
        Some(Value::Array(values)) => SpecValue::List(values.iter().map(scalar_text).collect()),
        Some(other) => SpecValue::Text(scalar_text(other)),
        None => SpecValue::default(),
    };
    SpecItem {
        label,
        kind: value.kind().to_owned(),
        value,
    }
}

/// Normalizes raw color swatches, deriving `hexColor` from `colorStyle`.
#[must_use]
pub fn process_color_options(colors: &[Value]) -> Vec<ColorOption> {
    colors
        .iter()
        .filter_map(Value::as_object)
        .map(|color| {
            let color_style = text_field(color, "colorStyle");
            ColorOption {
                name: text_field(color, "name"),
                is_active: bool_field(color, "isActive"),
                color_code: text_field(color, "colorCode"),
                product_code: text_field(color, "productCode"),
                hex_color: extract_hex_color(&color_style),
                color_style,
            }
        })
        .collect()
}

/// Normalizes raw storage options, splitting the capacity from its unit.
///
/// Unit detection checks `"GB"` before `"TB"`.
#[must_use]
pub fn process_storage_options(options: &[Value]) -> Vec<StorageOption> {
    options
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| {
            let option = text_field(entry, "option");
            let unit = if option.contains("GB") {
                "GB"
            } else if option.contains("TB") {
                "TB"
            } else {
                ""
            };
            StorageOption {
                capacity: option.replace("GB", "").replace("TB", "").trim().to_owned(),
                is_active: bool_field(entry, "isActive"),
                unit: unit.to_owned(),
                option,
            }
        })
        .collect()
}

/// Sorts gallery URLs into buckets, first matching rule wins:
/// `Slider` → slider, `Kit` → kit, a numbered-shot marker → product,
/// otherwise other.
///
/// An empty gallery has an empty `categories` map; a non-empty one always
/// carries all four buckets.
#[must_use]
pub fn process_images(urls: &[String]) -> ImageSet {
    if urls.is_empty() {
        return ImageSet::default();
    }

    let mut categories: BTreeMap<ImageCategory, Vec<String>> = ImageCategory::ALL
        .into_iter()
        .map(|c| (c, Vec::new()))
        .collect();

    for url in urls {
        categories
            .entry(classify_image(url))
            .or_default()
            .push(url.clone());
    }

    ImageSet {
        count: urls.len(),
        urls: urls.to_vec(),
        categories,
    }
}

fn classify_image(url: &str) -> ImageCategory {
    if url.contains("Slider") {
        ImageCategory::Slider
    } else if url.contains("Kit") {
        ImageCategory::Kit
    } else if PRODUCT_SHOT_MARKERS.iter().any(|m| url.contains(m)) {
        ImageCategory::Product
    } else {
        ImageCategory::Other
    }
}

/// Decomposes an ISO-8601 timestamp for display.
///
/// A trailing `Z` is read as UTC. Times are rendered in the timestamp's own
/// offset. Unparsable input keeps `raw` and leaves every derived field empty.
#[must_use]
pub fn format_timestamp(raw: &str) -> FormattedTimestamp {
    if raw.trim().is_empty() {
        return FormattedTimestamp::default();
    }

    let Some(dt) = parse_iso_timestamp(raw.trim()) else {
        tracing::debug!(raw, "unparsable timestamp");
        return FormattedTimestamp {
            raw: raw.to_owned(),
            ..FormattedTimestamp::default()
        };
    };

    FormattedTimestamp {
        raw: raw.to_owned(),
        formatted: dt.format("%d/%m/%Y %H:%M:%S").to_string(),
        date: dt.format("%d/%m/%Y").to_string(),
        time: dt.format("%H:%M:%S").to_string(),
        year: Some(dt.year()),
        month: Some(dt.month()),
        day: Some(dt.day()),
    }
}

/// Parses the ISO-8601 forms seen in scraper output, returning the wall-clock
/// time in the timestamp's own offset.
fn parse_iso_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.naive_local());
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

fn bool_field(obj: &Map<String, Value>, key: &str) -> bool {
    match obj.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    // -----------------------------------------------------------------------
    // process_images
    // -----------------------------------------------------------------------

    #[test]
    fn process_images_empty_has_no_buckets() {
        let set = process_images(&[]);
        assert_eq!(set.count, 0);
        assert!(set.urls.is_empty());
        assert!(set.categories.is_empty());
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, json!({ "count": 0, "urls": [], "categories": {} }));
    }

    #[test]
    fn process_images_first_rule_wins() {
        let input = urls(&[
            "https://cdn.example.vn/ip16-Slider-1-.jpg",
            "https://cdn.example.vn/ip16-Kit-2-.jpg",
            "https://cdn.example.vn/ip16-3-.jpg",
            "https://cdn.example.vn/ip16-box.jpg",
        ]);
        let set = process_images(&input);
        assert_eq!(set.count, 4);
        assert_eq!(set.urls, input);
        assert_eq!(set.bucket(ImageCategory::Slider), &input[0..1]);
        assert_eq!(set.bucket(ImageCategory::Kit), &input[1..2]);
        assert_eq!(set.bucket(ImageCategory::Product), &input[2..3]);
        assert_eq!(set.bucket(ImageCategory::Other), &input[3..4]);
    }

    #[test]
    fn process_images_every_url_in_exactly_one_bucket() {
        let input = urls(&[
            "a-Slider.jpg",
            "b-Kit.jpg",
            "c-1-.jpg",
            "d.jpg",
            "e-5-Slider.jpg",
            "f-Kit-4-.jpg",
            "g-9-.jpg",
        ]);
        let set = process_images(&input);
        assert_eq!(set.categories.len(), 4);
        let total: usize = set.categories.values().map(Vec::len).sum();
        assert_eq!(total, input.len());
        for url in &input {
            let hits = set
                .categories
                .values()
                .filter(|bucket| bucket.contains(url))
                .count();
            assert_eq!(hits, 1, "{url} should be in exactly one bucket");
        }
    }

    #[test]
    fn process_images_keyword_match_is_case_sensitive() {
        let set = process_images(&urls(&["ip16-slider.jpg"]));
        assert_eq!(set.bucket(ImageCategory::Other).len(), 1);
        assert!(set.bucket(ImageCategory::Slider).is_empty());
    }

    // -----------------------------------------------------------------------
    // process_specifications
    // -----------------------------------------------------------------------

    #[test]
    fn process_specifications_strips_label_colon_and_tags_type() {
        let specs = vec![json!({
            "category": "Màn hình",
            "items": [
                { "label": " Kích thước màn hình: ", "value": "6.9 inches" },
                { "label": "Tính năng:", "value": ["HDR10", "Dolby Vision"] },
                { "label": "Tần số quét", "value": 120 },
                "not-an-item"
            ]
        })];
        let groups = process_specifications(&specs);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.category, "Màn hình");
        assert_eq!(group.item_count, 3);
        assert_eq!(group.items.len(), group.item_count);

        assert_eq!(group.items[0].label, "Kích thước màn hình");
        assert_eq!(group.items[0].kind, "string");
        assert_eq!(group.items[0].value, SpecValue::Text("6.9 inches".into()));

        assert_eq!(group.items[1].label, "Tính năng");
        assert_eq!(group.items[1].kind, "array");
        assert_eq!(
            group.items[1].value,
            SpecValue::List(vec!["HDR10".into(), "Dolby Vision".into()])
        );

        assert_eq!(group.items[2].value, SpecValue::Text("120".into()));
    }

    #[test]
    fn process_specifications_keeps_inner_colons() {
        let specs = vec![json!({
            "category": "Camera",
            "items": [{ "label": "Tỉ lệ: khung hình ::", "value": "4:3" }]
        })];
        let groups = process_specifications(&specs);
        assert_eq!(groups[0].items[0].label, "Tỉ lệ: khung hình");
    }

    #[test]
    fn process_specifications_group_without_items() {
        let groups = process_specifications(&[json!({ "category": "Pin" }), json!(3)]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].item_count, 0);
        assert!(groups[0].items.is_empty());
    }

    // -----------------------------------------------------------------------
    // colors & storage
    // -----------------------------------------------------------------------

    #[test]
    fn process_color_options_extracts_hex() {
        let colors = vec![
            json!({
                "name": "Titan Sa Mạc",
                "isActive": true,
                "colorCode": "DT",
                "productCode": "IP16PM-DT",
                "colorStyle": "background-color:#C2A58B;"
            }),
            json!({ "name": "Đen", "colorStyle": "black" }),
        ];
        let processed = process_color_options(&colors);
        assert_eq!(processed.len(), 2);
        assert_eq!(processed[0].hex_color, "#C2A58B");
        assert!(processed[0].is_active);
        assert_eq!(processed[0].product_code, "IP16PM-DT");
        assert_eq!(processed[1].hex_color, "");
        assert!(!processed[1].is_active);
    }

    #[test]
    fn process_storage_options_splits_unit() {
        let options = vec![
            json!({ "option": "256GB", "isActive": true }),
            json!({ "option": "1TB" }),
            json!({ "option": "Mặc định" }),
        ];
        let processed = process_storage_options(&options);
        assert_eq!(processed[0].capacity, "256");
        assert_eq!(processed[0].unit, "GB");
        assert!(processed[0].is_active);
        assert_eq!(processed[1].capacity, "1");
        assert_eq!(processed[1].unit, "TB");
        assert_eq!(processed[2].capacity, "Mặc định");
        assert_eq!(processed[2].unit, "");
    }

    // -----------------------------------------------------------------------
    // format_timestamp
    // -----------------------------------------------------------------------

    #[test]
    fn format_timestamp_utc_z() {
        let ts = format_timestamp("2024-02-01T10:00:00Z");
        assert_eq!(ts.raw, "2024-02-01T10:00:00Z");
        assert_eq!(ts.date, "01/02/2024");
        assert_eq!(ts.time, "10:00:00");
        assert_eq!(ts.formatted, "01/02/2024 10:00:00");
        assert_eq!(ts.year, Some(2024));
        assert_eq!(ts.month, Some(2));
        assert_eq!(ts.day, Some(1));
    }

    #[test]
    fn format_timestamp_keeps_own_offset() {
        let ts = format_timestamp("2024-10-01T23:15:42.123+07:00");
        assert_eq!(ts.date, "01/10/2024");
        assert_eq!(ts.time, "23:15:42");
    }

    #[test]
    fn format_timestamp_naive_and_date_only() {
        assert_eq!(format_timestamp("2024-10-01T08:30:00").time, "08:30:00");
        let date_only = format_timestamp("2024-10-01");
        assert_eq!(date_only.date, "01/10/2024");
        assert_eq!(date_only.time, "00:00:00");
    }

    #[test]
    fn format_timestamp_invalid_keeps_raw_only() {
        let ts = format_timestamp("not-a-date");
        assert_eq!(ts.raw, "not-a-date");
        assert_eq!(ts.formatted, "");
        assert_eq!(ts.date, "");
        assert_eq!(ts.time, "");
        assert!(ts.year.is_none() && ts.month.is_none() && ts.day.is_none());
    }

    #[test]
    fn format_timestamp_empty() {
        assert_eq!(format_timestamp(""), FormattedTimestamp::default());
    }

    // -----------------------------------------------------------------------
    // process_record
    // -----------------------------------------------------------------------

    #[test]
    fn process_record_builds_summary() {
        let record = ExtractedRecord {
            id: Some("iphone-16".into()),
            title: "iPhone 16 128GB".into(),
            price: "22.990.000₫".into(),
            price_old: String::new(),
            discount: String::new(),
            specifications: vec![json!({ "category": "Camera", "items": [] })],
            storage_options: vec![json!({ "option": "128GB" }), json!({ "option": "256GB" })],
            color_options: vec![json!({ "name": "Hồng", "colorStyle": "background:#F2C6D0" })],
            images: urls(&["x-1-.jpg", "y-Slider.jpg"]),
            timestamp: "2024-10-01T08:30:00Z".into(),
            ..ExtractedRecord::default()
        };
        let product = process_record(record);
        assert_eq!(product.id.as_deref(), Some("iphone-16"));
        assert_eq!(product.price.numeric, 22_990_000);
        assert_eq!(product.price_old.numeric, 0);
        assert_eq!(product.summary.spec_count, 1);
        assert_eq!(product.summary.storage_count, 2);
        assert_eq!(product.summary.color_count, 1);
        assert_eq!(product.summary.image_count, 2);
        assert!(!product.summary.has_discount);
        assert!(!product.summary.has_old_price);
        assert_eq!(product.color_options[0].hex_color, "#F2C6D0");
        assert_eq!(product.timestamp.date, "01/10/2024");
    }
}
