//! Batch statistics over normalized products.

use num_format::{Locale, ToFormattedString};
use serde::Serialize;
use shopdata_core::NormalizedProduct;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub total_products: usize,
    pub price_stats: PriceStats,
    pub discount_stats: DiscountStats,
    pub image_stats: ImageStats,
    pub color_stats: CountStats,
    pub storage_stats: CountStats,
    pub coverage: Coverage,
}

/// Computed over products whose `price.numeric > 0` only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceStats {
    pub min_price: u64,
    pub max_price: u64,
    pub avg_price: f64,
    /// `"1,000₫ - 2,000₫"`, or `"N/A"` when no product has a price.
    pub price_range: String,
}

impl Default for PriceStats {
    fn default() -> Self {
        Self {
            min_price: 0,
            max_price: 0,
            avg_price: 0.0,
            price_range: "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountStats {
    pub total_discounts: usize,
    /// Share of products with a discount label, `0.0..=100.0`.
    pub discount_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    pub total_images: usize,
    pub avg_images_per_product: f64,
    pub max_images: usize,
    pub min_images: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountStats {
    pub avg: f64,
    pub max: usize,
    pub min: usize,
}

/// How many products carry each kind of data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub with_title: usize,
    pub with_price: usize,
    pub with_specs: usize,
    pub with_images: usize,
    pub with_colors: usize,
}

/// Summarizes a batch. An empty batch (or an empty filtered subset) yields
/// zeros, never a division by zero.
#[must_use]
pub fn summarize(products: &[NormalizedProduct]) -> SummaryReport {
    let total = products.len();

    let prices: Vec<u64> = products
        .iter()
        .map(|p| p.price.numeric)
        .filter(|n| *n > 0)
        .collect();
    let image_counts: Vec<usize> = products.iter().map(|p| p.images.count).collect();
    let color_counts: Vec<usize> = products.iter().map(|p| p.summary.color_count).collect();
    let storage_counts: Vec<usize> = products
        .iter()
        .map(|p| p.summary.storage_count)
        .collect();
    let total_discounts = products.iter().filter(|p| !p.discount.is_empty()).count();

    let report = SummaryReport {
        total_products: total,
        price_stats: price_stats(&prices),
        discount_stats: DiscountStats {
            total_discounts,
            discount_percentage: percentage(total_discounts, total),
        },
        image_stats: ImageStats {
            total_images: image_counts.iter().sum(),
            avg_images_per_product: mean_usize(&image_counts),
            max_images: image_counts.iter().copied().max().unwrap_or(0),
            min_images: image_counts.iter().copied().min().unwrap_or(0),
        },
        color_stats: count_stats(&color_counts),
        storage_stats: count_stats(&storage_counts),
        coverage: Coverage {
            with_title: products
                .iter()
                .filter(|p| !p.display_name().is_empty())
                .count(),
            with_price: prices.len(),
            with_specs: products.iter().filter(|p| p.summary.spec_count > 0).count(),
            with_images: products.iter().filter(|p| p.images.count > 0).count(),
            with_colors: products.iter().filter(|p| p.summary.color_count > 0).count(),
        },
    };

    tracing::debug!(
        total,
        priced = report.coverage.with_price,
        discounted = total_discounts,
        "computed summary report"
    );
    report
}

#[allow(clippy::cast_precision_loss)]
fn price_stats(prices: &[u64]) -> PriceStats {
    let (Some(&min), Some(&max)) = (prices.iter().min(), prices.iter().max()) else {
        return PriceStats::default();
    };
    let sum: u128 = prices.iter().map(|p| u128::from(*p)).sum();
    PriceStats {
        min_price: min,
        max_price: max,
        avg_price: sum as f64 / prices.len() as f64,
        price_range: format!(
            "{}₫ - {}₫",
            min.to_formatted_string(&Locale::en),
            max.to_formatted_string(&Locale::en)
        ),
    }
}

fn count_stats(counts: &[usize]) -> CountStats {
    CountStats {
        avg: mean_usize(counts),
        max: counts.iter().copied().max().unwrap_or(0),
        min: counts.iter().copied().min().unwrap_or(0),
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean_usize(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<usize>() as f64 / values.len() as f64
}

#[allow(clippy::cast_precision_loss)]
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}
