//! Offline file commands: `extract`, `process`, `report` and `strip-fields`.

use std::path::{Path, PathBuf};

use num_format::{Locale, ToFormattedString};
use shopdata_normalize::{
    extract_records, process_records, read_json_value, read_products, strip_fields, summarize,
    write_csv, write_json, RawInput, SummaryReport,
};

/// Output paths for `process`, with defaults derived from the input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProcessOutputs {
    pub json: PathBuf,
    pub csv: PathBuf,
    pub report: PathBuf,
}

impl ProcessOutputs {
    pub(crate) fn resolve(
        input: &Path,
        json: Option<PathBuf>,
        csv: Option<PathBuf>,
        report: Option<PathBuf>,
    ) -> Self {
        Self {
            json: json.unwrap_or_else(|| derived_path(input, "processed.json")),
            csv: csv.unwrap_or_else(|| derived_path(input, "processed.csv")),
            report: report.unwrap_or_else(|| derived_path(input, "report.json")),
        }
    }
}

/// `data/phones.json` + `processed.json` → `data/phones.processed.json`.
fn derived_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "products".to_string(), |s| s.to_string_lossy().into_owned());
    input.with_file_name(format!("{stem}.{suffix}"))
}

fn read_raw(input: &Path) -> anyhow::Result<RawInput> {
    let value = read_json_value(input)?;
    Ok(RawInput::from_value(value))
}

pub(crate) fn run_extract(input: &Path, output: &Path) -> anyhow::Result<()> {
    let extraction = extract_records(read_raw(input)?);
    write_json(output, &extraction.records)?;
    println!(
        "extracted {} records ({} skipped) to {}",
        extraction.records.len(),
        extraction.skipped,
        output.display()
    );
    Ok(())
}

/// Extracts, normalizes and writes every sink.
///
/// Each sink is attempted even if an earlier one failed; the command fails
/// afterwards if any of them did.
pub(crate) fn run_process(input: &Path, outputs: &ProcessOutputs) -> anyhow::Result<()> {
    let extraction = extract_records(read_raw(input)?);
    let products = process_records(extraction.records);
    let report = summarize(&products);

    tracing::info!(
        input = %input.display(),
        products = products.len(),
        skipped = extraction.skipped,
        "normalized products"
    );

    let results = [
        ("JSON", write_json(&outputs.json, &products)),
        ("CSV", write_csv(&outputs.csv, &products)),
        ("report", write_json(&outputs.report, &report)),
    ];

    let mut failed = Vec::new();
    for (sink, result) in results {
        if let Err(e) = result {
            tracing::error!(sink, error = %e, "sink write failed");
            failed.push(sink);
        }
    }

    print_report(&report);

    if !failed.is_empty() {
        anyhow::bail!("failed to write {} output(s): {}", failed.len(), failed.join(", "));
    }
    println!(
        "wrote {}, {} and {}",
        outputs.json.display(),
        outputs.csv.display(),
        outputs.report.display()
    );
    Ok(())
}

pub(crate) fn run_report(input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let products = read_products(input)?;
    let report = summarize(&products);
    print_report(&report);
    if let Some(path) = output {
        write_json(path, &report)?;
        println!("report written to {}", path.display());
    }
    Ok(())
}

pub(crate) fn run_strip_fields(input: &Path, fields: &[String], backup: bool) -> anyhow::Result<()> {
    let outcome = strip_fields(input, fields, backup)?;
    println!(
        "removed [{}] from {}/{} records in {}",
        fields.join(", "),
        outcome.removed,
        outcome.records,
        input.display()
    );
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn share(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn print_report(report: &SummaryReport) {
    let total = report.total_products;
    let cov = &report.coverage;

    println!("Products: {}", total.to_formatted_string(&Locale::en));
    for (label, count) in [
        ("with title", cov.with_title),
        ("with price", cov.with_price),
        ("with specs", cov.with_specs),
        ("with images", cov.with_images),
        ("with colors", cov.with_colors),
    ] {
        println!("  {label:<12} {count}/{total} ({:.1}%)", share(count, total));
    }
    println!("Price range: {}", report.price_stats.price_range);
    println!(
        "Discounted: {} ({:.1}%)",
        report.discount_stats.total_discounts, report.discount_stats.discount_percentage
    );
    println!(
        "Images: {} total, {:.1} per product",
        report.image_stats.total_images, report.image_stats.avg_images_per_product
    );
    println!("Colors per product: {:.1}", report.color_stats.avg);
    println!("Storage options per product: {:.1}", report.storage_stats.avg);
}
