//! `upload` command: push processed products to the catalog API.

use std::path::Path;

use shopdata_core::{AppConfig, CategoryIds};
use shopdata_normalize::{read_products, write_json};
use shopdata_upload::{BatchReport, CatalogClient, UploadOrchestrator, UploadState};

/// Reads `input`, uploads up to `limit` products and prints a summary.
///
/// `category_id` applies to every product; `None` infers it per product name.
///
/// # Errors
///
/// Fails when the bearer token is missing, the input cannot be read, or the
/// client cannot be built. Per-product failures are reported, not returned.
pub(crate) async fn run_upload(
    config: &AppConfig,
    category_ids: CategoryIds,
    input: &Path,
    category_id: Option<i64>,
    limit: Option<usize>,
    report_out: Option<&Path>,
) -> anyhow::Result<()> {
    let token = config.require_bearer_token()?;
    let mut products = read_products(input)?;
    if let Some(limit) = limit {
        products.truncate(limit);
    }
    if products.is_empty() {
        println!("no products to upload in {}", input.display());
        return Ok(());
    }

    let client = CatalogClient::new(
        &config.api_base_url,
        token,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let orchestrator = UploadOrchestrator::new(client, category_ids);
    let batch = orchestrator.run(&products, category_id).await;

    print_batch(&batch);
    if let Some(path) = report_out {
        write_json(path, &batch)?;
        println!("upload report written to {}", path.display());
    }
    Ok(())
}

fn print_batch(batch: &BatchReport) {
    for (index, product) in batch.products.iter().enumerate() {
        let detail = match product.state {
            UploadState::Done => format!(
                "id={} colors={} images={} specs={} failed_attachments={}",
                product.remote_id.unwrap_or_default(),
                product.colors.len(),
                product.images.len(),
                product.specifications.len(),
                product.failed_attachments()
            ),
            _ => product.reason.clone().unwrap_or_default(),
        };
        println!(
            "[{}/{}] {:?} {} {}",
            index + 1,
            batch.total,
            product.state,
            product.name,
            detail
        );
    }
    println!(
        "uploaded {} of {} products ({} skipped, {} failed)",
        batch.done, batch.total, batch.skipped, batch.failed
    );
}
