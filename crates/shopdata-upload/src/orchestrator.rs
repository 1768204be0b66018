//! Per-product upload sequencing against the catalog API.
//!
//! Each product moves through
//! `Pending → ProductCreated → ColorsAttempted → ImagesAttempted → SpecsAttempted → Done`,
//! or exits early as `Skipped` (no price) or `Failed` (product creation failed).
//!
//! Attachment failures are recorded per item and never abort sibling items,
//! later steps, or the already-created product. There is no rollback.

use serde::Serialize;
use shopdata_core::{CategoryIds, NormalizedProduct};

use crate::client::CatalogClient;
use crate::types::{
    CreateColorRequest, CreateImageRequest, CreateProductRequest, CreateSpecificationRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadState {
    Pending,
    ProductCreated,
    ColorsAttempted,
    ImagesAttempted,
    SpecsAttempted,
    Done,
    Skipped,
    Failed,
}

impl UploadState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Skipped | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum AttachmentOutcome {
    Attached,
    Failed(String),
    Skipped(String),
}

/// Result of one color, image or specification attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentReport {
    /// Color name, image URL, or `"group / label"` for specifications.
    pub item: String,
    pub outcome: AttachmentOutcome,
}

impl AttachmentReport {
    fn new(item: impl Into<String>, outcome: AttachmentOutcome) -> Self {
        Self {
            item: item.into(),
            outcome,
        }
    }
}

/// Outcome of uploading one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductReport {
    pub name: String,
    pub state: UploadState,
    /// Server-assigned id once the product exists remotely.
    pub remote_id: Option<i64>,
    pub category_id: Option<i64>,
    /// Why the product was skipped or failed.
    pub reason: Option<String>,
    pub colors: Vec<AttachmentReport>,
    pub images: Vec<AttachmentReport>,
    pub specifications: Vec<AttachmentReport>,
}

impl ProductReport {
    fn pending(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            state: UploadState::Pending,
            remote_id: None,
            category_id: None,
            reason: None,
            colors: Vec::new(),
            images: Vec::new(),
            specifications: Vec::new(),
        }
    }

    /// Number of attachments that failed across all three steps.
    #[must_use]
    pub fn failed_attachments(&self) -> usize {
        self.colors
            .iter()
            .chain(&self.images)
            .chain(&self.specifications)
            .filter(|a| matches!(a.outcome, AttachmentOutcome::Failed(_)))
            .count()
    }
}

/// Tally over one batch run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub skipped: usize,
    pub failed: usize,
    pub done: usize,
    pub products: Vec<ProductReport>,
}

/// Drives the dependent create-then-attach sequence for each product.
pub struct UploadOrchestrator {
    client: CatalogClient,
    category_ids: CategoryIds,
}

impl UploadOrchestrator {
    #[must_use]
    pub fn new(client: CatalogClient, category_ids: CategoryIds) -> Self {
        Self {
            client,
            category_ids,
        }
    }

    /// Uploads every product in order, one request at a time.
    ///
    /// `category_id` applies to every product when given; otherwise each
    /// product's category is inferred from its name.
    pub async fn run(&self, products: &[NormalizedProduct], category_id: Option<i64>) -> BatchReport {
        let total = products.len();
        let mut batch = BatchReport {
            total,
            ..BatchReport::default()
        };

        tracing::info!(total, category_id, "starting catalog upload");

        for (index, product) in products.iter().enumerate() {
            tracing::info!(
                position = index + 1,
                total,
                name = product.display_name(),
                "uploading product"
            );
            let report = self.upload_product(product, category_id).await;
            match report.state {
                UploadState::Skipped => batch.skipped += 1,
                UploadState::Failed => batch.failed += 1,
                UploadState::Done => batch.done += 1,
                _ => {}
            }
            batch.products.push(report);
        }

        tracing::info!(
            total,
            done = batch.done,
            skipped = batch.skipped,
            failed = batch.failed,
            "catalog upload finished"
        );
        batch
    }

    /// Runs the full sequence for one product.
    pub async fn upload_product(
        &self,
        product: &NormalizedProduct,
        category_id: Option<i64>,
    ) -> ProductReport {
        let name = product.display_name();
        let mut report = ProductReport::pending(name);

        if !product.has_price() {
            tracing::info!(name, "skipping product without price");
            report.state = UploadState::Skipped;
            report.reason = Some("no price or old price".to_string());
            return report;
        }

        let category_id =
            category_id.unwrap_or_else(|| self.category_ids.resolve_for_name(name));
        report.category_id = Some(category_id);

        let payload = CreateProductRequest::from_product(product, category_id);
        let product_id = match self.client.create_product(&payload).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(name, error = %e, "product creation failed");
                report.state = UploadState::Failed;
                report.reason = Some(e.to_string());
                return report;
            }
        };
        tracing::info!(name, product_id, category_id, "created product");
        report.remote_id = Some(product_id);
        report.state = UploadState::ProductCreated;

        report.colors = self.attach_colors(product_id, product).await;
        report.state = UploadState::ColorsAttempted;

        report.images = self.attach_images(product_id, product).await;
        report.state = UploadState::ImagesAttempted;

        report.specifications = self.attach_specifications(product_id, product).await;
        report.state = UploadState::SpecsAttempted;

        let failed = report.failed_attachments();
        if failed > 0 {
            tracing::warn!(name, product_id, failed, "product uploaded with failed attachments");
        }
        report.state = UploadState::Done;
        report
    }

    async fn attach_colors(
        &self,
        product_id: i64,
        product: &NormalizedProduct,
    ) -> Vec<AttachmentReport> {
        let mut results = Vec::with_capacity(product.color_options.len());
        for color in &product.color_options {
            let Some(payload) = CreateColorRequest::from_color(product_id, color) else {
                tracing::info!(product_id, color = %color.name, "skipping color without hex value");
                results.push(AttachmentReport::new(
                    &color.name,
                    AttachmentOutcome::Skipped("no hex color".to_string()),
                ));
                continue;
            };
            let outcome = match self.client.create_color(&payload).await {
                Ok(()) => AttachmentOutcome::Attached,
                Err(e) => {
                    tracing::warn!(product_id, color = %color.name, error = %e, "color attach failed");
                    AttachmentOutcome::Failed(e.to_string())
                }
            };
            results.push(AttachmentReport::new(&color.name, outcome));
        }
        results
    }

    async fn attach_images(
        &self,
        product_id: i64,
        product: &NormalizedProduct,
    ) -> Vec<AttachmentReport> {
        let mut results = Vec::with_capacity(product.images.urls.len());
        for url in &product.images.urls {
            let payload = CreateImageRequest {
                product_id,
                url: url.clone(),
            };
            let outcome = match self.client.create_image(&payload).await {
                Ok(()) => AttachmentOutcome::Attached,
                Err(e) => {
                    tracing::warn!(product_id, url = %url, error = %e, "image attach failed");
                    AttachmentOutcome::Failed(e.to_string())
                }
            };
            results.push(AttachmentReport::new(url, outcome));
        }
        results
    }

    async fn attach_specifications(
        &self,
        product_id: i64,
        product: &NormalizedProduct,
    ) -> Vec<AttachmentReport> {
        let mut results = Vec::new();
        for group in &product.specifications {
            for item in &group.items {
                let payload = CreateSpecificationRequest::from_item(product_id, group, item);
                let label = format!("{} / {}", group.category, item.label);
                let outcome = match self.client.create_specification(&payload).await {
                    Ok(()) => AttachmentOutcome::Attached,
                    Err(e) => {
                        tracing::warn!(product_id, spec = %label, error = %e, "specification attach failed");
                        AttachmentOutcome::Failed(e.to_string())
                    }
                };
                results.push(AttachmentReport::new(label, outcome));
            }
        }
        results
    }
}
