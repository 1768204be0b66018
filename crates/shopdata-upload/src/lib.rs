pub mod client;
pub mod error;
pub mod orchestrator;
pub mod types;

pub use client::{extract_product_id, CatalogClient};
pub use error::UploadError;
pub use orchestrator::{
    AttachmentOutcome, AttachmentReport, BatchReport, ProductReport, UploadOrchestrator,
    UploadState,
};
pub use types::{
    CreateColorRequest, CreateImageRequest, CreateProductRequest, CreateSpecificationRequest,
};
