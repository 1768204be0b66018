pub mod app_config;
pub mod category;
pub mod config;
pub mod products;

use thiserror::Error;

pub use app_config::{AppConfig, CategoryIds};
pub use category::ProductCategory;
pub use config::{load_app_config, load_app_config_from_env, load_category_ids_from_env};
pub use products::{
    ColorOption, FormattedTimestamp, ImageCategory, ImageSet, Money, NormalizedProduct,
    ProductSummary, SpecGroup, SpecItem, SpecValue, StorageOption,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
