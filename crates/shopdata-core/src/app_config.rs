use crate::category::ProductCategory;

/// Numeric catalog category ids, one per [`ProductCategory`] plus a fallback
/// for names that match no keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryIds {
    pub phone: i64,
    pub laptop: i64,
    pub smartwatch: i64,
    pub tablet: i64,
    pub default: i64,
}

impl Default for CategoryIds {
    fn default() -> Self {
        Self {
            phone: 2,
            laptop: 3,
            smartwatch: 5,
            tablet: 1,
            default: 2,
        }
    }
}

impl CategoryIds {
    /// Returns the configured id for `category`.
    #[must_use]
    pub fn for_category(&self, category: ProductCategory) -> i64 {
        match category {
            ProductCategory::Phone => self.phone,
            ProductCategory::Laptop => self.laptop,
            ProductCategory::Smartwatch => self.smartwatch,
            ProductCategory::Tablet => self.tablet,
        }
    }

    /// Infers the category id for a product name via the keyword table,
    /// falling back to `default` when nothing matches.
    #[must_use]
    pub fn resolve_for_name(&self, name: &str) -> i64 {
        ProductCategory::detect(name).map_or(self.default, |c| self.for_category(c))
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub api_base_url: String,
    pub api_bearer_token: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl AppConfig {
    /// Returns the bearer token, or an error naming the missing variable.
    ///
    /// Only the upload path needs a credential, so it is validated lazily.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::MissingEnvVar`] when `API_BEARER_TOKEN`
    /// was not set or was empty.
    pub fn require_bearer_token(&self) -> Result<&str, crate::ConfigError> {
        self.api_bearer_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| crate::ConfigError::MissingEnvVar("API_BEARER_TOKEN".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("api_base_url", &self.api_base_url)
            .field(
                "api_bearer_token",
                &self.api_bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
