//! HTTP client for the catalog REST API.
//!
//! Wraps `reqwest` with bearer authentication, a fixed per-request timeout
//! and typed request bodies. Each call is a single attempt; non-2xx statuses
//! surface as [`UploadError::UnexpectedStatus`].

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;

use crate::error::UploadError;
use crate::types::{
    CreateColorRequest, CreateImageRequest, CreateProductRequest, CreateSpecificationRequest,
};

const PRODUCTS_PATH: &str = "api/v1/products";
const COLORS_PATH: &str = "api/v1/product-colors";
const IMAGES_PATH: &str = "api/v1/product-images";
const SPECIFICATIONS_PATH: &str = "api/v1/product-specifications";

/// Client for the catalog API.
///
/// The bearer header is installed once at construction and reused for every
/// request made through this client.
pub struct CatalogClient {
    client: Client,
    base_url: Url,
}

impl CatalogClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// - [`UploadError::InvalidBaseUrl`] if `base_url` does not parse.
    /// - [`UploadError::InvalidBearerToken`] if the token is not a valid
    ///   header value.
    /// - [`UploadError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        bearer_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, UploadError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {bearer_token}"))
            .map_err(|_| UploadError::InvalidBearerToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        // Keep exactly one trailing slash so `Url::join` appends to the base
        // path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| UploadError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(UploadError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self { client, base_url })
    }

    /// Creates a product and returns its server-assigned id.
    ///
    /// # Errors
    ///
    /// - [`UploadError::Http`] on network failure or timeout.
    /// - [`UploadError::UnexpectedStatus`] on a non-2xx status.
    /// - [`UploadError::Deserialize`] if the body is not JSON.
    /// - [`UploadError::MissingProductId`] if the body has no `id` or `data.id`.
    pub async fn create_product(&self, payload: &CreateProductRequest) -> Result<i64, UploadError> {
        let url = self.endpoint(PRODUCTS_PATH)?;
        let body = self.post_json(&url, payload).await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| UploadError::Deserialize {
            context: url.to_string(),
            source: e,
        })?;
        extract_product_id(&value).ok_or_else(|| UploadError::MissingProductId {
            url: url.to_string(),
            body,
        })
    }

    /// # Errors
    ///
    /// [`UploadError::Http`] or [`UploadError::UnexpectedStatus`].
    pub async fn create_color(&self, payload: &CreateColorRequest) -> Result<(), UploadError> {
        let url = self.endpoint(COLORS_PATH)?;
        self.post_json(&url, payload).await.map(drop)
    }

    /// # Errors
    ///
    /// [`UploadError::Http`] or [`UploadError::UnexpectedStatus`].
    pub async fn create_image(&self, payload: &CreateImageRequest) -> Result<(), UploadError> {
        let url = self.endpoint(IMAGES_PATH)?;
        self.post_json(&url, payload).await.map(drop)
    }

    /// # Errors
    ///
    /// [`UploadError::Http`] or [`UploadError::UnexpectedStatus`].
    pub async fn create_specification(
        &self,
        payload: &CreateSpecificationRequest,
    ) -> Result<(), UploadError> {
        let url = self.endpoint(SPECIFICATIONS_PATH)?;
        self.post_json(&url, payload).await.map(drop)
    }

    fn endpoint(&self, path: &str) -> Result<Url, UploadError> {
        self.base_url
            .join(path)
            .map_err(|e| UploadError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// POSTs `payload` as JSON and returns the response body on a 2xx status.
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &Url,
        payload: &T,
    ) -> Result<String, UploadError> {
        let response = self.client.post(url.clone()).json(payload).send().await?;
        let status = response.status();
        // A body that fails to read is reported as empty; the status is what matters.
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(UploadError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        Ok(body)
    }
}

/// Reads the created product's id from a top-level `id` or a nested
/// `data.id`, accepting a JSON integer or a numeric string.
#[must_use]
pub fn extract_product_id(body: &Value) -> Option<i64> {
    id_value(body.get("id")).or_else(|| id_value(body.get("data").and_then(|d| d.get("id"))))
}

fn id_value(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
