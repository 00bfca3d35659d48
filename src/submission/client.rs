//! ConvertClient - talks to the image conversion service.

use std::time::Duration;

use reqwest::multipart::{Form, Part};

use super::error_body::ErrorBody;
use crate::selection::{BlockWidth, SourceImage};

/// Environment variable overriding the service base URL.
pub const API_URL_ENV: &str = "MINECRAFTIMG_API_URL";

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Path of the conversion endpoint, appended to the base URL.
pub const CONVERT_PATH: &str = "/minecraftify";

/// Shown for every failure that is not a message from the service itself.
pub const UNREACHABLE_MESSAGE: &str =
    "Conversion failed. Is the conversion server running?";

/// How long the service itself lets a conversion run before answering 504.
pub const SERVICE_CONVERSION_BUDGET: Duration = Duration::from_secs(30);

/// Default timeout for a whole conversion request (2 minutes).
///
/// Must stay well above [`SERVICE_CONVERSION_BUDGET`] so the service's own
/// timeout message reaches the user instead of a local transport error.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the `/minecraftify` endpoint. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ConvertClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl ConvertClient {
    /// Create a client from `MINECRAFTIMG_API_URL`, falling back to
    /// [`DEFAULT_API_URL`].
    pub fn new() -> Result<Self, ConvertError> {
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::with_base_url(base_url)
    }

    /// Create a client for an explicit base URL with default timeouts.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ConvertError> {
        Self::with_timeouts(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_timeouts(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, ConvertError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the conversion endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CONVERT_PATH)
    }

    /// Upload `image` with `width` and return the converted image bytes.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::Service` with the interpreted error body for a
    /// non-2xx response, `ConvertError::EmptyResponse` for a 2xx response
    /// without a body, or `ConvertError::Http` if the request itself fails.
    pub async fn convert(
        &self,
        image: &SourceImage,
        width: BlockWidth,
    ) -> Result<Vec<u8>, ConvertError> {
        let image_part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.mime().as_str())?;

        let form = Form::new()
            .part("image", image_part)
            .text("width", width.to_string());

        let url = self.endpoint();
        log::debug!("POST {} ({}, width {})", url, image.file_name(), width);

        let response = self.http_client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            let message = ErrorBody::parse(&body).into_message();
            log::warn!("Conversion rejected with status {}: {}", status, message);
            return Err(ConvertError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if let Some(ct) = content_type.as_deref() {
            if !ct.starts_with("image/") {
                log::warn!("Conversion response has unexpected content type {}", ct);
            }
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ConvertError::EmptyResponse);
        }

        Ok(bytes.to_vec())
    }
}

/// Errors that can occur while converting an image.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Conversion service returned {status}: {message}")]
    Service {
        /// HTTP status code of the response
        status: u16,
        /// Message interpreted from the response body
        message: String,
    },

    #[error("Conversion service returned an empty body")]
    EmptyResponse,

    #[error("{0}")]
    InvalidWidth(String),
}

impl ConvertError {
    /// Text to show the user for this failure.
    ///
    /// Service messages and local width rejections are shown verbatim;
    /// everything else collapses to [`UNREACHABLE_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            ConvertError::Service { message, .. } => message.clone(),
            ConvertError::InvalidWidth(message) => message.clone(),
            ConvertError::Http(_) | ConvertError::EmptyResponse => UNREACHABLE_MESSAGE.to_string(),
        }
    }
}
