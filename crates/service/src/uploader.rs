//! Feature-image hosting.
//!
//! `ImageHost` is the seam the post workflow talks to; `CloudinaryUploader`
//! implements it against Cloudinary's signed upload API.

use std::time::Duration;

use async_trait::async_trait;
use configs::CloudinaryConfig;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("image host credentials are not configured")]
    NotConfigured,
    #[error("image host request failed: {0}")]
    Http(String),
    #[error("image host rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected image host response: {0}")]
    Decode(String),
}

/// Where an uploaded image ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
}

#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<UploadedImage, UploadError>;
    async fn destroy(&self, public_id: &str) -> Result<(), UploadError>;
}

pub struct CloudinaryUploader {
    client: reqwest::Client,
    cfg: CloudinaryConfig,
}

#[derive(Deserialize)]
struct UploadResponse {
    public_id: String,
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Cloudinary request signature: parameters sorted by name, joined as
/// `k=v&k=v`, the API secret appended, SHA-1 as lowercase hex.
pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let digest = Sha1::digest(format!("{joined}{api_secret}").as_bytes());
    format!("{:x}", digest)
}

impl CloudinaryUploader {
    pub fn new(cfg: CloudinaryConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| UploadError::Http(e.to_string()))?;
        Ok(Self { client, cfg })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{}",
            self.cfg.api_base.trim_end_matches('/'),
            self.cfg.cloud_name,
            action
        )
    }

    fn ensure_configured(&self) -> Result<(), UploadError> {
        if self.cfg.is_configured() { Ok(()) } else { Err(UploadError::NotConfigured) }
    }

    async fn read_error(resp: reqwest::Response) -> UploadError {
        let status = resp.status().as_u16();
        let message = match resp.json::<ErrorResponse>().await {
            Ok(body) => body.error.message,
            Err(_) => "no error details".to_string(),
        };
        UploadError::Rejected { status, message }
    }
}

#[async_trait]
impl ImageHost for CloudinaryUploader {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<UploadedImage, UploadError> {
        self.ensure_configured()?;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(&[("timestamp", timestamp.clone())], &self.cfg.api_secret);

        let form = Form::new()
            .text("api_key", self.cfg.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()));

        let resp = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Http(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Self::read_error(resp).await);
        }
        let body: UploadResponse = resp.json().await.map_err(|e| UploadError::Decode(e.to_string()))?;
        let url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| UploadError::Decode("response has no url".into()))?;
        info!(public_id = %body.public_id, event = "image_uploaded", "feature image uploaded");
        Ok(UploadedImage { url, public_id: body.public_id })
    }

    #[instrument(skip(self))]
    async fn destroy(&self, public_id: &str) -> Result<(), UploadError> {
        self.ensure_configured()?;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", public_id.to_string()), ("timestamp", timestamp.clone())],
            &self.cfg.api_secret,
        );
        let resp = self
            .client
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", public_id.to_string()),
                ("timestamp", timestamp),
                ("api_key", self.cfg.api_key.clone()),
                ("signature", signature),
            ])
            .send()
            .await
            .map_err(|e| UploadError::Http(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Self::read_error(resp).await);
        }
        let body: DestroyResponse = resp.json().await.map_err(|e| UploadError::Decode(e.to_string()))?;
        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(UploadError::Decode(format!("destroy returned {other:?}"))),
        }
    }
}
