//! REST client for the content backend.
//!
//! Every request carries `Authorization: Bearer <admin token>`. Non-2xx
//! responses become [`ApiError::Status`] holding the body text.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;
use crate::config::Config;
use crate::model::{EntityKind, FormMode, Payload, Record};

/// HTTP client bound to one backend configuration.
///
/// Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    config: Arc<Config>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    file: Option<String>,
}

impl CmsClient {
    /// Builds a client, applying the configured request timeout.
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `POST {base}{endpoint}` with a JSON body.
    pub async fn create(&self, kind: EntityKind, payload: &Payload) -> Result<(), ApiError> {
        let url = self.config.collection_url(kind);
        debug!(%kind, %url, "create");
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.admin_token)
            .json(payload)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// `PUT {base}{endpoint}{id}/` with a JSON body.
    pub async fn update(
        &self,
        kind: EntityKind,
        id: &str,
        payload: &Payload,
    ) -> Result<(), ApiError> {
        let url = self.config.record_url(kind, id);
        debug!(%kind, %url, "update");
        let response = self
            .http
            .put(url)
            .bearer_auth(&self.config.admin_token)
            .json(payload)
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Creates or updates depending on the form mode.
    pub async fn save(
        &self,
        kind: EntityKind,
        mode: &FormMode,
        payload: &Payload,
    ) -> Result<(), ApiError> {
        match mode {
            FormMode::Create => self.create(kind, payload).await,
            FormMode::Update(id) => self.update(kind, id, payload).await,
        }
    }

    /// `GET {base}{endpoint}{id}/`.
    ///
    /// Accepts the bare record or one wrapped as `{"data": …}`.
    pub async fn fetch(&self, kind: EntityKind, id: &str) -> Result<Record, ApiError> {
        let url = self.config.record_url(kind, id);
        debug!(%kind, %url, "fetch");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.config.admin_token)
            .send()
            .await?;
        let mut body: serde_json::Value = Self::parse_response(response).await?;
        if let Some(inner) = body.get_mut("data")
            && inner.is_object()
        {
            body = inner.take();
        }
        let mut record = match kind {
            EntityKind::Club => Record::Club(serde_json::from_value(body)?),
            EntityKind::Event => Record::Event(serde_json::from_value(body)?),
            EntityKind::News => Record::News(serde_json::from_value(body)?),
        };
        // Some list endpoints omit the id on detail views.
        if record.id().is_empty() {
            set_record_id(&mut record, id);
        }
        Ok(record)
    }

    /// Multipart `POST` of one `file` part to the upload endpoint.
    ///
    /// Returns the file identifier from `{"data": {"file": …}}`.
    pub async fn upload_image(&self, path: &Path) -> Result<String, ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ApiError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(guess_mime(path))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = &self.config.image_upload_url;
        debug!(%url, path = %path.display(), "upload");
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.admin_token)
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = Self::parse_response(response).await?;
        body.data
            .and_then(|d| d.file)
            .filter(|f| !f.is_empty())
            .ok_or(ApiError::MissingFileId)
    }

    // ---- private helpers ----

    /// Returns the response unchanged on success, or [`ApiError::Status`]
    /// with the body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

fn set_record_id(record: &mut Record, id: &str) {
    let slot = match record {
        Record::Club(r) => &mut r.id,
        Record::Event(r) => &mut r.id,
        Record::News(r) => &mut r.id,
    };
    *slot = id.to_string();
}

/// MIME type from the file extension; unknown types go as octet-stream.
fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}
