use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::SupabaseConfig;
use crate::error::UpstreamError;

/// Logical bucket an image is filed under. Also the object key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketCategory {
    Media,
    Profile,
    Event,
}

impl BucketCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            BucketCategory::Media => "media",
            BucketCategory::Profile => "profile",
            BucketCategory::Event => "event",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "media" => Some(BucketCategory::Media),
            "profile" => Some(BucketCategory::Profile),
            "event" => Some(BucketCategory::Event),
            _ => None,
        }
    }
}

impl fmt::Display for BucketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated image ready to be sent, with its object key fixed.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    category: BucketCategory,
    key: String,
    content_type: String,
    data: Bytes,
}

impl ImageUpload {
    /// Rejects anything whose declared content type is not `image/*`.
    ///
    /// The key is `{category}/{identifier}.{extension}`; without an
    /// identifier a random UUID is used. The extension is whatever follows
    /// the last `.` of the file name's final path segment. When that is
    /// missing or not alphanumeric the content-type subtype is used.
    pub fn new(
        category: BucketCategory,
        identifier: Option<&str>,
        file_name: Option<&str>,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<Self, UpstreamError> {
        let content_type = content_type
            .map(str::trim)
            .filter(|ct| ct.starts_with("image/"))
            .ok_or(UpstreamError::NotAnImage)?;

        let extension = file_name
            .and_then(extension_of)
            .unwrap_or_else(|| subtype_extension(content_type));

        let stem = match identifier.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };

        Ok(Self {
            category,
            key: format!("{}/{}.{}", category, stem, extension),
            content_type: content_type.to_string(),
            data,
        })
    }

    pub fn category(&self) -> BucketCategory {
        self.category
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Extension taken from the last path segment of a client file name.
/// A dotless name is its own extension.
fn extension_of(file_name: &str) -> Option<&str> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let extension = base.rsplit('.').next().unwrap_or(base);
    let valid = !extension.is_empty() && extension.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(extension)
}

/// Leading alphanumeric run of the subtype: `image/svg+xml` gives `svg`.
fn subtype_extension(content_type: &str) -> &str {
    let subtype = content_type["image/".len()..]
        .split(|c: char| !c.is_ascii_alphanumeric())
        .next()
        .unwrap_or_default();
    if subtype.is_empty() { "img" } else { subtype }
}

/// Where an upload ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub bucket: String,
    pub public_url: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write the image under its key, replacing any existing object.
    async fn put_image(&self, upload: &ImageUpload) -> Result<StoredObject, UpstreamError>;
}

/// Object store backed by the hosted storage API.
pub struct SupabaseStorage {
    http: reqwest::Client,
    config: Arc<SupabaseConfig>,
}

impl SupabaseStorage {
    pub fn new(http: reqwest::Client, config: Arc<SupabaseConfig>) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    async fn put_image(&self, upload: &ImageUpload) -> Result<StoredObject, UpstreamError> {
        let creds = self.config.credentials()?;
        let bucket = self.config.buckets.resolve(upload.category());
        let url = format!("{}/storage/v1/object/{}/{}", creds.base_url, bucket, upload.key());

        let response = self
            .http
            .post(&url)
            .bearer_auth(creds.service_role_key)
            .header(CONTENT_TYPE, upload.content_type())
            .header(CACHE_CONTROL, "3600")
            .header("x-upsert", "true")
            .body(upload.data.clone())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            warn!("Upload of {} to bucket {} failed: {} {}", upload.key(), bucket, status, body);
            return Err(UpstreamError::UploadFailed {
                status: status.as_u16(),
                body,
            });
        }

        info!("Uploaded {} ({} bytes) to bucket {}", upload.key(), upload.len(), bucket);

        Ok(StoredObject {
            key: upload.key().to_string(),
            bucket: bucket.to_string(),
            public_url: format!(
                "{}/storage/v1/object/public/{}/{}",
                creds.base_url,
                bucket,
                upload.key()
            ),
        })
    }
}
