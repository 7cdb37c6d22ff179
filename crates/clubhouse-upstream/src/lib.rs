//! Clients for the hosted backend that owns the allow-list table and the
//! image buckets.

pub mod allow_list;
pub mod config;
pub mod error;
pub mod storage;

#[cfg(test)]
mod stub;

pub use allow_list::{AllowList, AllowListEntry, SupabaseAllowList};
pub use config::{BucketNames, SupabaseConfig};
pub use error::UpstreamError;
pub use storage::{BucketCategory, ImageUpload, ObjectStore, StoredObject, SupabaseStorage};

/// HTTP client shared by both gateways.
pub fn http_client(config: &SupabaseConfig) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder().timeout(config.timeout).build()?;
    Ok(client)
}
