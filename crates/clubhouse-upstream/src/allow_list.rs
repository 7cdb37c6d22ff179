use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::SupabaseConfig;
use crate::error::UpstreamError;

/// An active row of the remote allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AllowListEntry {
    pub id: i64,
    #[serde(default)]
    pub is_admin: bool,
}

/// Read-only view of who may use the site.
#[async_trait]
pub trait AllowList: Send + Sync {
    /// The active entry for `email`, or `None` if the address is not provisioned.
    async fn lookup(&self, email: &str) -> Result<Option<AllowListEntry>, UpstreamError>;
}

/// Allow-list backed by the hosted REST table.
pub struct SupabaseAllowList {
    http: reqwest::Client,
    config: Arc<SupabaseConfig>,
}

impl SupabaseAllowList {
    pub fn new(http: reqwest::Client, config: Arc<SupabaseConfig>) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl AllowList for SupabaseAllowList {
    async fn lookup(&self, email: &str) -> Result<Option<AllowListEntry>, UpstreamError> {
        let creds = self.config.credentials()?;
        let url = format!("{}/rest/v1/{}", creds.base_url, self.config.allow_list_table);
        let email_filter = format!("eq.{email}");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("select", "id,is_admin"),
                ("email", email_filter.as_str()),
                ("is_active", "eq.true"),
                ("limit", "1"),
            ])
            .header("apikey", creds.service_role_key)
            .bearer_auth(creds.service_role_key)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Allow-list query for {} failed with {}", email, status);
            return Err(UpstreamError::QueryFailed {
                status: status.as_u16(),
            });
        }

        let rows: Vec<AllowListEntry> = response.json().await?;
        debug!("Allow-list lookup for {}: {} row(s)", email, rows.len());
        Ok(rows.into_iter().next())
    }
}
