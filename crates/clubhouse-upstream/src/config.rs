use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::error::UpstreamError;
use crate::storage::BucketCategory;

pub const DEFAULT_MEDIA_BUCKET: &str = "media";
pub const DEFAULT_PROFILE_BUCKET: &str = "profile-pics";
pub const DEFAULT_EVENT_BUCKET: &str = "event-images";
pub const DEFAULT_ALLOW_LIST_TABLE: &str = "api_allowedemail";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Bucket name for each upload category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketNames {
    pub media: String,
    pub profile: String,
    pub event: String,
}

impl BucketNames {
    pub fn resolve(&self, category: BucketCategory) -> &str {
        match category {
            BucketCategory::Media => &self.media,
            BucketCategory::Profile => &self.profile,
            BucketCategory::Event => &self.event,
        }
    }
}

impl Default for BucketNames {
    fn default() -> Self {
        Self {
            media: DEFAULT_MEDIA_BUCKET.to_string(),
            profile: DEFAULT_PROFILE_BUCKET.to_string(),
            event: DEFAULT_EVENT_BUCKET.to_string(),
        }
    }
}

/// Connection settings for the hosted backend. Built once at startup.
///
/// URL and key are optional so the rest of the API keeps working without
/// them; the gateways report [`UpstreamError::NotConfigured`] per request.
#[derive(Clone)]
pub struct SupabaseConfig {
    url: Option<String>,
    service_role_key: Option<String>,
    pub buckets: BucketNames,
    pub allow_list_table: String,
    pub timeout: Duration,
}

/// Borrowed view of a complete set of credentials.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub base_url: &'a str,
    pub service_role_key: &'a str,
}

impl SupabaseConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let timeout_secs = match get("SUPABASE_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("SUPABASE_TIMEOUT_SECS is not a number: {raw}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            url: get("SUPABASE_URL").map(|url| url.trim_end_matches('/').to_string()),
            service_role_key: get("SUPABASE_SERVICE_ROLE_KEY"),
            buckets: BucketNames {
                media: or_default("SUPABASE_MEDIA_BUCKET", DEFAULT_MEDIA_BUCKET),
                profile: or_default("SUPABASE_PROFILE_BUCKET", DEFAULT_PROFILE_BUCKET),
                event: or_default("SUPABASE_EVENT_BUCKET", DEFAULT_EVENT_BUCKET),
            },
            allow_list_table: or_default("SUPABASE_ALLOWLIST_TABLE", DEFAULT_ALLOW_LIST_TABLE),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn credentials(&self) -> Result<Credentials<'_>, UpstreamError> {
        match (&self.url, &self.service_role_key) {
            (Some(base_url), Some(service_role_key)) => Ok(Credentials {
                base_url,
                service_role_key,
            }),
            _ => Err(UpstreamError::NotConfigured),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_ok()
    }
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("service_role_key", &self.service_role_key.as_ref().map(|_| "<redacted>"))
            .field("buckets", &self.buckets)
            .field("allow_list_table", &self.allow_list_table)
            .field("timeout", &self.timeout)
            .finish()
    }
}
