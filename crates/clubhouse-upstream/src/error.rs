use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// URL or service key absent from the environment.
    #[error("Supabase configuration missing")]
    NotConfigured,

    #[error("File must be an image")]
    NotAnImage,

    #[error("Query failed: {status}")]
    QueryFailed { status: u16 },

    #[error("Upload failed: {status} - {body}")]
    UploadFailed { status: u16, body: String },

    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
