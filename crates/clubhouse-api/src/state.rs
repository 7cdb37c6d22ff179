use std::sync::Arc;

use clubhouse_db::Database;
use clubhouse_upstream::{AllowList, ObjectStore};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub allow_list: Arc<dyn AllowList>,
    pub storage: Arc<dyn ObjectStore>,
    /// Largest accepted image, in bytes.
    pub max_upload_bytes: usize,
}

/// Run a database closure off the async runtime.
pub async fn blocking<F, T>(state: &AppState, f: F) -> anyhow::Result<T>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db)).await?
}
