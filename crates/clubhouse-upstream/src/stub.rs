//! Throwaway HTTP server standing in for the hosted backend in tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;

use crate::config::SupabaseConfig;

#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: &'static str,
    seen: Arc<Mutex<Vec<Captured>>>,
}

pub struct Stub {
    pub base_url: String,
    seen: Arc<Mutex<Vec<Captured>>>,
}

impl Stub {
    /// Answer every request with `status` and a JSON `body`.
    pub async fn start(status: StatusCode, body: &'static str) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            status,
            body,
            seen: seen.clone(),
        };
        let app = Router::new().fallback(capture).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            seen,
        }
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.seen.lock().unwrap().clone()
    }

    pub fn config(&self) -> SupabaseConfig {
        let base_url = self.base_url.clone();
        SupabaseConfig::from_lookup(move |key| match key {
            "SUPABASE_URL" => Some(base_url.clone()),
            "SUPABASE_SERVICE_ROLE_KEY" => Some("service-key".to_string()),
            "SUPABASE_EVENT_BUCKET" => Some("club-events".to_string()),
            _ => None,
        })
        .unwrap()
    }
}

async fn capture(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.seen.lock().unwrap().push(Captured {
        method,
        uri,
        headers,
        body,
    });
    (
        state.status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}
