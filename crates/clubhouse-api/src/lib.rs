pub mod accounts;
pub mod allowed_emails;
pub mod error;
pub mod events;
pub mod extract;
pub mod health;
pub mod members;
pub mod profile;
pub mod routes;
pub mod state;
pub mod uploads;

pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, AppStateInner};
