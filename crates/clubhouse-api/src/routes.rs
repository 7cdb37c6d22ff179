use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;
use crate::{accounts, allowed_emails, events, health, members, profile, uploads};

/// Room for multipart framing and text fields on top of the image itself.
const FORM_OVERHEAD: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(FORM_OVERHEAD);

    let gateway = Router::new()
        .route("/health/", get(health::health))
        .route("/upload-image/", post(uploads::upload_image))
        .route("/admin-status/", post(accounts::admin_status))
        .route("/profile-update/", post(profile::update_profile))
        .route("/get-member-by-email/", post(accounts::get_member_by_email));

    let members = Router::new()
        .route("/members/", get(members::list_members).post(members::create_member))
        .route("/members/board/", get(members::list_board_members))
        .route("/members/non-board/", get(members::list_non_board_members))
        .route(
            "/members/{id}/",
            get(members::get_member)
                .put(members::replace_member)
                .patch(members::patch_member)
                .delete(members::delete_member),
        );

    let events = Router::new()
        .route("/events/", get(events::list_events).post(events::create_event))
        .route("/events/club/", get(events::list_club_events))
        .route("/events/featured/", get(events::list_featured_events))
        .route("/events/recruiting/", get(events::list_recruiting_events))
        .route(
            "/events/{id}/",
            get(events::get_event)
                .put(events::replace_event)
                .patch(events::patch_event)
                .delete(events::delete_event),
        );

    let allowed_emails = Router::new()
        .route(
            "/allowed-emails/",
            get(allowed_emails::list_allowed_emails).post(allowed_emails::create_allowed_email),
        )
        .route(
            "/allowed-emails/{id}/",
            get(allowed_emails::get_allowed_email)
                .put(allowed_emails::replace_allowed_email)
                .patch(allowed_emails::patch_allowed_email)
                .delete(allowed_emails::delete_allowed_email),
        );

    Router::new()
        .merge(gateway)
        .merge(members)
        .merge(events)
        .merge(allowed_emails)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
