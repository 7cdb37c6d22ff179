use axum::{Json, extract::State};
use clubhouse_types::api::{AdminStatusResponse, MemberEnvelope};
use clubhouse_upstream::AllowListEntry;

use crate::error::ApiError;
use crate::extract::FormData;
use crate::state::{AppState, blocking};

const ADMIN_STATUS_FAILED: &str = "Admin status check failed";
const MEMBER_LOOKUP_FAILED: &str = "Failed to get member data";

pub(crate) fn required_email(form: &FormData) -> Result<String, ApiError> {
    form.non_blank("email")
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request("Email is required"))
}

/// The active allow-list entry for `email`, or [`ApiError::NotProvisioned`].
pub(crate) async fn provisioned(
    state: &AppState,
    email: &str,
    fallback: &'static str,
) -> Result<AllowListEntry, ApiError> {
    state
        .allow_list
        .lookup(email)
        .await
        .map_err(|e| ApiError::upstream(e, fallback))?
        .ok_or(ApiError::NotProvisioned)
}

/// POST /admin-status/: unknown emails are simply not admins.
pub async fn admin_status(
    State(state): State<AppState>,
    form: FormData,
) -> Result<Json<AdminStatusResponse>, ApiError> {
    let email = required_email(&form)?;
    let entry = state
        .allow_list
        .lookup(&email)
        .await
        .map_err(|e| ApiError::upstream(e, ADMIN_STATUS_FAILED))?;

    Ok(Json(AdminStatusResponse {
        is_admin: entry.is_some_and(|e| e.is_admin),
        email,
    }))
}

/// POST /get-member-by-email/: a provisioned email without a member row
/// gets a blank, unsaved member.
pub async fn get_member_by_email(
    State(state): State<AppState>,
    form: FormData,
) -> Result<Json<MemberEnvelope>, ApiError> {
    let email = required_email(&form)?;
    provisioned(&state, &email, MEMBER_LOOKUP_FAILED).await?;

    let lookup = email.clone();
    let member = blocking(&state, move |db| db.get_member_by_email(&lookup))
        .await
        .map_err(|e| ApiError::internal(MEMBER_LOOKUP_FAILED, e))?;

    Ok(Json(match member {
        Some(member) => MemberEnvelope::stored(member),
        None => MemberEnvelope::unsaved(email),
    }))
}
