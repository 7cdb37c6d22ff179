//! Self-service profile updates for allow-listed users.

use anyhow::anyhow;
use axum::{Json, extract::State};
use clubhouse_types::api::MemberEnvelope;
use clubhouse_types::models::{Member, MemberFields};
use clubhouse_types::validation::{self, ProfileChanges};
use clubhouse_upstream::{AllowListEntry, BucketCategory, UpstreamError};
use tracing::{info, warn};

use crate::accounts::{provisioned, required_email};
use crate::error::ApiError;
use crate::extract::{FormData, UploadedFile};
use crate::state::{AppState, blocking};
use crate::uploads::prepare_image;

const PROFILE_UPDATE_FAILED: &str = "Profile update failed";

/// POST /profile-update/: `email` plus any of `name`, `linkedIn`, `title`
/// and an `image` file.
pub async fn update_profile(
    State(state): State<AppState>,
    mut form: FormData,
) -> Result<Json<MemberEnvelope>, ApiError> {
    let email = required_email(&form)?;
    let entry = provisioned(&state, &email, PROFILE_UPDATE_FAILED).await?;

    let changes = validation::profile(form.text("name"), form.text("linkedIn"), form.text("title"))?;
    let image = form.take_file("image");

    let member = apply_profile_update(&state, email, entry, changes, image).await?;
    Ok(Json(MemberEnvelope::stored(member)))
}

/// Creates the member on first use, then applies `changes` and the image.
///
/// All input checks run before anything is written. The member row is
/// committed before the image goes out, so a failed upload on first use
/// leaves the new row behind, seeded from `changes` but without an image.
pub async fn apply_profile_update(
    state: &AppState,
    email: String,
    entry: AllowListEntry,
    changes: ProfileChanges,
    image: Option<UploadedFile>,
) -> Result<Member, ApiError> {
    let identifier = entry.id.to_string();
    let upload = image
        .map(|file| prepare_image(state, BucketCategory::Profile, Some(&identifier), file))
        .transpose()?;

    let defaults = MemberFields {
        email: Some(email.clone()),
        name: changes.name.clone().unwrap_or_default(),
        linked_in: Some(changes.linked_in.clone().unwrap_or_default()),
        title: Some(changes.title.clone().unwrap_or_default()),
        board: false,
        image: Some(String::new()),
    };

    let lookup = email.clone();
    let (member, created) = blocking(state, move |db| db.get_or_create_member(&lookup, &defaults))
        .await
        .map_err(|e| ApiError::internal(PROFILE_UPDATE_FAILED, e))?;
    if created {
        info!("Created member {} for {}", member.id, email);
    }

    let mut fields = member.fields();
    changes.apply(&mut fields);

    if let Some(upload) = upload {
        let stored = state.storage.put_image(&upload).await.map_err(|e| match e {
            UpstreamError::UploadFailed { status, body } => {
                warn!("Profile image for {} rejected by storage", email);
                ApiError::Upstream(format!("Image upload failed: {status} - {body}"))
            }
            other => ApiError::upstream(other, PROFILE_UPDATE_FAILED),
        })?;
        fields.image = Some(stored.key);
    }

    let id = member.id;
    blocking(state, move |db| db.update_member(id, &fields))
        .await
        .map_err(|e| ApiError::internal(PROFILE_UPDATE_FAILED, e))?
        .ok_or_else(|| ApiError::internal(PROFILE_UPDATE_FAILED, anyhow!("member {id} vanished mid-update")))
}
