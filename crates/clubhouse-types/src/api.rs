use serde::{Deserialize, Deserializer, Serialize};

use crate::models::Member;

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// -- Members --

/// Body of `POST /members/`, `PUT` and `PATCH /members/{id}/`.
/// `id` and unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct MemberPayload {
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    pub name: Option<String>,
    #[serde(rename = "linkedIn", default, deserialize_with = "nullable")]
    pub linked_in: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<Option<String>>,
    pub board: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub image: Option<Option<String>>,
}

/// A member that has no stored row yet: every text field blank, `id` null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsavedMember {
    pub id: Option<i64>,
    pub email: String,
    pub name: String,
    #[serde(rename = "linkedIn")]
    pub linked_in: String,
    pub title: String,
    pub board: bool,
    pub image: String,
}

impl UnsavedMember {
    pub fn blank(email: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            name: String::new(),
            linked_in: String::new(),
            title: String::new(),
            board: false,
            image: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MemberSnapshot {
    Stored(Member),
    Unsaved(UnsavedMember),
}

/// Response of `/profile-update/` and `/get-member-by-email/`.
#[derive(Debug, Clone, Serialize)]
pub struct MemberEnvelope {
    pub success: bool,
    pub member: MemberSnapshot,
}

impl MemberEnvelope {
    pub fn stored(member: Member) -> Self {
        Self {
            success: true,
            member: MemberSnapshot::Stored(member),
        }
    }

    pub fn unsaved(email: impl Into<String>) -> Self {
        Self {
            success: true,
            member: MemberSnapshot::Unsaved(UnsavedMember::blank(email)),
        }
    }
}

// -- Events --

#[derive(Debug, Default, Deserialize)]
pub struct EventPayload {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub date: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub image: Option<Option<String>>,
}

// -- Allowed emails --

#[derive(Debug, Default, Deserialize)]
pub struct AllowedEmailPayload {
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

// -- Gateways --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadImageResponse {
    pub success: bool,
    pub filename: String,
    pub url: String,
    pub bucket: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminStatusResponse {
    pub is_admin: bool,
    pub email: String,
}

/// Body of every non-validation error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
