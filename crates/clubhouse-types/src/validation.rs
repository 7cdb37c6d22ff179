//! Field rules for writable records.
//!
//! Every check trims its input first and returns the normalized value.
//! Failures are collected per field into [`ValidationErrors`] so a single
//! response can report all of them.

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use validator::{ValidateEmail, ValidationError, ValidationErrors};

use crate::api::{AllowedEmailPayload, EventPayload, MemberPayload};
use crate::models::{AllowedEmailFields, EventFields, EventType, MemberFields};

const NAME_MAX: usize = 200;
const LINKED_IN_MAX: usize = 200;
const TITLE_MAX: usize = 200;
const IMAGE_MAX: usize = 500;
const EVENT_TITLE_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 1000;
const LOCATION_MAX: usize = 200;
const EMAIL_MAX: usize = 254;

/// `Full` writes (create, PUT) must carry every required field;
/// `Partial` writes (PATCH) only validate what was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Full,
    Partial,
}

fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn required() -> ValidationError {
    invalid("required", "This field is required.")
}

/// Error attached to the `email` field when a unique constraint rejects a write.
pub fn already_exists(entity: &str) -> ValidationError {
    invalid("unique", format!("{entity} with this email already exists."))
}

fn max_length(value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(invalid(
            "max_length",
            format!("Ensure this field has no more than {max} characters."),
        ));
    }
    Ok(())
}

pub fn member_name(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("blank", "Name cannot be empty"));
    }
    if trimmed.chars().count() < 2 {
        return Err(invalid("min_length", "Name must be at least 2 characters long"));
    }
    max_length(trimmed, NAME_MAX)?;
    Ok(trimmed.to_string())
}

/// Empty is allowed; anything else must be an http(s) URL.
pub fn linked_in(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(invalid("url", "LinkedIn must be a valid URL"));
    }
    max_length(trimmed, LINKED_IN_MAX)?;
    Ok(trimmed.to_string())
}

pub fn email(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("blank", "This field may not be blank."));
    }
    if !trimmed.validate_email() {
        return Err(invalid("email", "Enter a valid email address."));
    }
    max_length(trimmed, EMAIL_MAX)?;
    Ok(trimmed.to_string())
}

pub fn event_title(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("blank", "Title cannot be empty"));
    }
    if trimmed.chars().count() < 3 {
        return Err(invalid("min_length", "Title must be at least 3 characters long"));
    }
    max_length(trimmed, EVENT_TITLE_MAX)?;
    Ok(trimmed.to_string())
}

pub fn event_type(value: &str) -> Result<EventType, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("required", "Event type is required"));
    }
    trimmed.parse().map_err(|_| {
        let valid: Vec<&str> = EventType::ALL.iter().map(|t| t.as_str()).collect();
        invalid(
            "choice",
            format!("Event type must be one of: {}", valid.join(", ")),
        )
    })
}

/// Blank means no date.
pub fn event_date(value: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| invalid("date", "Date must be in YYYY-MM-DD format"))
}

fn optional_text(value: Option<String>, max: usize) -> Result<Option<String>, ValidationError> {
    value
        .map(|v| {
            let trimmed = v.trim();
            max_length(trimmed, max)?;
            Ok(trimmed.to_string())
        })
        .transpose()
}

/// Null collapses to the empty string.
fn defaulted_text(value: Option<String>, max: usize) -> Result<String, ValidationError> {
    optional_text(value, max).map(Option::unwrap_or_default)
}

fn assign<T>(errors: &mut ValidationErrors, field: &'static str, slot: &mut T, result: Result<T, ValidationError>) {
    match result {
        Ok(value) => *slot = value,
        Err(e) => errors.add(field, e),
    }
}

fn finish<T>(errors: ValidationErrors, value: T) -> Result<T, ValidationErrors> {
    if errors.is_empty() { Ok(value) } else { Err(errors) }
}

/// Apply a member payload on top of `base`.
pub fn member(payload: MemberPayload, base: MemberFields, mode: WriteMode) -> Result<MemberFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut fields = base;

    match payload.name {
        Some(name) => assign(&mut errors, "name", &mut fields.name, member_name(&name)),
        None if mode == WriteMode::Full => errors.add("name", required()),
        None => {}
    }
    if let Some(value) = payload.email {
        let result = match value {
            Some(raw) if !raw.trim().is_empty() => email(&raw).map(Some),
            _ => Ok(None),
        };
        assign(&mut errors, "email", &mut fields.email, result);
    }
    if let Some(value) = payload.linked_in {
        let result = value.map(|raw| linked_in(&raw)).transpose();
        assign(&mut errors, "linkedIn", &mut fields.linked_in, result);
    }
    if let Some(value) = payload.title {
        assign(&mut errors, "title", &mut fields.title, optional_text(value, TITLE_MAX));
    }
    if let Some(board) = payload.board {
        fields.board = board;
    }
    if let Some(value) = payload.image {
        assign(&mut errors, "image", &mut fields.image, optional_text(value, IMAGE_MAX));
    }

    finish(errors, fields)
}

pub fn event(payload: EventPayload, base: EventFields, mode: WriteMode) -> Result<EventFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut fields = base;

    match payload.title {
        Some(title) => assign(&mut errors, "title", &mut fields.title, event_title(&title)),
        None if mode == WriteMode::Full => errors.add("title", required()),
        None => {}
    }
    match payload.event_type {
        Some(kind) => assign(&mut errors, "event_type", &mut fields.event_type, event_type(&kind)),
        None if mode == WriteMode::Full => errors.add("event_type", required()),
        None => {}
    }
    if let Some(value) = payload.description {
        assign(&mut errors, "description", &mut fields.description, defaulted_text(value, DESCRIPTION_MAX));
    }
    if let Some(value) = payload.location {
        assign(&mut errors, "location", &mut fields.location, defaulted_text(value, LOCATION_MAX));
    }
    if let Some(value) = payload.date {
        let result = match value {
            Some(raw) => event_date(&raw),
            None => Ok(None),
        };
        assign(&mut errors, "date", &mut fields.date, result);
    }
    if let Some(value) = payload.image {
        assign(&mut errors, "image", &mut fields.image, optional_text(value, IMAGE_MAX));
    }

    finish(errors, fields)
}

pub fn allowed_email(
    payload: AllowedEmailPayload,
    base: AllowedEmailFields,
    mode: WriteMode,
) -> Result<AllowedEmailFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut fields = base;

    match payload.email {
        Some(raw) => assign(&mut errors, "email", &mut fields.email, email(&raw)),
        None if mode == WriteMode::Full => errors.add("email", required()),
        None => {}
    }
    if let Some(active) = payload.is_active {
        fields.is_active = active;
    }
    if let Some(admin) = payload.is_admin {
        fields.is_admin = admin;
    }

    finish(errors, fields)
}

/// Profile fields a member supplied about themselves. Absent fields leave
/// the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub linked_in: Option<String>,
    pub title: Option<String>,
}

impl ProfileChanges {
    pub fn apply(&self, fields: &mut MemberFields) {
        if let Some(name) = &self.name {
            fields.name = name.clone();
        }
        if let Some(linked_in) = &self.linked_in {
            fields.linked_in = Some(linked_in.clone());
        }
        if let Some(title) = &self.title {
            fields.title = Some(title.clone());
        }
    }
}

pub fn profile(
    name: Option<&str>,
    linked_in_value: Option<&str>,
    title: Option<&str>,
) -> Result<ProfileChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut changes = ProfileChanges::default();

    if let Some(raw) = name {
        assign(&mut errors, "name", &mut changes.name, member_name(raw).map(Some));
    }
    if let Some(raw) = linked_in_value {
        assign(&mut errors, "linkedIn", &mut changes.linked_in, linked_in(raw).map(Some));
    }
    if let Some(raw) = title {
        assign(&mut errors, "title", &mut changes.title, optional_text(Some(raw.to_string()), TITLE_MAX));
    }

    finish(errors, changes)
}

/// Flatten errors into `{field: [message, ...]}` with a stable key order.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
