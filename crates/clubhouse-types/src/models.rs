use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A club member profile.
///
/// `email` is the only link to the allow-list; there is no relational key
/// between the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub email: Option<String>,
    pub name: String,
    #[serde(rename = "linkedIn")]
    pub linked_in: Option<String>,
    pub title: Option<String>,
    pub board: bool,
    /// Object key in the profile bucket, not a public URL.
    pub image: Option<String>,
}

impl Member {
    pub fn fields(&self) -> MemberFields {
        MemberFields {
            email: self.email.clone(),
            name: self.name.clone(),
            linked_in: self.linked_in.clone(),
            title: self.title.clone(),
            board: self.board,
            image: self.image.clone(),
        }
    }
}

/// Every writable Member column, already validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFields {
    pub email: Option<String>,
    pub name: String,
    pub linked_in: Option<String>,
    pub title: Option<String>,
    pub board: bool,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Club,
    Recruiting,
    Featured,
}

impl EventType {
    pub const ALL: [EventType; 3] = [EventType::Club, EventType::Recruiting, EventType::Featured];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Club => "club",
            EventType::Recruiting => "recruiting",
            EventType::Featured => "featured",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventType(pub String);

impl fmt::Display for UnknownEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event type '{}'", self.0)
    }
}

impl std::error::Error for UnknownEventType {}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub location: String,
    pub event_type: EventType,
    pub image: Option<String>,
}

impl Event {
    pub fn fields(&self) -> EventFields {
        EventFields {
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date,
            location: self.location.clone(),
            event_type: self.event_type,
            image: self.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub location: String,
    pub event_type: EventType,
    pub image: Option<String>,
}

impl Default for EventFields {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            date: None,
            location: String::new(),
            event_type: EventType::Club,
            image: None,
        }
    }
}

/// An entry on the local allow-list table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedEmail {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
    pub is_admin: bool,
}

impl AllowedEmail {
    pub fn fields(&self) -> AllowedEmailFields {
        AllowedEmailFields {
            email: self.email.clone(),
            is_active: self.is_active,
            is_admin: self.is_admin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedEmailFields {
    pub email: String,
    pub is_active: bool,
    pub is_admin: bool,
}

impl Default for AllowedEmailFields {
    fn default() -> Self {
        Self {
            email: String::new(),
            is_active: true,
            is_admin: false,
        }
    }
}
