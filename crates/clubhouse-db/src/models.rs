//! Row mapping between SQLite and the API models in `clubhouse-types`.

use clubhouse_types::models::{AllowedEmail, Event, EventType, Member};
use rusqlite::Row;
use rusqlite::types::Type;

pub const MEMBER_COLUMNS: &str = "id, email, name, linkedin, title, board, image";
pub const EVENT_COLUMNS: &str = "id, title, description, date, location, event_type, image";
pub const ALLOWED_EMAIL_COLUMNS: &str = "id, email, is_active, is_admin";

pub fn member_from_row(row: &Row<'_>) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        linked_in: row.get(3)?,
        title: row.get(4)?,
        board: row.get(5)?,
        image: row.get(6)?,
    })
}

pub fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    let event_type: String = row.get(5)?;
    let event_type = event_type
        .parse::<EventType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        date: row.get(3)?,
        location: row.get(4)?,
        event_type,
        image: row.get(6)?,
    })
}

pub fn allowed_email_from_row(row: &Row<'_>) -> rusqlite::Result<AllowedEmail> {
    Ok(AllowedEmail {
        id: row.get(0)?,
        email: row.get(1)?,
        is_active: row.get(2)?,
        is_admin: row.get(3)?,
    })
}
