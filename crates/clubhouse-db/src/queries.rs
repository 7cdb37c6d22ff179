use anyhow::Result;
use clubhouse_types::models::{
    AllowedEmail, AllowedEmailFields, Event, EventFields, EventType, Member, MemberFields,
};
use rusqlite::{Connection, params};

use crate::Database;
use crate::models::{
    ALLOWED_EMAIL_COLUMNS, EVENT_COLUMNS, MEMBER_COLUMNS, allowed_email_from_row, event_from_row,
    member_from_row,
};

impl Database {
    // -- Members --

    pub fn list_members(&self) -> Result<Vec<Member>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {MEMBER_COLUMNS} FROM members ORDER BY id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], member_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_members_by_board(&self, board: bool) -> Result<Vec<Member>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE board = ?1 ORDER BY id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([board], member_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_member(&self, id: i64) -> Result<Option<Member>> {
        self.with_conn(|conn| query_member(conn, "id = ?1", id))
    }

    pub fn get_member_by_email(&self, email: &str) -> Result<Option<Member>> {
        self.with_conn(|conn| query_member(conn, "email = ?1", email))
    }

    pub fn create_member(&self, fields: &MemberFields) -> Result<Member> {
        self.with_conn_mut(|conn| {
            let sql = format!(
                "INSERT INTO members (email, name, linkedin, title, board, image)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING {MEMBER_COLUMNS}"
            );
            let member = conn.query_row(
                &sql,
                params![
                    fields.email,
                    fields.name,
                    fields.linked_in,
                    fields.title,
                    fields.board,
                    fields.image
                ],
                member_from_row,
            )?;
            Ok(member)
        })
    }

    /// Overwrite every column of an existing member. `None` if `id` is unknown.
    pub fn update_member(&self, id: i64, fields: &MemberFields) -> Result<Option<Member>> {
        self.with_conn_mut(|conn| {
            let sql = format!(
                "UPDATE members
                 SET email = ?1, name = ?2, linkedin = ?3, title = ?4, board = ?5, image = ?6
                 WHERE id = ?7
                 RETURNING {MEMBER_COLUMNS}"
            );
            let member = conn
                .query_row(
                    &sql,
                    params![
                        fields.email,
                        fields.name,
                        fields.linked_in,
                        fields.title,
                        fields.board,
                        fields.image,
                        id
                    ],
                    member_from_row,
                )
                .optional()?;
            Ok(member)
        })
    }

    pub fn delete_member(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| Ok(conn.execute("DELETE FROM members WHERE id = ?1", [id])? > 0))
    }

    /// Fetch the member owning `email`, inserting one built from `defaults`
    /// if none exists. Returns `(member, created)`.
    ///
    /// The insert is `ON CONFLICT DO NOTHING` against the unique email index,
    /// so two concurrent calls for a new email still yield a single row.
    pub fn get_or_create_member(&self, email: &str, defaults: &MemberFields) -> Result<(Member, bool)> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO members (email, name, linkedin, title, board, image)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(email) DO NOTHING",
                params![
                    email,
                    defaults.name,
                    defaults.linked_in,
                    defaults.title,
                    defaults.board,
                    defaults.image
                ],
            )?;

            let member = query_member(conn, "email = ?1", email)?
                .ok_or_else(|| anyhow::anyhow!("Member row for {} vanished after upsert", email))?;
            Ok((member, inserted == 1))
        })
    }

    // -- Events --

    pub fn list_events(&self) -> Result<Vec<Event>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], event_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_events_by_type(&self, event_type: EventType) -> Result<Vec<Event>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_type = ?1 ORDER BY id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([event_type.as_str()], event_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_event(&self, id: i64) -> Result<Option<Event>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1");
            Ok(conn.query_row(&sql, [id], event_from_row).optional()?)
        })
    }

    pub fn create_event(&self, fields: &EventFields) -> Result<Event> {
        self.with_conn_mut(|conn| {
            let sql = format!(
                "INSERT INTO events (title, description, date, location, event_type, image)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING {EVENT_COLUMNS}"
            );
            let event = conn.query_row(
                &sql,
                params![
                    fields.title,
                    fields.description,
                    fields.date,
                    fields.location,
                    fields.event_type.as_str(),
                    fields.image
                ],
                event_from_row,
            )?;
            Ok(event)
        })
    }

    pub fn update_event(&self, id: i64, fields: &EventFields) -> Result<Option<Event>> {
        self.with_conn_mut(|conn| {
            let sql = format!(
                "UPDATE events
                 SET title = ?1, description = ?2, date = ?3, location = ?4, event_type = ?5, image = ?6
                 WHERE id = ?7
                 RETURNING {EVENT_COLUMNS}"
            );
            let event = conn
                .query_row(
                    &sql,
                    params![
                        fields.title,
                        fields.description,
                        fields.date,
                        fields.location,
                        fields.event_type.as_str(),
                        fields.image,
                        id
                    ],
                    event_from_row,
                )
                .optional()?;
            Ok(event)
        })
    }

    pub fn delete_event(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| Ok(conn.execute("DELETE FROM events WHERE id = ?1", [id])? > 0))
    }

    // -- Allowed emails --

    pub fn list_allowed_emails(&self) -> Result<Vec<AllowedEmail>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {ALLOWED_EMAIL_COLUMNS} FROM allowed_emails ORDER BY id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], allowed_email_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_allowed_email(&self, id: i64) -> Result<Option<AllowedEmail>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {ALLOWED_EMAIL_COLUMNS} FROM allowed_emails WHERE id = ?1");
            Ok(conn.query_row(&sql, [id], allowed_email_from_row).optional()?)
        })
    }

    pub fn create_allowed_email(&self, fields: &AllowedEmailFields) -> Result<AllowedEmail> {
        self.with_conn_mut(|conn| {
            let sql = format!(
                "INSERT INTO allowed_emails (email, is_active, is_admin)
                 VALUES (?1, ?2, ?3)
                 RETURNING {ALLOWED_EMAIL_COLUMNS}"
            );
            let row = conn.query_row(
                &sql,
                params![fields.email, fields.is_active, fields.is_admin],
                allowed_email_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn update_allowed_email(&self, id: i64, fields: &AllowedEmailFields) -> Result<Option<AllowedEmail>> {
        self.with_conn_mut(|conn| {
            let sql = format!(
                "UPDATE allowed_emails SET email = ?1, is_active = ?2, is_admin = ?3
                 WHERE id = ?4
                 RETURNING {ALLOWED_EMAIL_COLUMNS}"
            );
            let row = conn
                .query_row(
                    &sql,
                    params![fields.email, fields.is_active, fields.is_admin, id],
                    allowed_email_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn delete_allowed_email(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            Ok(conn.execute("DELETE FROM allowed_emails WHERE id = ?1", [id])? > 0)
        })
    }
}

fn query_member<P: rusqlite::ToSql>(conn: &Connection, filter: &str, value: P) -> Result<Option<Member>> {
    let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE {filter}");
    let row = conn.query_row(&sql, [value], member_from_row).optional()?;
    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
