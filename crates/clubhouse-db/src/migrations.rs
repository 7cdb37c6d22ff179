use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE members (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                email       TEXT UNIQUE,
                name        TEXT NOT NULL,
                linkedin    TEXT,
                title       TEXT,
                board       INTEGER NOT NULL DEFAULT 0,
                image       TEXT
            );

            CREATE INDEX idx_members_board ON members(board);

            CREATE TABLE events (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                title       TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                date        TEXT,
                location    TEXT NOT NULL DEFAULT '',
                event_type  TEXT NOT NULL DEFAULT 'club'
                            CHECK (event_type IN ('club', 'recruiting', 'featured')),
                image       TEXT
            );

            CREATE INDEX idx_events_type ON events(event_type);

            CREATE TABLE allowed_emails (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                email       TEXT NOT NULL UNIQUE,
                is_active   INTEGER NOT NULL DEFAULT 1,
                is_admin    INTEGER NOT NULL DEFAULT 0
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
