use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Auth identities. The `users` table below mirrors a subset of this
        -- for public profile reads; the split matches the hosted-auth setup
        -- this schema was migrated from.
        CREATE TABLE IF NOT EXISTS identities (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            username    TEXT NOT NULL,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL,
            email       TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS scripts (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            code        TEXT NOT NULL,
            game        TEXT,
            icon        TEXT,
            keyless     TEXT NOT NULL DEFAULT 'no',
            user_id     TEXT NOT NULL REFERENCES identities(id),
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_scripts_created
            ON scripts(created_at);

        CREATE INDEX IF NOT EXISTS idx_scripts_user
            ON scripts(user_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
