use crate::Database;
use crate::models::{IdentityRow, ScriptFields, ScriptRow, UserRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Identities (auth) --

    pub fn create_identity(
        &self,
        id: &str,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO identities (id, email, username, password) VALUES (?1, ?2, ?3, ?4)",
                (id, email, username, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_identity_by_email(&self, email: &str) -> Result<Option<IdentityRow>> {
        self.with_conn(|conn| query_identity(conn, "email", email))
    }

    pub fn get_identity_by_id(&self, id: &str) -> Result<Option<IdentityRow>> {
        self.with_conn(|conn| query_identity(conn, "id", id))
    }

    /// Replaces the stored hash. Returns the affected row count so callers
    /// can tell a missing identity from a successful change.
    pub fn update_identity_password(&self, id: &str, password_hash: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE identities SET password = ?2 WHERE id = ?1",
                (id, password_hash),
            )?;
            Ok(n)
        })
    }

    // -- Users (mirrored profile rows) --

    /// Idempotent by id: re-running sign-up logic for the same identity
    /// refreshes the row instead of duplicating or erroring.
    pub fn upsert_user(&self, id: &str, username: &str, email: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                     username = excluded.username,
                     email = excluded.email",
                (id, username, email),
            )?;
            Ok(())
        })
    }

    pub fn get_user(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, username, email FROM users WHERE id = ?1")?;
            let row = stmt
                .query_row([id], |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        email: row.get(2)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    // -- Scripts --

    pub fn insert_script(&self, id: &str, user_id: &str, fields: &ScriptFields) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO scripts (id, title, code, game, icon, keyless, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    id,
                    fields.title,
                    fields.code,
                    fields.game,
                    fields.icon,
                    fields.keyless,
                    user_id
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_script(&self, id: &str) -> Result<Option<ScriptRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{SCRIPT_SELECT} WHERE id = ?1"))?;
            let row = stmt.query_row([id], script_from_row).optional()?;
            Ok(row)
        })
    }

    pub fn recent_scripts(&self, limit: u32) -> Result<Vec<ScriptRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                // rowid tiebreak keeps same-second inserts in insertion order
                conn.prepare(&format!(
                    "{SCRIPT_SELECT} ORDER BY created_at DESC, rowid DESC LIMIT ?1"
                ))?;
            let rows = stmt
                .query_map([limit], script_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn scripts_by_user(&self, user_id: &str) -> Result<Vec<ScriptRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{SCRIPT_SELECT} WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt
                .query_map([user_id], script_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Update filtered by id AND owner. A non-owner gets 0 rows affected,
    /// never someone else's row.
    pub fn update_script(&self, id: &str, user_id: &str, fields: &ScriptFields) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE scripts
                 SET title = ?3, code = ?4, game = ?5, icon = ?6, keyless = ?7
                 WHERE id = ?1 AND user_id = ?2",
                rusqlite::params![
                    id,
                    user_id,
                    fields.title,
                    fields.code,
                    fields.game,
                    fields.icon,
                    fields.keyless
                ],
            )?;
            Ok(n)
        })
    }

    /// Delete filtered by id AND owner, same contract as [`update_script`].
    ///
    /// [`update_script`]: Database::update_script
    pub fn delete_script(&self, id: &str, user_id: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "DELETE FROM scripts WHERE id = ?1 AND user_id = ?2",
                (id, user_id),
            )?;
            Ok(n)
        })
    }
}

const SCRIPT_SELECT: &str =
    "SELECT id, title, code, game, icon, keyless, user_id, created_at FROM scripts";

fn script_from_row(row: &rusqlite::Row) -> std::result::Result<ScriptRow, rusqlite::Error> {
    Ok(ScriptRow {
        id: row.get(0)?,
        title: row.get(1)?,
        code: row.get(2)?,
        game: row.get(3)?,
        icon: row.get(4)?,
        keyless: row.get(5)?,
        user_id: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn query_identity(conn: &Connection, column: &str, value: &str) -> Result<Option<IdentityRow>> {
    // `column` is a compile-time constant at every call site, never user input.
    let mut stmt = conn.prepare(&format!(
        "SELECT id, email, username, password, created_at FROM identities WHERE {column} = ?1"
    ))?;

    let row = stmt
        .query_row([value], |row| {
            Ok(IdentityRow {
                id: row.get(0)?,
                email: row.get(1)?,
                username: row.get(2)?,
                password: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

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
