/// Database row types — these map directly to SQLite rows.
/// Distinct from the scripthub-types API models to keep the DB layer
/// independent.

pub struct IdentityRow {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
}

pub struct ScriptRow {
    pub id: String,
    pub title: String,
    pub code: String,
    pub game: Option<String>,
    pub icon: Option<String>,
    pub keyless: String,
    pub user_id: String,
    pub created_at: String,
}

/// Field set for script insert/update. Owner and id are passed separately so
/// mutating queries can filter on both.
pub struct ScriptFields<'a> {
    pub title: &'a str,
    pub code: &'a str,
    pub game: Option<&'a str>,
    pub icon: Option<&'a str>,
    pub keyless: &'a str,
}
