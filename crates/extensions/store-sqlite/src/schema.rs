//! Database schema management.

use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;

/// SQL function used for case-insensitive matching. Folds with Rust's
/// Unicode lower-casing so SQL matching agrees with `KeywordPredicate::matches`.
pub const FOLD_FUNCTION: &str = "scmd_fold";

/// Register functions and create tables.
pub fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.create_scalar_function(
        FOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS commands (
    id INTEGER PRIMARY KEY,
    key TEXT NOT NULL,
    data TEXT NOT NULL,
    embedding BLOB
);

CREATE INDEX IF NOT EXISTS idx_commands_key ON commands(key);
"#;
