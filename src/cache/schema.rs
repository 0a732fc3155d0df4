//! Schema of the persisted cache table.

use rusqlite::Connection;

/// Name of the single cache table.
pub const TABLE_NAME: &str = "DataCache";

/// Idempotent DDL applied on every opened connection.
pub const DDL: &str = "CREATE TABLE IF NOT EXISTS DataCache (
    Key     TEXT    NOT NULL UNIQUE,
    Value   TEXT    NOT NULL,
    Expires INTEGER NULL
);";

pub(crate) const SELECT_VALUE: &str = "SELECT Value FROM DataCache WHERE Key = ?1";
pub(crate) const SELECT_ENTRY: &str = "SELECT Key, Value, Expires FROM DataCache WHERE Key = ?1";
pub(crate) const SELECT_KEYS: &str = "SELECT Key FROM DataCache";
pub(crate) const DELETE_EXPIRED: &str = "DELETE FROM DataCache WHERE Expires <= ?1";
pub(crate) const DELETE_KEY: &str = "DELETE FROM DataCache WHERE Key = ?1";
pub(crate) const UPDATE_EXPIRES: &str = "UPDATE DataCache SET Expires = ?2 WHERE Key = ?1";
pub(crate) const UPSERT: &str = "INSERT INTO DataCache (Key, Value, Expires) VALUES (?1, ?2, ?3)
    ON CONFLICT(Key) DO UPDATE SET Value = excluded.Value, Expires = excluded.Expires";

/// Applies the schema to an open connection.
pub fn apply(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(DDL)
}
