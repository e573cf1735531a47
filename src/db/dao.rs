#![cfg(feature = "native-db")]
use crate::db::native::connection;
use crate::error::Result;
use rusqlite::{params, OptionalExtension};

pub fn get_item(key: &str) -> Result<Option<String>> {
    let conn = connection()?;
    let value = conn
        .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
        .optional()?;
    Ok(value)
}

pub fn set_item(key: &str, value: &str) -> Result<()> {
    let conn = connection()?;
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn remove_item(key: &str) -> Result<()> {
    let conn = connection()?;
    conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
    Ok(())
}
