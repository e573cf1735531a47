//! Storage facade: one JSON slot per concern. The backend is chosen at compile
//! time: browser localStorage (wasm), sqlite (`native-db`), or an in-process
//! map for plain native builds and tests.

use crate::directory::{ManagerDirectory, ManagerRecord};
use crate::error::Result;
use crate::settings::SheetSettings;

pub const KEY_MANAGERS: &str = "easyCallSheets_managers";
pub const KEY_SETTINGS: &str = "easyCallSheets_settings";

// Native (sqlite) path
#[cfg(all(feature = "native-db", not(target_arch = "wasm32")))]
pub mod native {
    use once_cell::sync::Lazy;
    use rusqlite::Connection;
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard};

    use crate::error::{CallSheetError, Result};

    #[path = "dao.rs"]
    pub mod dao;

    static DB: Lazy<Option<Mutex<Connection>>> = Lazy::new(|| {
        let path = db_file_path();
        if let Some(parent) = path.parent() { let _ = std::fs::create_dir_all(parent); }
        match Connection::open(&path).and_then(|conn| apply_migrations(&conn).map(|_| conn)) {
            Ok(conn) => {
                tracing::debug!(path = %path.display(), "sqlite store opened");
                Some(Mutex::new(conn))
            }
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "cannot open sqlite store");
                None
            }
        }
    });

    pub fn connection() -> Result<MutexGuard<'static, Connection>> {
        let db = DB.as_ref().ok_or_else(|| CallSheetError::Storage("sqlite store unavailable".into()))?;
        db.lock().map_err(|_| CallSheetError::Storage("sqlite store poisoned".into()))
    }

    fn db_file_path() -> PathBuf {
        let mut base = dirs_next::data_local_dir()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(std::env::temp_dir);
        base.push("easy_callsheets");
        base.push("data.db");
        base
    }

    fn apply_migrations(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);",
            [],
        )?;
        let migrations: &[(&str, &str)] = &[("0001_kv", super::MIGRATION_0001_KV)];
        for (name, sql) in migrations {
            let already: i64 = conn.query_row("SELECT COUNT(*) FROM _migrations WHERE name = ?1", [name], |row| row.get(0))?;
            if already == 0 {
                conn.execute_batch(sql)?;
                conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])?;
            }
        }
        Ok(())
    }
}

#[cfg(all(feature = "native-db", not(target_arch = "wasm32")))]
const MIGRATION_0001_KV: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

#[cfg(target_arch = "wasm32")] pub mod wasm_store;

// Neither browser nor sqlite: process-local slots
#[cfg(all(not(target_arch = "wasm32"), not(feature = "native-db")))]
pub mod memory {
    use once_cell::sync::Lazy;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::error::{CallSheetError, Result};

    static SLOTS: Lazy<Mutex<HashMap<String, String>>> = Lazy::new(|| Mutex::new(HashMap::new()));

    fn slots() -> Result<std::sync::MutexGuard<'static, HashMap<String, String>>> {
        SLOTS.lock().map_err(|_| CallSheetError::Storage("memory store poisoned".into()))
    }

    pub fn get_item(key: &str) -> Result<Option<String>> { Ok(slots()?.get(key).cloned()) }

    pub fn set_item(key: &str, value: &str) -> Result<()> {
        slots()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    pub fn remove_item(key: &str) -> Result<()> {
        slots()?.remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")] use wasm_store as backend;
#[cfg(all(feature = "native-db", not(target_arch = "wasm32")))] use native::dao as backend;
#[cfg(all(not(target_arch = "wasm32"), not(feature = "native-db")))] use memory as backend;

fn read_slot(key: &str) -> Option<String> {
    match backend::get_item(key) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(%key, error = %e, "storage read failed");
            None
        }
    }
}

/// Stored directory; a missing or corrupt slot gives an empty directory.
pub fn load_managers() -> ManagerDirectory {
    let Some(raw) = read_slot(KEY_MANAGERS) else { return ManagerDirectory::new() };
    match serde_json::from_str::<Vec<ManagerRecord>>(&raw) {
        Ok(records) => ManagerDirectory::from_records(records),
        Err(e) => {
            tracing::warn!(error = %e, "stored managers unreadable, starting empty");
            ManagerDirectory::new()
        }
    }
}

pub fn save_managers(directory: &ManagerDirectory) -> Result<()> {
    let json = serde_json::to_string(directory.list())?;
    backend::set_item(KEY_MANAGERS, &json)?;
    tracing::debug!(count = directory.len(), "managers saved");
    Ok(())
}

pub fn load_settings() -> SheetSettings {
    SheetSettings::from_json(read_slot(KEY_SETTINGS).as_deref())
}

pub fn save_settings(settings: &SheetSettings) -> Result<()> {
    let json = serde_json::to_string(settings)?;
    backend::set_item(KEY_SETTINGS, &json)
}

/// Drops both slots.
pub fn reset_data() -> Result<()> {
    backend::remove_item(KEY_MANAGERS)?;
    backend::remove_item(KEY_SETTINGS)?;
    tracing::info!("stored data cleared");
    Ok(())
}

#[cfg(all(test, not(target_arch = "wasm32"), not(feature = "native-db")))]
mod tests {
    use super::*;

    // The slots are process-wide; keep every assertion in one test.
    #[test]
    fn slots_round_trip_and_reset() {
        reset_data().unwrap();
        assert!(load_managers().is_empty());
        assert_eq!(load_settings(), SheetSettings::default());

        let dir = ManagerDirectory::from_records(vec![ManagerRecord::new("Zoé", "07"), ManagerRecord::new("alice", "06")]);
        save_managers(&dir).unwrap();
        let raw = memory::get_item(KEY_MANAGERS).unwrap().unwrap();
        assert_eq!(raw, r#"[{"name":"alice","phone":"06"},{"name":"Zoé","phone":"07"}]"#);
        assert_eq!(load_managers(), dir);

        let settings = SheetSettings { brand: "Studio".into(), ..SheetSettings::default() };
        save_settings(&settings).unwrap();
        assert_eq!(load_settings().brand, "Studio");

        memory::set_item(KEY_MANAGERS, "[{broken").unwrap();
        assert!(load_managers().is_empty());

        reset_data().unwrap();
        assert_eq!(memory::get_item(KEY_SETTINGS).unwrap(), None);
    }
}
