use web_sys::{window, Storage};

use crate::error::{CallSheetError, Result};

fn storage() -> Result<Storage> {
    window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| CallSheetError::Storage("localStorage unavailable".into()))
}

fn js_err(e: wasm_bindgen::JsValue) -> CallSheetError {
    CallSheetError::Storage(format!("{e:?}"))
}

pub fn get_item(key: &str) -> Result<Option<String>> {
    storage()?.get_item(key).map_err(js_err)
}

/// Fails when the origin quota is exceeded.
pub fn set_item(key: &str, value: &str) -> Result<()> {
    storage()?.set_item(key, value).map_err(js_err)
}

pub fn remove_item(key: &str) -> Result<()> {
    storage()?.remove_item(key).map_err(js_err)
}
