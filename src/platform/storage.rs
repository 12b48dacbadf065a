//! Key/value persistence
//!
//! LocalStorage in the browser. Native builds have nowhere to write to, so
//! reads come back empty and writes are dropped.

/// Read a raw string value
#[cfg(target_arch = "wasm32")]
pub fn load(key: &str) -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(key).ok()?
}

/// Write a raw string value. Returns false if storage is unavailable.
#[cfg(target_arch = "wasm32")]
pub fn store(key: &str, value: &str) -> bool {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    match storage {
        Some(storage) => storage.set_item(key, value).is_ok(),
        None => {
            log::warn!("LocalStorage unavailable, {} not saved", key);
            false
        }
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn store(_key: &str, _value: &str) -> bool {
    false
}

/// Load and decode a JSON value
pub fn load_json<T: serde::de::DeserializeOwned>(key: &str) -> Option<T> {
    let raw = load(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable {}: {}", key, e);
            None
        }
    }
}

/// Encode and store a JSON value
pub fn store_json<T: serde::Serialize>(key: &str, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => store(key, &json),
        Err(e) => {
            log::warn!("Could not encode {}: {}", key, e);
            false
        }
    }
}
