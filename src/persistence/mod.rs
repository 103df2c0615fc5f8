use std::{
    env,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    warn,
};

use crate::core::LexyError;

const APP_NAME: &str = "lexy";
pub const DATA_DIR_ENV: &str = "LEXY_DATA_DIR";

pub fn get_app_data_dir() -> PathBuf {
    let app_dir = match env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => match dirs::data_local_dir() {
            Some(data_dir) => data_dir.join(APP_NAME),
            None => PathBuf::from("."),
        },
    };
    let _ = fs::create_dir_all(&app_dir);
    app_dir
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json<T: Serialize>(data: &T, file_path: &Path) -> Result<(), LexyError> {
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(file_path, json)?;
    debug!("Data saved to: {}", file_path.display());
    Ok(())
}

/// Reads a JSON file, falling back to `T::default()` when it does not exist yet.
pub fn load_json<T: for<'de> Deserialize<'de> + Default>(file_path: &Path) -> Result<T, LexyError> {
    if !file_path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(file_path)?;
    let data: T = serde_json::from_str(&json)
        .map_err(|e| LexyError::parse(file_path.display().to_string(), e))?;
    debug!("Data loaded from: {}", file_path.display());
    Ok(data)
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(file_path: &Path) -> T {
    match load_json::<T>(file_path) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to load {}: {}. Using defaults.", file_path.display(), e);
            T::default()
        }
    }
}

pub fn delete_data_file(file_path: &Path) -> Result<(), LexyError> {
    if file_path.exists() {
        fs::remove_file(file_path)?;
        debug!("Deleted: {}", file_path.display());
    }
    Ok(())
}
