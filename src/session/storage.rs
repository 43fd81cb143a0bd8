//! File-backed stand-ins for the two places a browser keeps the session token:
//! a key/value store (`local_storage.json`) and a cookie header
//! (`cookies.txt`, `name=value; name2=value2`). Both files live in the state
//! directory and are written with owner-only permissions on Unix.

use crate::errors::AppError;
use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::warn;

const LOCAL_STORAGE_FILE: &str = "local_storage.json";
const COOKIE_FILE: &str = "cookies.txt";

/// Persistent key/value storage.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    #[must_use]
    pub fn open(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(LOCAL_STORAGE_FILE),
        }
    }

    /// # Errors
    /// Returns `AppError::Storage` if the file exists but cannot be read.
    pub fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.load()?.remove(key))
    }

    /// # Errors
    /// Returns `AppError::Storage` if the file cannot be written.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    /// # Errors
    /// Returns `AppError::Storage` if the file cannot be written.
    pub fn remove_item(&self, key: &str) -> Result<(), AppError> {
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.save(&items)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<BTreeMap<String, String>, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };

        // A corrupt store is treated like an empty one, the same way a browser
        // would after the user cleared site data.
        Ok(serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("ignoring unreadable local storage {}: {err}", self.path.display());
            BTreeMap::new()
        }))
    }

    fn save(&self, items: &BTreeMap<String, String>) -> Result<(), AppError> {
        let raw = serde_json::to_string_pretty(items)
            .map_err(|err| AppError::Storage(format!("Failed to encode local storage: {err}")))?;
        write_private(&self.path, &raw)
    }
}

/// Cookie header persisted between runs.
#[derive(Clone, Debug)]
pub struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    #[must_use]
    pub fn open(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(COOKIE_FILE),
        }
    }

    /// # Errors
    /// Returns `AppError::Storage` if the file exists but cannot be read.
    pub fn get(&self, name: &str) -> Result<Option<String>, AppError> {
        Ok(parse_cookie_header(&self.read()?)
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value))
    }

    /// # Errors
    /// Returns `AppError::Storage` if the file cannot be written.
    pub fn set(&self, name: &str, value: &str) -> Result<(), AppError> {
        let mut cookies: Vec<(String, String)> = parse_cookie_header(&self.read()?)
            .into_iter()
            .filter(|(key, _)| key != name)
            .collect();
        cookies.push((name.to_string(), value.to_string()));
        write_private(&self.path, &format_cookie_header(&cookies))
    }

    /// # Errors
    /// Returns `AppError::Storage` if the file cannot be written.
    pub fn delete(&self, name: &str) -> Result<(), AppError> {
        let cookies = parse_cookie_header(&self.read()?);
        let kept: Vec<(String, String)> = cookies
            .iter()
            .filter(|(key, _)| key != name)
            .cloned()
            .collect();
        if kept.len() != cookies.len() {
            write_private(&self.path, &format_cookie_header(&kept))?;
        }
        Ok(())
    }

    fn read(&self) -> Result<String, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Splits a `name=value; name2=value2` header. Pairs without `=` and empty
/// names are skipped.
fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                None
            } else {
                Some((key.to_string(), value.trim().to_string()))
            }
        })
        .collect()
}

fn format_cookie_header(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn write_private(path: &Path, contents: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;

    // `mode` only applies when the file is created
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(contents.as_bytes())?;
    Ok(())
}
