//! Session files on disk
//!
//! Sessions live as pretty-printed JSON in a single directory, one file per
//! save. Files are created fresh and never rewritten.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::record::Session;
use crate::error::{LoadError, SaveError};

const PREFIX: &str = "recording_";
const EXTENSION: &str = ".json";

/// Where a saved session ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    /// File name within the store directory; pass to [`SessionStore::load`].
    pub name: String,
    pub path: PathBuf,
}

/// Directory of saved sessions
#[derive(Debug, Clone)]
pub struct SessionStore {
    directory: PathBuf,
}

impl SessionStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Write a session as `recording_<timestamp>.json`
    ///
    /// If that name is taken, `_1`, `_2`, ... are appended. The directory is
    /// created if needed.
    pub fn save(&self, session: &Session) -> Result<SessionHandle, SaveError> {
        fs::create_dir_all(&self.directory)?;
        let mut json = serde_json::to_string_pretty(session)?;
        json.push('\n');

        let mut attempt = 0u32;
        loop {
            let name = file_name(&session.timestamp, attempt);
            let path = self.directory.join(&name);
            match create_file(&path, |file| file.write_all(json.as_bytes())) {
                Ok(()) => {
                    info!("saved {} notes to {:?}", session.total_notes, path);
                    return Ok(SessionHandle { name, path });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Load a session by file name or bare timestamp
    ///
    /// `"recording_20240309_140507.json"` and `"20240309_140507"` name the
    /// same file.
    pub fn load(&self, id: &str) -> Result<Session, LoadError> {
        let name = resolve_name(id).ok_or_else(|| LoadError::NotFound(id.to_string()))?;
        load_file(&self.directory.join(name))
    }

    /// Names of saved sessions, oldest first
    pub fn list(&self) -> io::Result<Vec<String>> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(PREFIX) && name.ends_with(EXTENSION) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Load and validate a session file at an arbitrary path
pub fn load_file(path: &Path) -> Result<Session, LoadError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(LoadError::NotFound(name)),
        Err(e) => return Err(LoadError::corrupt(name, e)),
    };

    let session: Session =
        serde_json::from_str(&contents).map_err(|e| LoadError::corrupt(name.as_str(), e))?;
    session
        .validate()
        .map_err(|reason| LoadError::corrupt(name.as_str(), reason))?;
    Ok(session)
}

/// Create `path` (which must not exist) and fill it with `write`
///
/// If writing fails the file is removed again, so no partial record is left.
fn create_file(
    path: &Path,
    write: impl FnOnce(&mut File) -> io::Result<()>,
) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    if let Err(e) = write(&mut file).and_then(|()| file.sync_all()) {
        drop(file);
        if let Err(remove) = fs::remove_file(path) {
            warn!("could not remove partial file {:?}: {}", path, remove);
        }
        return Err(e);
    }
    Ok(())
}

fn file_name(timestamp: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{PREFIX}{timestamp}{EXTENSION}")
    } else {
        format!("{PREFIX}{timestamp}_{attempt}{EXTENSION}")
    }
}

/// Map an id to a file name inside the store; `None` if it tries to leave it.
fn resolve_name(id: &str) -> Option<String> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
        return None;
    }
    if id.ends_with(EXTENSION) {
        Some(id.to_string())
    } else {
        Some(file_name(id, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::RecordedEvent;
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    fn session() -> Session {
        let saved_at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        Session::new(
            saved_at,
            2.5,
            vec![
                RecordedEvent {
                    offset_secs: 0.0,
                    note: "C".to_string(),
                    frequency: 261.63,
                    waveform: "sine".to_string(),
                },
                RecordedEvent {
                    offset_secs: 0.5,
                    note: "E".to_string(),
                    frequency: 329.63,
                    waveform: "square".to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("recordings"));

        let handle = store.save(&session()).unwrap();
        assert_eq!(handle.name, "recording_20240309_140507.json");
        assert!(handle.path.exists());
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        let original = session();

        let handle = store.save(&original).unwrap();
        let loaded = store.load(&handle.name).unwrap();
        assert_eq!(loaded, original);

        let by_timestamp = store.load("20240309_140507").unwrap();
        assert_eq!(by_timestamp, original);
    }

    #[test]
    fn test_repeat_save_gets_new_name() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());

        let first = store.save(&session()).unwrap();
        let second = store.save(&session()).unwrap();
        assert_ne!(first.name, second.name);
        assert_eq!(second.name, "recording_20240309_140507_1.json");
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recording_20240309_140507.json");

        let result = create_file(&path, |file| {
            file.write_all(b"{ \"timestamp\":")?;
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        });
        assert!(result.is_err());
        assert!(!path.exists());
        assert!(SessionStore::new(dir.path()).list().unwrap().is_empty());
    }

    #[test]
    fn test_create_file_keeps_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recording_20240309_140507.json");
        fs::write(&path, "keep").unwrap();

        let err = create_file(&path, |file| file.write_all(b"new")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep");
    }

    #[test]
    fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(matches!(
            store.load("recording_19990101_000000.json"),
            Err(LoadError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_rejects_path_escape() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(matches!(store.load("../secret.json"), Err(LoadError::NotFound(_))));
    }

    #[test]
    fn test_load_malformed() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        fs::write(dir.path().join("recording_bad.json"), "{ not json").unwrap();

        assert!(matches!(
            store.load("recording_bad.json"),
            Err(LoadError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_load_inconsistent() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        let json = r#"{"timestamp":"20240309_140507","duration":1.0,"total_notes":5,"notes":[]}"#;
        fs::write(dir.path().join("recording_20240309_140507.json"), json).unwrap();

        assert!(matches!(
            store.load("20240309_140507"),
            Err(LoadError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_load_rejects_far_offset() {
        let dir = TempDir::new().unwrap();
        let json = r#"{"timestamp":"20240309_140507","duration":1.0,"total_notes":1,
            "notes":[{"time":1e30,"note":"C","freq":261.63,"wave":"sine"}]}"#;
        let path = dir.path().join("recording_20240309_140507.json");
        fs::write(&path, json).unwrap();

        assert!(matches!(load_file(&path), Err(LoadError::Corrupt { .. })));
    }

    #[test]
    fn test_list() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("missing"));
        assert!(store.list().unwrap().is_empty());

        let store = SessionStore::new(dir.path());
        store.save(&session()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        assert_eq!(
            store.list().unwrap(),
            vec!["recording_20240309_140507.json".to_string()]
        );
    }
}
