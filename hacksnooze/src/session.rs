//! Durable session persistence
//!
//! A session survives restarts as two independent entries, the files
//! `token` and `username`, under this user's config directory. Both must
//! be present to restore a session; a partial pair is treated as logged
//! out, never as an error.

use std::fs::{self, DirBuilder, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::Error;
use crate::models::Session;

const TOKEN_ENTRY: &str = "token";
const USERNAME_ENTRY: &str = "username";

/// Persists the session (token + username) across runs
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at this user's config directory
    pub fn new() -> Result<Self, Error> {
        ProjectDirs::from("rs", "hacksnooze", env!("CARGO_PKG_NAME"))
            .map(|proj_dirs| SessionStore {
                dir: proj_dirs.config_dir().to_path_buf(),
            })
            .ok_or_else(|| Error::HomeNotFound)
    }

    /// Create a store rooted at an explicit directory
    pub fn with_dir<P: Into<PathBuf>>(dir: P) -> Self {
        SessionStore { dir: dir.into() }
    }

    /// Read the persisted session
    ///
    /// Returns `None` when either entry is missing. Only a storage
    /// failure other than absence is an error.
    pub fn restore(&self) -> Result<Option<Session>, Error> {
        let token = read_entry(&self.dir.join(TOKEN_ENTRY))?;
        let username = read_entry(&self.dir.join(USERNAME_ENTRY))?;

        match (token, username) {
            (Some(token), Some(username)) => Ok(Some(Session { token, username })),
            _ => Ok(None),
        }
    }

    /// Write both entries of the session
    pub fn save(&self, session: &Session) -> Result<(), Error> {
        if !self.dir.exists() {
            DirBuilder::new().recursive(true).create(&self.dir)?;
        }

        write_entry(&self.dir.join(TOKEN_ENTRY), &session.token)?;
        write_entry(&self.dir.join(USERNAME_ENTRY), &session.username)
    }

    /// Remove both entries; missing entries are not an error
    pub fn clear(&self) -> Result<(), Error> {
        remove_entry(&self.dir.join(TOKEN_ENTRY))?;
        remove_entry(&self.dir.join(USERNAME_ENTRY))
    }
}

fn read_entry(path: &Path) -> Result<Option<String>, Error> {
    match fs::read_to_string(path) {
        Ok(value) => {
            let value = value.trim_end().to_string();
            if value.is_empty() {
                Ok(None)
            } else {
                Ok(Some(value))
            }
        }
        Err(ref err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(Error::Io(err)),
    }
}

fn write_entry(path: &Path, value: &str) -> Result<(), Error> {
    let tmp_path = path.with_extension("tmp");

    {
        // Write out the file entirely
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(value.as_bytes())?;
    }

    // Move into place atomically
    fs::rename(tmp_path, path).map_err(Error::from)
}

fn remove_entry(path: &Path) -> Result<(), Error> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(ref err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(Error::Io(err)),
    }
}
