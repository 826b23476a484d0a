//! The stored login credential. Created by `login`, removed by `logout`, and
//! read (never mutated) by every authenticated request.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::*;

#[derive(Debug, Deserialize, Serialize)]
pub struct Session {
    pub access_token: String,
}

impl Session {
    pub fn new(access_token: String) -> Session {
        Session { access_token }
    }

    /// Loads the stored session, failing with `AuthenticationRequired` when
    /// none exists so callers surface the login flow instead of a request
    /// error.
    pub fn load(session_file: &Path) -> Result<Session> {
        if !session_file.exists() {
            bail!(ErrorKind::AuthenticationRequired);
        }
        debug!("Using session file: {}", session_file.display());
        let contents = fs::read_to_string(session_file)
            .chain_err(|| format!("Failed to read session file: {}", session_file.display()))?;
        serde_json::from_str(&contents)
            .chain_err(|| format!("Failed to parse session file: {}", session_file.display()))
    }

    pub fn save(&self, session_file: &Path) -> Result<()> {
        let parent = session_file.parent().chain_err(|| {
            format!(
                "Failed to determine parent directory of session file path: {}",
                session_file.display()
            )
        })?;
        fs::create_dir_all(parent)
            .chain_err(|| format!("Failed to create session directory: {}", parent.display()))?;
        debug!("Writing session file: {}", session_file.display());
        let contents =
            serde_json::to_string(self).chain_err(|| "Failed to serialize session")?;
        fs::write(session_file, contents)
            .chain_err(|| format!("Failed to write session file: {}", session_file.display()))
    }

    pub fn clear(session_file: &Path) -> Result<()> {
        if session_file.exists() {
            fs::remove_file(session_file).chain_err(|| {
                format!("Failed to remove session file: {}", session_file.display())
            })?;
        }
        Ok(())
    }
}
