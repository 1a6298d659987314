use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: role.into(),
            created_at: Utc::now(),
        }
    }
}

/// A remembered sign-in. It does not expire; `clear` on logout.
pub struct Session {
    cache_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            data: None,
        }
    }

    /// Load session from disk. Returns whether one was found.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(false);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let data: SessionData =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        self.data = Some(data);
        Ok(true)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents).context("Failed to write session file")?;
        }
        Ok(())
    }

    /// Clear session data
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove session file")?;
        }
        Ok(())
    }

    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    pub fn email(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.email.as_str())
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("reelboard-session-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = scratch_dir("roundtrip");
        let mut session = Session::new(dir.clone());
        session.update(SessionData::new("somchai@rcp.co", "User"));
        session.save().unwrap();

        let mut reloaded = Session::new(dir.clone());
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.email(), Some("somchai@rcp.co"));
        assert_eq!(reloaded.data, session.data);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = scratch_dir("missing");
        let mut session = Session::new(dir);
        assert!(!session.load().unwrap());
        assert!(session.email().is_none());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = scratch_dir("clear");
        let mut session = Session::new(dir.clone());
        session.update(SessionData::new("a@b.co", "Admin"));
        session.save().unwrap();

        session.clear().unwrap();
        assert!(session.data.is_none());
        assert!(!Session::new(dir.clone()).load().unwrap());

        let _ = std::fs::remove_dir_all(dir);
    }
}
