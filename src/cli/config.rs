use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SESSION_FILE: &str = "session.json";

/// Token saved by `pokedex login`, scoped to the server it came from.
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    pub url: String,
    pub username: String,
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

impl Session {
    pub fn new(url: impl Into<String>, username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            token: token.into(),
            saved_at: Utc::now(),
        }
    }

    /// A session only applies to the server it was issued by.
    pub fn matches(&self, url: &str) -> bool {
        self.url.trim_end_matches('/') == url.trim_end_matches('/')
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .field("saved_at", &self.saved_at)
            .finish()
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("POKEDEX_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("pokedex")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<Option<Session>> {
    load_session_from(&get_config_dir()?)
}

pub fn save_session(session: &Session) -> anyhow::Result<()> {
    save_session_to(&get_config_dir()?, session)
}

/// Returns true when a saved session was removed.
pub fn clear_session() -> anyhow::Result<bool> {
    clear_session_in(&get_config_dir()?)
}

pub fn load_session_from(dir: &Path) -> anyhow::Result<Option<Session>> {
    let session_file = dir.join(SESSION_FILE);

    if !session_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(session_file)?;
    let session: Session = serde_json::from_str(&content)?;
    Ok(Some(session))
}

pub fn save_session_to(dir: &Path, session: &Session) -> anyhow::Result<()> {
    let session_file = dir.join(SESSION_FILE);

    let content = serde_json::to_string_pretty(session)?;
    fs::write(&session_file, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&session_file, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

pub fn clear_session_in(dir: &Path) -> anyhow::Result<bool> {
    let session_file = dir.join(SESSION_FILE);

    if !session_file.exists() {
        return Ok(false);
    }

    fs::remove_file(session_file)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_round_trips_through_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_session_from(dir.path()).unwrap().is_none());

        let session = Session::new("http://localhost:3000", "ash", "abc.def.ghi");
        save_session_to(dir.path(), &session).unwrap();

        let loaded = load_session_from(dir.path()).unwrap().unwrap();
        assert_eq!(loaded.username, "ash");
        assert_eq!(loaded.token, "abc.def.ghi");

        assert!(clear_session_in(dir.path()).unwrap());
        assert!(!clear_session_in(dir.path()).unwrap());
        assert!(load_session_from(dir.path()).unwrap().is_none());
    }

    #[test]
    fn session_matches_ignoring_trailing_slash() {
        let session = Session::new("http://localhost:3000/", "ash", "t");
        assert!(session.matches("http://localhost:3000"));
        assert!(!session.matches("http://localhost:4000"));
    }

    #[test]
    fn debug_hides_token() {
        let session = Session::new("http://localhost:3000", "ash", "secret-token");
        assert!(!format!("{:?}", session).contains("secret-token"));
    }
}
