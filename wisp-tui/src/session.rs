use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use wisp_types::SessionContext;

/// Manages session storage in the user's home directory.
///
/// The session (bearer token plus the cached identity) is stored as JSON in
/// `~/.wisp/session.json` with 0600 permissions so only the owner can read it.
#[derive(Debug, Clone)]
pub struct SessionStore {
    file_path: PathBuf,
}

impl SessionStore {
    /// Creates a new SessionStore with the default path `~/.wisp/session.json`.
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        let wisp_dir = home_dir.join(".wisp");
        let file_path = wisp_dir.join("session.json");

        Ok(Self { file_path })
    }

    #[cfg(test)]
    pub fn with_path(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    /// Loads the stored session.
    ///
    /// - `Ok(Some(session))` if the file exists and parses
    /// - `Ok(None)` if the file doesn't exist or is corrupted (a corrupt file
    ///   just means logging in again)
    pub fn load(&self) -> Result<Option<SessionContext>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&self.file_path).context("Failed to read session file")?;

        if content.trim().is_empty() {
            log::warn!("Session file is empty, treating as no session");
            return Ok(None);
        }

        match serde_json::from_str::<SessionContext>(&content) {
            Ok(session) if !session.token.trim().is_empty() => {
                log::debug!(
                    "Loaded session for {} from {}",
                    session.user.username,
                    self.file_path.display()
                );
                Ok(Some(session))
            }
            Ok(_) => {
                log::warn!("Session file has an empty token, treating as no session");
                Ok(None)
            }
            Err(e) => {
                log::warn!("Session file is corrupted ({}), treating as no session", e);
                Ok(None)
            }
        }
    }

    /// Saves the session with 0600 permissions.
    ///
    /// Writes to a temporary file first and renames it into place so a crash
    /// mid-write cannot leave a truncated session behind.
    pub fn save(&self, session: &SessionContext) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).context("Failed to create .wisp directory")?;
        }

        self.cleanup_stale_files()?;

        let json =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        let temp_path = self.file_path.with_extension("tmp");

        let mut file =
            fs::File::create(&temp_path).context("Failed to create temporary session file")?;
        file.write_all(json.as_bytes())
            .context("Failed to write session")?;
        file.sync_all()
            .context("Failed to sync session file to disk")?;
        drop(file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&temp_path, permissions)
                .context("Failed to set session file permissions")?;
        }

        fs::rename(&temp_path, &self.file_path)
            .context("Failed to rename temporary session file")?;

        log::info!("Saved session to {}", self.file_path.display());
        Ok(())
    }

    /// Deletes the session file. Returns `Ok(())` even if it doesn't exist.
    pub fn delete(&self) -> Result<()> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path).context("Failed to delete session file")?;
            log::info!("Deleted session file at {}", self.file_path.display());
        } else {
            log::debug!("Session file does not exist, nothing to delete");
        }
        Ok(())
    }

    /// Removes leftover temporary or backup session files so exactly one
    /// session file exists per user.
    fn cleanup_stale_files(&self) -> Result<()> {
        let parent = match self.file_path.parent() {
            Some(parent) if parent.exists() => parent,
            _ => return Ok(()),
        };

        let entries = fs::read_dir(parent).context("Failed to read .wisp directory")?;

        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path == self.file_path {
                continue;
            }

            if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
                if file_name.starts_with("session") {
                    log::debug!("Removing stale session file: {}", path.display());
                    if let Err(e) = fs::remove_file(&path) {
                        log::warn!("Failed to remove stale session file {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns the path to the session file.
    pub fn path(&self) -> &PathBuf {
        &self.file_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use wisp_types::{User, UserRole};

    fn create_test_store(temp_dir: &TempDir) -> SessionStore {
        SessionStore::with_path(temp_dir.path().join("session.json"))
    }

    fn test_session() -> SessionContext {
        SessionContext::new(
            "token-1234567890".to_string(),
            User {
                user_id: 1,
                username: "willow".to_string(),
                email: "willow@example.com".to_string(),
                full_name: None,
                bio: None,
                role: UserRole::User,
                is_admin: false,
                is_banned: false,
            },
        )
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        let session = test_session();
        store.save(&session).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token, session.token);
        assert_eq!(loaded.user.username, "willow");
    }

    #[test]
    fn test_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        store.save(&test_session()).unwrap();
        assert!(store.path().exists());

        store.delete().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_delete_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        // Should not error even if file doesn't exist
        store.delete().unwrap();
    }

    #[test]
    fn test_empty_file_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        fs::write(store.path(), "").unwrap();

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupted_file_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        fs::write(store.path(), "{not json at all").unwrap();

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_empty_token_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        let mut session = test_session();
        session.token = "   ".to_string();
        let json = serde_json::to_string(&session).unwrap();
        fs::write(store.path(), json).unwrap();

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_cleanup_stale_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        fs::write(temp_dir.path().join("session.bak"), "old").unwrap();
        fs::write(temp_dir.path().join("session.tmp"), "tmp").unwrap();

        store.save(&test_session()).unwrap();

        assert!(!temp_dir.path().join("session.bak").exists());
        assert!(!temp_dir.path().join("session.tmp").exists());
        assert!(store.path().exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        store.save(&test_session()).unwrap();

        let metadata = fs::metadata(store.path()).unwrap();
        assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
    }
}
