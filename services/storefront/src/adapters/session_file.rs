//! services/storefront/src/adapters/session_file.rs
//!
//! A `SessionStore` backed by a small JSON file, so that a login survives between
//! invocations of the CLI. The file is read on every access and never cached.

use super::wire::UserRecord;
use robokit_core::domain::{AuthSession, User};
use robokit_core::ports::{PortError, PortResult, SessionStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    token: String,
    user: UserRecord,
}

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or unreadable file is treated as "not logged in".
    fn load(&self) -> Option<SessionFile> {
        let raw = std::fs::read(&self.path).ok()?;
        match serde_json::from_slice::<SessionFile>(&raw) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt session file");
                None
            }
        }
    }
}

/// Writes `contents` readable by the owner only, since the file holds a bearer token.
#[cfg(unix)]
fn write_owner_only(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; tighten a file left by an older run.
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_owner_only(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        self.load().map(|file| file.token)
    }

    fn user(&self) -> Option<User> {
        self.load().and_then(|file| file.user.to_domain().ok())
    }

    fn save(&self, session: &AuthSession) -> PortResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| PortError::Unexpected(format!("cannot create {}: {}", parent.display(), e)))?;
        }
        let file = SessionFile {
            token: session.token.clone(),
            user: UserRecord::from_domain(&session.user),
        };
        let json = serde_json::to_vec_pretty(&file).map_err(|e| PortError::Unexpected(e.to_string()))?;
        write_owner_only(&self.path, &json)
            .map_err(|e| PortError::Unexpected(format!("cannot write {}: {}", self.path.display(), e)))
    }

    fn clear(&self) -> PortResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(format!(
                "cannot remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use robokit_core::domain::Role;

    fn session() -> AuthSession {
        AuthSession {
            token: "tok-42".to_string(),
            user: User {
                id: 3,
                name: Some("Luis".to_string()),
                handle: "luis".to_string(),
                role: Role::Staff,
            },
        }
    }

    #[test]
    fn saves_into_missing_directories_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/session.json"));
        assert_eq!(store.token(), None);

        store.save(&session()).unwrap();

        assert_eq!(store.token().as_deref(), Some("tok-42"));
        assert_eq!(store.user(), Some(session().user));
    }

    #[test]
    fn clear_removes_the_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.save(&session()).unwrap();

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.token(), None);
        store.clear().unwrap();
    }

    #[test]
    fn a_second_handle_sees_writes_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let reader = FileSessionStore::new(&path);
        let writer = FileSessionStore::new(&path);

        writer.save(&session()).unwrap();
        assert_eq!(reader.token().as_deref(), Some("tok-42"));
        writer.clear().unwrap();
        assert_eq!(reader.token(), None);
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private_to_the_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        let store = FileSessionStore::new(&path);

        store.save(&session()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.token().as_deref(), Some("tok-42"));
    }

    #[test]
    fn corrupt_file_reads_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{not json").unwrap();
        let store = FileSessionStore::new(&path);
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
    }
}
