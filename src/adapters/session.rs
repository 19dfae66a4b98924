use crate::domain::model::Session;
use crate::domain::ports::SessionStore;
use crate::utils::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

const SESSION_FILE: &str = "session.json";

/// Keeps the session as JSON in a directory of its own.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.base_path.join(SESSION_FILE)
    }
}

impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Session> {
        let data = match fs::read(self.path()) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Session::anonymous()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&data) {
            Ok(session) => Ok(session),
            Err(e) => {
                tracing::warn!("Discarding unreadable session file: {}", e);
                self.clear().await?;
                Ok(Session::anonymous())
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let full_path = self.path();
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
