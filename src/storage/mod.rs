//! Key-value storage tiers
//!
//! The session layer persists tokens and the user record through a small
//! key-value port with two implementations: a durable tier backed by a TOML
//! file in the config directory ("remember me" logins survive restarts), and
//! an ephemeral in-memory tier that lives only as long as the process.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Storage port for session data. Implementations must tolerate concurrent
/// access from interleaved async tasks.
pub trait KeyValue: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Durable tier: a flat TOML map written back on every mutation.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open a store at an explicit path, loading any existing content.
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).context("Failed to read session file")?;
            toml::from_str(&content).context("Failed to parse session file")?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open the default store (`session.toml` in the config directory).
    pub fn open_default() -> Result<Self> {
        Self::open(crate::config::config_dir()?.join("session.toml"))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let dir = self
            .path
            .parent()
            .context("Session file has no parent directory")?;
        fs::create_dir_all(dir).context("Failed to create config directory")?;

        let content = toml::to_string_pretty(entries).context("Failed to serialize session")?;
        fs::write(&self.path, content).context("Failed to write session file")?;

        // Set restrictive permissions on the session file (contains tokens)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms)
                .context("Failed to set session file permissions")?;
        }

        Ok(())
    }
}

impl KeyValue for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

/// Ephemeral tier: cleared when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
