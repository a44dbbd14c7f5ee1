// Local configuration: where the panel lives and where the API key is kept.
//
// The credential file is a tiny JSON document: `{}` when logged out and
// `{"api_key": "..."}` when logged in. `CredentialStore` is the only code
// that touches it; everything else receives a `Credential` value.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PanelError;

/// Default panel API root.
pub const DEFAULT_PANEL_URL: &str = "https://panel.coldshard.com/api/client";

/// Runtime settings resolved from flags, environment and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub panel_url: String,
    pub credential_path: PathBuf,
}

impl Settings {
    /// Build settings from optional overrides. `None` falls back to the
    /// defaults (`DEFAULT_PANEL_URL` and `default_credential_path`).
    pub fn new(panel_url: Option<String>, credential_path: Option<PathBuf>) -> Self {
        let panel_url = panel_url.unwrap_or_else(|| DEFAULT_PANEL_URL.to_string());
        Settings {
            panel_url: panel_url.trim_end_matches('/').to_string(),
            credential_path: credential_path.unwrap_or_else(default_credential_path),
        }
    }
}

/// `<config dir>/coldshard/config.json`, or `./config.json` on platforms
/// without a config directory.
pub fn default_credential_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("coldshard").join("config.json"),
        None => PathBuf::from("config.json"),
    }
}

/// A bearer API key for the panel. Never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for an empty or whitespace-only key, or one holding
    /// control characters (it could never be sent as a header).
    pub fn new(api_key: impl Into<String>) -> Option<Self> {
        let key = api_key.into().trim().to_string();
        if key.is_empty() || key.chars().any(char::is_control) {
            None
        } else {
            Some(Credential(key))
        }
    }

    pub fn api_key(&self) -> &str {
        &self.0
    }
}

// Keep keys out of logs and panic messages.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// On-disk shape of the credential file.
#[derive(Serialize, Deserialize, Default)]
struct CredentialFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

/// File-backed storage for the single panel credential.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CredentialStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored credential.
    ///
    /// A missing, empty or malformed file, or one without an `api_key`
    /// field, means "logged out" and yields `Ok(None)`. Only unexpected I/O
    /// failures (permissions and the like) are errors.
    pub fn load(&self) -> Result<Option<Credential>, PanelError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PanelError::ConfigIo {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if data.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<CredentialFile>(&data) {
            Ok(file) => Ok(file.api_key.and_then(Credential::new)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed credential file");
                Ok(None)
            }
        }
    }

    /// Replace the stored state with exactly `credential`.
    pub fn save(&self, credential: &Credential) -> Result<(), PanelError> {
        self.write(&CredentialFile {
            api_key: Some(credential.api_key().to_string()),
        })?;
        info!(path = %self.path.display(), "credential saved");
        Ok(())
    }

    /// Reset the store to the logged-out state (`{}`).
    pub fn clear(&self) -> Result<(), PanelError> {
        self.write(&CredentialFile::default())?;
        info!(path = %self.path.display(), "credential cleared");
        Ok(())
    }

    /// Create the file with `{}` when it does not exist yet.
    pub fn bootstrap(&self) -> Result<(), PanelError> {
        if self.path.exists() {
            return Ok(());
        }
        self.write(&CredentialFile::default())
    }

    fn write(&self, file: &CredentialFile) -> Result<(), PanelError> {
        let data = serde_json::to_vec_pretty(file)
            .map_err(|e| self.io_error(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        self.write_atomically(&data).map_err(|e| self.io_error(e))
    }

    // Write to a sibling temp file, then rename over the target so an
    // interrupted write never leaves a truncated credential file.
    fn write_atomically(&self, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp_path = self.path.with_extension("json.tmp");
        // A leftover temp file would keep its old permissions.
        let _ = fs::remove_file(&temp_path);
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // The file holds an API key: owner read/write only.
        #[cfg(unix)]
        std::os::unix::fs::OpenOptionsExt::mode(&mut options, 0o600);
        let mut file = options.open(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> PanelError {
        PanelError::ConfigIo {
            path: self.path.clone(),
            source,
        }
    }
}
