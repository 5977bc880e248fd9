//! JSON-file preferences adapter.
//!
//! Implements [`PreferencesPort`] on a single pretty-printed JSON file.
//! Saves go to a sibling temp file that is then renamed over the target,
//! so a crash mid-write leaves the previous file intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{PreferencesError, PreferencesPort};
use crate::preferences::Preferences;

pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_atomic(&self, bytes: &[u8]) -> io::Result<()> {
        let tmp = self.temp_path();
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)
    }
}

impl PreferencesPort for JsonFilePreferences {
    fn load(&self) -> Result<Preferences, PreferencesError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(PreferencesError::NotFound),
            Err(e) => {
                warn!("JsonFilePreferences: read {} failed: {}", self.path.display(), e);
                return Err(PreferencesError::IoError);
            }
        };
        let prefs: Preferences =
            serde_json::from_slice(&bytes).map_err(|_| PreferencesError::Corrupted)?;
        prefs.validate().map_err(|_| PreferencesError::Corrupted)?;
        info!("JsonFilePreferences: loaded {}", self.path.display());
        Ok(prefs)
    }

    fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        prefs.validate()?;
        let json = serde_json::to_vec_pretty(prefs).map_err(|_| PreferencesError::IoError)?;
        self.write_atomic(&json).map_err(|e| {
            warn!("JsonFilePreferences: write {} failed: {}", self.path.display(), e);
            PreferencesError::IoError
        })
    }
}
