//! In-memory preferences adapter.
//!
//! Implements [`PreferencesPort`] over a single postcard-encoded blob
//! held in memory, the same encoding a flash key-value store would use.
//! Clones share the blob, so a test can keep one handle and give the
//! other to a [`PreferenceStore`](crate::preferences::PreferenceStore).

use std::sync::{Arc, Mutex};

use log::info;

use crate::app::ports::{PreferencesError, PreferencesPort};
use crate::preferences::Preferences;

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    blob: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryPreferences {
    /// Empty store: the first `load` returns `NotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw bytes (e.g. a corrupted blob in tests).
    pub fn with_blob(bytes: Vec<u8>) -> Self {
        Self {
            blob: Arc::new(Mutex::new(Some(bytes))),
        }
    }

    /// Copy of the stored bytes, if any.
    pub fn blob(&self) -> Option<Vec<u8>> {
        self.blob.lock().ok().and_then(|b| b.clone())
    }
}

impl PreferencesPort for MemoryPreferences {
    fn load(&self) -> Result<Preferences, PreferencesError> {
        let guard = self.blob.lock().map_err(|_| PreferencesError::IoError)?;
        let bytes = guard.as_ref().ok_or(PreferencesError::NotFound)?;
        let prefs: Preferences = postcard::from_bytes(bytes).map_err(|_| PreferencesError::Corrupted)?;
        prefs.validate().map_err(|_| PreferencesError::Corrupted)?;
        Ok(prefs)
    }

    fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        prefs.validate()?;
        let bytes = postcard::to_allocvec(prefs).map_err(|_| PreferencesError::IoError)?;
        let len = bytes.len();
        *self.blob.lock().map_err(|_| PreferencesError::IoError)? = Some(bytes);
        info!("MemoryPreferences: saved ({} bytes)", len);
        Ok(())
    }
}
