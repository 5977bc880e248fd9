//! Fuzz target: stored preference blobs
//!
//! Loads arbitrary bytes through `MemoryPreferences` (postcard) and
//! opens a `PreferenceStore` on them.  Verifies:
//! - No panics under arbitrary byte inputs
//! - Whatever the store ends up holding passes validation
//! - A value that loaded and re-encodes loads back identically
//!
//! cargo fuzz run fuzz_preferences_blob

#![no_main]

use libfuzzer_sys::fuzz_target;
use ornimetrics::adapters::memory::MemoryPreferences;
use ornimetrics::app::ports::PreferencesPort;
use ornimetrics::preferences::PreferenceStore;

fuzz_target!(|data: &[u8]| {
    let backend = MemoryPreferences::with_blob(data.to_vec());
    let direct = backend.load();

    let Ok(store) = PreferenceStore::open(Box::new(backend.clone())) else {
        return;
    };
    assert!(store.current().validate().is_ok(), "store accepted invalid preferences");

    if let Ok(prefs) = direct {
        let bytes = postcard::to_allocvec(&prefs).unwrap();
        if let Ok(reloaded) = MemoryPreferences::with_blob(bytes).load() {
            assert_eq!(reloaded, prefs);
        }
    }
});
