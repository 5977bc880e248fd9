//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements        | Connects to                       |
//! |--------------|-------------------|-----------------------------------|
//! | `http`       | TelemetrySource   | Realtime Database REST (feature `host`) |
//! |              | WeatherSource     | WeatherAPI current conditions     |
//! | `log_sink`   | AlertSink         | `log` facade                      |
//! | `memory`     | PreferencesPort   | In-memory postcard blob           |
//! | `prefs_file` | PreferencesPort   | JSON file, atomic rename          |
//! | `time`       | Clock             | Host wall clock                   |

#[cfg(feature = "host")]
pub mod http;
pub mod log_sink;
pub mod memory;
pub mod prefs_file;
pub mod time;
