//! Ornimetrics feeder monitor: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  FirebaseTelemetrySource  WeatherApiSource  LogAlertSink       │
//! │  (TelemetrySource)        (WeatherSource)   (AlertSink)        │
//! │  JsonFilePreferences      SystemClock                          │
//! │  (PreferencesPort)        (Clock)                              │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           MonitorService (pure logic)                  │    │
//! │  │  Rules · EventLog · PreferenceStore                    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  TelemetryPoller (dedicated thread, async timer loop)          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `ornimetrics-monitor [config.json]`, then type `cleaned` after
//! cleaning the feeder, or `quit` (or EOF) to exit.  `--help` lists the
//! options.
#![deny(unused_must_use)]

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use ornimetrics::adapters::http::{FirebaseTelemetrySource, WeatherApiSource};
use ornimetrics::adapters::log_sink::LogAlertSink;
use ornimetrics::adapters::prefs_file::JsonFilePreferences;
use ornimetrics::adapters::time::SystemClock;
use ornimetrics::app::commands::MonitorCommand;
use ornimetrics::app::ports::WeatherSource;
use ornimetrics::app::service::MonitorService;
use ornimetrics::config::MonitorConfig;
use ornimetrics::poller::{PollSources, TelemetryPoller};
use ornimetrics::preferences::PreferenceStore;

#[derive(Parser, Debug)]
#[command(version, about = "Ornimetrics feeder monitor")]
struct Cli {
    /// JSON config file (defaults are used when omitted)
    config: Option<PathBuf>,

    /// Preferences file, overriding `preferences_path` from the config
    #[arg(long = "preferences")]
    preferences: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Ornimetrics monitor v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => MonitorConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => {
            info!("No config file given, using defaults");
            MonitorConfig::default()
        }
    };
    if let Some(path) = cli.preferences {
        config.preferences_path = path;
    }
    config.validate().context("invalid configuration")?;

    // ── 3. Preferences ────────────────────────────────────────
    let backend = JsonFilePreferences::new(config.preferences_path.clone());
    let prefs = PreferenceStore::open(Box::new(backend)).context("opening preference store")?;
    info!("Preferences: {}", config.preferences_path.display());

    // ── 4. Sources ────────────────────────────────────────────
    let telemetry = FirebaseTelemetrySource::new(config.telemetry_url.clone(), config.request_timeout())
        .context("telemetry_url must be set in the config file")?;

    let weather: Option<Box<dyn WeatherSource + Send>> = if config.weather_enabled() {
        let source = WeatherApiSource::new(
            &config.weather_endpoint,
            config.weather_api_key.clone(),
            config.latitude,
            config.longitude,
            config.request_timeout(),
        )
        .context("building weather client")?;
        info!("Weather: every {} tick(s)", config.weather_every_ticks());
        Some(Box::new(source))
    } else {
        warn!("Weather: no API key configured, weather alerts disabled");
        None
    };

    // ── 5. Poller ─────────────────────────────────────────────
    let service = MonitorService::new(prefs, Box::new(SystemClock));
    let sources = PollSources {
        telemetry: Box::new(telemetry),
        weather,
        weather_every_ticks: config.weather_every_ticks(),
    };
    let poller = TelemetryPoller::start(config.poll_interval(), service, sources, Box::new(LogAlertSink::new()))
        .context("starting poller")?;

    // ── 6. Console commands ───────────────────────────────────
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        match line.trim() {
            "" => {}
            "cleaned" => match poller.send(MonitorCommand::MarkCleaned) {
                Ok(()) => info!("Marked feeder cleaned"),
                Err(e) => warn!("Could not mark cleaned: {}", e),
            },
            "quit" | "exit" => break,
            other => warn!("Unknown command '{}' (try: cleaned, quit)", other),
        }
    }

    // ── 7. Shutdown ───────────────────────────────────────────
    let service = poller.stop().context("stopping poller")?;
    info!(
        "Exiting: {} tick(s), {} failed fetch(es), {} alert(s) in log",
        service.tick_count(),
        service.failed_fetches(),
        service.event_log().len()
    );
    Ok(())
}
