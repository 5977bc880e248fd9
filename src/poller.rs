//! Telemetry poller: interval-driven monitor loop.
//!
//! Runs in a dedicated thread driving one cooperative async loop with
//! `futures_lite::future::block_on` and reactor-driven `async-io-mini`
//! timers (no busy-spinning).  Each wake-up is one of three things:
//!
//! 1. **Stop**: the shared `Signal` fired; leave the loop.
//! 2. **Command**: a [`MonitorCommand`] arrived on the bounded channel;
//!    apply it between ticks.
//! 3. **Tick**: the poll deadline passed; fetch → evaluate → append →
//!    dispatch, then schedule the next deadline.
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────────┐
//!  │  Poller Thread                                               │
//!  │  ┌────────────────────────────────────────────────────────┐  │
//!  │  │  futures_lite::future::block_on                        │  │
//!  │  │                                                        │  │
//!  │  │  ┌──────────┐   ┌───────────────┐   ┌───────────────┐  │  │
//!  │  │  │  Stop    │ or│  Command rx   │ or│ Deadline ⏱    │  │  │
//!  │  │  │ (Signal) │   │ (Channel, 8)  │   │(async-io-mini)│  │  │
//!  │  │  └──────────┘   └───────────────┘   └───────────────┘  │  │
//!  │  └────────────────────────────────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`MonitorService`] (and with it the rule state, event log and
//! preference store) is owned by the poller thread for its whole life and
//! handed back by [`TelemetryPoller::stop`].  Ticks never overlap: a slow
//! fetch simply delays the next deadline check.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use futures_lite::future;
use log::{debug, info, warn};

use crate::app::commands::MonitorCommand;
use crate::app::ports::{AlertSink, TelemetrySource, WeatherSource};
use crate::app::service::MonitorService;
use crate::error::PollerError;

/// Depth of the inbound command queue.
pub const COMMAND_QUEUE_DEPTH: usize = 8;

/// Data sources polled by the loop.
pub struct PollSources {
    pub telemetry: Box<dyn TelemetrySource + Send>,
    pub weather: Option<Box<dyn WeatherSource + Send>>,
    /// Fetch weather on every Nth telemetry tick (first on the immediate
    /// poll).  Zero is treated as one.
    pub weather_every_ticks: u32,
}

impl PollSources {
    /// Telemetry only, no weather.
    pub fn telemetry_only(telemetry: Box<dyn TelemetrySource + Send>) -> Self {
        Self {
            telemetry,
            weather: None,
            weather_every_ticks: 1,
        }
    }
}

// ── Cross-thread control block ───────────────────────────────

/// The only state shared between the poller thread and its handle.
struct PollerControl {
    stop: Signal<CriticalSectionRawMutex, ()>,
    commands: Channel<CriticalSectionRawMutex, MonitorCommand, COMMAND_QUEUE_DEPTH>,
    running: AtomicBool,
    completed_ticks: AtomicU64,
}

impl PollerControl {
    fn new() -> Self {
        Self {
            stop: Signal::new(),
            commands: Channel::new(),
            running: AtomicBool::new(true),
            completed_ticks: AtomicU64::new(0),
        }
    }
}

/// Clears `running` when the poller thread exits, including by panic.
struct RunningGuard(Arc<PollerControl>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.running.store(false, Ordering::Release);
    }
}

enum Wake {
    Stop,
    Command(MonitorCommand),
    Tick,
}

// ── Handle ───────────────────────────────────────────────────

/// Handle to a running poller thread.  Dropping it stops the thread.
pub struct TelemetryPoller {
    control: Arc<PollerControl>,
    handle: Option<JoinHandle<MonitorService>>,
    interval: Duration,
}

impl TelemetryPoller {
    /// Spawn the poller.  Performs one poll immediately, then one per
    /// `interval`.
    pub fn start(
        interval: Duration,
        service: MonitorService,
        sources: PollSources,
        sink: Box<dyn AlertSink + Send>,
    ) -> Result<Self, PollerError> {
        if interval.is_zero() {
            return Err(PollerError::InvalidInterval);
        }

        let control = Arc::new(PollerControl::new());
        let worker = PollLoop {
            service,
            sources,
            sink,
            interval,
            control: Arc::clone(&control),
        };

        let handle = std::thread::Builder::new()
            .name("telemetry-poller".into())
            .spawn(move || {
                let _running = RunningGuard(Arc::clone(&worker.control));
                future::block_on(worker.run())
            })
            .map_err(|e| {
                warn!("Poller: thread spawn failed: {}", e);
                PollerError::SpawnFailed
            })?;

        info!("Poller started (interval {:?})", interval);
        Ok(Self {
            control,
            handle: Some(handle),
            interval,
        })
    }

    /// Queue a command for the poller thread.  Never blocks.
    pub fn send(&self, cmd: MonitorCommand) -> Result<(), PollerError> {
        if !self.is_running() {
            return Err(PollerError::NotRunning);
        }
        self.control
            .commands
            .try_send(cmd)
            .map_err(|_| PollerError::CommandQueueFull)
    }

    /// Stop the loop, wait for the thread, and take back the service.
    ///
    /// An in-flight tick runs to completion first.  Commands already
    /// queued are applied before the thread exits.
    pub fn stop(mut self) -> Result<MonitorService, PollerError> {
        self.shutdown()
    }

    pub fn is_running(&self) -> bool {
        self.control.running.load(Ordering::Acquire)
    }

    /// Poll cycles finished so far (successful or skipped).
    pub fn completed_ticks(&self) -> u64 {
        self.control.completed_ticks.load(Ordering::Acquire)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn shutdown(&mut self) -> Result<MonitorService, PollerError> {
        let handle = self.handle.take().ok_or(PollerError::NotRunning)?;
        self.control.running.store(false, Ordering::Release);
        self.control.stop.signal(());
        let service = handle.join().map_err(|_| PollerError::Panicked)?;
        info!("Poller stopped after {} ticks", service.tick_count());
        Ok(service)
    }
}

impl Drop for TelemetryPoller {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.shutdown();
        }
    }
}

// ── Loop body (poller thread) ────────────────────────────────

struct PollLoop {
    service: MonitorService,
    sources: PollSources,
    sink: Box<dyn AlertSink + Send>,
    interval: Duration,
    control: Arc<PollerControl>,
}

impl PollLoop {
    async fn run(mut self) -> MonitorService {
        // Deadline-based so commands arriving mid-interval do not push
        // the next tick back.
        let mut deadline = Instant::now();

        loop {
            let control = &self.control;
            let wake = future::or(
                async {
                    control.stop.wait().await;
                    Wake::Stop
                },
                future::or(
                    async { Wake::Command(control.commands.receive().await) },
                    async {
                        let remaining = deadline.saturating_duration_since(Instant::now());
                        async_io_mini::Timer::after(remaining).await;
                        Wake::Tick
                    },
                ),
            )
            .await;

            match wake {
                Wake::Stop => break,
                Wake::Command(cmd) => self.apply(cmd),
                Wake::Tick => {
                    self.tick();
                    deadline += self.interval;
                    let now = Instant::now();
                    if deadline <= now {
                        // Fell behind (slow fetch); skip missed slots.
                        debug!("Poller: tick overran interval, rescheduling");
                        deadline = now + self.interval;
                    }
                }
            }
        }

        while let Ok(cmd) = self.control.commands.try_receive() {
            self.apply(cmd);
        }
        self.service
    }

    fn tick(&mut self) {
        let every = u64::from(self.sources.weather_every_ticks.max(1));
        let weather_due = self.service.tick_count() % every == 0;

        let emitted = self
            .service
            .tick(self.sources.telemetry.as_mut(), self.sink.as_mut());

        if weather_due {
            if let Some(weather) = self.sources.weather.as_mut() {
                self.service.poll_weather(weather.as_mut(), self.sink.as_mut());
            }
        }

        self.control.completed_ticks.fetch_add(1, Ordering::AcqRel);
        debug!(
            "Poller: tick {} done, {} alert(s), log size {}",
            self.service.tick_count(),
            emitted,
            self.service.event_log().len()
        );
    }

    fn apply(&mut self, cmd: MonitorCommand) {
        if let Err(e) = self.service.handle_command(cmd, self.sink.as_mut()) {
            warn!("Poller: command rejected: {}", e);
        }
    }
}
