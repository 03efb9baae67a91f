//! Lifecycle Manager -- priority, shutdown signals, and the wait loop.
//!
//! The process moves through four states:
//!
//! ```text
//! Starting --> Running --> ShuttingDown --> Stopped
//!     \                        ^
//!      `--- bootstrap failure -'
//! ```
//!
//! SIGINT and SIGTERM only store `true` into a shared [`ShutdownFlag`];
//! nothing else runs in signal context. The wait loop in
//! [`Lifecycle::wait_for_shutdown`] polls that flag from normal control
//! flow and is the only place the process blocks once it is running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use signal_hook::consts::{SIGINT, SIGTERM};
use tracing::{debug, error, info};

use crate::error::BootstrapError;

/// How often the wait loop checks for a shutdown request.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Where the process is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Priority and signal handling are being set up, hardware is being
    /// negotiated and the pipeline assembled.
    Starting,
    /// The pipeline is live; waiting for a shutdown request.
    Running,
    /// Components are being released, core first.
    ShuttingDown,
    /// Terminal.
    Stopped,
}

/// Process-wide shutdown request, safe to set from a signal handler.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    /// Create a flag with no shutdown requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown.
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Make SIGINT and SIGTERM set this flag.
    ///
    /// The installed handlers do nothing but the atomic store.
    pub fn register_signals(&self) -> Result<(), BootstrapError> {
        for (signal, name) in [(SIGINT, "SIGINT"), (SIGTERM, "SIGTERM")] {
            signal_hook::flag::register(signal, Arc::clone(&self.0)).map_err(|source| {
                error!("Failed to install {name} signal handler: {source}");
                BootstrapError::SignalHandler {
                    signal: name,
                    source,
                }
            })?;
        }
        Ok(())
    }
}

/// Switch the calling process to SCHED_RR at `priority`.
#[cfg(target_os = "linux")]
pub fn set_realtime_priority(priority: i32) -> Result<(), BootstrapError> {
    info!("Setting SCHED_RR priority({priority})");

    // SAFETY: sched_param is plain data; all-zero is a valid value.
    let mut param: libc::sched_param = unsafe { std::mem::zeroed() };
    param.sched_priority = priority;

    // SAFETY: pid 0 names the calling process and `param` outlives the call.
    let rc = unsafe { libc::sched_setscheduler(0, libc::SCHED_RR, &param) };
    if rc != 0 {
        let source = std::io::Error::last_os_error();
        error!("Setting SCHED_RR failed: {source}");
        return Err(BootstrapError::Scheduling { priority, source });
    }
    Ok(())
}

/// Switch the calling process to SCHED_RR at `priority`.
#[cfg(not(target_os = "linux"))]
pub fn set_realtime_priority(priority: i32) -> Result<(), BootstrapError> {
    let source = std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "SCHED_RR is only supported on Linux",
    );
    error!("Setting SCHED_RR failed: {source}");
    Err(BootstrapError::Scheduling { priority, source })
}

/// Drives the state machine for one process run.
#[derive(Debug)]
pub struct Lifecycle {
    state: LifecycleState,
    shutdown: ShutdownFlag,
    poll_interval: Duration,
}

impl Lifecycle {
    /// Create a lifecycle in [`LifecycleState::Starting`].
    pub fn new(shutdown: ShutdownFlag) -> Self {
        Lifecycle {
            state: LifecycleState::Starting,
            shutdown,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the wait loop's poll interval (default: 1s).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn shutdown_flag(&self) -> &ShutdownFlag {
        &self.shutdown
    }

    /// Apply the real-time priority, if requested, and install the
    /// shutdown signal handlers.
    ///
    /// Failure is fatal and leaves the lifecycle [`LifecycleState::Stopped`]
    /// without any hardware having been touched.
    pub fn start(&mut self, rt_priority: Option<i32>) -> Result<(), BootstrapError> {
        let started = match rt_priority {
            Some(priority) => set_realtime_priority(priority),
            None => Ok(()),
        }
        .and_then(|()| self.shutdown.register_signals());

        if started.is_err() {
            self.transition(LifecycleState::Stopped);
        }
        started
    }

    /// Mark the pipeline live.
    pub fn enter_running(&mut self, chans: usize) {
        self.transition(LifecycleState::Running);
        info!("-- Transceiver active with {chans} channel(s)");
        println!("-- Transceiver active with {chans} channel(s)");
    }

    /// Block until shutdown is requested.
    pub async fn wait_for_shutdown(&mut self) {
        while !self.shutdown.is_requested() {
            tokio::time::sleep(self.poll_interval).await;
        }
        info!("Received shutdown signal");
    }

    /// Enter [`LifecycleState::ShuttingDown`] and announce it.
    ///
    /// Only the first call does anything; returns whether this call made
    /// the transition.
    pub fn begin_shutdown(&mut self) -> bool {
        if matches!(
            self.state,
            LifecycleState::ShuttingDown | LifecycleState::Stopped
        ) {
            return false;
        }
        self.transition(LifecycleState::ShuttingDown);
        info!("Shutting down transceiver...");
        println!("Shutting down transceiver...");
        true
    }

    /// Enter the terminal state.
    pub fn stop(&mut self) {
        self.begin_shutdown();
        self.transition(LifecycleState::Stopped);
    }

    fn transition(&mut self, next: LifecycleState) {
        debug!(from = ?self.state, to = ?next, "lifecycle transition");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_starts_clear_and_latches() {
        let flag = ShutdownFlag::new();
        assert!(!flag.is_requested());
        flag.clone().request();
        assert!(flag.is_requested());
    }

    #[test]
    fn terminate_signal_sets_flag() {
        let flag = ShutdownFlag::new();
        flag.register_signals().unwrap();
        signal_hook::low_level::raise(SIGTERM).unwrap();
        assert!(flag.is_requested());
    }

    #[test]
    fn start_without_priority_registers_signals() {
        let mut lifecycle = Lifecycle::new(ShutdownFlag::new());
        lifecycle.start(None).unwrap();
        assert_eq!(lifecycle.state(), LifecycleState::Starting);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn out_of_range_priority_is_fatal() {
        let mut lifecycle = Lifecycle::new(ShutdownFlag::new());
        let err = lifecycle.start(Some(1000)).unwrap_err();
        assert!(matches!(err, BootstrapError::Scheduling { priority: 1000, .. }));
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn wait_returns_once_flag_is_set() {
        let flag = ShutdownFlag::new();
        let mut lifecycle =
            Lifecycle::new(flag.clone()).with_poll_interval(Duration::from_millis(5));
        lifecycle.enter_running(1);

        let setter = flag.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            setter.request();
        });

        lifecycle.wait_for_shutdown().await;
        assert!(flag.is_requested());
        assert_eq!(lifecycle.state(), LifecycleState::Running);
    }

    #[test]
    fn shutdown_is_announced_once() {
        let mut lifecycle = Lifecycle::new(ShutdownFlag::new());
        assert!(lifecycle.begin_shutdown());
        assert_eq!(lifecycle.state(), LifecycleState::ShuttingDown);
        assert!(!lifecycle.begin_shutdown());

        lifecycle.stop();
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
        assert!(!lifecycle.begin_shutdown());
    }

    #[test]
    fn stop_passes_through_shutting_down() {
        let mut lifecycle = Lifecycle::new(ShutdownFlag::new());
        lifecycle.enter_running(2);
        lifecycle.stop();
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    }
}
