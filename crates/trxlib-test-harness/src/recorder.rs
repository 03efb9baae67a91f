//! Ordered record of everything the mock pipeline was asked to do.
//!
//! Every mock collaborator shares one [`EventLog`]. Construction,
//! initialization, FIFO attachment, and release are appended in the order
//! they happen, so tests can assert on teardown order and on what was
//! (or was not) left attached after a failure.

use std::sync::{Arc, Mutex, MutexGuard};

use trxlib_core::{
    DeviceParams, InterfaceType, ReferenceClock, TransceiverInit, TransceiverParams,
};

/// Which radio interface constructor was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    /// Plain interface at a multiple of the symbol rate.
    Direct,
    /// Single-channel resampling interface.
    Resampling,
    /// Multi-ARFCN channelizing interface.
    MultiCarrier,
}

/// One step taken by the mock pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A device object was constructed.
    DeviceMade(DeviceParams),
    /// `open()` was called on the device.
    DeviceOpened {
        args: String,
        reference: ReferenceClock,
        swap_channels: bool,
    },
    /// A radio interface was constructed.
    InterfaceBuilt { kind: InterfaceKind, chans: usize },
    /// The radio interface was initialized successfully.
    InterfaceInitialized(InterfaceType),
    /// A transceiver core was constructed.
    TransceiverBuilt(TransceiverParams),
    /// The transceiver core was initialized successfully.
    TransceiverInitialized(TransceiverInit),
    /// A receive FIFO was attached to a core channel.
    FifoAttached(usize),
    /// The transceiver core was dropped while holding `attached` FIFOs.
    TransceiverReleased { attached: usize },
    /// The radio interface was dropped.
    InterfaceReleased,
    /// The device was dropped.
    DeviceReleased,
}

impl PipelineEvent {
    /// Whether this event records a component being released.
    pub fn is_release(&self) -> bool {
        matches!(
            self,
            PipelineEvent::TransceiverReleased { .. }
                | PipelineEvent::InterfaceReleased
                | PipelineEvent::DeviceReleased
        )
    }
}

/// Shared, append-only event log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn record(&self, event: PipelineEvent) {
        self.lock().push(event);
    }

    /// Snapshot of every event recorded so far.
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.lock().clone()
    }

    /// Snapshot of the release events only, in order.
    pub fn releases(&self) -> Vec<PipelineEvent> {
        self.lock()
            .iter()
            .filter(|e| e.is_release())
            .cloned()
            .collect()
    }

    /// Whether `event` has been recorded.
    pub fn contains(&self, event: &PipelineEvent) -> bool {
        self.lock().iter().any(|e| e == event)
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PipelineEvent>> {
        // A panicking test thread must not hide the log from the others.
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}
