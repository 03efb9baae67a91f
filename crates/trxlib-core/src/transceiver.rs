//! The [`Transceiver`] trait -- the burst-level processing core.
//!
//! The core runs GSM modulation, demodulation, and the control/data
//! sockets to the upper-layer stack on its own worker threads. The
//! bootstrap's only contract with it is construct, initialize, attach one
//! receive FIFO per channel, and eventually drop it.

use std::net::IpAddr;

use async_trait::async_trait;

use crate::error::Result;
use crate::fifo::FifoHandle;
use crate::interface::RadioInterface;
use crate::types::{FillerType, SamplesPerSymbol};

/// Construction parameters for a transceiver core.
#[derive(Debug, Clone, PartialEq)]
pub struct TransceiverParams {
    /// Base UDP port for the clock/control/data sockets.
    pub port: u16,
    /// Address the core binds its sockets to.
    pub local_addr: IpAddr,
    /// Address of the upper-layer GSM stack.
    pub remote_addr: IpAddr,
    /// Transmit samples-per-symbol.
    pub tx_sps: SamplesPerSymbol,
    /// Receive samples-per-symbol.
    pub rx_sps: SamplesPerSymbol,
    /// Number of logical channels.
    pub chans: usize,
    /// RSSI to dBm calibration offset in dB.
    pub rssi_offset: f64,
}

/// Initialization settings for a transceiver core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransceiverInit {
    /// C0 filler policy.
    pub filler: FillerType,
    /// Training sequence code for random normal bursts (0..=7).
    pub tsc: u8,
    /// Access delay for random access bursts (0..=68).
    pub rach_delay: u8,
    /// Enable the EDGE (8-PSK) receiver.
    pub edge: bool,
}

/// Constructs transceiver cores.
pub trait TransceiverProvider {
    /// Construct a core bound to `radio`.
    ///
    /// The core borrows the interface, so it can never outlive it.
    fn make_transceiver<'r>(
        &self,
        params: TransceiverParams,
        radio: &'r dyn RadioInterface,
    ) -> Box<dyn Transceiver + 'r>;
}

/// A constructed transceiver core.
#[async_trait]
pub trait Transceiver: Send + Sync {
    /// Initialize burst tables and sockets. Failure is fatal.
    async fn init(&mut self, settings: TransceiverInit) -> Result<()>;

    /// Attach a receive FIFO to logical channel `chan`.
    fn attach_fifo(&mut self, fifo: FifoHandle, chan: usize) -> Result<()>;

    /// Number of channels the core is running.
    fn num_chans(&self) -> usize;
}
