//! The [`RadioInterface`] trait and the constructors for each variant.
//!
//! The radio interface sits between the transceiver core and the device.
//! It handles sample rate changes, frequency shifts, and channel
//! multiplexing so the core always sees vectors at a multiple of the GSM
//! symbol rate, whatever rate the device actually runs at.
//!
//! Which variant is legal depends on the [`InterfaceType`] the device
//! reported when it was opened, so the bootstrap picks one of the
//! [`InterfaceProvider`] constructors at run time.

use async_trait::async_trait;

use crate::device::RadioDevice;
use crate::error::Result;
use crate::fifo::FifoHandle;
use crate::types::{InterfaceType, SamplesPerSymbol};

/// A constructed radio interface.
///
/// The interface exclusively borrows its device for its whole lifetime.
/// It owns the per-channel receive FIFOs; anything that attaches to them
/// holds a non-owning clone of the handle.
#[async_trait]
pub trait RadioInterface: Send + Sync {
    /// Initialize the interface for the negotiated topology.
    ///
    /// Must succeed before any FIFO is handed out. Failure is fatal.
    async fn init(&mut self, iface: InterfaceType) -> Result<()>;

    /// Return the receive FIFO for a logical channel, if it exists.
    fn receive_fifo(&self, chan: usize) -> Option<FifoHandle>;
}

/// Constructs the radio interface variants.
///
/// Resampling interfaces always carry a single channel and take no channel
/// count. The 64 MHz and 100 MHz variants share one constructor; the rate
/// is passed to [`RadioInterface::init`].
pub trait InterfaceProvider {
    /// Interface for devices running at a multiple of the symbol rate.
    fn direct<'d>(
        &self,
        device: &'d mut dyn RadioDevice,
        tx_sps: SamplesPerSymbol,
        rx_sps: SamplesPerSymbol,
        chans: usize,
    ) -> Box<dyn RadioInterface + 'd>;

    /// Interface for devices at a fixed clock that needs resampling.
    fn resampling<'d>(
        &self,
        device: &'d mut dyn RadioDevice,
        tx_sps: SamplesPerSymbol,
        rx_sps: SamplesPerSymbol,
    ) -> Box<dyn RadioInterface + 'd>;

    /// Channelizing interface for wideband multi-ARFCN devices.
    fn multi_carrier<'d>(
        &self,
        device: &'d mut dyn RadioDevice,
        tx_sps: SamplesPerSymbol,
        rx_sps: SamplesPerSymbol,
        chans: usize,
    ) -> Box<dyn RadioInterface + 'd>;
}
