//! The [`RadioDevice`] trait -- the physical SDR as seen by the bootstrap.
//!
//! Device drivers (UHD, UmTRX, LimeSDR, ...) implement this trait. The
//! bootstrap only needs two things from a driver: a way to construct the
//! device object with the requested rates ([`DeviceFactory`]), and an
//! `open()` that negotiates with the hardware and reports which radio
//! interface topology the device needs.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CapabilityCode, InterfaceType, ReferenceClock, SamplesPerSymbol};

/// Parameters a device is constructed with, before it is opened.
///
/// These are *requested* values. The achievable topology is only known
/// after [`RadioDevice::open`] completes.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceParams {
    /// Transmit samples-per-symbol.
    pub tx_sps: SamplesPerSymbol,
    /// Receive samples-per-symbol.
    pub rx_sps: SamplesPerSymbol,
    /// Interface topology hint: [`InterfaceType::MultiArfcn`] when
    /// multi-carrier operation was requested, otherwise
    /// [`InterfaceType::Normal`].
    pub iface_hint: InterfaceType,
    /// Number of logical channels.
    pub chans: usize,
    /// Baseband tuning offset in hertz.
    pub offset: f64,
}

/// Constructs device objects.
pub trait DeviceFactory {
    /// Construct an unopened device with the requested parameters.
    fn make_device(&self, params: &DeviceParams) -> Box<dyn RadioDevice>;
}

/// A physical radio device.
///
/// The device is owned by the bootstrap driver. A radio interface borrows
/// it exclusively for the interface's whole lifetime, so dropping the
/// device is always the last step of teardown.
#[async_trait]
pub trait RadioDevice: Send + Sync {
    /// Open the hardware and negotiate its interface capability.
    ///
    /// `args` is the driver-specific device argument string. Returns the
    /// raw capability code on success. Any error is fatal to the bootstrap
    /// and is never retried.
    async fn open(
        &mut self,
        args: &str,
        reference: ReferenceClock,
        swap_channels: bool,
    ) -> Result<CapabilityCode>;
}
