//! Interface Factory -- pick and build the radio interface variant.
//!
//! The capability code reported by the device is converted to an
//! [`InterfaceType`] exactly once, here. From then on the dispatch is an
//! exhaustive `match`, so adding a variant without a constructor does not
//! compile.

use tracing::{error, info};

use trxlib_core::{CapabilityCode, InterfaceProvider, InterfaceType, RadioDevice, RadioInterface};

use crate::config::TrxConfig;
use crate::error::BootstrapError;

/// Build and initialize the radio interface for a negotiated device.
///
/// The returned interface borrows `device` for its whole lifetime. On
/// failure nothing is left reachable: an unknown code constructs nothing,
/// and an interface whose `init()` fails is dropped before returning.
pub async fn build_interface<'d, P: InterfaceProvider + ?Sized>(
    provider: &P,
    device: &'d mut dyn RadioDevice,
    capability: CapabilityCode,
    config: &TrxConfig,
) -> Result<Box<dyn RadioInterface + 'd>, BootstrapError> {
    let iface = InterfaceType::try_from(capability).map_err(|code| {
        error!("Unsupported radio interface configuration (type code {code})");
        BootstrapError::UnsupportedInterface(code)
    })?;

    let mut radio = construct(provider, device, iface, config);

    if let Err(e) = radio.init(iface).await {
        error!("Failed to initialize radio interface: {e}");
        drop(radio);
        return Err(BootstrapError::InterfaceInit(e));
    }

    info!(iface = %iface, "radio interface initialized");
    Ok(radio)
}

fn construct<'d, P: InterfaceProvider + ?Sized>(
    provider: &P,
    device: &'d mut dyn RadioDevice,
    iface: InterfaceType,
    config: &TrxConfig,
) -> Box<dyn RadioInterface + 'd> {
    let (tx_sps, rx_sps) = (config.tx_sps(), config.rx_sps());

    match iface {
        InterfaceType::Normal => provider.direct(device, tx_sps, rx_sps, config.chans()),
        InterfaceType::Resamp64M | InterfaceType::Resamp100M => {
            provider.resampling(device, tx_sps, rx_sps)
        }
        InterfaceType::MultiArfcn => {
            provider.multi_carrier(device, tx_sps, rx_sps, config.chans())
        }
    }
}
