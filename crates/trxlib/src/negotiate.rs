//! Hardware Negotiator -- construct the device and open it.
//!
//! The device is built with the *requested* rates and channel count, but
//! the interface topology it can actually drive is only known once the
//! driver has talked to the hardware. [`negotiate`] returns that raw
//! capability code; mapping it to an interface variant is the interface
//! factory's job.

use tracing::{debug, error};

use trxlib_core::{CapabilityCode, DeviceFactory, RadioDevice};

use crate::config::TrxConfig;
use crate::error::BootstrapError;

/// Construct the unopened device for `config`.
pub fn make_device<F: DeviceFactory + ?Sized>(factory: &F, config: &TrxConfig) -> Box<dyn RadioDevice> {
    let params = config.device_params();
    debug!(
        tx_sps = %params.tx_sps,
        rx_sps = %params.rx_sps,
        hint = %params.iface_hint,
        chans = params.chans,
        "constructing radio device"
    );
    factory.make_device(&params)
}

/// Open the device and report its capability code.
///
/// A failed open is fatal and is not retried.
pub async fn negotiate(
    device: &mut dyn RadioDevice,
    config: &TrxConfig,
) -> Result<CapabilityCode, BootstrapError> {
    match device
        .open(config.device_args(), config.reference(), config.swap_channels())
        .await
    {
        Ok(code) => {
            debug!(code = %code, "radio device opened");
            Ok(code)
        }
        Err(e) => {
            error!("Failed to create radio device: {e}");
            Err(BootstrapError::Negotiation(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrxOptions;
    use trxlib_core::{InterfaceType, ReferenceClock, SamplesPerSymbol};
    use trxlib_test_harness::{MockBackend, PipelineEvent};

    #[tokio::test]
    async fn device_is_built_with_requested_parameters() {
        let backend = MockBackend::new();
        let config = TrxOptions::new()
            .multi_arfcn(true)
            .chans(3)
            .offset(-50.0)
            .validate()
            .unwrap();

        let _device = make_device(&backend, &config);

        match &backend.log().events()[0] {
            PipelineEvent::DeviceMade(params) => {
                assert_eq!(params.tx_sps, SamplesPerSymbol::FOUR);
                assert_eq!(params.rx_sps, SamplesPerSymbol::FOUR);
                assert_eq!(params.iface_hint, InterfaceType::MultiArfcn);
                assert_eq!(params.chans, 3);
                assert_eq!(params.offset, -50.0);
            }
            other => panic!("expected DeviceMade, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn open_passes_args_reference_and_swap() {
        let backend = MockBackend::new();
        let config = TrxOptions::new()
            .device_args("type=b200")
            .external_reference(true)
            .swap_channels(true)
            .validate()
            .unwrap();

        let mut device = make_device(&backend, &config);
        let code = negotiate(device.as_mut(), &config).await.unwrap();

        assert_eq!(code, InterfaceType::Normal.code());
        assert!(backend.log().contains(&PipelineEvent::DeviceOpened {
            args: "type=b200".into(),
            reference: ReferenceClock::External,
            swap_channels: true,
        }));
    }

    #[tokio::test]
    async fn open_reports_negotiated_code_not_hint() {
        let backend = MockBackend::new().capability(2);
        let config = TrxOptions::new().validate().unwrap();

        let mut device = make_device(&backend, &config);
        let code = negotiate(device.as_mut(), &config).await.unwrap();
        assert_eq!(code, InterfaceType::Resamp100M.code());
    }

    #[tokio::test]
    async fn failed_open_is_a_negotiation_error() {
        let backend = MockBackend::new().fail_open();
        let config = TrxOptions::new().validate().unwrap();

        let mut device = make_device(&backend, &config);
        let err = negotiate(device.as_mut(), &config).await.unwrap_err();
        assert!(matches!(err, BootstrapError::Negotiation(_)));
    }
}
