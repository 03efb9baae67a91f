//! Mock device whose negotiation result is scripted.

use async_trait::async_trait;

use trxlib_core::error::{Error, Result};
use trxlib_core::{CapabilityCode, DeviceParams, RadioDevice, ReferenceClock};

use crate::mock_backend::MockScript;
use crate::recorder::{EventLog, PipelineEvent};

/// A [`RadioDevice`] that reports whatever capability its script says.
///
/// Without a scripted capability the device echoes the interface hint it
/// was constructed with, which is what a well-behaved driver does when the
/// hardware supports the requested topology.
#[derive(Debug)]
pub struct MockDevice {
    params: DeviceParams,
    script: MockScript,
    log: EventLog,
}

impl MockDevice {
    /// Create a device; records [`PipelineEvent::DeviceMade`].
    pub fn new(params: DeviceParams, script: MockScript, log: EventLog) -> Self {
        log.record(PipelineEvent::DeviceMade(params.clone()));
        MockDevice {
            params,
            script,
            log,
        }
    }

    /// Parameters the device was constructed with.
    pub fn params(&self) -> &DeviceParams {
        &self.params
    }
}

#[async_trait]
impl RadioDevice for MockDevice {
    async fn open(
        &mut self,
        args: &str,
        reference: ReferenceClock,
        swap_channels: bool,
    ) -> Result<CapabilityCode> {
        self.log.record(PipelineEvent::DeviceOpened {
            args: args.to_string(),
            reference,
            swap_channels,
        });

        if self.script.fail_open {
            return Err(Error::Device("mock device refused to open".into()));
        }

        Ok(self
            .script
            .capability
            .unwrap_or_else(|| self.params.iface_hint.code()))
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.log.record(PipelineEvent::DeviceReleased);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trxlib_core::{InterfaceType, SamplesPerSymbol};

    fn params(hint: InterfaceType) -> DeviceParams {
        DeviceParams {
            tx_sps: SamplesPerSymbol::FOUR,
            rx_sps: SamplesPerSymbol::FOUR,
            iface_hint: hint,
            chans: 2,
            offset: 0.0,
        }
    }

    #[tokio::test]
    async fn open_echoes_hint_by_default() {
        let log = EventLog::new();
        let mut dev = MockDevice::new(
            params(InterfaceType::MultiArfcn),
            MockScript::default(),
            log.clone(),
        );

        let code = dev.open("", ReferenceClock::Gps, true).await.unwrap();
        assert_eq!(code, InterfaceType::MultiArfcn.code());
        assert!(log.contains(&PipelineEvent::DeviceOpened {
            args: String::new(),
            reference: ReferenceClock::Gps,
            swap_channels: true,
        }));
    }

    #[tokio::test]
    async fn open_reports_scripted_failure() {
        let script = MockScript {
            fail_open: true,
            ..MockScript::default()
        };
        let mut dev = MockDevice::new(params(InterfaceType::Normal), script, EventLog::new());
        assert!(matches!(
            dev.open("", ReferenceClock::Internal, false).await,
            Err(Error::Device(_))
        ));
    }

    #[test]
    fn drop_is_recorded() {
        let log = EventLog::new();
        drop(MockDevice::new(
            params(InterfaceType::Normal),
            MockScript::default(),
            log.clone(),
        ));
        assert_eq!(log.releases(), vec![PipelineEvent::DeviceReleased]);
    }
}
