//! Mock radio interface and transceiver core.
//!
//! [`MockInterface`] borrows its device and [`MockTransceiver`] borrows its
//! interface, exactly like real implementations, so the borrow checker
//! holds tests to the same teardown order as production code.

use async_trait::async_trait;

use trxlib_core::error::{Error, Result};
use trxlib_core::{
    FifoHandle, InterfaceType, RadioDevice, RadioInterface, SamplesPerSymbol, Transceiver,
    TransceiverInit, TransceiverParams, VectorFifo, DEFAULT_FIFO_DEPTH,
};

use crate::mock_backend::MockScript;
use crate::recorder::{EventLog, InterfaceKind, PipelineEvent};

/// A [`RadioInterface`] that creates one FIFO per channel on `init()`.
pub struct MockInterface<'d> {
    _device: &'d mut dyn RadioDevice,
    kind: InterfaceKind,
    tx_sps: SamplesPerSymbol,
    rx_sps: SamplesPerSymbol,
    chans: usize,
    fifos: Vec<Option<FifoHandle>>,
    script: MockScript,
    log: EventLog,
}

impl<'d> MockInterface<'d> {
    /// Create an interface; records [`PipelineEvent::InterfaceBuilt`].
    pub fn new(
        device: &'d mut dyn RadioDevice,
        kind: InterfaceKind,
        tx_sps: SamplesPerSymbol,
        rx_sps: SamplesPerSymbol,
        chans: usize,
        script: MockScript,
        log: EventLog,
    ) -> Self {
        log.record(PipelineEvent::InterfaceBuilt { kind, chans });
        MockInterface {
            _device: device,
            kind,
            tx_sps,
            rx_sps,
            chans,
            fifos: Vec::new(),
            script,
            log,
        }
    }

    /// Which constructor built this interface.
    pub fn kind(&self) -> InterfaceKind {
        self.kind
    }

    /// Configured (tx, rx) samples-per-symbol.
    pub fn rates(&self) -> (SamplesPerSymbol, SamplesPerSymbol) {
        (self.tx_sps, self.rx_sps)
    }
}

#[async_trait]
impl RadioInterface for MockInterface<'_> {
    async fn init(&mut self, iface: InterfaceType) -> Result<()> {
        if self.script.fail_radio_init {
            return Err(Error::Interface("mock interface init failure".into()));
        }

        self.fifos = (0..self.chans)
            .map(|chan| {
                (self.script.missing_fifo != Some(chan))
                    .then(|| VectorFifo::new(chan, DEFAULT_FIFO_DEPTH))
            })
            .collect();
        self.log.record(PipelineEvent::InterfaceInitialized(iface));
        Ok(())
    }

    fn receive_fifo(&self, chan: usize) -> Option<FifoHandle> {
        self.fifos.get(chan).cloned().flatten()
    }
}

impl Drop for MockInterface<'_> {
    fn drop(&mut self) {
        self.log.record(PipelineEvent::InterfaceReleased);
    }
}

/// A [`Transceiver`] that records attachments.
pub struct MockTransceiver<'r> {
    _radio: &'r dyn RadioInterface,
    params: TransceiverParams,
    attached: Vec<Option<FifoHandle>>,
    script: MockScript,
    log: EventLog,
}

impl<'r> MockTransceiver<'r> {
    /// Create a core; records [`PipelineEvent::TransceiverBuilt`].
    pub fn new(
        params: TransceiverParams,
        radio: &'r dyn RadioInterface,
        script: MockScript,
        log: EventLog,
    ) -> Self {
        log.record(PipelineEvent::TransceiverBuilt(params.clone()));
        MockTransceiver {
            _radio: radio,
            attached: vec![None; params.chans],
            params,
            script,
            log,
        }
    }

    /// Number of channels with an attached FIFO.
    pub fn attached_count(&self) -> usize {
        self.attached.iter().filter(|f| f.is_some()).count()
    }
}

#[async_trait]
impl Transceiver for MockTransceiver<'_> {
    async fn init(&mut self, settings: TransceiverInit) -> Result<()> {
        if self.script.fail_trx_init {
            return Err(Error::Transceiver("mock transceiver init failure".into()));
        }
        self.log.record(PipelineEvent::TransceiverInitialized(settings));
        Ok(())
    }

    fn attach_fifo(&mut self, fifo: FifoHandle, chan: usize) -> Result<()> {
        if self.script.reject_fifo == Some(chan) {
            return Err(Error::Transceiver(format!(
                "mock transceiver rejected FIFO on channel {chan}"
            )));
        }
        let slot = self.attached.get_mut(chan).ok_or_else(|| {
            Error::InvalidParameter(format!(
                "channel {chan} out of range (core has {})",
                self.params.chans
            ))
        })?;
        *slot = Some(fifo);
        self.log.record(PipelineEvent::FifoAttached(chan));
        Ok(())
    }

    fn num_chans(&self) -> usize {
        self.params.chans
    }
}

impl Drop for MockTransceiver<'_> {
    fn drop(&mut self) {
        self.log.record(PipelineEvent::TransceiverReleased {
            attached: self.attached_count(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_device::MockDevice;
    use std::net::{IpAddr, Ipv4Addr};
    use trxlib_core::{DeviceParams, FillerType};

    fn device(log: &EventLog) -> MockDevice {
        MockDevice::new(
            DeviceParams {
                tx_sps: SamplesPerSymbol::FOUR,
                rx_sps: SamplesPerSymbol::ONE,
                iface_hint: InterfaceType::Normal,
                chans: 2,
                offset: 0.0,
            },
            MockScript::default(),
            log.clone(),
        )
    }

    fn trx_params(chans: usize) -> TransceiverParams {
        TransceiverParams {
            port: 5700,
            local_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            remote_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            tx_sps: SamplesPerSymbol::FOUR,
            rx_sps: SamplesPerSymbol::ONE,
            chans,
            rssi_offset: 0.0,
        }
    }

    #[tokio::test]
    async fn interface_hands_out_fifos_after_init() {
        let log = EventLog::new();
        let mut dev = device(&log);
        let mut radio = MockInterface::new(
            &mut dev,
            InterfaceKind::Direct,
            SamplesPerSymbol::FOUR,
            SamplesPerSymbol::ONE,
            2,
            MockScript::default(),
            log.clone(),
        );

        assert!(radio.receive_fifo(0).is_none());
        radio.init(InterfaceType::Normal).await.unwrap();
        assert_eq!(radio.receive_fifo(1).unwrap().channel(), 1);
        assert!(radio.receive_fifo(2).is_none());
        assert_eq!(radio.kind(), InterfaceKind::Direct);
    }

    #[tokio::test]
    async fn interface_skips_scripted_missing_fifo() {
        let log = EventLog::new();
        let mut dev = device(&log);
        let script = MockScript {
            missing_fifo: Some(1),
            ..MockScript::default()
        };
        let mut radio = MockInterface::new(
            &mut dev,
            InterfaceKind::Direct,
            SamplesPerSymbol::FOUR,
            SamplesPerSymbol::ONE,
            2,
            script,
            log.clone(),
        );
        radio.init(InterfaceType::Normal).await.unwrap();
        assert!(radio.receive_fifo(0).is_some());
        assert!(radio.receive_fifo(1).is_none());
    }

    #[tokio::test]
    async fn transceiver_records_attached_count_on_drop() {
        let log = EventLog::new();
        let mut dev = device(&log);
        let mut radio = MockInterface::new(
            &mut dev,
            InterfaceKind::Direct,
            SamplesPerSymbol::FOUR,
            SamplesPerSymbol::ONE,
            2,
            MockScript::default(),
            log.clone(),
        );
        radio.init(InterfaceType::Normal).await.unwrap();

        {
            let mut trx =
                MockTransceiver::new(trx_params(2), &radio, MockScript::default(), log.clone());
            trx.init(TransceiverInit {
                filler: FillerType::Zero,
                tsc: 0,
                rach_delay: 0,
                edge: false,
            })
            .await
            .unwrap();
            let fifo = radio.receive_fifo(0).unwrap();
            trx.attach_fifo(fifo, 0).unwrap();
            assert!(trx.attach_fifo(radio.receive_fifo(1).unwrap(), 5).is_err());
            assert_eq!(trx.num_chans(), 2);
        }

        assert!(log.contains(&PipelineEvent::TransceiverReleased { attached: 1 }));
    }
}
