//! [`MockBackend`] -- one object implementing every provider trait.
//!
//! The backend is scripted either in code, with the fluent setters, or
//! from a device argument string so the `trxd` binary can drive every
//! bootstrap path from the command line:
//!
//! ```text
//! capability=<code>   report this raw capability code from open()
//! fail-open           open() fails
//! fail-radio-init     radio interface init() fails
//! fail-trx-init       transceiver init() fails
//! missing-fifo=<n>    the interface has no FIFO for channel n
//! reject-fifo=<n>     the core refuses to attach channel n
//! ```
//!
//! Keys are separated by commas. Unknown keys are ignored so that real
//! driver arguments (`serial=...`, `type=b200`) pass through untouched.
//!
//! # Example
//!
//! ```
//! use trxlib_test_harness::MockBackend;
//!
//! let backend = MockBackend::from_device_args("type=b200,missing-fifo=1").unwrap();
//! assert_eq!(backend.script().missing_fifo, Some(1));
//! ```

use trxlib_core::error::{Error, Result};
use trxlib_core::{
    CapabilityCode, DeviceFactory, DeviceParams, InterfaceProvider, RadioDevice, RadioInterface,
    SamplesPerSymbol, Transceiver, TransceiverParams, TransceiverProvider,
};

use crate::mock_device::MockDevice;
use crate::mock_radio::{MockInterface, MockTransceiver};
use crate::recorder::{EventLog, InterfaceKind};

/// Failure and capability script shared by the mock collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockScript {
    /// Capability code reported by `open()`; `None` echoes the hint.
    pub capability: Option<CapabilityCode>,
    /// Make `open()` fail.
    pub fail_open: bool,
    /// Make the radio interface's `init()` fail.
    pub fail_radio_init: bool,
    /// Make the transceiver's `init()` fail.
    pub fail_trx_init: bool,
    /// Channel with no receive FIFO.
    pub missing_fifo: Option<usize>,
    /// Channel whose FIFO the core refuses to attach.
    pub reject_fifo: Option<usize>,
}

/// Mock implementation of [`DeviceFactory`], [`InterfaceProvider`], and
/// [`TransceiverProvider`].
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    script: MockScript,
    log: EventLog,
}

impl MockBackend {
    /// Create a backend where every step succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a backend from a comma-separated device argument string.
    pub fn from_device_args(args: &str) -> Result<Self> {
        let mut backend = MockBackend::new();
        for item in args.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = match item.split_once('=') {
                Some((k, v)) => (k.trim(), Some(v.trim())),
                None => (item, None),
            };
            backend = match key {
                "capability" => backend.capability(parse_number(key, value)?),
                "fail-open" => backend.fail_open(),
                "fail-radio-init" => backend.fail_radio_init(),
                "fail-trx-init" => backend.fail_trx_init(),
                "missing-fifo" => backend.missing_fifo(parse_number(key, value)? as usize),
                "reject-fifo" => backend.reject_fifo(parse_number(key, value)? as usize),
                _ => backend,
            };
        }
        Ok(backend)
    }

    /// Report `code` from `open()` regardless of the hint.
    pub fn capability(mut self, code: u32) -> Self {
        self.script.capability = Some(CapabilityCode(code));
        self
    }

    /// Make `open()` fail.
    pub fn fail_open(mut self) -> Self {
        self.script.fail_open = true;
        self
    }

    /// Make the radio interface's `init()` fail.
    pub fn fail_radio_init(mut self) -> Self {
        self.script.fail_radio_init = true;
        self
    }

    /// Make the transceiver's `init()` fail.
    pub fn fail_trx_init(mut self) -> Self {
        self.script.fail_trx_init = true;
        self
    }

    /// Leave channel `chan` without a receive FIFO.
    pub fn missing_fifo(mut self, chan: usize) -> Self {
        self.script.missing_fifo = Some(chan);
        self
    }

    /// Make the core refuse to attach channel `chan`.
    pub fn reject_fifo(mut self, chan: usize) -> Self {
        self.script.reject_fifo = Some(chan);
        self
    }

    /// The active script.
    pub fn script(&self) -> &MockScript {
        &self.script
    }

    /// The shared event log.
    pub fn log(&self) -> &EventLog {
        &self.log
    }
}

fn parse_number(key: &str, value: Option<&str>) -> Result<u32> {
    let value =
        value.ok_or_else(|| Error::InvalidParameter(format!("device argument {key} needs a value")))?;
    value.parse().map_err(|_| {
        Error::InvalidParameter(format!("device argument {key}: invalid number {value:?}"))
    })
}

impl DeviceFactory for MockBackend {
    fn make_device(&self, params: &DeviceParams) -> Box<dyn RadioDevice> {
        Box::new(MockDevice::new(
            params.clone(),
            self.script.clone(),
            self.log.clone(),
        ))
    }
}

impl InterfaceProvider for MockBackend {
    fn direct<'d>(
        &self,
        device: &'d mut dyn RadioDevice,
        tx_sps: SamplesPerSymbol,
        rx_sps: SamplesPerSymbol,
        chans: usize,
    ) -> Box<dyn RadioInterface + 'd> {
        Box::new(MockInterface::new(
            device,
            InterfaceKind::Direct,
            tx_sps,
            rx_sps,
            chans,
            self.script.clone(),
            self.log.clone(),
        ))
    }

    fn resampling<'d>(
        &self,
        device: &'d mut dyn RadioDevice,
        tx_sps: SamplesPerSymbol,
        rx_sps: SamplesPerSymbol,
    ) -> Box<dyn RadioInterface + 'd> {
        Box::new(MockInterface::new(
            device,
            InterfaceKind::Resampling,
            tx_sps,
            rx_sps,
            1,
            self.script.clone(),
            self.log.clone(),
        ))
    }

    fn multi_carrier<'d>(
        &self,
        device: &'d mut dyn RadioDevice,
        tx_sps: SamplesPerSymbol,
        rx_sps: SamplesPerSymbol,
        chans: usize,
    ) -> Box<dyn RadioInterface + 'd> {
        Box::new(MockInterface::new(
            device,
            InterfaceKind::MultiCarrier,
            tx_sps,
            rx_sps,
            chans,
            self.script.clone(),
            self.log.clone(),
        ))
    }
}

impl TransceiverProvider for MockBackend {
    fn make_transceiver<'r>(
        &self,
        params: TransceiverParams,
        radio: &'r dyn RadioInterface,
    ) -> Box<dyn Transceiver + 'r> {
        Box::new(MockTransceiver::new(
            params,
            radio,
            self.script.clone(),
            self.log.clone(),
        ))
    }
}
