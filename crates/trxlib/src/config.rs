//! Configuration Validator -- raw options in, immutable [`TrxConfig`] out.
//!
//! [`TrxOptions`] collects what the operator asked for, with the same
//! defaults the transceiver has always shipped with. [`TrxOptions::validate`]
//! normalizes and cross-checks it and either produces a [`TrxConfig`],
//! which every later stage reads by reference, or a [`ConfigError`].
//!
//! # Example
//!
//! ```
//! use trxlib::config::TrxOptions;
//!
//! let config = TrxOptions::new()
//!     .edge(true)
//!     .tx_sps(1)
//!     .validate()
//!     .unwrap();
//!
//! // EDGE forces 4 samples-per-symbol in both directions.
//! assert_eq!(config.tx_sps().get(), 4);
//! assert_eq!(config.rx_sps().get(), 4);
//! ```

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use trxlib_core::{
    DeviceParams, FillerType, InterfaceType, ReferenceClock, SamplesPerSymbol, TransceiverInit,
    TransceiverParams,
};

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Default base port for the transceiver sockets.
pub const DEFAULT_TRX_PORT: u16 = 5700;

/// Default local and remote address.
pub const DEFAULT_TRX_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Default downlink samples-per-symbol (precision modulator).
pub const DEFAULT_TX_SPS: u32 = 4;

/// Default uplink samples-per-symbol.
pub const DEFAULT_RX_SPS: u32 = 1;

/// Default number of channels.
pub const DEFAULT_CHANS: usize = 1;

/// Largest channel count the multi-ARFCN channelizer supports.
pub const MAX_MULTI_ARFCN_CHANS: usize = 5;

/// Largest training sequence code.
pub const MAX_TSC: u32 = 7;

/// Largest random access burst delay, in symbols.
pub const MAX_RACH_DELAY: u32 = 68;

/// Raw, unvalidated transceiver options.
///
/// All options have the shipped defaults, so the simplest usage is:
///
/// ```
/// let config = trxlib::config::TrxOptions::new().validate().unwrap();
/// assert_eq!(config.port(), 5700);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrxOptions {
    log_level: String,
    dev_args: String,
    local_addr: IpAddr,
    remote_addr: IpAddr,
    port: u16,
    tx_sps: u32,
    rx_sps: u32,
    chans: usize,
    tsc: u32,
    rach_delay: u32,
    ext_ref: bool,
    gps_ref: bool,
    filler: FillerType,
    multi_arfcn: bool,
    offset: f64,
    rssi_offset: f64,
    swap_channels: bool,
    edge: bool,
    sched_rr: Option<i32>,
}

impl Default for TrxOptions {
    fn default() -> Self {
        TrxOptions {
            log_level: LogLevel::default().to_string(),
            dev_args: String::new(),
            local_addr: DEFAULT_TRX_ADDR,
            remote_addr: DEFAULT_TRX_ADDR,
            port: DEFAULT_TRX_PORT,
            tx_sps: DEFAULT_TX_SPS,
            rx_sps: DEFAULT_RX_SPS,
            chans: DEFAULT_CHANS,
            tsc: 0,
            rach_delay: 0,
            ext_ref: false,
            gps_ref: false,
            filler: FillerType::Zero,
            multi_arfcn: false,
            offset: 0.0,
            rssi_offset: 0.0,
            swap_channels: false,
            edge: false,
            sched_rr: None,
        }
    }
}

impl TrxOptions {
    /// Create options with the shipped defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level by name (`NOTICE`, `DEBUG`, ...).
    pub fn log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }

    /// Set the driver-specific device argument string.
    pub fn device_args(mut self, args: &str) -> Self {
        self.dev_args = args.to_string();
        self
    }

    /// Set the address the transceiver binds to.
    pub fn local_addr(mut self, addr: IpAddr) -> Self {
        self.local_addr = addr;
        self
    }

    /// Set the address of the upper-layer GSM stack.
    pub fn remote_addr(mut self, addr: IpAddr) -> Self {
        self.remote_addr = addr;
        self
    }

    /// Set the base port number.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set transmit samples-per-symbol.
    pub fn tx_sps(mut self, sps: u32) -> Self {
        self.tx_sps = sps;
        self
    }

    /// Set receive samples-per-symbol.
    pub fn rx_sps(mut self, sps: u32) -> Self {
        self.rx_sps = sps;
        self
    }

    /// Set the number of ARFCN channels.
    pub fn chans(mut self, chans: usize) -> Self {
        self.chans = chans;
        self
    }

    /// Enable the EDGE receiver.
    pub fn edge(mut self, enabled: bool) -> Self {
        self.edge = enabled;
        self
    }

    /// Enable the multi-ARFCN transceiver.
    pub fn multi_arfcn(mut self, enabled: bool) -> Self {
        self.multi_arfcn = enabled;
        self
    }

    /// Request the external 10 MHz reference.
    pub fn external_reference(mut self, enabled: bool) -> Self {
        self.ext_ref = enabled;
        self
    }

    /// Request the GPSDO reference.
    pub fn gps_reference(mut self, enabled: bool) -> Self {
        self.gps_ref = enabled;
        self
    }

    /// Transmit dummy bursts from the C0 filler table.
    pub fn filler_table(mut self) -> Self {
        self.filler = FillerType::Dummy;
        self
    }

    /// Random normal burst test mode with training sequence `tsc`.
    pub fn normal_burst_test(mut self, tsc: u32) -> Self {
        self.tsc = tsc;
        self.filler = FillerType::NormalRandom;
        self
    }

    /// Random access burst test mode with access delay `delay`.
    pub fn access_burst_test(mut self, delay: u32) -> Self {
        self.rach_delay = delay;
        self.filler = FillerType::AccessRandom;
        self
    }

    /// Set the baseband tuning offset in hertz.
    pub fn offset(mut self, hz: f64) -> Self {
        self.offset = hz;
        self
    }

    /// Set the RSSI to dBm calibration offset in dB.
    pub fn rssi_offset(mut self, db: f64) -> Self {
        self.rssi_offset = db;
        self
    }

    /// Swap the device's channels (UmTRX).
    pub fn swap_channels(mut self, enabled: bool) -> Self {
        self.swap_channels = enabled;
        self
    }

    /// Request SCHED_RR real-time scheduling at `priority`.
    pub fn sched_rr(mut self, priority: i32) -> Self {
        self.sched_rr = Some(priority);
        self
    }

    /// Normalize and cross-check the options.
    ///
    /// Rules are applied in a fixed order, so e.g. the samples-per-symbol
    /// check sees the rates forced by EDGE or multi-ARFCN mode rather than
    /// the raw values.
    pub fn validate(mut self) -> Result<TrxConfig, ConfigError> {
        if self.multi_arfcn && self.chans > MAX_MULTI_ARFCN_CHANS {
            return Err(ConfigError::UnsupportedChannelCount(self.chans));
        }

        if self.edge || self.multi_arfcn {
            self.tx_sps = 4;
            self.rx_sps = 4;
        }

        if self.ext_ref && self.gps_ref {
            return Err(ConfigError::ConflictingReferences);
        }

        if self.edge && self.filler == FillerType::NormalRandom {
            self.filler = FillerType::EdgeRandom;
        }

        let (tx_sps, rx_sps) = match (
            SamplesPerSymbol::try_from(self.tx_sps),
            SamplesPerSymbol::try_from(self.rx_sps),
        ) {
            (Ok(tx), Ok(rx)) => (tx, rx),
            _ => {
                return Err(ConfigError::UnsupportedSps {
                    tx: self.tx_sps,
                    rx: self.rx_sps,
                })
            }
        };

        if self.tsc > MAX_TSC {
            return Err(ConfigError::InvalidTrainingSequence(self.tsc));
        }

        if self.rach_delay > MAX_RACH_DELAY {
            return Err(ConfigError::RachDelayTooLarge(self.rach_delay));
        }

        let log_level = self
            .log_level
            .parse::<LogLevel>()
            .map_err(|_| ConfigError::UnknownLogLevel(self.log_level.clone()))?;

        let reference = if self.ext_ref {
            ReferenceClock::External
        } else if self.gps_ref {
            ReferenceClock::Gps
        } else {
            ReferenceClock::Internal
        };

        Ok(TrxConfig {
            log_level,
            dev_args: self.dev_args,
            local_addr: self.local_addr,
            remote_addr: self.remote_addr,
            port: self.port,
            tx_sps,
            rx_sps,
            chans: self.chans,
            // Both bounded above by the checks just made.
            tsc: self.tsc as u8,
            rach_delay: self.rach_delay as u8,
            reference,
            filler: self.filler,
            multi_arfcn: self.multi_arfcn,
            offset: self.offset,
            rssi_offset: self.rssi_offset,
            swap_channels: self.swap_channels,
            edge: self.edge,
            sched_rr: self.sched_rr,
        })
    }
}

/// Validated, immutable transceiver configuration.
///
/// Built once at start-up by [`TrxOptions::validate`] and passed by
/// reference to every stage of the bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct TrxConfig {
    log_level: LogLevel,
    dev_args: String,
    local_addr: IpAddr,
    remote_addr: IpAddr,
    port: u16,
    tx_sps: SamplesPerSymbol,
    rx_sps: SamplesPerSymbol,
    chans: usize,
    tsc: u8,
    rach_delay: u8,
    reference: ReferenceClock,
    filler: FillerType,
    multi_arfcn: bool,
    offset: f64,
    rssi_offset: f64,
    swap_channels: bool,
    edge: bool,
    sched_rr: Option<i32>,
}

impl TrxConfig {
    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn device_args(&self) -> &str {
        &self.dev_args
    }

    pub fn local_addr(&self) -> IpAddr {
        self.local_addr
    }

    pub fn remote_addr(&self) -> IpAddr {
        self.remote_addr
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn tx_sps(&self) -> SamplesPerSymbol {
        self.tx_sps
    }

    pub fn rx_sps(&self) -> SamplesPerSymbol {
        self.rx_sps
    }

    pub fn chans(&self) -> usize {
        self.chans
    }

    pub fn tsc(&self) -> u8 {
        self.tsc
    }

    pub fn rach_delay(&self) -> u8 {
        self.rach_delay
    }

    /// The single active reference clock.
    pub fn reference(&self) -> ReferenceClock {
        self.reference
    }

    pub fn filler(&self) -> FillerType {
        self.filler
    }

    pub fn multi_arfcn(&self) -> bool {
        self.multi_arfcn
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn rssi_offset(&self) -> f64 {
        self.rssi_offset
    }

    pub fn swap_channels(&self) -> bool {
        self.swap_channels
    }

    pub fn edge(&self) -> bool {
        self.edge
    }

    /// Requested SCHED_RR priority, if any.
    pub fn sched_rr(&self) -> Option<i32> {
        self.sched_rr
    }

    /// Parameters for constructing the device.
    pub fn device_params(&self) -> DeviceParams {
        DeviceParams {
            tx_sps: self.tx_sps,
            rx_sps: self.rx_sps,
            iface_hint: if self.multi_arfcn {
                InterfaceType::MultiArfcn
            } else {
                InterfaceType::Normal
            },
            chans: self.chans,
            offset: self.offset,
        }
    }

    /// Parameters for constructing the transceiver core.
    pub fn transceiver_params(&self) -> TransceiverParams {
        TransceiverParams {
            port: self.port,
            local_addr: self.local_addr,
            remote_addr: self.remote_addr,
            tx_sps: self.tx_sps,
            rx_sps: self.rx_sps,
            chans: self.chans,
            rssi_offset: self.rssi_offset,
        }
    }

    /// Settings for initializing the transceiver core.
    pub fn transceiver_init(&self) -> TransceiverInit {
        TransceiverInit {
            filler: self.filler,
            tsc: self.tsc,
            rach_delay: self.rach_delay,
            edge: self.edge,
        }
    }
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "Enabled"
    } else {
        "Disabled"
    }
}

/// The operator-facing settings summary.
impl fmt::Display for TrxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config Settings")?;
        writeln!(f, "   Log Level............... {}", self.log_level)?;
        writeln!(f, "   Device args............. {}", self.dev_args)?;
        writeln!(f, "   TRX Base Port........... {}", self.port)?;
        writeln!(f, "   TRX Address............. {}", self.local_addr)?;
        writeln!(f, "   GSM Core Address........ {}", self.remote_addr)?;
        writeln!(f, "   Channels................ {}", self.chans)?;
        writeln!(f, "   Tx Samples-per-Symbol... {}", self.tx_sps)?;
        writeln!(f, "   Rx Samples-per-Symbol... {}", self.rx_sps)?;
        writeln!(f, "   EDGE support............ {}", enabled(self.edge))?;
        writeln!(f, "   Reference............... {}", self.reference)?;
        writeln!(f, "   C0 Filler Table......... {}", self.filler)?;
        writeln!(f, "   Multi-Carrier........... {}", enabled(self.multi_arfcn))?;
        writeln!(f, "   Tuning offset........... {}", self.offset)?;
        writeln!(f, "   RSSI to dBm offset...... {}", self.rssi_offset)?;
        write!(f, "   Swap channels........... {}", enabled(self.swap_channels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = TrxOptions::new().validate().unwrap();
        assert_eq!(config.port(), DEFAULT_TRX_PORT);
        assert_eq!(config.local_addr(), DEFAULT_TRX_ADDR);
        assert_eq!(config.remote_addr(), DEFAULT_TRX_ADDR);
        assert_eq!(config.tx_sps(), SamplesPerSymbol::FOUR);
        assert_eq!(config.rx_sps(), SamplesPerSymbol::ONE);
        assert_eq!(config.chans(), 1);
        assert_eq!(config.reference(), ReferenceClock::Internal);
        assert_eq!(config.filler(), FillerType::Zero);
        assert_eq!(config.log_level(), LogLevel::Notice);
        assert_eq!(config.sched_rr(), None);
    }

    #[test]
    fn multi_arfcn_six_channels_rejected() {
        let err = TrxOptions::new()
            .multi_arfcn(true)
            .chans(6)
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedChannelCount(6));
        assert!(err.to_string().contains("Unsupported number of channels"));
    }

    #[test]
    fn multi_arfcn_five_channels_accepted() {
        let config = TrxOptions::new()
            .multi_arfcn(true)
            .chans(5)
            .validate()
            .unwrap();
        assert_eq!(config.chans(), 5);
        assert_eq!(config.device_params().iface_hint, InterfaceType::MultiArfcn);
    }

    #[test]
    fn channel_limit_only_applies_to_multi_arfcn() {
        let config = TrxOptions::new().chans(8).validate().unwrap();
        assert_eq!(config.chans(), 8);
        assert_eq!(config.device_params().iface_hint, InterfaceType::Normal);
    }

    #[test]
    fn extended_modes_force_four_sps() {
        for options in [
            TrxOptions::new().edge(true),
            TrxOptions::new().multi_arfcn(true),
        ] {
            let config = options.tx_sps(1).rx_sps(1).validate().unwrap();
            assert_eq!(config.tx_sps(), SamplesPerSymbol::FOUR);
            assert_eq!(config.rx_sps(), SamplesPerSymbol::FOUR);
        }
    }

    #[test]
    fn forced_sps_overrides_invalid_raw_values() {
        let config = TrxOptions::new().edge(true).tx_sps(3).validate().unwrap();
        assert_eq!(config.tx_sps(), SamplesPerSymbol::FOUR);
    }

    #[test]
    fn conflicting_references_rejected() {
        let err = TrxOptions::new()
            .external_reference(true)
            .gps_reference(true)
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::ConflictingReferences);
    }

    #[test]
    fn single_reference_selected() {
        let ext = TrxOptions::new().external_reference(true).validate().unwrap();
        assert_eq!(ext.reference(), ReferenceClock::External);
        let gps = TrxOptions::new().gps_reference(true).validate().unwrap();
        assert_eq!(gps.reference(), ReferenceClock::Gps);
    }

    #[test]
    fn channel_count_checked_before_references() {
        let err = TrxOptions::new()
            .multi_arfcn(true)
            .chans(9)
            .external_reference(true)
            .gps_reference(true)
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedChannelCount(9));
    }

    #[test]
    fn edge_upgrades_normal_burst_filler() {
        let config = TrxOptions::new()
            .edge(true)
            .normal_burst_test(3)
            .validate()
            .unwrap();
        assert_eq!(config.filler(), FillerType::EdgeRandom);
        assert_eq!(config.tsc(), 3);
    }

    #[test]
    fn edge_leaves_other_fillers_alone() {
        let config = TrxOptions::new()
            .edge(true)
            .access_burst_test(10)
            .validate()
            .unwrap();
        assert_eq!(config.filler(), FillerType::AccessRandom);

        let config = TrxOptions::new().normal_burst_test(2).validate().unwrap();
        assert_eq!(config.filler(), FillerType::NormalRandom);
    }

    #[test]
    fn sps_rejected_when_either_direction_invalid() {
        assert_eq!(
            TrxOptions::new().tx_sps(2).rx_sps(1).validate().unwrap_err(),
            ConfigError::UnsupportedSps { tx: 2, rx: 1 }
        );
        assert_eq!(
            TrxOptions::new().tx_sps(4).rx_sps(8).validate().unwrap_err(),
            ConfigError::UnsupportedSps { tx: 4, rx: 8 }
        );
        assert!(TrxOptions::new().tx_sps(1).rx_sps(4).validate().is_ok());
    }

    #[test]
    fn training_sequence_bounds() {
        assert!(TrxOptions::new().normal_burst_test(7).validate().is_ok());
        for tsc in [8, 9, 100, u32::MAX] {
            assert_eq!(
                TrxOptions::new().normal_burst_test(tsc).validate().unwrap_err(),
                ConfigError::InvalidTrainingSequence(tsc)
            );
        }
    }

    #[test]
    fn rach_delay_bounds() {
        assert!(TrxOptions::new().access_burst_test(68).validate().is_ok());
        for delay in [69, 70, 255, u32::MAX] {
            assert_eq!(
                TrxOptions::new().access_burst_test(delay).validate().unwrap_err(),
                ConfigError::RachDelayTooLarge(delay)
            );
        }
    }

    #[test]
    fn unknown_log_level_rejected() {
        assert_eq!(
            TrxOptions::new().log_level("LOUD").validate().unwrap_err(),
            ConfigError::UnknownLogLevel("LOUD".into())
        );
        let config = TrxOptions::new().log_level("debug").validate().unwrap();
        assert_eq!(config.log_level(), LogLevel::Debug);
    }

    #[test]
    fn derived_parameters_follow_config() {
        let config = TrxOptions::new()
            .port(6700)
            .chans(2)
            .rssi_offset(-3.5)
            .offset(125.0)
            .access_burst_test(12)
            .validate()
            .unwrap();

        let dev = config.device_params();
        assert_eq!(dev.chans, 2);
        assert_eq!(dev.offset, 125.0);

        let trx = config.transceiver_params();
        assert_eq!(trx.port, 6700);
        assert_eq!(trx.chans, 2);
        assert_eq!(trx.rssi_offset, -3.5);

        let init = config.transceiver_init();
        assert_eq!(init.filler, FillerType::AccessRandom);
        assert_eq!(init.rach_delay, 12);
        assert!(!init.edge);
    }

    #[test]
    fn summary_lists_settings() {
        let summary = TrxOptions::new()
            .gps_reference(true)
            .filler_table()
            .validate()
            .unwrap()
            .to_string();
        assert!(summary.starts_with("Config Settings"));
        assert!(summary.contains("Reference............... GPS"));
        assert!(summary.contains("C0 Filler Table......... Dummy bursts"));
        assert!(summary.contains("EDGE support............ Disabled"));
        assert!(summary.contains("TRX Base Port........... 5700"));
    }
}
