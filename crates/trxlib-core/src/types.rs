//! Core types used throughout trxlib.
//!
//! These types describe what the bootstrap negotiates with the hardware:
//! sample rates expressed in samples-per-symbol, the reference clock, the
//! C0 filler policy, and the radio interface topology reported by the
//! device once it has been opened.

use std::fmt;

/// Samples per GSM symbol on one direction of the radio path.
///
/// Only two rates are supported: 1 sps (minimized modulator, less
/// computation) and 4 sps (precision modulator, required for EDGE and
/// multi-ARFCN operation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplesPerSymbol(u32);

impl SamplesPerSymbol {
    /// One sample per symbol.
    pub const ONE: SamplesPerSymbol = SamplesPerSymbol(1);

    /// Four samples per symbol.
    pub const FOUR: SamplesPerSymbol = SamplesPerSymbol(4);

    /// Return the raw sample count.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for SamplesPerSymbol {
    type Error = u32;

    /// Accept 1 or 4; any other value is returned unchanged as the error.
    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(SamplesPerSymbol::ONE),
            4 => Ok(SamplesPerSymbol::FOUR),
            other => Err(other),
        }
    }
}

impl fmt::Display for SamplesPerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Frequency reference used to discipline the device clock.
///
/// Exactly one reference is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReferenceClock {
    /// The device's own oscillator.
    #[default]
    Internal,
    /// An external 10 MHz reference input.
    External,
    /// A GPS-disciplined oscillator.
    Gps,
}

impl fmt::Display for ReferenceClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReferenceClock::Internal => "Internal",
            ReferenceClock::External => "External",
            ReferenceClock::Gps => "GPS",
        };
        write!(f, "{s}")
    }
}

/// What the transceiver transmits on idle C0 timeslots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillerType {
    /// Dummy bursts from the C0 filler table.
    Dummy,
    /// Nothing (filler table disabled).
    #[default]
    Zero,
    /// GMSK normal bursts with random payload (test mode).
    NormalRandom,
    /// 8-PSK EDGE bursts with random payload (test mode).
    EdgeRandom,
    /// Access bursts with random payload (test mode).
    AccessRandom,
}

impl fmt::Display for FillerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FillerType::Dummy => "Dummy bursts",
            FillerType::Zero => "Disabled",
            FillerType::NormalRandom => "Normal bursts with random payload",
            FillerType::EdgeRandom => "EDGE bursts with random payload",
            FillerType::AccessRandom => "Access bursts with random payload",
        };
        write!(f, "{s}")
    }
}

/// Raw interface capability code reported by a device driver after open.
///
/// The code is whatever the driver's firmware negotiation produced. It is
/// only meaningful once converted into an [`InterfaceType`], which fails
/// for codes this build does not know how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapabilityCode(pub u32);

impl fmt::Display for CapabilityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Radio interface topology required by the opened device.
///
/// Not knowable from configuration alone: the device reports it once the
/// hardware and firmware have been negotiated. It decides which radio
/// interface variant may be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceType {
    /// Device runs at a multiple of the GSM symbol rate; no resampling.
    Normal,
    /// Device clock fixed at 64 MHz; resampling interface required.
    Resamp64M,
    /// Device clock fixed at 100 MHz; resampling interface required.
    Resamp100M,
    /// Wideband device carrying several ARFCNs; channelizer required.
    MultiArfcn,
}

impl InterfaceType {
    /// Return the wire code drivers use for this interface type.
    pub fn code(&self) -> CapabilityCode {
        let raw = match self {
            InterfaceType::Normal => 0,
            InterfaceType::Resamp64M => 1,
            InterfaceType::Resamp100M => 2,
            InterfaceType::MultiArfcn => 3,
        };
        CapabilityCode(raw)
    }
}

impl TryFrom<CapabilityCode> for InterfaceType {
    type Error = CapabilityCode;

    fn try_from(code: CapabilityCode) -> std::result::Result<Self, Self::Error> {
        match code.0 {
            0 => Ok(InterfaceType::Normal),
            1 => Ok(InterfaceType::Resamp64M),
            2 => Ok(InterfaceType::Resamp100M),
            3 => Ok(InterfaceType::MultiArfcn),
            _ => Err(code),
        }
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InterfaceType::Normal => "normal",
            InterfaceType::Resamp64M => "resampled (64 MHz)",
            InterfaceType::Resamp100M => "resampled (100 MHz)",
            InterfaceType::MultiArfcn => "multi-ARFCN",
        };
        write!(f, "{s}")
    }
}
