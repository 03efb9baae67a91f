//! Error types for the bootstrap.
//!
//! Configuration problems and bootstrap failures are kept apart because
//! they end the process differently: a [`ConfigError`] is an operator
//! mistake answered with usage text and a clean exit, while every
//! [`BootstrapError`] is fatal and exits with the failure code.

use trxlib_core::{CapabilityCode, Error};

/// A rejected configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Multi-ARFCN mode supports at most five channels.
    #[error("Unsupported number of channels {0}")]
    UnsupportedChannelCount(usize),

    /// External and GPS references were both requested.
    #[error("External and GPSDO references unavailable at the same time")]
    ConflictingReferences,

    /// Samples-per-symbol must be 1 or 4 in each direction.
    #[error("Unsupported samples-per-symbol (tx {tx}, rx {rx})")]
    UnsupportedSps { tx: u32, rx: u32 },

    /// Training sequence codes run from 0 to 7.
    #[error("Invalid training sequence {0}")]
    InvalidTrainingSequence(u32),

    /// Access delay is limited to 68 symbols.
    #[error("RACH delay is too big {0}")]
    RachDelayTooLarge(u32),

    /// The log level name is not recognized.
    #[error("Unknown log level {0:?}")]
    UnknownLogLevel(String),
}

/// A fatal failure while bringing the transceiver up.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The real-time scheduling request was refused.
    #[error("Setting SCHED_RR priority {priority} failed: {source}")]
    Scheduling {
        priority: i32,
        #[source]
        source: std::io::Error,
    },

    /// A shutdown signal handler could not be installed.
    #[error("Failed to install {signal} signal handler: {source}")]
    SignalHandler {
        signal: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The device could not be opened.
    #[error("Failed to create radio device: {0}")]
    Negotiation(#[source] Error),

    /// The device reported a capability code with no interface variant.
    #[error("Unsupported radio interface configuration (type code {0})")]
    UnsupportedInterface(CapabilityCode),

    /// The radio interface failed to initialize.
    #[error("Failed to initialize radio interface: {0}")]
    InterfaceInit(#[source] Error),

    /// The transceiver core failed to initialize.
    #[error("Failed to initialize transceiver: {0}")]
    TransceiverInit(#[source] Error),

    /// The interface has no receive FIFO for a channel.
    #[error("Could not attach FIFO to channel {channel}: no receive FIFO")]
    MissingFifo { channel: usize },

    /// The core refused a channel's receive FIFO.
    #[error("Could not attach FIFO to channel {channel}: {source}")]
    AttachFailed {
        channel: usize,
        #[source]
        source: Error,
    },
}

impl BootstrapError {
    /// The channel whose attachment failed, if this is an attachment error.
    pub fn channel(&self) -> Option<usize> {
        match self {
            BootstrapError::MissingFifo { channel }
            | BootstrapError::AttachFailed { channel, .. } => Some(*channel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages() {
        assert_eq!(
            ConfigError::UnsupportedChannelCount(6).to_string(),
            "Unsupported number of channels 6"
        );
        assert_eq!(
            ConfigError::ConflictingReferences.to_string(),
            "External and GPSDO references unavailable at the same time"
        );
        assert_eq!(
            ConfigError::RachDelayTooLarge(69).to_string(),
            "RACH delay is too big 69"
        );
    }

    #[test]
    fn bootstrap_error_messages() {
        let e = BootstrapError::UnsupportedInterface(CapabilityCode(9));
        assert_eq!(
            e.to_string(),
            "Unsupported radio interface configuration (type code 9)"
        );

        let e = BootstrapError::MissingFifo { channel: 1 };
        assert_eq!(
            e.to_string(),
            "Could not attach FIFO to channel 1: no receive FIFO"
        );
    }

    #[test]
    fn channel_is_reported_for_attach_errors() {
        assert_eq!(BootstrapError::MissingFifo { channel: 2 }.channel(), Some(2));
        let e = BootstrapError::AttachFailed {
            channel: 0,
            source: Error::Transceiver("busy".into()),
        };
        assert_eq!(e.channel(), Some(0));
        assert_eq!(
            BootstrapError::Negotiation(Error::Device("gone".into())).channel(),
            None
        );
    }
}
