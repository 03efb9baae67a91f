//! Error types for trxlib collaborators.
//!
//! Device drivers, radio interfaces, and transceiver cores all report
//! failures through [`Error`]. The bootstrap layer in `trxlib` wraps these
//! in its own stage-specific error so the operator sees which step failed.

/// The error type reported by device, interface, and transceiver collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The device driver could not open or configure the hardware.
    #[error("device error: {0}")]
    Device(String),

    /// The radio interface failed (resampler setup, channelizer, buffers).
    #[error("radio interface error: {0}")]
    Interface(String),

    /// The transceiver core failed (socket setup, burst tables).
    #[error("transceiver error: {0}")]
    Transceiver(String),

    /// A receive FIFO was written after its consumer went away.
    #[error("FIFO closed")]
    FifoClosed,

    /// A receive FIFO was at capacity and the vector was dropped.
    #[error("FIFO full")]
    FifoFull,

    /// An invalid parameter was passed to a collaborator.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
