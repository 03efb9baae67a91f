//! trxlib-core: Collaborator traits, types, and error definitions for trxlib.
//!
//! The bootstrap in `trxlib` assembles a chain of three collaborators:
//! a physical device, a radio interface that adapts the device's sample
//! stream, and a transceiver core that runs the GSM burst processing. This
//! crate defines what the bootstrap requires of each without pulling in any
//! specific driver or DSP implementation.
//!
//! # Key types
//!
//! - [`RadioDevice`] / [`DeviceFactory`] -- the hardware and its negotiation
//! - [`RadioInterface`] / [`InterfaceProvider`] -- the interface variants
//! - [`Transceiver`] / [`TransceiverProvider`] -- the processing core
//! - [`VectorFifo`] -- per-channel receive queues
//! - [`Error`] / [`Result`] -- error handling

pub mod device;
pub mod error;
pub mod fifo;
pub mod interface;
pub mod transceiver;
pub mod types;

pub use device::{DeviceFactory, DeviceParams, RadioDevice};
pub use error::{Error, Result};
pub use fifo::{FifoHandle, RadioVector, VectorFifo, DEFAULT_FIFO_DEPTH};
pub use interface::{InterfaceProvider, RadioInterface};
pub use transceiver::{Transceiver, TransceiverInit, TransceiverParams, TransceiverProvider};
pub use types::*;
