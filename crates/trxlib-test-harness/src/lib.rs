//! trxlib-test-harness: Mock collaborators and an event recorder for trxlib.
//!
//! This crate provides [`MockBackend`], which implements every provider
//! trait from `trxlib-core` with scriptable failures, and [`EventLog`],
//! which records construction, attachment, and release in order. Together
//! they let the bootstrap be tested end to end without radio hardware.

pub mod mock_backend;
pub mod mock_device;
pub mod mock_radio;
pub mod recorder;

pub use mock_backend::{MockBackend, MockScript};
pub use mock_device::MockDevice;
pub use mock_radio::{MockInterface, MockTransceiver};
pub use recorder::{EventLog, InterfaceKind, PipelineEvent};
