//! # trxlib -- Bootstrap for a Multi-Channel GSM Transceiver
//!
//! `trxlib` turns a set of command-line style options into a running
//! transceiver pipeline. It validates the configuration, negotiates with the
//! radio hardware, picks the radio interface variant the hardware supports,
//! assembles the transceiver core with one receive FIFO per channel, and
//! then waits for SIGINT or SIGTERM before tearing everything down in
//! reverse order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use trxlib::{Lifecycle, ShutdownFlag, TrxOptions};
//! use trxlib_test_harness::MockBackend;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = TrxOptions::new().chans(2).validate()?;
//!     let backend = MockBackend::new();
//!     let mut lifecycle = Lifecycle::new(ShutdownFlag::new());
//!
//!     trxlib::run(&config, &backend, &mut lifecycle).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! | Crate                 | Purpose                                         |
//! |-----------------------|-------------------------------------------------|
//! | `trxlib-core`         | Collaborator traits, FIFOs, shared types, errors |
//! | `trxlib-test-harness` | Scriptable mock backend and event recorder      |
//! | **`trxlib`**          | Config, negotiation, assembly, lifecycle        |
//!
//! The pipeline is a chain of borrows: the transceiver core borrows the
//! radio interface, which borrows the device. Release order on shutdown or
//! on any bootstrap failure is therefore fixed by scope, core first.
//!
//! ## Stages
//!
//! 1. [`config`] -- [`TrxOptions::validate`] applies the option rules and
//!    derives the reference clock.
//! 2. [`lifecycle`] -- optional SCHED_RR priority, signal handlers.
//! 3. [`negotiate`] -- construct and open the device, read its capability.
//! 4. [`radio`] -- map the capability to an interface variant and build it.
//! 5. [`assemble`] -- build the core and attach every channel's FIFO.
//! 6. [`bootstrap`] -- drive the above, wait, and shut down.

pub mod assemble;
pub mod bootstrap;
pub mod config;
pub mod cpu;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod negotiate;
pub mod radio;

pub use trxlib_core::*;

pub use bootstrap::{exit_code, run, Backend};
pub use config::{TrxConfig, TrxOptions};
pub use error::{BootstrapError, ConfigError};
pub use lifecycle::{Lifecycle, LifecycleState, ShutdownFlag};
pub use logging::LogLevel;
