//! The bootstrap driver: validated config in, running pipeline, clean exit.
//!
//! Stages run strictly in order -- start-up (priority, signals), device
//! negotiation, interface construction, core assembly, wait -- and each
//! nested scope owns one component. The core borrows the interface, which
//! borrows the device, so whichever stage stops the run, components are
//! released core, then interface, then device.

use std::process::ExitCode;

use tracing::info;

use trxlib_core::{DeviceFactory, InterfaceProvider, RadioDevice, RadioInterface, TransceiverProvider};

use crate::assemble::assemble;
use crate::config::TrxConfig;
use crate::cpu;
use crate::error::BootstrapError;
use crate::lifecycle::Lifecycle;
use crate::negotiate::{make_device, negotiate};
use crate::radio::build_interface;

/// Everything the bootstrap needs from a driver stack.
pub trait Backend: DeviceFactory + InterfaceProvider + TransceiverProvider {}
impl<T: DeviceFactory + InterfaceProvider + TransceiverProvider + ?Sized> Backend for T {}

/// Bring the pipeline up, run until shutdown is requested, tear it down.
///
/// Returns `Ok(())` after a requested shutdown. Any bootstrap failure is
/// returned after whatever had been constructed has been released.
pub async fn run<B: Backend + ?Sized>(
    config: &TrxConfig,
    backend: &B,
    lifecycle: &mut Lifecycle,
) -> Result<(), BootstrapError> {
    lifecycle.start(config.sched_rr())?;

    cpu::log_simd_support();
    info!("{config}");

    let mut device = make_device(backend, config);
    let result = run_device(config, backend, device.as_mut(), lifecycle).await;

    lifecycle.begin_shutdown();
    drop(device);
    lifecycle.stop();
    result
}

async fn run_device<B: Backend + ?Sized>(
    config: &TrxConfig,
    backend: &B,
    device: &mut dyn RadioDevice,
    lifecycle: &mut Lifecycle,
) -> Result<(), BootstrapError> {
    let capability = negotiate(device, config).await?;
    let radio = build_interface(backend, device, capability, config).await?;

    let result = run_radio(config, backend, radio.as_ref(), lifecycle).await;

    lifecycle.begin_shutdown();
    drop(radio);
    result
}

async fn run_radio<B: Backend + ?Sized>(
    config: &TrxConfig,
    backend: &B,
    radio: &dyn RadioInterface,
    lifecycle: &mut Lifecycle,
) -> Result<(), BootstrapError> {
    let trx = assemble(backend, config, radio).await?;

    lifecycle.enter_running(trx.num_chans());
    lifecycle.wait_for_shutdown().await;

    lifecycle.begin_shutdown();
    drop(trx);
    Ok(())
}

/// Map a bootstrap outcome to the process exit code.
///
/// Every failure collapses to the same code; the logged text says which
/// stage failed.
pub fn exit_code(result: &Result<(), BootstrapError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
