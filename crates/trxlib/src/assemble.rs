//! Pipeline Assembler -- build the transceiver core and attach its FIFOs.
//!
//! Assembly is all-or-nothing. If the core fails to initialize, or any
//! channel's receive FIFO is missing or refused, the core is dropped
//! before the error is returned, so no core holding a partial set of
//! channels ever survives. The interface and device the core was bound to
//! stay with the caller, which releases them in order.

use tracing::{debug, error};

use trxlib_core::{RadioInterface, Transceiver, TransceiverProvider};

use crate::config::TrxConfig;
use crate::error::BootstrapError;

/// Construct, initialize, and wire up the transceiver core.
pub async fn assemble<'r, P: TransceiverProvider + ?Sized>(
    provider: &P,
    config: &TrxConfig,
    radio: &'r dyn RadioInterface,
) -> Result<Box<dyn Transceiver + 'r>, BootstrapError> {
    let mut trx = provider.make_transceiver(config.transceiver_params(), radio);

    if let Err(e) = trx.init(config.transceiver_init()).await {
        error!("Failed to initialize transceiver: {e}");
        drop(trx);
        return Err(BootstrapError::TransceiverInit(e));
    }

    for chan in 0..config.chans() {
        let failure = match radio.receive_fifo(chan) {
            Some(fifo) => match trx.attach_fifo(fifo, chan) {
                Ok(()) => {
                    debug!(chan, "receive FIFO attached");
                    continue;
                }
                Err(source) => BootstrapError::AttachFailed {
                    channel: chan,
                    source,
                },
            },
            None => BootstrapError::MissingFifo { channel: chan },
        };

        error!("Could not attach FIFO to channel {chan}");
        drop(trx);
        return Err(failure);
    }

    Ok(trx)
}
