//! Per-channel receive FIFOs between the radio interface and the core.
//!
//! The radio interface pushes demultiplexed, resampled [`RadioVector`]s
//! into one [`VectorFifo`] per logical channel; the transceiver core drains
//! them to run burst detection. The interface creates and owns each FIFO.
//! A core attaches to a FIFO by holding a clone of its [`FifoHandle`].
//!
//! # Channel-based queueing
//!
//! Vectors flow through a bounded [`tokio::sync::mpsc`] channel. When the
//! consumer falls behind, [`VectorFifo::try_write`] reports
//! [`Error::FifoFull`] and the producer drops the vector rather than
//! accumulating unbounded memory.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::error::{Error, Result};

/// Default FIFO depth in vectors.
pub const DEFAULT_FIFO_DEPTH: usize = 64;

/// A block of received baseband samples.
///
/// Samples are interleaved I/Q `f32` pairs:
///
/// ```text
/// [I0, Q0, I1, Q1, ...]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RadioVector {
    /// Sample clock timestamp of the first sample.
    pub timestamp: u64,

    /// Interleaved I/Q samples.
    pub samples: Vec<f32>,
}

impl RadioVector {
    /// Create a new `RadioVector`.
    pub fn new(timestamp: u64, samples: Vec<f32>) -> Self {
        RadioVector { timestamp, samples }
    }

    /// Number of complex samples (I/Q pairs) in this vector.
    pub fn len(&self) -> usize {
        self.samples.len() / 2
    }

    /// Check whether this vector contains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.len() < 2
    }
}

/// Shared handle to a channel's receive FIFO.
pub type FifoHandle = Arc<VectorFifo>;

/// Bounded receive queue for one logical channel.
#[derive(Debug)]
pub struct VectorFifo {
    channel: usize,
    tx: mpsc::Sender<RadioVector>,
    rx: Mutex<mpsc::Receiver<RadioVector>>,
}

impl VectorFifo {
    /// Create a FIFO for `channel` holding at most `depth` vectors.
    ///
    /// A depth of zero is treated as one.
    pub fn new(channel: usize, depth: usize) -> FifoHandle {
        let (tx, rx) = mpsc::channel(depth.max(1));
        Arc::new(VectorFifo {
            channel,
            tx,
            rx: Mutex::new(rx),
        })
    }

    /// Logical channel index this FIFO carries.
    pub fn channel(&self) -> usize {
        self.channel
    }

    /// Push a vector without waiting.
    ///
    /// Returns [`Error::FifoFull`] when the consumer has fallen behind.
    pub fn try_write(&self, vector: RadioVector) -> Result<()> {
        self.tx.try_send(vector).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => Error::FifoFull,
            mpsc::error::TrySendError::Closed(_) => Error::FifoClosed,
        })
    }

    /// Wait for the next vector.
    ///
    /// The FIFO holds its own sender, so this only returns `None` if the
    /// channel has been torn down underneath it.
    pub async fn read(&self) -> Option<RadioVector> {
        self.rx.lock().await.recv().await
    }

    /// Take the next vector if one is queued and no other reader is active.
    pub fn try_read(&self) -> Option<RadioVector> {
        self.rx.try_lock().ok()?.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radio_vector_counts_iq_pairs() {
        let v = RadioVector::new(0, vec![0.1, -0.1, 0.2, -0.2]);
        assert_eq!(v.len(), 2);
        assert!(!v.is_empty());
        assert!(RadioVector::new(0, Vec::new()).is_empty());
    }

    #[tokio::test]
    async fn fifo_preserves_order() {
        let fifo = VectorFifo::new(0, 4);
        fifo.try_write(RadioVector::new(10, vec![1.0, 0.0])).unwrap();
        fifo.try_write(RadioVector::new(20, vec![0.0, 1.0])).unwrap();

        assert_eq!(fifo.read().await.unwrap().timestamp, 10);
        assert_eq!(fifo.read().await.unwrap().timestamp, 20);
        assert!(fifo.try_read().is_none());
    }

    #[test]
    fn fifo_reports_full() {
        let fifo = VectorFifo::new(3, 1);
        assert_eq!(fifo.channel(), 3);
        fifo.try_write(RadioVector::new(0, vec![0.0, 0.0])).unwrap();
        let err = fifo.try_write(RadioVector::new(1, vec![0.0, 0.0])).unwrap_err();
        assert!(matches!(err, Error::FifoFull));
    }

    #[test]
    fn shared_handle_sees_same_queue() {
        let fifo = VectorFifo::new(1, 2);
        let attached = Arc::clone(&fifo);
        fifo.try_write(RadioVector::new(7, vec![0.5, 0.5])).unwrap();
        assert_eq!(attached.try_read().unwrap().timestamp, 7);
    }
}
