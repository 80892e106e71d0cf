//! Bounded queue of units awaiting dispatch.
//!
//! One queue carries both fresh arrivals and retries. Producers choose the
//! backpressure behaviour per call: [`UnitQueue::enqueue`] waits for space,
//! [`UnitQueue::try_enqueue`] fails immediately when full. Closing the queue
//! wakes every blocked producer and consumer.

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch, Mutex};

use crate::core::unit::Unit;
use crate::core::AirfieldError;

/// Bounded multi-producer, multi-consumer unit buffer.
#[derive(Debug)]
pub struct UnitQueue {
    tx: mpsc::Sender<Unit>,
    rx: Mutex<mpsc::Receiver<Unit>>,
    closed: watch::Sender<bool>,
}

impl UnitQueue {
    /// Create a queue holding at most `capacity` units (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let (closed, _) = watch::channel(false);
        Self {
            tx,
            rx: Mutex::new(rx),
            closed,
        }
    }

    /// Enqueue, waiting for space if the queue is full.
    ///
    /// # Errors
    ///
    /// [`AirfieldError::QueueClosed`] if the queue is or becomes closed.
    pub async fn enqueue(&self, unit: Unit) -> Result<(), AirfieldError> {
        if self.is_closed() {
            return Err(AirfieldError::QueueClosed);
        }
        self.tx
            .send(unit)
            .await
            .map_err(|_| AirfieldError::QueueClosed)
    }

    /// Enqueue only if there is space right now.
    ///
    /// # Errors
    ///
    /// [`AirfieldError::QueueOverflow`] when full,
    /// [`AirfieldError::QueueClosed`] when closed.
    pub fn try_enqueue(&self, unit: Unit) -> Result<(), AirfieldError> {
        if self.is_closed() {
            return Err(AirfieldError::QueueClosed);
        }
        match self.tx.try_send(unit) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(AirfieldError::QueueOverflow),
            Err(TrySendError::Closed(_)) => Err(AirfieldError::QueueClosed),
        }
    }

    /// Take the next unit, waiting while the queue is empty.
    ///
    /// Returns `None` once the queue is closed.
    pub async fn dequeue(&self) -> Option<Unit> {
        let mut closed = self.closed.subscribe();
        if *closed.borrow() {
            return None;
        }
        let mut rx = self.rx.lock().await;
        tokio::select! {
            biased;
            _ = closed.wait_for(|closed| *closed) => None,
            unit = rx.recv() => unit,
        }
    }

    /// Close the queue. Units still buffered are discarded with it.
    pub async fn close(&self) {
        self.closed.send_replace(true);
        self.rx.lock().await.close();
    }

    /// Whether [`UnitQueue::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Maximum number of buffered units.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Units currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// True if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
