//! Bounded, thread-safe FIFO with blocking dequeue and cancellation.
//! Used for both the inbound and outbound queues.
//!
//! Built on `crossbeam-channel`. Cancellation is a second, zero-capacity
//! channel selected against alongside the data channel: closing it (via
//! [`MessageQueue::cancel`]) wakes every thread blocked in `dequeue` or a
//! full `enqueue` with `QueueError::Cancelled`, without polling.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue was cancelled")]
    Cancelled,
}

/// A multi-producer / multi-consumer safe FIFO. `dequeue` blocks until a
/// message arrives or the queue is cancelled.
pub struct MessageQueue<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
    cancel_tx: Arc<Mutex<Option<Sender<()>>>>,
    cancel_rx: Receiver<()>,
}

impl<T> Clone for MessageQueue<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            cancel_tx: self.cancel_tx.clone(),
            cancel_rx: self.cancel_rx.clone(),
        }
    }
}

impl<T> MessageQueue<T> {
    /// `capacity` of `0` creates an unbounded queue (matching
    /// `crossbeam_channel::unbounded`'s semantics), any other value a
    /// bounded one whose `enqueue` blocks when full.
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = if capacity == 0 {
            crossbeam_channel::unbounded()
        } else {
            crossbeam_channel::bounded(capacity)
        };
        let (cancel_tx, cancel_rx) = crossbeam_channel::bounded(0);
        Self {
            sender,
            receiver,
            cancel_tx: Arc::new(Mutex::new(Some(cancel_tx))),
            cancel_rx,
        }
    }

    /// Blocks iff the queue is bounded and full; unblocks early on
    /// cancellation.
    pub fn enqueue(&self, message: T) -> Result<(), QueueError> {
        crossbeam_channel::select! {
            send(self.sender, message) -> result => result.map_err(|_| QueueError::Cancelled),
            recv(self.cancel_rx) -> _ => Err(QueueError::Cancelled),
        }
    }

    /// Blocks until a message arrives or the queue is cancelled.
    pub fn dequeue(&self) -> Result<T, QueueError> {
        crossbeam_channel::select! {
            recv(self.receiver) -> message => message.map_err(|_| QueueError::Cancelled),
            recv(self.cancel_rx) -> _ => Err(QueueError::Cancelled),
        }
    }

    /// Wakes every thread blocked in `enqueue`/`dequeue` on this queue (and
    /// any of its clones) with `QueueError::Cancelled`. Idempotent.
    pub fn cancel(&self) {
        self.cancel_tx.lock().take();
    }

    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod test {
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn fifo_order() {
        let queue = MessageQueue::new(0);
        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();
        queue.enqueue(3).unwrap();
        assert_eq!(queue.dequeue().unwrap(), 1);
        assert_eq!(queue.dequeue().unwrap(), 2);
        assert_eq!(queue.dequeue().unwrap(), 3);
    }

    #[test]
    fn dequeue_blocks_until_enqueue() {
        let queue: MessageQueue<i32> = MessageQueue::new(0);
        let producer = queue.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            producer.enqueue(42).unwrap();
        });
        assert_eq!(queue.dequeue().unwrap(), 42);
        handle.join().unwrap();
    }

    #[test]
    fn cancel_wakes_blocked_dequeue() {
        let queue: MessageQueue<i32> = MessageQueue::new(0);
        let canceler = queue.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            canceler.cancel();
        });
        assert_eq!(queue.dequeue(), Err(QueueError::Cancelled));
        handle.join().unwrap();
    }

    #[test]
    fn cancel_wakes_blocked_enqueue_on_full_queue() {
        let queue: MessageQueue<i32> = MessageQueue::new(1);
        queue.enqueue(1).unwrap();
        let canceler = queue.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            canceler.cancel();
        });
        assert_eq!(queue.enqueue(2), Err(QueueError::Cancelled));
        handle.join().unwrap();
    }
}
