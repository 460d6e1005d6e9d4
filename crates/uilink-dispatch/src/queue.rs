use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};
use serde::Serialize;
use tracing::{debug, warn};
use uilink_frame::DecodedCommand;

use crate::error::{DispatchError, Result};

// Overflow warnings after the first one are rate limited to one per this many drops.
const DROP_WARN_EVERY: u64 = 1024;

#[derive(Debug, Default)]
struct DispatchStats {
    enqueued: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time queue counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSnapshot {
    /// Commands accepted into the queue.
    pub enqueued: u64,
    /// Commands dropped because the queue was full.
    pub dropped: u64,
}

impl DispatchStats {
    fn snapshot(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Producer half, owned by the polling loop.
pub struct Dispatcher {
    producer: Producer<DecodedCommand>,
    stats: Arc<DispatchStats>,
    capacity: usize,
}

/// Consumer half, owned by the presentation backend.
pub struct CommandQueue {
    consumer: Consumer<DecodedCommand>,
    stats: Arc<DispatchStats>,
    capacity: usize,
}

/// Create a bounded command queue holding up to `capacity` commands.
pub fn command_queue(capacity: usize) -> Result<(Dispatcher, CommandQueue)> {
    if capacity == 0 {
        return Err(DispatchError::InvalidCapacity);
    }

    let (producer, consumer) = RingBuffer::new(capacity);
    let stats = Arc::new(DispatchStats::default());

    Ok((
        Dispatcher {
            producer,
            stats: Arc::clone(&stats),
            capacity,
        },
        CommandQueue {
            consumer,
            stats,
            capacity,
        },
    ))
}

impl Dispatcher {
    /// Hand a command to the consumer without blocking.
    ///
    /// Returns `false` when the queue was full; the command is dropped and counted.
    pub fn enqueue(&mut self, command: DecodedCommand) -> bool {
        match self.producer.push(command) {
            Ok(()) => {
                self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                let dropped = self.stats.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                if dropped == 1 || dropped % DROP_WARN_EVERY == 0 {
                    warn!(
                        dropped,
                        capacity = self.capacity,
                        "command queue full, dropping newest command"
                    );
                } else {
                    debug!(kind = %command.kind(), dropped, "command dropped");
                }
                false
            }
        }
    }

    /// True when the consumer half has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.producer.is_abandoned()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> DispatchSnapshot {
        self.stats.snapshot()
    }
}

impl CommandQueue {
    /// Take the oldest queued command, if any, without blocking.
    pub fn try_dequeue(&mut self) -> Option<DecodedCommand> {
        self.consumer.pop().ok()
    }

    /// Take every command queued right now, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = DecodedCommand> + '_ {
        std::iter::from_fn(move || self.try_dequeue())
    }

    /// Number of commands waiting.
    pub fn len(&self) -> usize {
        self.consumer.slots()
    }

    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when the producer half (the polling loop) has gone away.
    pub fn is_abandoned(&self) -> bool {
        self.consumer.is_abandoned()
    }

    pub fn stats(&self) -> DispatchSnapshot {
        self.stats.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use uilink_frame::{PlaySound, PrintChar};

    use super::*;

    fn print(col: u8) -> DecodedCommand {
        DecodedCommand::PrintChar(PrintChar {
            ascii: b'A',
            row: 0,
            col,
        })
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            command_queue(0),
            Err(DispatchError::InvalidCapacity)
        ));
    }

    #[test]
    fn commands_come_out_in_order() {
        let (mut tx, mut rx) = command_queue(4).unwrap();
        assert!(rx.try_dequeue().is_none());

        assert!(tx.enqueue(print(1)));
        assert!(tx.enqueue(DecodedCommand::Boot));
        assert_eq!(rx.len(), 2);

        assert_eq!(rx.try_dequeue(), Some(print(1)));
        assert_eq!(rx.try_dequeue(), Some(DecodedCommand::Boot));
        assert!(rx.is_empty());
    }

    #[test]
    fn full_queue_drops_newest_and_counts() {
        let (mut tx, mut rx) = command_queue(2).unwrap();

        assert!(tx.enqueue(print(1)));
        assert!(tx.enqueue(print(2)));
        assert!(!tx.enqueue(print(3)));
        assert!(!tx.enqueue(DecodedCommand::ClearScreen));

        let drained: Vec<DecodedCommand> = rx.drain().collect();
        assert_eq!(drained, vec![print(1), print(2)]);
        assert_eq!(
            rx.stats(),
            DispatchSnapshot {
                enqueued: 2,
                dropped: 2
            }
        );

        assert!(tx.enqueue(DecodedCommand::PlaySound(PlaySound {
            sound_id: 4,
            volume: 0
        })));
        assert_eq!(rx.len(), 1);
        assert_eq!(tx.capacity(), 2);
        assert_eq!(rx.capacity(), 2);
    }

    #[test]
    fn producer_and_consumer_on_separate_threads() {
        let (mut tx, mut rx) = command_queue(8).unwrap();

        let producer = std::thread::spawn(move || {
            for col in 0..64u8 {
                while !tx.enqueue(print(col)) {
                    std::thread::yield_now();
                }
            }
        });

        let mut received = Vec::new();
        while received.len() < 64 {
            match rx.try_dequeue() {
                Some(cmd) => received.push(cmd),
                None => std::thread::yield_now(),
            }
        }
        producer.join().expect("producer thread should finish");

        let expected: Vec<DecodedCommand> = (0..64u8).map(print).collect();
        assert_eq!(received, expected);
        assert!(rx.is_abandoned());
    }
}
