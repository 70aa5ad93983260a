//! Event channel: the single serialization point between producers and the
//! dispatch loop.

use super::event::Event;
use crate::error::ClientError;
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

/// Create a new event channel.
///
/// The sender half may be cloned into any number of producers. The receiver
/// half is not cloneable, so exactly one consumer exists per channel.
pub fn channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = unbounded();
    (EventSender { tx }, EventReceiver { rx })
}

/// Write handle held by producers.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<Event>,
}

impl EventSender {
    /// Push an event. Never blocks.
    ///
    /// Returns `false` once the receiver has been dropped; producers should
    /// stop when that happens.
    pub fn push(&self, event: Event) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Read handle owned by the dispatch loop.
#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<Event>,
}

impl EventReceiver {
    /// Block until an event is available and remove it.
    ///
    /// If every sender is gone the loop could never wake again, so that case
    /// is reported as `Event::Error(ClientError::ChannelClosed)`.
    pub fn pop(&self) -> Event {
        self.rx
            .recv()
            .unwrap_or(Event::Error(ClientError::ChannelClosed))
    }

    /// Remove the next event if one is queued.
    pub fn try_pop(&self) -> Option<Event> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.rx.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::event::Key;
    use std::thread;

    #[test]
    fn test_fifo_single_producer() {
        let (tx, rx) = channel();
        for c in ['a', 'b', 'c'] {
            assert!(tx.push(Event::Input(Key::char(c))));
        }
        for c in ['a', 'b', 'c'] {
            assert!(matches!(rx.pop(), Event::Input(key) if key == Key::char(c)));
        }
        assert!(rx.is_empty());
    }

    #[test]
    fn test_concurrent_producers_no_loss_and_per_producer_order() {
        let (tx, rx) = channel();
        let producers: Vec<_> = (0..4u32)
            .map(|p| {
                let tx = tx.clone();
                thread::spawn(move || {
                    for i in 0..250u32 {
                        let c = char::from_u32(0x4e00 + p * 1000 + i).unwrap();
                        tx.push(Event::Input(Key::char(c)));
                    }
                })
            })
            .collect();
        for handle in producers {
            handle.join().unwrap();
        }
        drop(tx);

        let mut last = [None::<u32>; 4];
        let mut total = 0;
        while let Some(event) = rx.try_pop() {
            let Event::Input(key) = event else {
                panic!("unexpected event {event:?}");
            };
            let crate::producer::KeyCode::Char(c) = key.code else {
                panic!("unexpected key {key:?}");
            };
            let n = c as u32 - 0x4e00;
            let (p, i) = ((n / 1000) as usize, n % 1000);
            if let Some(prev) = last[p] {
                assert!(i > prev, "producer {p} out of order");
            }
            last[p] = Some(i);
            total += 1;
        }
        assert_eq!(total, 1000);
    }

    #[test]
    fn test_pop_reports_closed_channel() {
        let (tx, rx) = channel();
        drop(tx);
        assert!(matches!(rx.pop(), Event::Error(ClientError::ChannelClosed)));
    }

    #[test]
    fn test_push_after_receiver_dropped() {
        let (tx, rx) = channel();
        drop(rx);
        assert!(!tx.push(Event::Message(None)));
    }
}
