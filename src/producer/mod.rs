//! Producers: independent threads that feed the dispatch loop.
//!
//! Three producers run concurrently, each holding only an [`EventSender`]:
//! - **Listener**: pulls decoded messages from the transport
//! - **Input Reader**: blocks on raw key presses
//! - **Resize Notifier**: turns `SIGWINCH` into resize events
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  Message / Error
//! │   Listener   │ ─────────────────┐
//! └──────────────┘                  │
//! ┌──────────────┐  Input / Error   ▼
//! │ Input Reader │ ──────────▶ ┌──────────┐  pop()  ┌───────────────┐
//! └──────────────┘             │  Event   │ ──────▶ │ Dispatch Loop │
//! ┌──────────────┐  Resize     │ Channel  │         │ (owns state)  │
//! │Resize Notify │ ──────────▶ └──────────┘         └───────────────┘
//! └──────────────┘
//! ```
//!
//! Producers are detached: nothing joins or cancels them. The session ends
//! when the dispatch loop stops reading, and the process exit reclaims the
//! threads.

mod channel;
mod event;
mod input;
mod listener;
mod resize;

pub use channel::{channel, EventReceiver, EventSender};
pub use event::{Event, Key, KeyCode, KeyModifiers, ResizeInfo};
pub use input::{CrosstermKeys, InputReader, KeySource, RawInput};
pub use listener::Listener;
pub use resize::ResizeNotifier;

use crate::error::{ClientError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, warn};

/// How a producer's retrieval loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Exit {
    /// It pushed an error event before stopping.
    Reported,
    /// Its source ended normally (e.g. the server closed the connection).
    Finished,
    /// The dispatch loop is gone.
    ReceiverGone,
    /// It stopped without telling the dispatch loop anything.
    Silent,
}

/// Handle to a detached producer thread.
///
/// Dropping the handle does not stop the thread.
#[derive(Debug)]
pub struct ProducerHandle {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl ProducerHandle {
    /// The producer's name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the producer thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawn `body` on a named, detached thread.
///
/// A panic inside `body` is turned into an error event so the dispatch loop
/// learns the producer is gone.
pub(crate) fn spawn_detached<F>(name: &'static str, events: EventSender, body: F) -> Result<ProducerHandle>
where
    F: FnOnce(&EventSender) -> Exit + Send + 'static,
{
    let handle = thread::Builder::new()
        .name(format!("battilde-{name}"))
        .spawn(move || {
            match panic::catch_unwind(AssertUnwindSafe(|| body(&events))) {
                Ok(Exit::Reported) => debug!(producer = name, "producer stopped after reporting an error"),
                Ok(Exit::Finished) => debug!(producer = name, "producer source ended"),
                Ok(Exit::ReceiverGone) => debug!(producer = name, "dispatch loop gone, producer stopping"),
                Ok(Exit::Silent) => warn!(producer = name, "producer stopped without reporting an error"),
                Err(_) => {
                    error!(producer = name, "producer panicked");
                    events.push(Event::Error(ClientError::ProducerPanicked(name.to_string())));
                }
            }
        })?;

    Ok(ProducerHandle { name, handle })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_panicking_producer_reports_error() {
        let (tx, rx) = channel();
        let handle = spawn_detached("doomed", tx, |_| panic!("boom")).unwrap();
        assert_eq!(handle.name(), "doomed");
        match rx.pop() {
            Event::Error(ClientError::ProducerPanicked(name)) => assert_eq!(name, "doomed"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_producer_exit_is_observable() {
        let (tx, rx) = channel();
        let handle = spawn_detached("short", tx, |events| {
            events.push(Event::Message(None));
            Exit::Finished
        })
        .unwrap();
        assert!(matches!(rx.pop(), Event::Message(None)));
        for _ in 0..100 {
            if handle.is_finished() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert!(handle.is_finished());
    }
}
