//! Resize Notifier: turns terminal-resize signals into `Resize` events.

use super::event::{Event, ResizeInfo};
use super::{EventSender, ProducerHandle};
use crate::error::Result;

/// Producer for terminal-resize notifications.
pub struct ResizeNotifier;

impl ResizeNotifier {
    /// Push one resize notification.
    ///
    /// Returns `false` once the dispatch loop is gone.
    pub fn notify(events: &EventSender, info: ResizeInfo) -> bool {
        events.push(Event::Resize(info))
    }

    /// Listen for `SIGWINCH` on a detached thread.
    ///
    /// The notifier never stops on its own.
    #[cfg(unix)]
    pub fn spawn(events: EventSender) -> Result<Option<ProducerHandle>> {
        use super::{spawn_detached, Exit};
        use signal_hook::consts::SIGWINCH;
        use signal_hook::iterator::Signals;

        let mut signals = Signals::new([SIGWINCH])?;
        let handle = spawn_detached("resize", events, move |events| {
            for signal in signals.forever() {
                let info = ResizeInfo {
                    signal: Some(signal),
                    size: crossterm::terminal::size().ok(),
                };
                if !Self::notify(events, info) {
                    return Exit::ReceiverGone;
                }
            }
            Exit::Silent
        })?;
        Ok(Some(handle))
    }

    /// Without signals, the input reader forwards resizes instead.
    #[cfg(not(unix))]
    pub fn spawn(_events: EventSender) -> Result<Option<ProducerHandle>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::channel;

    #[test]
    fn test_notify_pushes_resize() {
        let (tx, rx) = channel();
        let info = ResizeInfo {
            signal: Some(28),
            size: Some((120, 40)),
        };
        assert!(ResizeNotifier::notify(&tx, info));
        assert!(matches!(rx.pop(), Event::Resize(got) if got == info));
    }

    #[cfg(unix)]
    #[test]
    fn test_sigwinch_is_delivered() {
        let (tx, rx) = channel();
        let handle = ResizeNotifier::spawn(tx).unwrap();
        assert!(handle.is_some());
        signal_hook::low_level::raise(signal_hook::consts::SIGWINCH).unwrap();
        match rx.pop() {
            Event::Resize(info) => assert_eq!(info.signal, Some(signal_hook::consts::SIGWINCH)),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
