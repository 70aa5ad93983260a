//! Listener: dedicated thread pulling decoded messages from the transport.

use super::event::Event;
use super::{spawn_detached, EventSender, Exit, ProducerHandle};
use crate::error::Result;
use crate::transport::MessageSource;
use std::ops::ControlFlow;

/// Producer wrapping a [`MessageSource`].
pub struct Listener;

impl Listener {
    /// Spawn the listener thread.
    pub fn spawn<T>(source: T, events: EventSender) -> Result<ProducerHandle>
    where
        T: MessageSource + Send + 'static,
    {
        spawn_detached("listener", events, move |events| Self::run(source, events))
    }

    fn run<T: MessageSource>(mut source: T, events: &EventSender) -> Exit {
        let mut closed = false;
        let mut gone = false;
        let mut reported = false;

        source.listen(
            &mut |message| {
                closed |= message.is_none();
                if events.push(Event::Message(message)) {
                    ControlFlow::Continue(())
                } else {
                    gone = true;
                    ControlFlow::Break(())
                }
            },
            &mut |error| {
                reported = true;
                events.push(Event::Error(error));
            },
        );

        if reported {
            Exit::Reported
        } else if gone {
            Exit::ReceiverGone
        } else if closed {
            Exit::Finished
        } else {
            Exit::Silent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::producer::channel;
    use crate::protocol::ServerMessage;

    enum Step {
        Message(Option<ServerMessage>),
        Fail(&'static str),
    }

    struct Scripted(Vec<Step>);

    impl MessageSource for Scripted {
        fn listen(
            &mut self,
            on_message: &mut dyn FnMut(Option<ServerMessage>) -> ControlFlow<()>,
            on_error: &mut dyn FnMut(ClientError),
        ) {
            for step in self.0.drain(..) {
                match step {
                    Step::Message(message) => {
                        let stop = message.is_none();
                        if on_message(message).is_break() || stop {
                            return;
                        }
                    }
                    Step::Fail(reason) => {
                        on_error(ClientError::Transport(reason.to_string()));
                        return;
                    }
                }
            }
        }
    }

    fn chat(text: &str) -> ServerMessage {
        ServerMessage::Message {
            text: text.to_string(),
            kind: None,
        }
    }

    #[test]
    fn test_close_is_a_message_not_an_error() {
        let (tx, rx) = channel();
        let source = Scripted(vec![Step::Message(Some(chat("hi"))), Step::Message(None)]);
        assert_eq!(Listener::run(source, &tx), Exit::Finished);
        assert!(matches!(rx.pop(), Event::Message(Some(_))));
        assert!(matches!(rx.pop(), Event::Message(None)));
        assert!(rx.is_empty());
    }

    #[test]
    fn test_transport_failure_is_reported() {
        let (tx, rx) = channel();
        let source = Scripted(vec![Step::Message(Some(chat("hi"))), Step::Fail("reset by peer")]);
        assert_eq!(Listener::run(source, &tx), Exit::Reported);
        assert!(matches!(rx.pop(), Event::Message(Some(_))));
        assert!(matches!(rx.pop(), Event::Error(ClientError::Transport(reason)) if reason == "reset by peer"));
    }

    #[test]
    fn test_silent_source_is_flagged() {
        let (tx, _rx) = channel();
        assert_eq!(Listener::run(Scripted(Vec::new()), &tx), Exit::Silent);
    }

    #[test]
    fn test_spawned_listener_delivers() {
        let (tx, rx) = channel();
        Listener::spawn(Scripted(vec![Step::Message(Some(chat("welcome")))]), tx).unwrap();
        assert!(matches!(rx.pop(), Event::Message(Some(ServerMessage::Message { text, .. })) if text == "welcome"));
    }
}
