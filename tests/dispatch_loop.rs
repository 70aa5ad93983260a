//! End-to-end sessions driven by scripted producers.

use battilde_client::display::DisplayCall;
use battilde_client::producer::{KeySource, RawInput};
use battilde_client::protocol::{Control, Direction, Pos};
use battilde_client::transport::FramedReader;
use battilde_client::{
    channel, Client, ClientError, ClientMessage, InputReader, Key, Keybindings, Listener, MessageLog, MessageSink,
    RecordingDisplay, Result,
};
use std::collections::VecDeque;
use std::io::Cursor;

#[derive(Debug, Default)]
struct Sent(Vec<ClientMessage>);

impl MessageSink for Sent {
    fn send(&mut self, message: &ClientMessage) -> Result<()> {
        self.0.push(message.clone());
        Ok(())
    }
}

struct Keys(VecDeque<Key>);

impl KeySource for Keys {
    fn next_input(&mut self) -> Result<RawInput> {
        Ok(self.0.pop_front().map_or(RawInput::Eof, RawInput::Key))
    }
}

fn frames(bodies: &[&str]) -> Cursor<Vec<u8>> {
    let mut bytes = Vec::new();
    for body in bodies {
        bytes.extend_from_slice(&u32::try_from(body.len()).unwrap().to_be_bytes());
        bytes.extend_from_slice(body.as_bytes());
    }
    Cursor::new(bytes)
}

fn client() -> Client<RecordingDisplay, Sent> {
    Client::new(RecordingDisplay::new(), Sent::default(), Keybindings::default(), MessageLog::default())
}

#[test]
fn test_server_session_until_close() {
    let (events, receiver) = channel();
    let source = FramedReader::new(frames(&[
        r#"["message", "alice connected"]"#,
        r#"["world", [
            ["field", {"width": 2, "height": 2, "field": [0, 1, 1, 0], "mapping": [["wall"], ["grass"]]}],
            ["changecells", [[[1, 1], ["player", "grass"]]]],
            ["playerpos", [1, 1]],
            ["health", [10, 10]]
        ]]"#,
        r#"["error", "invalidaction", "Set a name before you send other messages"]"#,
    ]));
    Listener::spawn(source, events).unwrap();

    let mut client = client();
    client.join("alice").unwrap();
    let close = client.run(&receiver).unwrap();

    assert_eq!(close.as_deref(), Some("Connection closed by server"));
    assert_eq!(client.sink().0, vec![ClientMessage::Name("alice".to_string())]);

    let changes = client.display().changes();
    assert!(changes.contains(&&DisplayCall::ResizeField(2, 2)));
    assert!(changes.contains(&&DisplayCall::SetFieldCenter(Pos::new(1, 1))));
    assert!(changes.contains(&&DisplayCall::SetHealth(10, Some(10))));
    assert_eq!(
        client.display().messages(),
        vec![
            "alice connected",
            "invalidaction: Set a name before you send other messages"
        ]
    );
}

#[test]
fn test_keyboard_session_until_quit() {
    let (events, receiver) = channel();
    let keys = Keys(VecDeque::from(vec![Key::char('w'), Key::char('e'), Key::char('Q')]));
    InputReader::spawn(keys, events).unwrap();

    let mut client = client();
    let close = client.run(&receiver).unwrap();

    assert_eq!(close, None);
    assert_eq!(
        client.sink().0,
        vec![
            ClientMessage::Input(Control::Move(Direction::North)),
            ClientMessage::Input(Control::NextWeapon),
        ]
    );
}

#[test]
fn test_transport_failure_is_fatal() {
    let (events, receiver) = channel();
    let mut truncated = frames(&[r#"["message", "hello"]"#]).into_inner();
    truncated.extend_from_slice(&[0, 0, 0, 40, b'[']);
    Listener::spawn(FramedReader::new(Cursor::new(truncated)), events).unwrap();

    let mut client = client();
    let err = client.run(&receiver).unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(client.display().messages(), vec!["hello"]);
}

#[test]
fn test_interrupt_key_is_fatal() {
    let (events, receiver) = channel();
    InputReader::spawn(Keys(VecDeque::from(vec![Key::ctrl('c'), Key::char('w')])), events).unwrap();

    let mut client = client();
    assert!(matches!(client.run(&receiver), Err(ClientError::Interrupted)));
    assert!(client.sink().0.is_empty());
}

#[test]
fn test_all_producers_gone_is_reported() {
    let (events, receiver) = channel();
    InputReader::spawn(Keys(VecDeque::new()), events).unwrap();

    let mut client = client();
    assert!(matches!(client.run(&receiver), Err(ClientError::ChannelClosed)));
}
