use std::time::Duration;

use edge_net::unix::pipe;
use edge_net::{Events, Interest, Poll, Token};

mod util;

const RECEIVER: Token = Token(2);

const TIMEOUT: Option<Duration> = Some(Duration::from_millis(2000));

#[test]
fn write_then_read() {
    let (sender, receiver) = pipe::new().unwrap();

    assert_eq!(sender.write(b"across").unwrap(), 6);

    let mut buf = [0; 16];
    let n = util::retry(|| receiver.read(&mut buf));
    assert_eq!(&buf[..n], b"across");
}

#[test]
fn read_on_empty_pipe_would_block() {
    let (_sender, receiver) = pipe::new().unwrap();

    let mut buf = [0; 16];
    let err = receiver.read(&mut buf).unwrap_err();
    assert!(err.is_would_block());
}

#[test]
fn dropped_sender_reads_eof() {
    let mut poll = Poll::new().unwrap();
    let mut events = Events::with_capacity(64);

    let (sender, mut receiver) = pipe::new().unwrap();
    poll.registry()
        .register(&mut receiver, RECEIVER, Interest::READABLE)
        .unwrap();

    drop(sender);

    poll.poll(&mut events, TIMEOUT).unwrap();

    let event = events
        .iter()
        .find(|event| event.token() == RECEIVER)
        .expect("no event after sender drop");
    assert!(event.is_read_closed());

    let mut buf = [0; 16];
    assert_eq!(receiver.read(&mut buf).unwrap(), 0);
}

#[test]
fn readable_event_for_buffered_data() {
    let mut poll = Poll::new().unwrap();
    let mut events = Events::with_capacity(64);

    let (sender, mut receiver) = pipe::new().unwrap();

    // Data written before registration still produces the initial
    // readiness edge.
    sender.write(b"early").unwrap();
    poll.registry()
        .register(&mut receiver, RECEIVER, Interest::READABLE)
        .unwrap();

    poll.poll(&mut events, TIMEOUT).unwrap();
    assert!(events
        .iter()
        .any(|event| event.token() == RECEIVER && event.is_readable()));
}

#[test]
fn blocking_mode_can_be_toggled() {
    let (sender, receiver) = pipe::new().unwrap();

    // Flip both ends to blocking and back; the pair stays usable.
    sender.set_nonblocking(false).unwrap();
    receiver.set_nonblocking(false).unwrap();
    sender.set_nonblocking(true).unwrap();
    receiver.set_nonblocking(true).unwrap();

    sender.write(b"still works").unwrap();
    let mut buf = [0; 16];
    let n = util::retry(|| receiver.read(&mut buf));
    assert_eq!(&buf[..n], b"still works");
}
