use std::time::Duration;

use edge_net::net::UdpSocket;
use edge_net::{Events, Interest, Poll, Token};

mod util;

const SENDER: Token = Token(1);
const RECEIVER: Token = Token(2);

const TIMEOUT: Option<Duration> = Some(Duration::from_millis(2000));

fn bind_loopback() -> UdpSocket {
    UdpSocket::bind("127.0.0.1:0".parse().unwrap()).unwrap()
}

#[test]
fn roundtrip_between_two_sockets() {
    let mut poll = Poll::new().unwrap();
    let mut events = Events::with_capacity(64);

    let mut alice = bind_loopback();
    let mut bob = bind_loopback();
    let bob_addr = bob.local_addr().unwrap();
    let alice_addr = alice.local_addr().unwrap();

    poll.registry()
        .register(&mut alice, SENDER, Interest::WRITABLE)
        .unwrap();
    poll.registry()
        .register(&mut bob, RECEIVER, Interest::READABLE)
        .unwrap();

    alice.send_to(b"ping", bob_addr).unwrap();

    poll.poll(&mut events, TIMEOUT).unwrap();
    assert!(events
        .iter()
        .any(|event| event.token() == RECEIVER && event.is_readable()));

    let mut buf = [0; 16];
    let (n, from) = util::retry(|| bob.recv_from(&mut buf));
    assert_eq!(&buf[..n], b"ping");
    assert_eq!(from, alice_addr);
}

#[test]
fn recv_on_empty_socket_would_block() {
    let socket = bind_loopback();

    let mut buf = [0; 16];
    let err = socket.recv_from(&mut buf).unwrap_err();
    assert!(err.is_would_block());
}

#[test]
fn connected_pair_uses_send_recv() {
    let alice = bind_loopback();
    let bob = bind_loopback();

    alice.connect(bob.local_addr().unwrap()).unwrap();
    bob.connect(alice.local_addr().unwrap()).unwrap();

    assert_eq!(alice.peer_addr().unwrap(), bob.local_addr().unwrap());

    alice.send(b"direct").unwrap();

    let mut buf = [0; 16];
    let n = util::retry(|| bob.recv(&mut buf));
    assert_eq!(&buf[..n], b"direct");
}

#[test]
fn peek_leaves_datagram_queued() {
    let alice = bind_loopback();
    let bob = bind_loopback();

    alice.send_to(b"twice", bob.local_addr().unwrap()).unwrap();

    let mut buf = [0; 16];
    let (n, _) = util::retry(|| bob.peek_from(&mut buf));
    assert_eq!(&buf[..n], b"twice");

    let (n, _) = util::retry(|| bob.recv_from(&mut buf));
    assert_eq!(&buf[..n], b"twice");
}

#[test]
fn socket_options_roundtrip() {
    let socket = bind_loopback();

    socket.set_broadcast(true).unwrap();
    assert!(socket.broadcast().unwrap());

    socket.set_ttl(42).unwrap();
    assert_eq!(socket.ttl().unwrap(), 42);

    assert_eq!(socket.take_error().unwrap(), None);
}
