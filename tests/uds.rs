use std::net::Shutdown;
use std::path::Path;
use std::time::Duration;

use edge_net::net::{UnixDatagram, UnixListener, UnixStream};
use edge_net::{Events, Interest, Poll, Token};

mod util;

const LISTENER: Token = Token(0);
const SERVER: Token = Token(1);

const TIMEOUT: Option<Duration> = Some(Duration::from_millis(2000));

struct PathGuard(std::path::PathBuf);

impl PathGuard {
    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for PathGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn listener_reports_bound_pathname() {
    let path = PathGuard(util::temp_sock("listener-addr"));
    let listener = UnixListener::bind(path.path()).unwrap();

    let addr = listener.local_addr().unwrap();
    assert!(!addr.is_unnamed());
    assert_eq!(addr.as_pathname(), Some(path.path()));
}

#[test]
fn stream_echo_roundtrip() {
    let path = PathGuard(util::temp_sock("stream-echo"));

    let mut poll = Poll::new().unwrap();
    let mut events = Events::with_capacity(64);

    let mut listener = UnixListener::bind(path.path()).unwrap();
    poll.registry()
        .register(&mut listener, LISTENER, Interest::READABLE)
        .unwrap();

    let client = UnixStream::connect(path.path()).unwrap();
    util::retry(|| client.write(b"hello"));

    poll.poll(&mut events, TIMEOUT).unwrap();
    assert!(events
        .iter()
        .any(|event| event.token() == LISTENER && event.is_readable()));

    let (mut stream, peer) = listener.accept().unwrap();
    // The client never bound a name of its own.
    assert!(peer.is_unnamed());

    poll.registry()
        .register(&mut stream, SERVER, Interest::READABLE)
        .unwrap();
    poll.poll(&mut events, TIMEOUT).unwrap();

    let mut buf = [0; 16];
    let n = util::retry(|| stream.read(&mut buf));
    assert_eq!(&buf[..n], b"hello");

    stream.write(&buf[..n]).unwrap();

    let mut echoed = [0; 16];
    let n = util::retry(|| client.read(&mut echoed));
    assert_eq!(&echoed[..n], b"hello");
}

#[test]
fn pair_is_connected_both_ways() {
    let (left, right) = UnixStream::pair().unwrap();

    left.write(b"ping").unwrap();
    let mut buf = [0; 16];
    let n = util::retry(|| right.read(&mut buf));
    assert_eq!(&buf[..n], b"ping");

    right.write(b"pong").unwrap();
    let n = util::retry(|| left.read(&mut buf));
    assert_eq!(&buf[..n], b"pong");
}

#[test]
fn zero_byte_read_after_peer_write_shutdown() {
    let (left, right) = UnixStream::pair().unwrap();

    left.write(b"last").unwrap();
    left.shutdown(Shutdown::Write).unwrap();

    let mut buf = [0; 16];
    let n = util::retry(|| right.read(&mut buf));
    assert_eq!(&buf[..n], b"last");
    assert_eq!(util::retry(|| right.read(&mut buf)), 0);
}

#[test]
fn peer_cred_reports_own_process() {
    let (left, _right) = UnixStream::pair().unwrap();

    let cred = left.peer_cred().unwrap();
    assert_eq!(cred.uid, unsafe { libc::getuid() });
    assert_eq!(cred.gid, unsafe { libc::getgid() });
    assert_eq!(cred.pid, std::process::id() as libc::pid_t);
}

#[test]
fn datagram_roundtrip_over_paths() {
    let alice_path = PathGuard(util::temp_sock("dgram-alice"));
    let bob_path = PathGuard(util::temp_sock("dgram-bob"));

    let alice = UnixDatagram::bind(alice_path.path()).unwrap();
    let bob = UnixDatagram::bind(bob_path.path()).unwrap();

    alice.send_to(b"ping", bob_path.path()).unwrap();

    let mut buf = [0; 16];
    let (n, from) = util::retry(|| bob.recv_from(&mut buf));
    assert_eq!(&buf[..n], b"ping");
    assert_eq!(from.as_pathname(), Some(alice_path.path()));
}

#[test]
fn datagram_pair_uses_send_recv() {
    let (alice, bob) = UnixDatagram::pair().unwrap();

    alice.send(b"direct").unwrap();

    let mut buf = [0; 16];
    let n = util::retry(|| bob.recv(&mut buf));
    assert_eq!(&buf[..n], b"direct");

    assert!(bob.local_addr().unwrap().is_unnamed());
}

#[test]
fn unbound_datagram_recv_would_block() {
    let socket = UnixDatagram::unbound().unwrap();

    let mut buf = [0; 16];
    let err = socket.recv(&mut buf).unwrap_err();
    assert!(err.is_would_block());
}

#[test]
fn datagram_sources_deliver_events() {
    let mut poll = Poll::new().unwrap();
    let mut events = Events::with_capacity(64);

    let (alice, mut bob) = UnixDatagram::pair().unwrap();
    poll.registry()
        .register(&mut bob, Token(5), Interest::READABLE)
        .unwrap();

    alice.send(b"wake").unwrap();

    poll.poll(&mut events, TIMEOUT).unwrap();
    assert!(events
        .iter()
        .any(|event| event.token() == Token(5) && event.is_readable()));
}
