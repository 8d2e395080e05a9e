use std::net::Shutdown;
use std::time::Duration;

use edge_net::net::{TcpListener, TcpStream};
use edge_net::{Events, Interest, Poll, Token};

mod util;

const LISTENER: Token = Token(0);
const CLIENT: Token = Token(1);

const TIMEOUT: Option<Duration> = Some(Duration::from_millis(2000));
const SHORT: Option<Duration> = Some(Duration::from_millis(50));

fn bind_loopback() -> (TcpListener, std::net::SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0".parse().unwrap()).unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

#[test]
fn listener_binds_to_assigned_port() {
    let (_listener, addr) = bind_loopback();

    assert!(addr.is_ipv4());
    assert_ne!(addr.port(), 0);
}

#[test]
fn accept_on_idle_listener_would_block() {
    let (listener, _addr) = bind_loopback();

    let err = listener.accept().unwrap_err();
    assert!(err.is_would_block());
}

#[test]
fn echo_roundtrip() {
    let mut poll = Poll::new().unwrap();
    let mut events = Events::with_capacity(1024);

    let (mut listener, addr) = bind_loopback();
    poll.registry()
        .register(&mut listener, LISTENER, Interest::READABLE)
        .unwrap();

    let client = TcpStream::connect(addr).unwrap();
    util::retry(|| client.write(b"hello"));

    poll.poll(&mut events, TIMEOUT).unwrap();
    assert!(events
        .iter()
        .any(|event| event.token() == LISTENER && event.is_readable()));

    let (mut stream, peer) = listener.accept().unwrap();
    assert_eq!(peer, client.local_addr().unwrap());

    poll.registry()
        .register(&mut stream, CLIENT, Interest::READABLE | Interest::WRITABLE)
        .unwrap();

    poll.poll(&mut events, TIMEOUT).unwrap();
    assert!(events
        .iter()
        .any(|event| event.token() == CLIENT && event.is_readable()));

    let mut buf = [0; 16];
    let n = stream.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"hello");

    stream.write(&buf[..n]).unwrap();

    let mut echoed = [0; 16];
    let n = util::retry(|| client.read(&mut echoed));
    assert_eq!(&echoed[..n], b"hello");
}

#[test]
fn read_on_empty_stream_would_block() {
    let mut poll = Poll::new().unwrap();
    let mut events = Events::with_capacity(64);

    let (mut listener, addr) = bind_loopback();
    poll.registry()
        .register(&mut listener, LISTENER, Interest::READABLE)
        .unwrap();

    let _client = TcpStream::connect(addr).unwrap();

    poll.poll(&mut events, TIMEOUT).unwrap();
    let (stream, _peer) = listener.accept().unwrap();

    let mut buf = [0; 16];
    let err = stream.read(&mut buf).unwrap_err();
    assert!(err.is_would_block());
}

#[test]
fn zero_byte_read_after_peer_write_shutdown() {
    let mut poll = Poll::new().unwrap();
    let mut events = Events::with_capacity(64);

    let (mut listener, addr) = bind_loopback();
    poll.registry()
        .register(&mut listener, LISTENER, Interest::READABLE)
        .unwrap();

    let client = TcpStream::connect(addr).unwrap();
    util::retry(|| client.write(b"bye"));
    client.shutdown(Shutdown::Write).unwrap();

    poll.poll(&mut events, TIMEOUT).unwrap();
    let (mut stream, _peer) = listener.accept().unwrap();

    poll.registry()
        .register(&mut stream, CLIENT, Interest::READABLE)
        .unwrap();
    poll.poll(&mut events, TIMEOUT).unwrap();

    let event = events
        .iter()
        .find(|event| event.token() == CLIENT)
        .expect("no event for the accepted stream");
    assert!(event.is_readable());
    assert!(event.is_read_closed());

    // Buffered data first, then the EOF.
    let mut buf = [0; 16];
    let n = util::retry(|| stream.read(&mut buf));
    assert_eq!(&buf[..n], b"bye");
    assert_eq!(util::retry(|| stream.read(&mut buf)), 0);
}

#[test]
fn reregistered_listener_reports_no_phantom_events() {
    let mut poll = Poll::new().unwrap();
    let mut events = Events::with_capacity(64);

    let (mut listener, _addr) = bind_loopback();

    // Writable interest on a listener: nothing to deliver.
    poll.registry()
        .register(&mut listener, LISTENER, Interest::WRITABLE)
        .unwrap();
    poll.poll(&mut events, SHORT).unwrap();
    assert!(events.is_empty());

    // Readable interest with no client connecting: still nothing.
    poll.registry()
        .reregister(&mut listener, LISTENER, Interest::READABLE)
        .unwrap();
    poll.poll(&mut events, SHORT).unwrap();
    assert!(events.is_empty());
}

#[test]
fn connect_becomes_writable() {
    let mut poll = Poll::new().unwrap();
    let mut events = Events::with_capacity(64);

    let (_listener, addr) = bind_loopback();

    let mut client = TcpStream::connect(addr).unwrap();
    poll.registry()
        .register(&mut client, CLIENT, Interest::WRITABLE)
        .unwrap();

    poll.poll(&mut events, TIMEOUT).unwrap();

    let event = events
        .iter()
        .find(|event| event.token() == CLIENT)
        .expect("no writable event after connect");
    assert!(event.is_writable());
    assert_eq!(client.take_error().unwrap(), None);
}

#[test]
fn drained_stream_is_silent_until_new_bytes() {
    let mut poll = Poll::new().unwrap();
    let mut events = Events::with_capacity(64);

    let (mut listener, addr) = bind_loopback();
    poll.registry()
        .register(&mut listener, LISTENER, Interest::READABLE)
        .unwrap();

    let client = TcpStream::connect(addr).unwrap();
    util::retry(|| client.write(b"first"));

    poll.poll(&mut events, TIMEOUT).unwrap();
    let (mut stream, _peer) = listener.accept().unwrap();
    poll.registry()
        .register(&mut stream, CLIENT, Interest::READABLE)
        .unwrap();

    poll.poll(&mut events, TIMEOUT).unwrap();
    assert!(events.iter().any(|event| event.token() == CLIENT));

    // Drain until would-block; the edge is now rearmed.
    let mut buf = [0; 64];
    loop {
        match stream.read(&mut buf) {
            Ok(_) => {}
            Err(ref e) if e.is_would_block() => break,
            Err(e) => panic!("read failed: {}", e),
        }
    }

    // No new bytes: no readable event for the stream.
    poll.poll(&mut events, SHORT).unwrap();
    assert!(!events.iter().any(|event| event.token() == CLIENT));

    // New bytes produce the next edge.
    util::retry(|| client.write(b"second"));
    poll.poll(&mut events, TIMEOUT).unwrap();
    assert!(events
        .iter()
        .any(|event| event.token() == CLIENT && event.is_readable()));
}

#[test]
fn socket_options_roundtrip() {
    let (listener, addr) = bind_loopback();

    listener.set_ttl(64).unwrap();
    assert_eq!(listener.ttl().unwrap(), 64);

    listener.set_reuseaddr(true).unwrap();
    listener.set_reuseport(true).unwrap();

    let stream = TcpStream::connect(addr).unwrap();
    stream.set_ttl(96).unwrap();
    assert_eq!(stream.ttl().unwrap(), 96);

    stream.set_nodelay(true).unwrap();
    assert!(stream.nodelay().unwrap());
    stream.set_nodelay(false).unwrap();
    assert!(!stream.nodelay().unwrap());
}
