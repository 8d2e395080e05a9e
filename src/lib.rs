//! # Edge-triggered I/O event notification
//!
//! A low-level library for watching many file descriptors for
//! readiness from a single blocking call, built directly on the
//! Linux kernel's edge-triggered readiness queue.
//!
//! # Features
//!
//! * Non-blocking TCP, UDP, Unix-domain sockets and pipes
//! * I/O event notification queue backed by epoll
//! * Zero allocations at event loop runtime
//! * Cross-thread wakeups via eventfd
//!
//! # Usage
//!
//! Create a [`Poll`], register one or more [`Source`]s with its
//! [`Registry`] under caller-chosen [`Token`]s, then loop on
//! [`Poll::poll`] filling a reusable [`Events`] batch. Every returned
//! [`Event`] carries the token supplied at registration.
//!
//! All readiness is **edge-triggered**: an event marks a transition,
//! not a state. After a readable event, read until the operation
//! fails with an error whose [`Error::is_would_block`] is true,
//! otherwise the next transition will never be reported.
//!
//! # Examples
//!
//! A server that accepts connections and echoes readable data back:
//!
//! ```no_run
//! use std::collections::HashMap;
//! use edge_net::net::{TcpListener, TcpStream};
//! use edge_net::{Events, Interest, Poll, Token};
//!
//! const SERVER: Token = Token(0);
//!
//! fn main() -> edge_net::Result<()> {
//!     let mut poll = Poll::new()?;
//!     let mut events = Events::with_capacity(1024);
//!
//!     let addr = "127.0.0.1:9000".parse().unwrap();
//!     let mut server = TcpListener::bind(addr)?;
//!     poll.registry().register(&mut server, SERVER, Interest::READABLE)?;
//!
//!     let mut connections: HashMap<Token, TcpStream> = HashMap::new();
//!     let mut next_token = 1;
//!
//!     loop {
//!         poll.poll(&mut events, None)?;
//!
//!         for event in &events {
//!             if event.token() == SERVER {
//!                 // Drain the accept queue.
//!                 loop {
//!                     match server.accept() {
//!                         Ok((mut stream, _peer)) => {
//!                             let token = Token(next_token);
//!                             next_token += 1;
//!                             poll.registry().register(
//!                                 &mut stream,
//!                                 token,
//!                                 Interest::READABLE,
//!                             )?;
//!                             connections.insert(token, stream);
//!                         }
//!                         Err(ref e) if e.is_would_block() => break,
//!                         Err(e) => return Err(e),
//!                     }
//!                 }
//!             } else if let Some(stream) = connections.get(&event.token()) {
//!                 let mut buf = [0; 4096];
//!                 let mut closed = false;
//!                 loop {
//!                     match stream.read(&mut buf) {
//!                         // Zero bytes: the peer closed its write half.
//!                         Ok(0) => {
//!                             closed = true;
//!                             break;
//!                         }
//!                         Ok(n) => {
//!                             stream.write(&buf[..n])?;
//!                         }
//!                         Err(ref e) if e.is_would_block() => break,
//!                         Err(e) => return Err(e),
//!                     }
//!                 }
//!                 if closed {
//!                     connections.remove(&event.token());
//!                 }
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! [`Poll`]: struct.Poll.html
//! [`Poll::poll`]: struct.Poll.html#method.poll
//! [`Registry`]: struct.Registry.html
//! [`Source`]: trait.Source.html
//! [`Token`]: struct.Token.html
//! [`Events`]: struct.Events.html
//! [`Event`]: struct.Event.html
//! [`Error::is_would_block`]: struct.Error.html#method.is_would_block

#![warn(
    rust_2018_idioms,
    unreachable_pub,
    missing_debug_implementations,
    missing_docs
)]
#![allow(clippy::needless_doctest_main)]

#[cfg(not(target_os = "linux"))]
compile_error!("edge-net only supports Linux");

mod error;
mod event;
mod interest;
mod poll;
mod source;
mod sys;
mod token;
mod waker;

pub mod net;
pub mod unix;

pub use crate::error::{Error, Result};
pub use crate::event::{Event, Events, Iter};
pub use crate::interest::Interest;
pub use crate::poll::{Poll, Registry};
pub use crate::source::Source;
pub use crate::token::Token;
pub use crate::waker::Waker;
