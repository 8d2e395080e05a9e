use std::os::unix::io::RawFd;

use crate::poll;
use crate::{Interest, Registry, Result, Source, Token};

/// Adapter for a [`RawFd`] providing a [`Source`] implementation.
///
/// `SourceFd` enables registering any descriptor with a [`Registry`].
/// It takes a `&RawFd` and **does not** take ownership: it will not
/// close the descriptor, and it is expected to be constructed right
/// at the registration call site. The descriptor should already be
/// non-blocking; registering a blocking descriptor defeats the
/// edge-triggered drain contract.
///
/// # Examples
///
/// Registering a std listener after making it non-blocking:
///
/// ```
/// use std::net::TcpListener;
/// use std::os::unix::io::AsRawFd;
/// use edge_net::unix::SourceFd;
/// use edge_net::{Interest, Poll, Token};
///
/// let listener = TcpListener::bind("127.0.0.1:0")?;
/// listener.set_nonblocking(true)?;
///
/// let poll = Poll::new()?;
/// poll.registry().register(
///     &mut SourceFd(&listener.as_raw_fd()),
///     Token(0),
///     Interest::READABLE,
/// )?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// [`RawFd`]: https://doc.rust-lang.org/std/os/unix/io/type.RawFd.html
/// [`Source`]: ../trait.Source.html
/// [`Registry`]: ../struct.Registry.html
#[derive(Debug)]
pub struct SourceFd<'a>(pub &'a RawFd);

impl<'a> Source for SourceFd<'a> {
    fn register(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> Result<()> {
        poll::selector(registry).register(*self.0, token, interests)
    }

    fn reregister(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> Result<()> {
        poll::selector(registry).reregister(*self.0, token, interests)
    }

    fn deregister(&mut self, registry: &Registry) -> Result<()> {
        poll::selector(registry).deregister(*self.0)
    }
}
