use crate::{Interest, Registry, Result, Token};

/// A value that may be registered with a [`Registry`].
///
/// The trait is a structural contract: anything that can register,
/// re-register and deregister itself against a registry is a source.
/// Every socket, pipe end and raw-descriptor adapter in this crate
/// implements it by forwarding to the registry with its owned
/// descriptor; none of them keeps registration state of its own.
///
/// Users should not call these methods directly. The equivalent
/// methods on [`Registry`] are the intended entry point and this
/// trait is how they dispatch.
///
/// # Implementing `Source`
///
/// An implementation on a type wrapping a descriptor delegates to
/// [`SourceFd`]:
///
/// ```
/// use std::os::unix::io::RawFd;
/// use edge_net::unix::SourceFd;
/// use edge_net::{Interest, Registry, Source, Token};
///
/// pub struct MySource {
///     fd: RawFd,
/// }
///
/// impl Source for MySource {
///     fn register(
///         &mut self,
///         registry: &Registry,
///         token: Token,
///         interests: Interest,
///     ) -> edge_net::Result<()> {
///         SourceFd(&self.fd).register(registry, token, interests)
///     }
///
///     fn reregister(
///         &mut self,
///         registry: &Registry,
///         token: Token,
///         interests: Interest,
///     ) -> edge_net::Result<()> {
///         SourceFd(&self.fd).reregister(registry, token, interests)
///     }
///
///     fn deregister(&mut self, registry: &Registry) -> edge_net::Result<()> {
///         SourceFd(&self.fd).deregister(registry)
///     }
/// }
/// ```
///
/// [`Registry`]: struct.Registry.html
/// [`SourceFd`]: unix/struct.SourceFd.html
pub trait Source {
    /// Register `self` with the given `Registry` instance.
    fn register(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> Result<()>;

    /// Re-register `self` with the given `Registry` instance,
    /// replacing the token and interests of the existing
    /// registration.
    fn reregister(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> Result<()>;

    /// Deregister `self` from the given `Registry` instance.
    fn deregister(&mut self, registry: &Registry) -> Result<()>;
}

impl<T> Source for Box<T>
where
    T: Source + ?Sized,
{
    fn register(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> Result<()> {
        (**self).register(registry, token, interests)
    }

    fn reregister(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> Result<()> {
        (**self).reregister(registry, token, interests)
    }

    fn deregister(&mut self, registry: &Registry) -> Result<()> {
        (**self).deregister(registry)
    }
}

impl<'a, T> Source for &'a mut T
where
    T: Source + ?Sized,
{
    fn register(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> Result<()> {
        (**self).register(registry, token, interests)
    }

    fn reregister(
        &mut self,
        registry: &Registry,
        token: Token,
        interests: Interest,
    ) -> Result<()> {
        (**self).reregister(registry, token, interests)
    }

    fn deregister(&mut self, registry: &Registry) -> Result<()> {
        (**self).deregister(registry)
    }
}
