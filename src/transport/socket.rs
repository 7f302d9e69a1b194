//! Socket-backed byte channels.
//!
//! Local IPC runs over a loopback TCP socket, or a Unix domain socket
//! where available. Both are thin wrappers that add nothing beyond
//! open-state tracking; connection establishment policy (retries,
//! authentication) belongs to the caller.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use tracing::debug;

use super::ByteChannel;

/// A [`ByteChannel`] over a connected TCP stream.
pub struct TcpChannel {
    stream: TcpStream,
    open: bool,
}

impl TcpChannel {
    /// Connect to a listening peer.
    pub fn connect<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        debug!(peer = ?stream.peer_addr().ok(), "tcp channel connected");
        Ok(Self { stream, open: true })
    }

    /// Wrap an already-connected stream (e.g. from an acceptor loop).
    pub fn from_stream(stream: TcpStream) -> Self {
        Self { stream, open: true }
    }
}

impl ByteChannel for TcpChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) -> io::Result<()> {
        if self.open {
            self.open = false;
            debug!("tcp channel closed");
            self.stream.shutdown(Shutdown::Both)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
mod unix_impl {
    use std::io::{self, Read, Write};
    use std::net::Shutdown;
    use std::os::unix::net::UnixStream;
    use std::path::Path;

    use tracing::debug;

    use super::ByteChannel;

    /// A [`ByteChannel`] over a connected Unix domain socket.
    pub struct UnixChannel {
        stream: UnixStream,
        open: bool,
    }

    impl UnixChannel {
        /// Connect to the socket at `path`.
        pub fn connect<P: AsRef<Path>>(path: P) -> io::Result<Self> {
            let stream = UnixStream::connect(path.as_ref())?;
            debug!(path = %path.as_ref().display(), "unix channel connected");
            Ok(Self { stream, open: true })
        }

        /// Wrap an already-connected stream.
        pub fn from_stream(stream: UnixStream) -> Self {
            Self { stream, open: true }
        }
    }

    impl ByteChannel for UnixChannel {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.stream.read(buf)
        }

        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.stream.write(buf)
        }

        fn is_open(&self) -> bool {
            self.open
        }

        fn close(&mut self) -> io::Result<()> {
            if self.open {
                self.open = false;
                debug!("unix channel closed");
                self.stream.shutdown(Shutdown::Both)?;
            }
            Ok(())
        }
    }
}

#[cfg(unix)]
pub use unix_impl::UnixChannel;
