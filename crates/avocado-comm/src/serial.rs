//! Serial port transport.

use crate::error::{CommError, Result};
use crate::transport::Transport;
use avocado_protocol::split_lines;
use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Default line speed of the actuator controllers.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default read timeout per poll.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10);

const READ_CHUNK: usize = 256;

/// Transport over a physical serial port.
///
/// The port is opened by [`SerialTransport::open`] and closed when the value
/// is dropped.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    path: String,
    timeout: Duration,
}

impl SerialTransport {
    /// Open `path` (`/dev/ttyACM0`, `COM3`, ...) at the given speed.
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|source| CommError::TransportOpen {
                port: path.to_string(),
                source,
            })?;

        info!("Opened {} at {} baud (timeout {:?})", path, baud_rate, timeout);
        Ok(Self::from_port(port, path))
    }

    /// Wrap an already opened port, polling for as long as its timeout.
    pub fn from_port(port: Box<dyn SerialPort>, path: &str) -> Self {
        SerialTransport {
            timeout: port.timeout(),
            port,
            path: path.to_string(),
        }
    }
}

/// Read from `reader` until it goes quiet or `timeout` has elapsed.
///
/// A quiet line is a read that times out or returns nothing. A controller
/// that keeps talking cannot hold the poll open: once the deadline passes,
/// whatever arrived so far is returned.
pub(crate) fn read_until_quiet<R: Read + ?Sized>(
    reader: &mut R,
    timeout: Duration,
) -> io::Result<Vec<u8>> {
    let deadline = Instant::now() + timeout;
    let mut raw = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => raw.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
        if Instant::now() >= deadline {
            trace!("poll deadline reached with {} bytes", raw.len());
            break;
        }
    }

    Ok(raw)
}

impl Transport for SerialTransport {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()
    }

    fn read_available(&mut self) -> io::Result<Vec<Vec<u8>>> {
        let raw = read_until_quiet(&mut *self.port, self.timeout)?;
        trace!("{}: read {} bytes", self.path, raw.len());
        Ok(split_lines(&raw))
    }

    fn name(&self) -> String {
        self.path.clone()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        debug!("Closing {}", self.path);
    }
}
