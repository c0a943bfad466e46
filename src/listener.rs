use std::io::{ErrorKind, Read};

use serialport::SerialPort;
use tracing::{debug, info};

use crate::config::LineSettings;
use crate::error::Result;

/// A byte source that can tell how much input is already buffered.
pub trait PendingRead: Read {
    fn bytes_pending(&self) -> Result<usize>;
}

impl PendingRead for Box<dyn SerialPort> {
    fn bytes_pending(&self) -> Result<usize> {
        Ok(self.bytes_to_read()? as usize)
    }
}

/// One-shot reader over an open port.
pub struct SerialPortListener<P> {
    port: P,
}

impl SerialPortListener<Box<dyn SerialPort>> {
    pub fn open(settings: &LineSettings) -> Result<Self> {
        let port = settings.builder().open()?;
        info!("Opened {}", settings);
        Ok(SerialPortListener::new(port))
    }
}

impl<P: PendingRead> SerialPortListener<P> {
    pub fn new(port: P) -> Self {
        SerialPortListener { port }
    }

    /// A listener only exists while it owns the port, so this is always
    /// true until `close` consumes it.
    pub fn is_open(&self) -> bool {
        true
    }

    pub fn bytes_waiting(&self) -> Result<usize> {
        self.port.bytes_pending()
    }

    /// Reads up to `n` bytes. Returns fewer when the port times out or
    /// reports end of input first.
    pub fn read_exact_or_timeout(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0; n];
        let mut filled = 0;
        while filled < n {
            match self.port.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(k) => filled += k,
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(ref e) if e.kind() == ErrorKind::TimedOut => {
                    debug!("Timed out after {} of {} bytes", filled, n);
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
        buf.truncate(filled);
        Ok(buf)
    }

    /// Reads whatever is currently buffered, nothing more.
    pub fn read_waiting(&mut self) -> Result<Vec<u8>> {
        let n = self.bytes_waiting()?;
        self.read_exact_or_timeout(n)
    }

    pub fn close(self) {
        drop(self.port);
        debug!("Port closed");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::VecDeque;
    use std::io;

    /// Replays a script of read results. Reading past the end times out.
    struct ScriptedPort {
        reads: VecDeque<io::Result<Vec<u8>>>,
        calls: usize,
    }

    impl ScriptedPort {
        fn new(reads: Vec<io::Result<Vec<u8>>>) -> Self {
            ScriptedPort {
                reads: reads.into(),
                calls: 0,
            }
        }
    }

    impl Read for ScriptedPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.calls += 1;
            match self.reads.pop_front() {
                Some(Ok(data)) => {
                    let n = data.len().min(buf.len());
                    buf[..n].copy_from_slice(&data[..n]);
                    if n < data.len() {
                        self.reads.push_front(Ok(data[n..].to_vec()));
                    }
                    Ok(n)
                }
                Some(Err(e)) => Err(e),
                None => Err(io::Error::new(ErrorKind::TimedOut, "timed out")),
            }
        }
    }

    impl PendingRead for ScriptedPort {
        fn bytes_pending(&self) -> Result<usize> {
            Ok(self
                .reads
                .iter()
                .map(|r| r.as_ref().map_or(0, |d| d.len()))
                .sum())
        }
    }

    #[test]
    fn test_read_waiting() {
        let port = ScriptedPort::new(vec![Ok(vec![0x55, 0xaa]), Ok(vec![0x01])]);
        let mut listener = SerialPortListener::new(port);

        assert!(listener.is_open());
        assert_eq!(listener.bytes_waiting().unwrap(), 3);
        assert_eq!(listener.read_waiting().unwrap(), vec![0x55, 0xaa, 0x01]);
        assert_eq!(listener.bytes_waiting().unwrap(), 0);
        listener.close();
    }

    #[test]
    fn test_stops_at_requested_count() {
        let port = ScriptedPort::new(vec![Ok(vec![1, 2, 3, 4, 5])]);
        let mut listener = SerialPortListener::new(port);

        assert_eq!(listener.read_exact_or_timeout(2).unwrap(), vec![1, 2]);
        assert_eq!(listener.bytes_waiting().unwrap(), 3);
    }

    #[test]
    fn test_timeout_returns_partial() {
        let port = ScriptedPort::new(vec![Ok(vec![7, 8])]);
        let mut listener = SerialPortListener::new(port);

        assert_eq!(listener.read_exact_or_timeout(10).unwrap(), vec![7, 8]);
    }

    #[test]
    fn test_end_of_input_returns_partial() {
        let port = ScriptedPort::new(vec![Ok(vec![9]), Ok(vec![]), Ok(vec![10])]);
        let mut listener = SerialPortListener::new(port);

        assert_eq!(listener.read_exact_or_timeout(3).unwrap(), vec![9]);
    }

    #[test]
    fn test_interrupted_is_retried() {
        let port = ScriptedPort::new(vec![
            Ok(vec![1]),
            Err(io::Error::new(ErrorKind::Interrupted, "signal")),
            Ok(vec![2]),
        ]);
        let mut listener = SerialPortListener::new(port);

        assert_eq!(listener.read_exact_or_timeout(2).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_other_errors_propagate() {
        let port = ScriptedPort::new(vec![Err(io::Error::new(
            ErrorKind::BrokenPipe,
            "device unplugged",
        ))]);
        let mut listener = SerialPortListener::new(port);

        assert!(matches!(
            listener.read_exact_or_timeout(1),
            Err(crate::error::Error::Io(_))
        ));
    }

    #[test]
    fn test_nothing_buffered_does_not_read() {
        let mut listener = SerialPortListener::new(ScriptedPort::new(vec![]));

        assert!(listener.read_waiting().unwrap().is_empty());
        assert_eq!(listener.port.calls, 0);
    }
}
