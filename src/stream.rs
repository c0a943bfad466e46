use std::io::ErrorKind;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

use crate::error::Result;

const DEFAULT_CAPACITY: usize = 64;

/// Continuous reader that hands out whatever the port delivers, chunk by chunk.
pub struct ByteStream<R> {
    reader: R,
    buffer: BytesMut,
    capacity: usize,
    bytes_seen: u64,
}

impl<R: AsyncRead + Unpin> ByteStream<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        ByteStream {
            reader,
            buffer: BytesMut::with_capacity(capacity),
            capacity,
            bytes_seen: 0,
        }
    }

    /// Waits for the next non-empty chunk. `None` means end of input.
    ///
    /// Cancel safe: dropping the future before it resolves loses no data.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        loop {
            self.buffer.reserve(self.capacity);
            match self.reader.read_buf(&mut self.buffer).await {
                Ok(0) => return Ok(None),
                Ok(n) => {
                    self.bytes_seen += n as u64;
                    trace!("Read {} bytes", n);
                    return Ok(Some(self.buffer.split().freeze()));
                }
                Err(ref e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted) => {
                    continue
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn bytes_seen(&self) -> u64 {
        self.bytes_seen
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
