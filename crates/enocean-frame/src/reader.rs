use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::{trace, warn};

use crate::codec::{decode_telegram, FrameConfig, Telegram, SYNC_BYTE};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 256;

/// Reads complete telegrams from any `Read` stream (serial port, socket, file).
///
/// Handles partial reads internally and skips corrupt telegrams, so callers
/// always get valid telegrams.
pub struct TelegramReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
    dropped: u64,
}

impl<T: Read> TelegramReader<T> {
    /// Create a new telegram reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new telegram reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            dropped: 0,
        }
    }

    /// Read the next valid telegram (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_telegram(&mut self) -> Result<Telegram> {
        loop {
            match decode_telegram(&mut self.buf, self.config.max_telegram_len) {
                Ok(Some(telegram)) => return Ok(telegram),
                Ok(None) => {}
                Err(err) if err.is_corrupt() => {
                    self.dropped = self.dropped.saturating_add(1);
                    warn!(error = %err, dropped = self.dropped, "skipping corrupt telegram");
                    continue;
                }
                Err(err) => return Err(err),
            }

            if !self.buf.contains(&SYNC_BYTE) && !self.buf.is_empty() {
                trace!(len = self.buf.len(), "discarding bytes without sync");
                self.buf.clear();
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Number of corrupt telegrams skipped so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl<T: Read> Iterator for TelegramReader<T> {
    type Item = Result<Telegram>;

    /// Yields telegrams until the stream ends cleanly.
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_telegram() {
            Ok(telegram) => Some(Ok(telegram)),
            Err(FrameError::ConnectionClosed) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
