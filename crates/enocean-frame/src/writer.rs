use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_telegram, Telegram};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Writes complete telegrams to any `Write` stream.
pub struct TelegramWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> TelegramWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Write a complete telegram (blocking).
    pub fn write_telegram(&mut self, telegram: &Telegram) -> Result<()> {
        self.send(telegram.packet_type, &telegram.data, &telegram.optional)
    }

    /// Encode and send one telegram.
    pub fn send(&mut self, packet_type: u8, data: &[u8], optional: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_telegram(packet_type, data, optional, &mut self.buf)?;
        self.write_buffered()
    }

    /// Send bytes that are already a complete telegram (e.g. from `Packet::build`).
    pub fn send_raw(&mut self, wire: &[u8]) -> Result<()> {
        self.buf.clear();
        self.buf.extend_from_slice(wire);
        self.write_buffered()
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
