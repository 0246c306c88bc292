//! Seekable little-endian reader over an archive

use std::io::{self, Read, Seek, SeekFrom};

/// Result of looking at the next byte without consuming it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peek {
    Byte(u8),
    EndOfStream,
}

/// Reader for archive records
///
/// Wraps any seekable byte source. Seeking past the end of a stream is not
/// an error in itself, so [`peek_byte`](ObjectReader::peek_byte) is used to
/// check that a position actually holds data.
#[derive(Debug)]
pub struct ObjectReader<R> {
    inner: R,
}

impl<R: Read + Seek> ObjectReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Current file position
    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    /// Move to an absolute file position
    pub fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(offset)).map(|_| ())
    }

    /// Look at the next byte, leaving the position unchanged
    pub fn peek_byte(&mut self) -> io::Result<Peek> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(Peek::EndOfStream),
                Ok(_) => {
                    self.inner.seek(SeekFrom::Current(-1))?;
                    return Ok(Peek::Byte(buf[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Read an i32 in little-endian format
    pub fn read_i32(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }
}
