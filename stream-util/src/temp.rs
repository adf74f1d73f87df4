//! A scratch stream that lives in memory until it grows too large.

use std::fs::File;
use std::io::{Cursor, Read, Result, Seek, SeekFrom, Write};

use crate::mode::{Mode, PrimaryMode, Translation};
use crate::stream::{Stream, StreamMetadata};

/// Bytes kept in memory before a [`TempStream`] moves to disk.
pub const DEFAULT_MEMORY_LIMIT: usize = 2 * 1024 * 1024;

enum Backing {
    Memory(Cursor<Vec<u8>>),
    File(File),
}

/// A writable, seekable stream with no backing location.
///
/// Data is held in memory until a write would take it past the memory limit,
/// at which point it moves to an anonymous temporary file. The cursor
/// position survives the move.
pub struct TempStream {
    backing: Backing,
    limit: usize,
    meta: StreamMetadata,
}

impl TempStream {
    pub fn new() -> TempStream {
        TempStream::with_memory_limit(DEFAULT_MEMORY_LIMIT)
    }

    pub fn with_memory_limit(limit: usize) -> TempStream {
        TempStream {
            backing: Backing::Memory(Cursor::new(Vec::new())),
            limit,
            meta: StreamMetadata {
                mode: Mode::new(PrimaryMode::Write, true).with_translation(Translation::Binary),
                seekable: true,
                uri: None,
                stream_type: "TEMP",
                wrapper_type: None,
            },
        }
    }

    #[inline(always)]
    pub fn memory_limit(&self) -> usize {
        self.limit
    }

    /// Whether the contents have moved to a temporary file.
    #[inline(always)]
    pub fn is_spilled(&self) -> bool {
        matches!(self.backing, Backing::File(_))
    }

    fn spill(&mut self) -> Result<()> {
        let file = match &self.backing {
            Backing::Memory(cursor) => {
                let mut file = tempfile::tempfile()?;
                file.write_all(cursor.get_ref())?;
                file.seek(SeekFrom::Start(cursor.position()))?;

                tracing::debug!(
                    bytes = cursor.get_ref().len(),
                    limit = self.limit,
                    "temp stream moved to disk"
                );

                file
            }
            Backing::File(_) => return Ok(()),
        };

        self.backing = Backing::File(file);
        Ok(())
    }

    fn would_overflow(&self, len: usize) -> bool {
        match &self.backing {
            Backing::Memory(cursor) => {
                cursor.position().saturating_add(len as u64) > self.limit as u64
            }
            Backing::File(_) => false,
        }
    }
}

impl Default for TempStream {
    fn default() -> Self {
        TempStream::new()
    }
}

impl std::fmt::Debug for TempStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TempStream")
            .field("spilled", &self.is_spilled())
            .field("limit", &self.limit)
            .field("meta", &self.meta)
            .finish()
    }
}

impl Read for TempStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match &mut self.backing {
            Backing::Memory(cursor) => cursor.read(buf),
            Backing::File(file) => file.read(buf),
        }
    }
}

impl Write for TempStream {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if self.would_overflow(buf.len()) {
            self.spill()?;
        }

        match &mut self.backing {
            Backing::Memory(cursor) => cursor.write(buf),
            Backing::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> Result<()> {
        match &mut self.backing {
            Backing::Memory(_) => Ok(()),
            Backing::File(file) => file.flush(),
        }
    }
}

impl Seek for TempStream {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        match &mut self.backing {
            Backing::Memory(cursor) => cursor.seek(pos),
            Backing::File(file) => file.seek(pos),
        }
    }
}

impl Stream for TempStream {
    #[inline(always)]
    fn metadata(&self) -> &StreamMetadata {
        &self.meta
    }

    fn position(&mut self) -> Result<u64> {
        match &mut self.backing {
            Backing::Memory(cursor) => Ok(cursor.position()),
            Backing::File(file) => file.seek(SeekFrom::Current(0)),
        }
    }

    fn seek_to(&mut self, pos: SeekFrom) -> Result<u64> {
        self.seek(pos)
    }

    fn size(&self) -> Result<u64> {
        match &self.backing {
            Backing::Memory(cursor) => Ok(cursor.get_ref().len() as u64),
            Backing::File(file) => Ok(file.metadata()?.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_grows_with_writes() {
        let mut stream = TempStream::new();
        assert_eq!(stream.size().unwrap(), 0);

        stream.write_all(b"aaaaaaaaaa").unwrap();
        assert_eq!(stream.size().unwrap(), 10);
        assert_eq!(stream.position().unwrap(), 10);
        assert!(!stream.is_spilled());
    }

    #[test]
    fn metadata() {
        let stream = TempStream::default();
        let meta = stream.metadata();
        assert!(meta.seekable);
        assert!(meta.uri.is_none());
        assert!(meta.mode.is_readable());
        assert!(meta.mode.is_writable());
        assert_eq!(meta.mode.to_string(), "w+b");
        assert_eq!(stream.memory_limit(), DEFAULT_MEMORY_LIMIT);
    }

    #[test]
    fn spills_past_limit() {
        let mut stream = TempStream::with_memory_limit(8);
        stream.write_all(b"12345").unwrap();
        assert!(!stream.is_spilled());

        stream.seek_to(SeekFrom::Start(2)).unwrap();
        stream.write_all(b"abcdefgh").unwrap();
        assert!(stream.is_spilled());
        assert_eq!(stream.position().unwrap(), 10);
        assert_eq!(stream.size().unwrap(), 10);

        stream.seek_to(SeekFrom::Start(0)).unwrap();
        let mut out = String::new();
        stream.read_to_string(&mut out).unwrap();
        assert_eq!(out, "12abcdefgh");
    }

    #[test]
    fn seek_past_end_pads_on_write() {
        let mut stream = TempStream::new();
        stream.seek_to(SeekFrom::Start(3)).unwrap();
        stream.write_all(b"x").unwrap();
        stream.seek_to(SeekFrom::Start(0)).unwrap();

        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"\0\0\0x");
    }
}
