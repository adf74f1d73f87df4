use std::io::{Error, ErrorKind, Read, Result, SeekFrom};

use crate::mode::{Mode, PrimaryMode};
use crate::stream::{Stream, StreamMetadata};

/// Wraps any reader as a read-only, non-seekable stream.
///
/// The position is the number of bytes consumed so far. Size is reported as
/// 0 since a plain reader has no way of knowing it.
#[derive(Debug)]
pub struct ReaderStream<R> {
    inner: R,
    consumed: u64,
    meta: StreamMetadata,
}

impl<R: Read> ReaderStream<R> {
    pub fn new(inner: R) -> ReaderStream<R> {
        ReaderStream {
            inner,
            consumed: 0,
            meta: StreamMetadata {
                mode: Mode::new(PrimaryMode::Read, false),
                seekable: false,
                uri: None,
                stream_type: "READER",
                wrapper_type: None,
            },
        }
    }

    /// Records where the reader's bytes come from, e.g. a socket address or a FIFO path.
    pub fn with_uri<S: Into<String>>(inner: R, uri: S) -> ReaderStream<R> {
        let mut stream = ReaderStream::new(inner);
        stream.meta.uri = Some(uri.into());
        stream
    }

    #[inline(always)]
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for ReaderStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.inner.read(buf)?;
        self.consumed += n as u64;
        Ok(n)
    }
}

impl<R: Read> Stream for ReaderStream<R> {
    #[inline(always)]
    fn metadata(&self) -> &StreamMetadata {
        &self.meta
    }

    fn position(&mut self) -> Result<u64> {
        Ok(self.consumed)
    }

    fn seek_to(&mut self, _pos: SeekFrom) -> Result<u64> {
        Err(Error::new(ErrorKind::Other, "reader stream does not support seeking"))
    }

    fn size(&self) -> Result<u64> {
        Ok(0)
    }
}
