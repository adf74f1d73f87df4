//! Helpers for dealing with streams.
//!
//! Everything here works on any [`Stream`]. Seeking helpers report whether
//! the move happened as a plain `bool` and never fail.

use std::convert::TryFrom;
use std::io::{Result, SeekFrom};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::stream::{Stream, Whence};
use crate::temp::TempStream;

/// Copies a stream into a new [`TempStream`], closing the original.
///
/// The source is rewound first if it can be. If it can't, only the bytes
/// from its current position onwards are copied. The returned stream's
/// cursor is placed where the source's cursor was.
pub fn copy<S: Stream>(mut stream: S) -> Result<TempStream> {
    let (mut cloned, position) = transfer(&mut stream)?;
    drop(stream);

    tracing::debug!(position, "closed source stream after copy");

    cloned.seek_to(SeekFrom::Start(position))?;
    Ok(cloned)
}

/// Like [`copy`], but leaves the source open and tries to put its cursor
/// back where it was.
pub fn copy_retaining<S: Stream + ?Sized>(stream: &mut S) -> Result<TempStream> {
    let (mut cloned, position) = transfer(stream)?;

    let restored = i64::try_from(position)
        .map(|offset| try_seek(stream, offset, Whence::Set))
        .unwrap_or(false);

    if !restored {
        tracing::debug!(position, "could not restore source position after copy");
    }

    cloned.seek_to(SeekFrom::Start(position))?;
    Ok(cloned)
}

fn transfer<S: Stream + ?Sized>(stream: &mut S) -> Result<(TempStream, u64)> {
    let mut cloned = TempStream::new();
    let position = stream.position()?;

    let rewound = try_rewind(stream);
    let bytes = std::io::copy(stream, &mut cloned)?;

    tracing::debug!(position, rewound, bytes, "copied stream");

    Ok((cloned, position))
}

#[inline(always)]
pub fn get_metadata_key<S: Stream + ?Sized>(stream: &S, key: &str) -> Option<Value> {
    stream.metadata().get(key)
}

#[inline(always)]
pub fn get_uri<S: Stream + ?Sized>(stream: &S) -> Option<&str> {
    stream.metadata().uri.as_deref()
}

/// Returns the stream's location if it names something that currently exists.
///
/// This probes the filesystem, so the answer may be stale by the time it is used.
pub fn get_usable_uri<S: Stream + ?Sized>(stream: &S) -> Option<PathBuf> {
    let uri = get_uri(stream).filter(|uri| !uri.is_empty())?;
    let path = Path::new(uri);

    if path.exists() {
        Some(path.to_path_buf())
    } else {
        None
    }
}

/// Returns the size of a stream.
///
/// A size of 0 could also mean the stream isn't reporting its size.
#[inline(always)]
pub fn get_size<S: Stream + ?Sized>(stream: &S) -> Result<u64> {
    stream.size()
}

#[inline(always)]
pub fn is_appendable<S: Stream + ?Sized>(stream: &S) -> bool {
    stream.metadata().mode.is_appendable()
}

#[inline(always)]
pub fn is_readable<S: Stream + ?Sized>(stream: &S) -> bool {
    stream.metadata().mode.is_readable()
}

#[inline(always)]
pub fn is_seekable<S: Stream + ?Sized>(stream: &S) -> bool {
    stream.metadata().seekable
}

#[inline(always)]
pub fn is_writable<S: Stream + ?Sized>(stream: &S) -> bool {
    stream.metadata().mode.is_writable()
}

/// Tries to rewind a stream. Returns `true` if the cursor ends up at 0.
#[must_use]
pub fn try_rewind<S: Stream + ?Sized>(stream: &mut S) -> bool {
    if let Ok(0) = stream.position() {
        return true;
    }

    seek_if_seekable(stream, SeekFrom::Start(0))
}

/// Tries to seek a stream. Returns `true` if the seek happened.
///
/// Seeking to the position the stream is already at succeeds without
/// touching the stream.
#[must_use]
pub fn try_seek<S: Stream + ?Sized>(stream: &mut S, offset: i64, whence: Whence) -> bool {
    let pos = match whence.to_seek_from(offset) {
        Some(pos) => pos,
        None => return false,
    };

    if let SeekFrom::Start(wanted) = pos {
        if matches!(stream.position(), Ok(current) if current == wanted) {
            tracing::trace!(position = wanted, "already at seek target");
            return true;
        }
    }

    seek_if_seekable(stream, pos)
}

fn seek_if_seekable<S: Stream + ?Sized>(stream: &mut S, pos: SeekFrom) -> bool {
    if !is_seekable(stream) {
        tracing::debug!(?pos, "refusing to seek a non-seekable stream");
        return false;
    }

    match stream.seek_to(pos) {
        Ok(_) => true,
        Err(err) => {
            tracing::debug!(?pos, error = %err, "seek failed");
            false
        }
    }
}
