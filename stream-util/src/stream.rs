use std::io::{Read, Result, SeekFrom};

use serde_json::Value;

use crate::mode::Mode;

/// Metadata describing an open stream, captured when the stream is constructed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StreamMetadata {
    pub mode: Mode,
    pub seekable: bool,
    /// Where the bytes live, if anywhere outside of memory.
    pub uri: Option<String>,
    pub stream_type: &'static str,
    pub wrapper_type: Option<&'static str>,
}

impl StreamMetadata {
    /// Looks up a field by name. Unknown keys and absent fields both give `None`.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "mode" => Some(Value::String(self.mode.to_string())),
            "seekable" => Some(Value::Bool(self.seekable)),
            "uri" => self.uri.clone().map(Value::String),
            "stream_type" => Some(Value::from(self.stream_type)),
            "wrapper_type" => self.wrapper_type.map(Value::from),
            _ => None,
        }
    }
}

/// Reference point for a signed seek offset.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Whence {
    Set,
    Current,
    End,
}

impl Default for Whence {
    fn default() -> Self {
        Whence::Set
    }
}

impl Whence {
    /// Returns `None` for a negative absolute offset.
    pub fn to_seek_from(self, offset: i64) -> Option<SeekFrom> {
        match self {
            Whence::Set if offset < 0 => None,
            Whence::Set => Some(SeekFrom::Start(offset as u64)),
            Whence::Current => Some(SeekFrom::Current(offset)),
            Whence::End => Some(SeekFrom::End(offset)),
        }
    }
}

/// An open byte stream whose lifecycle belongs to the caller.
pub trait Stream: Read {
    fn metadata(&self) -> &StreamMetadata;

    /// Current cursor position.
    fn position(&mut self) -> Result<u64>;

    fn seek_to(&mut self, pos: SeekFrom) -> Result<u64>;

    /// Length in bytes. Streams that cannot tell report 0, so 0 does not
    /// reliably mean empty.
    fn size(&self) -> Result<u64>;
}

impl<S: Stream + ?Sized> Stream for Box<S> {
    fn metadata(&self) -> &StreamMetadata {
        (**self).metadata()
    }

    fn position(&mut self) -> Result<u64> {
        (**self).position()
    }

    fn seek_to(&mut self, pos: SeekFrom) -> Result<u64> {
        (**self).seek_to(pos)
    }

    fn size(&self) -> Result<u64> {
        (**self).size()
    }
}
