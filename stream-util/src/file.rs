use std::fs::File;
use std::io::{Read, Result, Seek, SeekFrom, Write};
use std::path::Path;

use crate::mode::Mode;
use crate::stream::{Stream, StreamMetadata};

/// A file opened with a known mode, and optionally a known path.
#[derive(Debug)]
pub struct FileStream {
    file: File,
    meta: StreamMetadata,
}

impl FileStream {
    /// Opens `path` the way `mode` describes.
    pub fn open<P: AsRef<Path>>(path: P, mode: Mode) -> Result<FileStream> {
        let path = path.as_ref();
        let file = mode.open_options().open(path)?;
        FileStream::new(file, mode, Some(path))
    }

    /// Wraps an already open file. `mode` must describe how it was opened.
    pub fn new(file: File, mode: Mode, path: Option<&Path>) -> Result<FileStream> {
        // Pipes, sockets and character devices can't be repositioned.
        let seekable = file.metadata()?.file_type().is_file();

        Ok(FileStream {
            file,
            meta: StreamMetadata {
                mode,
                seekable,
                uri: path.map(|p| p.to_string_lossy().into_owned()),
                stream_type: "STDIO",
                wrapper_type: Some("plainfile"),
            },
        })
    }

    /// Wraps an already open file, reading its mode from the descriptor's access flags.
    #[cfg(unix)]
    pub fn from_file(file: File, path: Option<&Path>) -> Result<FileStream> {
        let mode = unix::access_mode(&file)?;
        FileStream::new(file, mode, path)
    }

    pub fn get_ref(&self) -> &File {
        &self.file
    }

    pub fn into_inner(self) -> File {
        self.file
    }
}

impl Read for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.file.read(buf)
    }
}

impl Write for FileStream {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        self.file.flush()
    }
}

impl Seek for FileStream {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.file.seek(pos)
    }
}

impl Stream for FileStream {
    #[inline(always)]
    fn metadata(&self) -> &StreamMetadata {
        &self.meta
    }

    fn position(&mut self) -> Result<u64> {
        self.file.seek(SeekFrom::Current(0))
    }

    fn seek_to(&mut self, pos: SeekFrom) -> Result<u64> {
        self.file.seek(pos)
    }

    fn size(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }
}

#[cfg(unix)]
mod unix {
    use std::fs::File;
    use std::io::{Error, Result};
    use std::os::unix::io::AsRawFd;

    use crate::mode::{Mode, PrimaryMode};

    pub(super) fn access_mode(file: &File) -> Result<Mode> {
        let flags = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_GETFL) };

        if flags == -1 {
            return Err(Error::last_os_error());
        }

        Ok(mode_from_flags(flags))
    }

    pub(super) fn mode_from_flags(flags: libc::c_int) -> Mode {
        let append = flags & libc::O_APPEND != 0;

        match flags & libc::O_ACCMODE {
            libc::O_WRONLY if append => Mode::new(PrimaryMode::Append, false),
            libc::O_WRONLY => Mode::new(PrimaryMode::Write, false),
            libc::O_RDWR if append => Mode::new(PrimaryMode::Append, true),
            libc::O_RDWR => Mode::new(PrimaryMode::Read, true),
            _ => Mode::new(PrimaryMode::Read, false),
        }
    }
}
