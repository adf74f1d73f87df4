mod file;
pub mod mode;
mod reader;
mod stream;
mod temp;
mod util;

pub use file::FileStream;
pub use mode::{
    mode_is_append_only, mode_is_appendable, mode_is_read_only, mode_is_readable,
    mode_is_writable, mode_is_write_only, Mode, ModeError, PrimaryMode, Translation,
};
pub use reader::ReaderStream;
pub use stream::{Stream, StreamMetadata, Whence};
pub use temp::{TempStream, DEFAULT_MEMORY_LIMIT};
pub use util::{
    copy, copy_retaining, get_metadata_key, get_size, get_uri, get_usable_uri, is_appendable,
    is_readable, is_seekable, is_writable, try_rewind, try_seek,
};
