//! Chunked file IO primitives for asset transfer.
//!
//! Byte ranges of local files are read or streamed without materializing the
//! whole file in memory, so that concurrent part uploads can each read their
//! own slice through an independent file handle. Whole-file digests stream
//! fixed-size blocks through SHA-256 the same way.

pub use self::chunk::{DEFAULT_BUFFER_SIZE, file_size, read_range, stream_range};
pub use self::digest::sha256_digest;
pub use self::error::{FileError, Result};

mod chunk;
mod digest;
mod error;
