use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures_util::Stream;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::error::{FileError, Result};

/// Default chunk size for [`stream_range`].
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Return the size of a regular file in bytes.
///
/// Fails with [`FileError::NotFound`] if the path does not exist and
/// [`FileError::NotAFile`] if it points at a directory.
pub async fn file_size(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| not_found_or_io(e, path))?;

    if !metadata.is_file() {
        return Err(FileError::NotAFile(path.to_path_buf()));
    }

    Ok(metadata.len())
}

/// Read up to `size` bytes starting at `offset`.
///
/// Returns fewer bytes only when the range extends past end-of-file. The file
/// is opened fresh for every call, so concurrent readers never share a seek
/// cursor.
pub async fn read_range(path: impl AsRef<Path>, offset: u64, size: u64) -> Result<Bytes> {
    let path = path.as_ref();
    let mut file = open(path).await?;
    file.seek(SeekFrom::Start(offset)).await?;

    let mut buffer = Vec::new();
    file.take(size).read_to_end(&mut buffer).await?;

    Ok(Bytes::from(buffer))
}

/// Stream the byte range `[offset, offset + size)` in chunks of at most
/// `buffer_size` bytes.
///
/// The stream totals `min(size, len - offset)` bytes and is empty when
/// `offset` is at or beyond end-of-file. The final chunk may be shorter than
/// `buffer_size`. Each call reopens the file, so the stream is restartable.
pub async fn stream_range(
    path: impl AsRef<Path>,
    offset: u64,
    size: u64,
    buffer_size: usize,
) -> Result<impl Stream<Item = Result<Bytes>>> {
    let path = path.as_ref();
    let buffer_size = buffer_size.max(1);

    let len = file_size(path).await?;
    let remaining = size.min(len.saturating_sub(offset));

    let mut file = open(path).await?;
    file.seek(SeekFrom::Start(offset)).await?;

    Ok(futures_util::stream::try_unfold(
        (file, remaining),
        move |(mut file, mut remaining)| async move {
            if remaining == 0 {
                return Ok(None);
            }

            let want = remaining.min(buffer_size as u64) as usize;
            let mut buffer = vec![0u8; want];
            let mut filled = 0;
            while filled < want {
                let n = file.read(&mut buffer[filled..]).await?;
                if n == 0 {
                    break;
                }
                filled += n;
            }

            if filled == 0 {
                return Ok(None);
            }

            buffer.truncate(filled);
            remaining -= filled as u64;
            Ok(Some((Bytes::from(buffer), (file, remaining))))
        },
    ))
}

pub(crate) async fn open(path: &Path) -> Result<File> {
    File::open(path)
        .await
        .map_err(|e| not_found_or_io(e, path))
}

fn not_found_or_io(error: std::io::Error, path: &Path) -> FileError {
    if error.kind() == std::io::ErrorKind::NotFound {
        FileError::NotFound(PathBuf::from(path))
    } else {
        FileError::Io(error)
    }
}
