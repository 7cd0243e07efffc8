use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use crate::chunk::open;
use crate::error::Result;

const DIGEST_BLOCK_SIZE: usize = 8192;

/// Compute the SHA-256 digest of a file as a lowercase hex string.
///
/// The file is streamed through the hasher in fixed-size blocks; the full
/// content is never held in memory.
pub async fn sha256_digest(path: impl AsRef<Path>) -> Result<String> {
    let mut file = open(path.as_ref()).await?;
    let mut hasher = Sha256::new();
    let mut block = vec![0u8; DIGEST_BLOCK_SIZE];

    loop {
        let n = file.read(&mut block).await?;
        if n == 0 {
            break;
        }
        hasher.update(&block[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}
