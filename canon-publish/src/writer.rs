//! Atomic artifact writer.
//!
//! Write flow: normalise line endings to LF → SHA-256 the content → write to
//! a `.canon.tmp` sibling → rename to the final path (atomic on POSIX).
//! Every artifact is written exactly once per run; there is no skip/compare
//! step because the whole tree is rebuilt from scratch.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{io_err, PublishError};

/// Outcome of one artifact write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub path: PathBuf,
    pub bytes: usize,
    /// SHA-256 hex digest of the written content.
    pub digest: String,
}

/// Atomically write UTF-8 text, normalising CRLF to LF first.
pub fn write_text_atomic(path: &Path, content: &str) -> Result<WriteOutcome, PublishError> {
    let normalized = content.replace("\r\n", "\n");
    write_bytes_atomic(path, normalized.as_bytes())
}

/// Atomically write raw bytes (registry mirrors are copied verbatim).
pub fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> Result<WriteOutcome, PublishError> {
    let digest = {
        let mut h = Sha256::new();
        h.update(bytes);
        hex::encode(h.finalize())
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let tmp = PathBuf::from(format!("{}.canon.tmp", path.display()));
    std::fs::write(&tmp, bytes).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {} ({} bytes)", path.display(), bytes.len());
    Ok(WriteOutcome {
        path: path.to_path_buf(),
        bytes: bytes.len(),
        digest,
    })
}
