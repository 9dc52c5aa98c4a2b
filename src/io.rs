use crate::error::AsmapDiffError;
use log::debug;
use std::io::Read;
use std::path::Path;

/// Checks that `path` exists and is a regular file.
pub fn check_input(path: &Path) -> Result<(), AsmapDiffError> {
    if !path.exists() {
        return Err(AsmapDiffError::InputNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(AsmapDiffError::InputNotAFile(path.to_path_buf()));
    }
    Ok(())
}

/// Reads the full content of a local file. `.gz` and `.bz2` files are decompressed on the fly.
pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, AsmapDiffError> {
    let read_failed = |reason: String| AsmapDiffError::ReadFailed {
        path: path.to_path_buf(),
        reason,
    };
    let path_str = path
        .to_str()
        .ok_or_else(|| read_failed("path is not valid UTF-8".to_string()))?;
    let mut reader = oneio::get_reader(path_str).map_err(|e| read_failed(e.to_string()))?;
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| read_failed(e.to_string()))?;
    debug!("read {} bytes from {}", buf.len(), path.display());
    Ok(buf)
}
