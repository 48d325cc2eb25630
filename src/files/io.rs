//! UTF-8 document reads and writes.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};

/// Read `path` as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8 {
        path: path.to_path_buf(),
    })?;
    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Write `text` to `path` as UTF-8.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// Whether a read error means the file is simply gone.
pub fn is_not_found(error: &Error) -> bool {
    matches!(error, Error::FileRead { source, .. } if source.kind() == ErrorKind::NotFound)
}
