//! File loading with transparent gzip decompression.
//!
//! Case files may be stored plain or gzip-compressed (`.gz` suffix).
//! Either way the whole file is buffered in memory before parsing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::MultiGzDecoder;
use log::trace;

use crate::foam::types::error::{FoamError, Result};

/// Returns `true` if the path carries the compressed-file suffix.
pub fn is_compressed(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "gz")
}

/// Reads the entire content of `path`, gunzipping `.gz` files.
///
/// The file handle lives only for the duration of this call.
pub fn load(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut content = Vec::new();

    if is_compressed(path) {
        let mut decoder = MultiGzDecoder::new(&mut file);
        decoder.read_to_end(&mut content).map_err(|e| {
            FoamError::InvalidFormat(format!(
                "Gzip decompression of {} failed: {}",
                path.display(),
                e
            ))
        })?;
        trace!("Decompressed {} -> {} bytes", path.display(), content.len());
    } else {
        file.read_to_end(&mut content)?;
        trace!("Read {} bytes from {}", content.len(), path.display());
    }

    Ok(content)
}
