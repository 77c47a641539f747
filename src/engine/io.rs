//! GB7 file I/O
//!
//! Thin filesystem wrappers around the in-memory codec. Generic raster
//! formats are read and written by the host.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::codec::{decode_gb7, encode_gb7, Gb7EncodeOptions};
use crate::engine::buffer::{GrayBuffer, PixelBuffer};
use crate::error::Result;

/// Read and decode a GB7 file
///
/// # Arguments
/// * `path` - Path to the `.gb7` file
///
/// # Errors
/// Returns an I/O error if the file cannot be read, or a format error if
/// its contents are not a valid GB7 stream.
pub fn read_gb7(path: &Path) -> Result<GrayBuffer> {
    let bytes = fs::read(path)?;
    let gray = decode_gb7(&bytes)?;
    info!(
        path = %path.display(),
        width = gray.width(),
        height = gray.height(),
        "loaded GB7 image"
    );
    Ok(gray)
}

/// Encode a buffer as GB7 and write it to `path`
///
/// # Arguments
/// * `path` - Destination file, overwritten if it exists
/// * `buffer` - RGBA pixels to export
/// * `opts` - Encoder settings
pub fn write_gb7(path: &Path, buffer: &PixelBuffer, opts: &Gb7EncodeOptions) -> Result<()> {
    let bytes = encode_gb7(buffer, opts)?;
    fs::write(path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "exported GB7 image");
    Ok(())
}
