//! Error type shared by the locator, rewriter, DEX repairer and the binaries.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    /// No `PK\x05\x06` signature anywhere in the archive
    #[error("End of central directory signature not found")]
    EocdNotFound,

    /// A fixed-width field runs past the end of the buffer
    #[error("Truncated data at {offset:#x}: need {needed} bytes, buffer holds {len}")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// Shifted offset no longer fits in a 32-bit ZIP field
    #[error("Offset {offset:#x} shifted by {shift} overflows 32 bits")]
    OffsetOverflow { offset: u32, shift: usize },

    #[error("Input data is not a DEX file (bad magic)")]
    InvalidDexMagic,

    #[error("Data too short for a DEX header: {len} bytes")]
    DexTooShort { len: usize },

    /// Output length does not fit the 32-bit DEX file size field
    #[error("Output of {len} bytes is too large for a DEX header")]
    DexTooLarge { len: usize },

    #[error("zip format error at: {offset}, reason: {reason}")]
    ZipFormat { offset: usize, reason: &'static str },

    /// No local file header found to split a prepended payload from the archive
    #[error("No prepended payload found before the first local file header")]
    PayloadNotFound,

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PatchError>;

impl PatchError {
    pub fn from_io_error(path: impl Into<String>, error: io::Error) -> Self {
        PatchError::Io {
            path: path.into(),
            source: error,
        }
    }

    pub(crate) fn zip_format(offset: usize, reason: &'static str) -> Self {
        PatchError::ZipFormat { offset, reason }
    }
}
