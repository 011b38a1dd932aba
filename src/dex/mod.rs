//! DEX header handling
//!
//! Only the leading header fields that carry integrity data are touched:
//! the Adler-32 checksum, the SHA-1 signature and the file size.

mod header;

pub use header::{repair_dex_header, update_checksum, update_dex_length};

pub const DEX_MAGIC: [u8; 4] = *b"dex\n";

/// DEX header offsets
pub const CHECKSUM_OFFSET: usize = 0x08;
pub const SIGNATURE_OFFSET: usize = 0x0C;
pub const FILE_SIZE_OFFSET: usize = 0x20;
pub const SIGNATURE_LEN: usize = 20;

/// `dex\n` followed by a three digit version and a NUL, e.g. `dex\n035\0`.
pub fn is_dex_magic(data: &[u8]) -> bool {
    data.len() >= 8
        && data[..4] == DEX_MAGIC
        && data[4..7].iter().all(|b| b.is_ascii_digit())
        && data[7] == 0
}
