pub mod locator;
pub mod rewriter;
pub mod zip;
pub mod builder;

pub use builder::ZipBuilder;
pub use locator::{locate_central_directory, CentralDirectoryLocation};
pub use rewriter::shift_offsets;
pub use zip::{ZipEntry, ZipFile};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompressMethod {
    Stored = 0,
    Deflated = 8
}

impl CompressMethod {
    pub fn convert_from_u16(value: u16) -> Option<CompressMethod> {
        match value {
            0 => Some(CompressMethod::Stored),
            8 => Some(CompressMethod::Deflated),
            _ => None
        }
    }

    pub fn value(&self) -> u16 {
        *self as u16
    }
}

pub(crate) const LOCAL_FILE_HEADER: u32 = 0x4034b50;
pub(crate) const CENTRAL_DIRECTORY_END: u32 = 0x6054b50;
pub(crate) const CENTRAL_DIRECTORY: u32 = 0x2014b50;

pub(crate) const LOCAL_FILE_HEADER_SIG: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];
pub(crate) const CENTRAL_DIRECTORY_SIG: [u8; 4] = [0x50, 0x4b, 0x01, 0x02];
pub(crate) const CENTRAL_DIRECTORY_END_SIG: [u8; 4] = [0x50, 0x4b, 0x05, 0x06];

pub(crate) const LOCAL_FILE_HEADER_LEN: usize = 30;
pub(crate) const CENTRAL_DIRECTORY_LEN: usize = 46;
pub(crate) const CENTRAL_DIRECTORY_END_LEN: usize = 22;

/// EOCD: offset of the central directory start field
pub(crate) const EOCD_CD_OFFSET_FIELD: usize = 16;
/// CD entry: offset of the local header offset field
pub(crate) const CD_LFH_OFFSET_FIELD: usize = 42;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_match_byte_form() {
        assert_eq!(LOCAL_FILE_HEADER.to_le_bytes(), LOCAL_FILE_HEADER_SIG);
        assert_eq!(CENTRAL_DIRECTORY.to_le_bytes(), CENTRAL_DIRECTORY_SIG);
        assert_eq!(CENTRAL_DIRECTORY_END.to_le_bytes(), CENTRAL_DIRECTORY_END_SIG);
    }

    #[test]
    fn compress_method_values() {
        assert_eq!(CompressMethod::convert_from_u16(8), Some(CompressMethod::Deflated));
        assert_eq!(CompressMethod::convert_from_u16(12), None);
        assert_eq!(CompressMethod::Stored.value(), 0);
    }
}
