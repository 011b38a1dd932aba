use log::{debug, warn};
use crate::apk_zip::{CENTRAL_DIRECTORY_END_LEN, CENTRAL_DIRECTORY_END_SIG, EOCD_CD_OFFSET_FIELD};
use crate::error::{PatchError, Result};
use crate::utils::{get_leu16_value, get_leu32_value, rfind_signature};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentralDirectoryLocation {
    pub eocd_offset: usize,
    pub cd_start: u32,
}

/// Finds the end of central directory record and the central directory start
/// it points at.
///
/// The EOCD is taken to be the last `PK\x05\x06` in the buffer. A ZIP comment
/// that itself contains those four bytes would fool this; when the comment
/// length stored in the record does not reach exactly to the end of the
/// buffer a warning is logged, but the record is still used.
pub fn locate_central_directory(data: &[u8]) -> Result<CentralDirectoryLocation> {
    let eocd_offset = rfind_signature(data, &CENTRAL_DIRECTORY_END_SIG)
        .ok_or(PatchError::EocdNotFound)?;
    let cd_start = get_leu32_value(data, eocd_offset + EOCD_CD_OFFSET_FIELD)?;

    if let Ok(comment_len) = get_leu16_value(data, eocd_offset + CENTRAL_DIRECTORY_END_LEN - 2) {
        let record_end = eocd_offset + CENTRAL_DIRECTORY_END_LEN + comment_len as usize;
        if record_end != data.len() {
            warn!(
                "EOCD at {:#x} with comment length {} ends at {:#x}, archive is {:#x} bytes",
                eocd_offset, comment_len, record_end, data.len()
            );
        }
    }

    debug!("Central directory end address: {:#x}", eocd_offset);
    debug!("Central directory start address: {:#x}", cd_start);
    Ok(CentralDirectoryLocation { eocd_offset, cd_start })
}
