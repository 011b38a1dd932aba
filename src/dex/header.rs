use adler::adler32_slice;
use log::{debug, info, warn};
use sha1::{Digest, Sha1};

use super::{is_dex_magic, CHECKSUM_OFFSET, FILE_SIZE_OFFSET, SIGNATURE_LEN, SIGNATURE_OFFSET};
use crate::error::{PatchError, Result};
use crate::utils::{put_leu32_value, write_array};

const MIN_HEADER_LEN: usize = FILE_SIZE_OFFSET + 4;

/// Writes `length` into the file size field at 0x20.
pub fn update_dex_length(buffer: &mut [u8], length: usize) -> Result<()> {
    let size = u32::try_from(length).map_err(|_| PatchError::DexTooLarge { len: length })?;
    put_leu32_value(buffer, FILE_SIZE_OFFSET, size)
}

/// Recomputes the SHA-1 signature over `[0x20..]`, then the Adler-32
/// checksum over `[0x0C..]`.
///
/// The signature has to be written first since the checksum covers it.
pub fn update_checksum(buffer: &mut [u8]) -> Result<()> {
    if buffer.len() < MIN_HEADER_LEN {
        return Err(PatchError::DexTooShort { len: buffer.len() });
    }

    let signature = Sha1::digest(&buffer[FILE_SIZE_OFFSET..]);
    write_array(buffer, SIGNATURE_OFFSET, &signature[..SIGNATURE_LEN])?;

    let checksum = adler32_slice(&buffer[SIGNATURE_OFFSET..]);
    put_leu32_value(buffer, CHECKSUM_OFFSET, checksum)?;

    debug!("DEX signature {:02x?}, checksum {:#010x}", &signature[..], checksum);
    Ok(())
}

/// Makes the header of a DEX that starts at offset 0 of `buffer` valid for
/// the whole buffer: file size, signature and checksum.
///
/// Without `strict` a missing DEX magic is only logged and the fields are
/// patched anyway.
pub fn repair_dex_header(mut buffer: Vec<u8>, strict: bool) -> Result<Vec<u8>> {
    if buffer.len() < MIN_HEADER_LEN {
        return Err(PatchError::DexTooShort { len: buffer.len() });
    }
    if !is_dex_magic(&buffer) {
        if strict {
            return Err(PatchError::InvalidDexMagic);
        }
        warn!("Input data has no DEX magic, patching header fields anyway");
    }

    info!("Fixing DEX checksum...");
    let length = buffer.len();
    update_dex_length(&mut buffer, length)?;
    update_checksum(&mut buffer)?;
    Ok(buffer)
}
