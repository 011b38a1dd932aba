//! Prepend pipeline: locate the central directory, shift its offsets, glue the
//! data in front and optionally fix the DEX header of the result.

use std::fs;
use std::path::Path;

use log::info;

use crate::apk_zip::{
    locate_central_directory, shift_offsets, CentralDirectoryLocation, ZipFile,
    LOCAL_FILE_HEADER_SIG,
};
use crate::config::PatchConfig;
use crate::dex::repair_dex_header;
use crate::error::{PatchError, Result};
use crate::utils::find_signature;

#[derive(Debug)]
pub struct PatchOutcome {
    pub data: Vec<u8>,
    /// Central directory location in the input archive, before shifting
    pub location: CentralDirectoryLocation,
    /// Central directory entries whose local header offset was moved
    pub entries: usize,
}

/// `blob` followed by `archive`.
pub fn assemble(blob: &[u8], archive: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(blob.len() + archive.len());
    out.extend_from_slice(blob);
    out.extend(archive);
    out
}

/// Prepends `blob` to `archive`, keeping the archive readable.
pub fn patch(blob: &[u8], archive: Vec<u8>, config: &PatchConfig) -> Result<PatchOutcome> {
    let location = locate_central_directory(&archive)?;
    let shifted = shift_offsets(archive, location, blob.len())?;
    let mut data = assemble(blob, shifted.data);

    if config.fix_checksum {
        data = repair_dex_header(data, config.strict_dex)?;
    }

    if config.verify {
        let zip = ZipFile::parse(&data)?;
        if zip.file_count() != shifted.entries {
            return Err(PatchError::zip_format(
                location.eocd_offset + blob.len(),
                "central directory entry count differs from shifted entries",
            ));
        }
        zip.verify_local_headers()?;
        info!("Verified {} entries in patched archive", zip.file_count());
    }

    Ok(PatchOutcome {
        data,
        location,
        entries: shifted.entries,
    })
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| PatchError::from_io_error(path.display().to_string(), e))
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).map_err(|e| PatchError::from_io_error(path.display().to_string(), e))
}

/// Reads both inputs, patches and writes the result to `output_apk`.
pub fn patch_files(
    input_data: &Path,
    input_apk: &Path,
    output_apk: &Path,
    config: &PatchConfig,
) -> Result<PatchOutcome> {
    info!("Reading data from {}...", input_data.display());
    let blob = read_file(input_data)?;
    info!("Reading APK from {}...", input_apk.display());
    let archive = read_file(input_apk)?;

    let outcome = patch(&blob, archive, config)?;

    info!("Saving injected APK to {}...", output_apk.display());
    write_file(output_apk, &outcome.data)?;
    Ok(outcome)
}

/// Bytes in front of the first local file header, i.e. whatever was prepended.
pub fn extract_payload(apk: &[u8]) -> Result<Vec<u8>> {
    match find_signature(apk, &LOCAL_FILE_HEADER_SIG, 0, apk.len()) {
        Some(pos) if pos > 0 => Ok(apk[..pos].to_vec()),
        _ => Err(PatchError::PayloadNotFound),
    }
}

/// Pulls a prepended DEX back out and makes its header describe it alone.
pub fn extract_dex(apk: &[u8]) -> Result<Vec<u8>> {
    let payload = extract_payload(apk)?;
    info!("Found {} bytes before the first local file header", payload.len());
    repair_dex_header(payload, false)
}

pub fn extract_dex_file(input_apk: &Path, output_dex: &Path) -> Result<Vec<u8>> {
    let apk = read_file(input_apk)?;
    let dex = extract_dex(&apk)?;
    write_file(output_dex, &dex)?;
    Ok(dex)
}
