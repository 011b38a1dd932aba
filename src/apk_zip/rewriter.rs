use log::{debug, trace};
use crate::apk_zip::{
    CentralDirectoryLocation, CD_LFH_OFFSET_FIELD, CENTRAL_DIRECTORY_LEN, CENTRAL_DIRECTORY_SIG,
    EOCD_CD_OFFSET_FIELD,
};
use crate::error::{PatchError, Result};
use crate::utils::{find_signature, get_leu32_value, put_leu32_value};

/// Archive whose stored offsets have been moved by a fixed amount.
#[derive(Debug)]
pub struct ShiftedArchive {
    pub data: Vec<u8>,
    /// Number of central directory entries rewritten
    pub entries: usize,
}

fn shifted(offset: u32, shift: usize) -> Result<u32> {
    u32::try_from(shift)
        .ok()
        .and_then(|s| offset.checked_add(s))
        .ok_or(PatchError::OffsetOverflow { offset, shift })
}

/// Adds `shift` to the central directory start stored in the EOCD and to the
/// local header offset of every central directory entry.
///
/// Entries are found by searching for the next `PK\x01\x02` at least one
/// fixed header length past the current one, never beyond the EOCD. When no
/// further signature is found the walk ends there.
pub fn shift_offsets(
    mut archive: Vec<u8>,
    location: CentralDirectoryLocation,
    shift: usize,
) -> Result<ShiftedArchive> {
    let CentralDirectoryLocation { eocd_offset, cd_start } = location;

    let new_cd_start = shifted(cd_start, shift)?;
    put_leu32_value(&mut archive, eocd_offset + EOCD_CD_OFFSET_FIELD, new_cd_start)?;
    debug!("Central directory start moved {:#x} -> {:#x}", cd_start, new_cd_start);

    let mut entries = 0;
    let mut pos = cd_start as usize;
    while pos < eocd_offset {
        let field = pos + CD_LFH_OFFSET_FIELD;
        let offset = get_leu32_value(&archive, field)?;
        let new_offset = shifted(offset, shift)?;
        put_leu32_value(&mut archive, field, new_offset)?;
        trace!("Entry at {:#x}: local header {:#x} -> {:#x}", pos, offset, new_offset);
        entries += 1;

        match find_signature(&archive, &CENTRAL_DIRECTORY_SIG, pos + CENTRAL_DIRECTORY_LEN, eocd_offset) {
            Some(next) => pos = next,
            None => break,
        }
    }

    debug!("Shifted {} central directory entries by {}", entries, shift);
    Ok(ShiftedArchive { data: archive, entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apk_zip::{locate_central_directory, CompressMethod, ZipBuilder, ZipFile};

    fn sample_archive() -> Vec<u8> {
        let mut builder = ZipBuilder::new();
        builder.append_file(b"first entry".to_vec(), "a.txt", CompressMethod::Stored);
        builder.append_file(vec![7u8; 300], "res/b.bin", CompressMethod::Deflated);
        builder.append_file(b"third".to_vec(), "c", CompressMethod::Stored);
        builder.finish_to_vec().unwrap()
    }

    #[test]
    fn shifts_every_entry_and_cd_start() {
        let data = sample_archive();
        let before = ZipFile::parse(&data).unwrap();
        let loc = locate_central_directory(&data).unwrap();

        let out = shift_offsets(data.clone(), loc, 100).unwrap();
        assert_eq!(out.entries, 3);
        assert_eq!(out.data.len(), data.len());
        assert_eq!(
            get_leu32_value(&out.data, loc.eocd_offset + 16).unwrap(),
            loc.cd_start + 100
        );
        for entry in &before.entries {
            let field = entry.central_directory_header_offset as usize + 42;
            assert_eq!(
                get_leu32_value(&out.data, field).unwrap(),
                entry.local_file_header_offset + 100
            );
        }
    }

    #[test]
    fn zero_shift_is_identity() {
        let data = sample_archive();
        let loc = locate_central_directory(&data).unwrap();
        let out = shift_offsets(data.clone(), loc, 0).unwrap();
        assert_eq!(out.data, data);
        assert_eq!(out.entries, 3);
    }

    #[test]
    fn walk_stops_without_next_signature() {
        // one 46 byte entry, then 10 bytes of padding before the EOCD
        let mut data = CENTRAL_DIRECTORY_SIG.to_vec();
        data.extend_from_slice(&[0; 38]);
        data.extend_from_slice(&0x10u32.to_le_bytes());
        data.extend_from_slice(&[0xEE; 10]);
        let eocd_offset = data.len();
        data.extend_from_slice(&[0x50, 0x4b, 0x05, 0x06]);
        data.extend_from_slice(&[0; 18]);
        let loc = CentralDirectoryLocation { eocd_offset, cd_start: 0 };

        let out = shift_offsets(data, loc, 4).unwrap();
        assert_eq!(out.entries, 1);
        assert_eq!(get_leu32_value(&out.data, 42).unwrap(), 0x14);
        assert_eq!(get_leu32_value(&out.data, eocd_offset + 16).unwrap(), 4);
    }

    #[test]
    fn signature_inside_entry_header_is_skipped() {
        // a fake signature inside the first 46 bytes must not be treated as an entry
        let mut data = CENTRAL_DIRECTORY_SIG.to_vec();
        data.extend_from_slice(&CENTRAL_DIRECTORY_SIG);
        data.extend_from_slice(&[0; 34]);
        data.extend_from_slice(&0u32.to_le_bytes());
        let eocd_offset = data.len();
        data.extend_from_slice(&[0x50, 0x4b, 0x05, 0x06]);
        data.extend_from_slice(&[0; 18]);
        let loc = CentralDirectoryLocation { eocd_offset, cd_start: 0 };

        let out = shift_offsets(data, loc, 1).unwrap();
        assert_eq!(out.entries, 1);
    }

    #[test]
    fn overflow_is_rejected() {
        let data = sample_archive();
        let loc = locate_central_directory(&data).unwrap();
        let result = shift_offsets(data, loc, u32::MAX as usize);
        assert!(matches!(result, Err(PatchError::OffsetOverflow { .. })));
    }

    #[test]
    fn truncated_entry_is_an_error() {
        let mut data = CENTRAL_DIRECTORY_SIG.to_vec();
        data.extend_from_slice(&[0; 10]);
        let eocd_offset = data.len();
        data.extend_from_slice(&[0x50, 0x4b, 0x05, 0x06]);
        data.extend_from_slice(&[0; 18]);
        // entry starts so close to the end that its offset field runs past the buffer
        let loc = CentralDirectoryLocation { eocd_offset, cd_start: 10 };
        assert!(matches!(
            shift_offsets(data, loc, 1),
            Err(PatchError::Truncated { .. })
        ));
    }
}
