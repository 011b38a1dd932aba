use std::collections::HashMap;
use std::io::Write;
use flate2::write::DeflateDecoder;
use log::debug;
use crate::apk_zip::{
    locate_central_directory, CompressMethod, CD_LFH_OFFSET_FIELD, CENTRAL_DIRECTORY,
    CENTRAL_DIRECTORY_LEN, LOCAL_FILE_HEADER, LOCAL_FILE_HEADER_LEN,
};
use crate::error::{PatchError, Result};
use crate::utils::{get_leu16_value, get_leu32_value};

#[derive(Debug, Clone)]
pub struct ZipEntry {
    pub origin_size: u32,
    pub compressed_size: u32,
    pub file_name: String,
    pub crc_32: u32,
    /// Raw method id, kept even when it is not one `CompressMethod` knows
    pub compress_method: u16,
    pub local_file_header_offset: u32,
    pub central_directory_header_offset: u32,
    pub entry_size: u32,
}

/// Read-only view of an archive's central directory.
pub struct ZipFile<'a> {
    pub(crate) data: &'a [u8],
    pub central_directory_offset: u32,
    pub entries: Vec<ZipEntry>,
    file_name_map: HashMap<String, usize>
}

impl<'a> ZipFile<'a> {

    pub fn parse(data: &'a [u8]) -> Result<ZipFile<'a>> {
        let location = locate_central_directory(data)?;
        let mut res = ZipFile {
            data,
            central_directory_offset: location.cd_start,
            entries: vec![],
            file_name_map: HashMap::new()
        };

        let dir_count = get_leu16_value(data, location.eocd_offset + 10)?;
        let mut current_offset = location.cd_start as usize;
        for _ in 0..dir_count {
            if get_leu32_value(data, current_offset)? != CENTRAL_DIRECTORY {
                return Err(PatchError::zip_format(current_offset, "magic of central directory error"));
            }

            let file_name_len = get_leu16_value(data, current_offset + 28)? as usize;
            let ext_len = get_leu16_value(data, current_offset + 30)? as usize;
            let comment_len = get_leu16_value(data, current_offset + 32)? as usize;
            let name_start = current_offset + CENTRAL_DIRECTORY_LEN;
            let file_name_data = data
                .get(name_start..name_start + file_name_len)
                .ok_or_else(|| PatchError::zip_format(current_offset, "file name out of range"))?;
            let file_name = String::from_utf8_lossy(file_name_data).into_owned();
            res.file_name_map.insert(file_name.clone(), res.entries.len());

            let entry = ZipEntry {
                origin_size: get_leu32_value(data, current_offset + 24)?,
                compressed_size: get_leu32_value(data, current_offset + 20)?,
                file_name,
                crc_32: get_leu32_value(data, current_offset + 16)?,
                compress_method: get_leu16_value(data, current_offset + 10)?,
                local_file_header_offset: get_leu32_value(data, current_offset + CD_LFH_OFFSET_FIELD)?,
                central_directory_header_offset: current_offset as u32,
                entry_size: (CENTRAL_DIRECTORY_LEN + file_name_len + ext_len + comment_len) as u32,
            };

            current_offset += entry.entry_size as usize;
            res.entries.push(entry);
        }
        debug!("Parsed {} central directory entries", res.entries.len());
        Ok(res)
    }

    pub fn file_count(&self) -> usize {
        self.entries.len()
    }

    pub fn get_entry(&self, idx: usize) -> Option<&ZipEntry> {
        self.entries.get(idx)
    }

    pub fn get_file(&self, name: &str) -> Option<&ZipEntry> {
        let idx = self.file_name_map.get(name)?;
        self.get_entry(*idx)
    }

    /// Checks that every entry's local header offset lands on a local file
    /// header signature.
    pub fn verify_local_headers(&self) -> Result<()> {
        for entry in &self.entries {
            let offset = entry.local_file_header_offset as usize;
            if get_leu32_value(self.data, offset)? != LOCAL_FILE_HEADER {
                return Err(PatchError::zip_format(offset, "local file header signature mismatch"));
            }
        }
        Ok(())
    }

    pub fn get_file_compress_data(&self, entry: &ZipEntry) -> Result<&'a [u8]> {
        let header_offset = entry.local_file_header_offset as usize;
        let file_name_len = get_leu16_value(self.data, header_offset + 26)? as usize;
        let ext_len = get_leu16_value(self.data, header_offset + 28)? as usize;
        let start = header_offset + LOCAL_FILE_HEADER_LEN + file_name_len + ext_len;
        self.data
            .get(start..start + entry.compressed_size as usize)
            .ok_or_else(|| PatchError::zip_format(header_offset, "file data out of range"))
    }

    pub fn get_uncompress_data(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let entry = match self.get_file(name) {
            Some(entry) => entry,
            None => return Ok(None),
        };
        let raw = self.get_file_compress_data(entry)?;
        match CompressMethod::convert_from_u16(entry.compress_method) {
            Some(CompressMethod::Stored) => Ok(Some(raw.to_vec())),
            Some(CompressMethod::Deflated) => {
                let mut decoder = DeflateDecoder::new(Vec::new());
                decoder.write_all(raw).map_err(|e| PatchError::from_io_error(name, e))?;
                let data = decoder.finish().map_err(|e| PatchError::from_io_error(name, e))?;
                Ok(Some(data))
            }
            None => Err(PatchError::zip_format(
                entry.local_file_header_offset as usize,
                "unsupported compress method",
            )),
        }
    }

}
