use std::io::{self, Write};
use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::DeflateEncoder;
use crate::apk_zip::{CENTRAL_DIRECTORY, CENTRAL_DIRECTORY_END, CompressMethod, LOCAL_FILE_HEADER};

struct AppendZipEntry {
    data: Vec<u8>,
    compress_method: CompressMethod,
    file_name: String,
}

struct FileHeaderBuilder<'a> {
    file_name: &'a str,
    compress_method: CompressMethod,
    origin_size: u32,
    compress_size: u32,
    crc32: u32,
}

impl<'a> FileHeaderBuilder<'a> {

    fn write_cd<W: Write>(&self, mut writer: W, lfh_offset: u32, ext_len: u16) -> io::Result<usize> {
        writer.write_u32::<LittleEndian>(CENTRAL_DIRECTORY)?;
        writer.write_u16::<LittleEndian>(20)?; // made by
        writer.write_u16::<LittleEndian>(20)?; // needed
        writer.write_u16::<LittleEndian>(0)?; // flag
        writer.write_u16::<LittleEndian>(self.compress_method.value())?;
        writer.write_u32::<LittleEndian>(0)?; // modify
        writer.write_u32::<LittleEndian>(self.crc32)?;
        writer.write_u32::<LittleEndian>(self.compress_size)?;
        writer.write_u32::<LittleEndian>(self.origin_size)?;
        writer.write_u16::<LittleEndian>(self.file_name.len() as u16)?;
        writer.write_u16::<LittleEndian>(ext_len)?;
        writer.write_u16::<LittleEndian>(0)?; // comment
        writer.write_u16::<LittleEndian>(0)?; // disk
        writer.write_u16::<LittleEndian>(0)?; // internal
        writer.write_u32::<LittleEndian>(0)?; // external
        writer.write_u32::<LittleEndian>(lfh_offset)?;
        writer.write_all(self.file_name.as_bytes())?;
        for _ in 0..ext_len {
            writer.write_u8(0)?;
        }
        Ok(46 + self.file_name.len() + ext_len as usize)
    }

    /// Writes the local header, padding its extra field so stored data
    /// starts on an `align` boundary. Returns bytes written and padding used.
    fn write_lfh<W: Write>(&self, mut writer: W, offset: usize, align: usize) -> io::Result<(usize, u16)> {
        let lfh_len = 30 + self.file_name.len();
        let align_count: usize = if self.compress_method != CompressMethod::Stored {
            0
        } else {
            (align - ((offset + lfh_len) % align)) % align
        };
        writer.write_u32::<LittleEndian>(LOCAL_FILE_HEADER)?;
        writer.write_u16::<LittleEndian>(20)?;
        writer.write_u16::<LittleEndian>(0)?;
        writer.write_u16::<LittleEndian>(self.compress_method.value())?;
        writer.write_u32::<LittleEndian>(0)?;
        writer.write_u32::<LittleEndian>(self.crc32)?;
        writer.write_u32::<LittleEndian>(self.compress_size)?;
        writer.write_u32::<LittleEndian>(self.origin_size)?;
        writer.write_u16::<LittleEndian>(self.file_name.len() as u16)?;
        writer.write_u16::<LittleEndian>(align_count as u16)?;
        writer.write_all(self.file_name.as_bytes())?;
        for _ in 0..align_count {
            writer.write_u8(0)?;
        }
        Ok((lfh_len + align_count, align_count as u16))
    }
}

/// Writes small archives from scratch: stored or deflated entries, a
/// central directory and an EOCD with an optional comment.
pub struct ZipBuilder {
    append_entries: Vec<AppendZipEntry>,
    align: usize,
    comment: Vec<u8>,
}

impl Default for ZipBuilder {
    fn default() -> Self {
        ZipBuilder::new()
    }
}

impl ZipBuilder {

    pub fn new() -> ZipBuilder {
        ZipBuilder {
            append_entries: vec![],
            align: 1,
            comment: vec![],
        }
    }

    /// Pads stored entries so their data is `align`-byte aligned, like zipalign.
    pub fn with_alignment(mut self, align: usize) -> ZipBuilder {
        self.align = align.max(1);
        self
    }

    pub fn set_comment<T: AsRef<[u8]>>(&mut self, comment: T) {
        self.comment = comment.as_ref().to_vec();
    }

    pub fn append_file(&mut self, data: Vec<u8>, file_name: impl Into<String>, method: CompressMethod) {
        self.append_entries.push(AppendZipEntry {
            data,
            compress_method: method,
            file_name: file_name.into(),
        });
    }

    pub fn finish<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let mut central_directory_data: Vec<u8> = Vec::new();
        let mut current_offset: usize = 0;

        for new_entry in &self.append_entries {
            let crc32_hash = crc32fast::hash(new_entry.data.as_slice());

            let payload = match new_entry.compress_method {
                CompressMethod::Stored => new_entry.data.clone(),
                CompressMethod::Deflated => {
                    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                    encoder.write_all(new_entry.data.as_slice())?;
                    encoder.finish()?
                }
            };

            let file_header = FileHeaderBuilder {
                file_name: new_entry.file_name.as_str(),
                compress_method: new_entry.compress_method,
                origin_size: new_entry.data.len() as u32,
                compress_size: payload.len() as u32,
                crc32: crc32_hash,
            };

            let lfh_offset = current_offset as u32;
            let (written, padding) = file_header.write_lfh(&mut writer, current_offset, self.align)?;
            current_offset += written;
            file_header.write_cd(&mut central_directory_data, lfh_offset, padding)?;

            writer.write_all(payload.as_slice())?;
            current_offset += payload.len();
        }

        let file_count = self.append_entries.len() as u16;
        let central_directory_offset = current_offset as u32;
        writer.write_all(central_directory_data.as_slice())?;
        writer.write_u32::<LittleEndian>(CENTRAL_DIRECTORY_END)?;
        writer.write_u16::<LittleEndian>(0)?;
        writer.write_u16::<LittleEndian>(0)?;
        writer.write_u16::<LittleEndian>(file_count)?;
        writer.write_u16::<LittleEndian>(file_count)?;
        writer.write_u32::<LittleEndian>(central_directory_data.len() as u32)?;
        writer.write_u32::<LittleEndian>(central_directory_offset)?;
        writer.write_u16::<LittleEndian>(self.comment.len() as u16)?;
        writer.write_all(self.comment.as_slice())?;
        Ok(())
    }

    pub fn finish_to_vec(&self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        self.finish(&mut out)?;
        Ok(out)
    }
}
