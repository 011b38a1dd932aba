use byteorder::{ByteOrder, LittleEndian};
use crate::error::{PatchError, Result};

fn check_range(data: &[u8], offset: usize, needed: usize) -> Result<()> {
    match offset.checked_add(needed) {
        Some(end) if end <= data.len() => Ok(()),
        _ => Err(PatchError::Truncated { offset, needed, len: data.len() }),
    }
}

pub(crate) fn get_leu32_value<I: AsRef<[u8]>>(data: I, offset: usize) -> Result<u32> {
    let data = data.as_ref();
    check_range(data, offset, 4)?;
    Ok(LittleEndian::read_u32(&data[offset..offset + 4]))
}

pub(crate) fn get_leu16_value<I: AsRef<[u8]>>(data: I, offset: usize) -> Result<u16> {
    let data = data.as_ref();
    check_range(data, offset, 2)?;
    Ok(LittleEndian::read_u16(&data[offset..offset + 2]))
}

pub(crate) fn put_leu32_value(data: &mut [u8], offset: usize, value: u32) -> Result<()> {
    check_range(data, offset, 4)?;
    LittleEndian::write_u32(&mut data[offset..offset + 4], value);
    Ok(())
}

pub(crate) fn write_array(data: &mut [u8], offset: usize, value: &[u8]) -> Result<()> {
    check_range(data, offset, value.len())?;
    data[offset..offset + value.len()].copy_from_slice(value);
    Ok(())
}

/// First occurrence of `sig` fully contained in `data[start..end]`, as an
/// absolute offset.
pub(crate) fn find_signature(data: &[u8], sig: &[u8], start: usize, end: usize) -> Option<usize> {
    let end = end.min(data.len());
    if start >= end || sig.is_empty() {
        return None;
    }
    data[start..end]
        .windows(sig.len())
        .position(|w| w == sig)
        .map(|pos| start + pos)
}

/// Last occurrence of `sig` anywhere in `data`.
pub(crate) fn rfind_signature(data: &[u8], sig: &[u8]) -> Option<usize> {
    if sig.is_empty() {
        return None;
    }
    data.windows(sig.len()).rposition(|w| w == sig)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_fields() {
        let data = [0x78u8, 0x56, 0x34, 0x12, 0xff];
        assert_eq!(get_leu32_value(&data, 0).unwrap(), 0x1234_5678);
        assert_eq!(get_leu16_value(&data, 1).unwrap(), 0x3456);
    }

    #[test]
    fn read_past_end_is_truncated() {
        let data = [0u8; 5];
        match get_leu32_value(&data, 2) {
            Err(PatchError::Truncated { offset, needed, len }) => {
                assert_eq!((offset, needed, len), (2, 4, 5));
            }
            other => panic!("expected truncated, got {:?}", other),
        }
        assert!(get_leu32_value(&data, usize::MAX - 1).is_err());
    }

    #[test]
    fn put_overwrites_in_place() {
        let mut data = vec![0u8; 8];
        put_leu32_value(&mut data, 2, 0xB4).unwrap();
        assert_eq!(data, [0, 0, 0xB4, 0, 0, 0, 0, 0]);
        assert!(put_leu32_value(&mut data, 6, 1).is_err());
    }

    #[test]
    fn find_respects_bounds() {
        let data = b"xxPK\x01\x02yyPK\x01\x02";
        let sig = b"PK\x01\x02";
        assert_eq!(find_signature(data, sig, 0, data.len()), Some(2));
        assert_eq!(find_signature(data, sig, 3, data.len()), Some(8));
        // signature straddling the end bound is not a match
        assert_eq!(find_signature(data, sig, 3, 11), None);
        assert_eq!(find_signature(data, sig, 20, 4), None);
    }

    #[test]
    fn rfind_returns_last_match() {
        let data = b"PK\x05\x06....PK\x05\x06..";
        assert_eq!(rfind_signature(data, b"PK\x05\x06"), Some(8));
        assert_eq!(rfind_signature(b"PK\x05", b"PK\x05\x06"), None);
    }
}
