//! bounds-checked little-endian field decoding over a raw image buffer
use crate::fs::{FsError, FsResult};

/// borrow `len` bytes starting at `offset`
/// # Example
/// ```
/// use ext2cat::utils::byte_reader::ensure_slice;
/// let data = [1u8, 2, 3, 4];
/// assert_eq!(ensure_slice(&data, 1, 2).unwrap(), &[2, 3]);
/// assert!(ensure_slice(&data, 3, 2).is_err());
/// ```
#[inline]
pub fn ensure_slice(data: &[u8], offset: usize, len: usize) -> FsResult<&[u8]> {
    let out_of_bounds = || FsError::OutOfBoundsOffset {
        offset: i64::try_from(offset).unwrap_or(i64::MAX),
        len,
        image_len: data.len(),
    };
    let end = offset.checked_add(len).ok_or_else(out_of_bounds)?;
    data.get(offset..end).ok_or_else(out_of_bounds)
}

#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> FsResult<u8> {
    Ok(ensure_slice(data, offset, 1)?[0])
}

#[inline]
pub fn read_le_u16(data: &[u8], offset: usize) -> FsResult<u16> {
    let bytes = ensure_slice(data, offset, 2)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

#[inline]
pub fn read_le_u32(data: &[u8], offset: usize) -> FsResult<u32> {
    let bytes = ensure_slice(data, offset, 4)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// copy a fixed-width field out of the buffer
#[inline]
pub fn read_fixed<const N: usize>(data: &[u8], offset: usize) -> FsResult<[u8; N]> {
    let bytes = ensure_slice(data, offset, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// decode a NUL padded on-disk string, e.g. the volume name
pub fn trim_nul_padded(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
