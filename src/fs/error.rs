//! errors raised while interpreting an image
use thiserror::Error;

/// Every accessor fails with one of these.
///
/// A path that does not resolve is **not** an error: [resolve](crate::fs::Ext2Image::resolve)
/// returns the `0` inode number for it.
#[derive(Debug, Error)]
pub enum FsError {
    /// the buffer is too short or its metadata is inconsistent
    #[error("malformed image: {0}")]
    MalformedImage(String),
    /// only the first block group can be read
    #[error("block group {0} is not supported, only group 1 is")]
    UnsupportedBlockGroup(u32),
    /// inode numbers start at 1
    #[error("invalid inode number: {0}")]
    InvalidInodeNumber(u32),
    /// a computed byte range does not fit in the buffer
    #[error("offset {offset} (+{len} bytes) is out of bounds for an image of {image_len} bytes")]
    OutOfBoundsOffset {
        offset: i64,
        len: usize,
        image_len: usize,
    },
    /// writing file data to the caller's sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FsResult<T> = Result<T, FsError>;
