//! packed directory entries inside one directory data block
use std::borrow::Cow;

use crate::utils::byte_reader::{ensure_slice, read_le_u16, read_le_u32, read_u8};

use super::{filekind::DirEntryFileType, FsError, FsResult};

/// inode (4) + rec_len (2) + name_len (1) + file_type (1)
pub const DIR_ENTRY_HEADER_SIZE: usize = 8;
/// an entry spanning a whole 64 KiB block stores its `rec_len` as 0
const MAX_REC_LEN: usize = 1 << 16;

/// One directory entry, borrowing its name from the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry<'a> {
    pub inode: u32,
    /// distance to the next entry in the same block
    pub rec_len: u32,
    pub file_type: DirEntryFileType,
    /// exactly `name_len` bytes, not NUL terminated
    pub name: &'a [u8],
}

impl<'a> DirEntry<'a> {
    pub fn name_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.name)
    }

    /// Whether `query` selects this entry.
    ///
    /// Only the first `query.len()` bytes of the stored name are compared, so a
    /// query that is a prefix of a longer stored name matches too: `"foo"`
    /// selects an entry named `"foobar"`. Lookups depend on this behaviour.
    /// An empty query never matches.
    pub fn matches(&self, query: &[u8]) -> bool {
        !query.is_empty() && self.name.starts_with(query)
    }
}

/// Walks the entries of one directory block.
///
/// Stops at the end of the block, at the first entry whose inode is 0, or
/// after an entry whose `rec_len` points past the block. A `rec_len` shorter
/// than the entry header yields an error and ends the walk. On 64 KiB blocks
/// a stored `rec_len` of 0 means the entry fills the block.
#[derive(Debug, Clone)]
pub struct DirEntryIter<'a> {
    block: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> DirEntryIter<'a> {
    pub fn new(block: &'a [u8]) -> Self {
        DirEntryIter {
            block,
            pos: 0,
            done: false,
        }
    }

    fn parse_entry(&self) -> FsResult<Option<(DirEntry<'a>, usize)>> {
        let block = self.block;
        let pos = self.pos;
        if pos + DIR_ENTRY_HEADER_SIZE > block.len() {
            return Ok(None);
        }
        let inode = read_le_u32(block, pos)?;
        if inode == 0 {
            return Ok(None);
        }
        let rec_len = match read_le_u16(block, pos + 4)? {
            0 if block.len() == MAX_REC_LEN => MAX_REC_LEN as u32,
            raw => u32::from(raw),
        };
        if (rec_len as usize) < DIR_ENTRY_HEADER_SIZE {
            return Err(FsError::MalformedImage(format!(
                "directory entry at block offset {pos} has rec_len {rec_len}"
            )));
        }
        let name_len = read_u8(block, pos + 6)? as usize;
        if DIR_ENTRY_HEADER_SIZE + name_len > rec_len as usize {
            return Err(FsError::MalformedImage(format!(
                "directory entry at block offset {pos}: name of {name_len} bytes overflows rec_len {rec_len}"
            )));
        }
        let entry = DirEntry {
            inode,
            rec_len,
            file_type: read_u8(block, pos + 7)?.into(),
            name: ensure_slice(block, pos + DIR_ENTRY_HEADER_SIZE, name_len)?,
        };
        Ok(Some((entry, pos + rec_len as usize)))
    }
}

impl<'a> Iterator for DirEntryIter<'a> {
    type Item = FsResult<DirEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.parse_entry() {
            Ok(Some((entry, next_pos))) => {
                self.pos = next_pos;
                self.done = next_pos >= self.block.len();
                Some(Ok(entry))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
