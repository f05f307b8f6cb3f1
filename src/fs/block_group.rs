use crate::utils::byte_reader::{read_le_u16, read_le_u32};

use super::FsResult;

/// on-disk size of one group descriptor
pub const GROUP_DESC_SIZE: usize = 32;

/// A block group descriptor.
///
/// Only the first group is ever read; its descriptor tells where the inode
/// table starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupDescriptor {
    pub block_bitmap: u32,
    pub inode_bitmap: u32,
    /// first block of the inode table
    pub inode_table: u32,
    pub free_blocks_count: u16,
    pub free_inodes_count: u16,
    pub used_dirs_count: u16,
}

impl GroupDescriptor {
    /// decode the descriptor starting at `offset`
    pub fn parse(image: &[u8], offset: usize) -> FsResult<Self> {
        Ok(GroupDescriptor {
            block_bitmap: read_le_u32(image, offset)?,
            inode_bitmap: read_le_u32(image, offset + 4)?,
            inode_table: read_le_u32(image, offset + 8)?,
            free_blocks_count: read_le_u16(image, offset + 12)?,
            free_inodes_count: read_le_u16(image, offset + 14)?,
            used_dirs_count: read_le_u16(image, offset + 16)?,
        })
    }
}
