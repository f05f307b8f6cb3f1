//! This module contains functions to calculate the size of different fs components

use crate::fs::DIR_ENTRY_HEADER_SIZE;

/// calculate the inode table size of one block group
/// # Arguments
/// - `inodes_per_group`: the number of inodes in a group
/// - `inode_size`: bytes per inode record
/// # Return
/// the size of the inode table in bytes
/// # Example
/// ```
/// use ext2cat::utils::fs_size_calculator::inode_table_size;
/// assert_eq!(inode_table_size(32, 128), 4096);
/// ```
pub const fn inode_table_size(inodes_per_group: u32, inode_size: u16) -> u64 {
    inodes_per_group as u64 * inode_size as u64
}

/// calculate how many blocks the inode table of one group spans
/// # Example
/// ```
/// use ext2cat::utils::fs_size_calculator::inode_table_blocks;
/// assert_eq!(inode_table_blocks(32, 128, 1024), 4);
/// assert_eq!(inode_table_blocks(10, 128, 1024), 2);
/// ```
pub const fn inode_table_blocks(inodes_per_group: u32, inode_size: u16, block_size: u32) -> u64 {
    inode_table_size(inodes_per_group, inode_size).div_ceil(block_size as u64)
}

/// calculate the record length of a directory entry, padded to 4 bytes
/// # Example
/// ```
/// use ext2cat::utils::fs_size_calculator::dir_entry_rec_len;
/// assert_eq!(dir_entry_rec_len(1), 12);
/// assert_eq!(dir_entry_rec_len(4), 12);
/// assert_eq!(dir_entry_rec_len(9), 20);
/// ```
pub const fn dir_entry_rec_len(name_len: usize) -> usize {
    (DIR_ENTRY_HEADER_SIZE + name_len).next_multiple_of(4)
}
