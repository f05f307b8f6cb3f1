//! what an ext2 image looks like when it is fully resident in memory
//!
//! Every accessor recomputes its byte offset from the raw buffer: nothing is
//! cached between calls and the buffer is never written.
use std::io::Write;

use log::{debug, trace, warn};

use crate::utils::byte_reader::ensure_slice;

use super::{
    block_group::{GroupDescriptor, GROUP_DESC_SIZE},
    directory::{DirEntry, DirEntryIter},
    superblock::SuperBlock,
    FsError, FsResult, Inode, ROOT_INODE, SUPERBLOCK_OFFSET,
};

/// the only block group this reader understands
pub const FIRST_BLOCK_GROUP: u32 = 1;

/// A borrowed, read-only view of a whole ext2 image.
///
/// It has the following layout:
/// - superblock at byte 1024
/// - the descriptor of the single block group, one block later
/// - the inode table and data blocks, addressed by block number
#[derive(Debug, Clone, Copy)]
pub struct Ext2Image<'a> {
    bytes: &'a [u8],
}

impl<'a> Ext2Image<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Ext2Image { bytes }
    }

    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// superblock and block addressing
impl<'a> Ext2Image<'a> {
    pub fn superblock(&self) -> FsResult<SuperBlock> {
        SuperBlock::parse(self.bytes)
    }

    /// `1024 << s_log_block_size`
    pub fn block_size(&self) -> FsResult<u32> {
        Ok(self.superblock()?.block_size())
    }

    /// Byte offset of block `block_number`.
    ///
    /// Block 1 is the block holding the superblock, so
    /// `block_offset(1) == 1024` whatever the block size, and block 0 is the
    /// start of the buffer on a 1 KiB block image. The whole block must lie
    /// inside the buffer.
    pub fn block_offset(&self, block_number: u32) -> FsResult<usize> {
        let block_size = self.block_size()?;
        let offset = i64::from(block_size) * (i64::from(block_number) - 1)
            + SUPERBLOCK_OFFSET as i64;
        let out_of_bounds = FsError::OutOfBoundsOffset {
            offset,
            len: block_size as usize,
            image_len: self.bytes.len(),
        };
        let start = usize::try_from(offset).map_err(|_| out_of_bounds)?;
        ensure_slice(self.bytes, start, block_size as usize)?;
        Ok(start)
    }

    /// the bytes of block `block_number`
    pub fn block(&self, block_number: u32) -> FsResult<&'a [u8]> {
        let block_size = self.block_size()?;
        let offset = self.block_offset(block_number)?;
        ensure_slice(self.bytes, offset, block_size as usize)
    }
}

/// block group descriptor
impl<'a> Ext2Image<'a> {
    /// The descriptor of group `group_index`, counted from 1.
    ///
    /// Images are assumed to hold a single block group, so only
    /// [FIRST_BLOCK_GROUP] is accepted. Its descriptor starts one block
    /// after the superblock.
    pub fn group_descriptor(&self, group_index: u32) -> FsResult<GroupDescriptor> {
        if group_index != FIRST_BLOCK_GROUP {
            return Err(FsError::UnsupportedBlockGroup(group_index));
        }
        let offset = SUPERBLOCK_OFFSET + self.block_size()? as usize;
        ensure_slice(self.bytes, offset, GROUP_DESC_SIZE)?;
        GroupDescriptor::parse(self.bytes, offset)
    }
}

/// inode table
impl<'a> Ext2Image<'a> {
    /// Copy out the record of inode `inode_number`.
    ///
    /// The record is returned even when the inode is not allocated.
    pub fn inode(&self, inode_number: u32) -> FsResult<Inode> {
        if inode_number == 0 {
            return Err(FsError::InvalidInodeNumber(inode_number));
        }
        let superblock = self.superblock()?;
        let group = self.group_descriptor(FIRST_BLOCK_GROUP)?;
        let table = self.block_offset(group.inode_table)?;
        let slot = (inode_number - 1) % superblock.inodes_per_group;
        let inode_size = superblock.inode_size() as usize;
        let offset = (slot as usize)
            .checked_mul(inode_size)
            .and_then(|delta| delta.checked_add(table))
            .ok_or(FsError::OutOfBoundsOffset {
                offset: i64::MAX,
                len: inode_size,
                image_len: self.bytes.len(),
            })?;
        let record = ensure_slice(self.bytes, offset, inode_size)?;
        trace!("inode {inode_number} lives in slot {slot} at byte {offset}");
        Inode::parse(record, 0, inode_number)
    }

    /// the inode of "/"
    pub fn root_inode(&self) -> FsResult<Inode> {
        self.inode(ROOT_INODE)
    }
}

/// directory scanning
impl<'a> Ext2Image<'a> {
    /// Find `name` in directory `dir`, returning its inode number or 0.
    ///
    /// Only the 12 direct blocks are scanned, in slot order, and the first
    /// matching entry wins. Matching follows [DirEntry::matches], so a
    /// name that is a prefix of a stored name selects that entry. `dir` is
    /// not checked to be a directory: an entry that does not decode ends the
    /// scan of its block, so a file's data can only yield a match or 0.
    pub fn lookup(&self, dir: &Inode, name: &str) -> FsResult<u32> {
        if name.is_empty() {
            return Ok(0);
        }
        for (slot, block) in dir.direct_blocks().iter().enumerate() {
            if *block == 0 {
                continue;
            }
            for entry in DirEntryIter::new(self.block(*block)?) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        debug!(
                            "inode {}: slot {slot}, block {block}: {e}, skipping rest of block",
                            dir.inode_number
                        );
                        break;
                    }
                };
                trace!(
                    "inode {}: slot {slot}, block {block}: entry {:?} -> {}",
                    dir.inode_number,
                    entry.name_lossy(),
                    entry.inode
                );
                if entry.matches(name.as_bytes()) {
                    debug!(
                        "found {name:?} in inode {} as inode {}",
                        dir.inode_number, entry.inode
                    );
                    return Ok(entry.inode);
                }
            }
        }
        debug!("{name:?} not found in inode {}", dir.inode_number);
        Ok(0)
    }

    /// every live entry of `dir`'s direct blocks, in on-disk order
    pub fn entries(&self, dir: &Inode) -> FsResult<Vec<DirEntry<'a>>> {
        let mut entries = Vec::new();
        for block in dir.direct_blocks().iter().filter(|block| **block != 0) {
            for entry in DirEntryIter::new(self.block(*block)?) {
                entries.push(entry?);
            }
        }
        Ok(entries)
    }
}

/// file data
impl<'a> Ext2Image<'a> {
    /// Copy the contents of `inode` into `w`, returning the number of bytes written.
    ///
    /// A zero pointer inside the file is a hole and reads as zeros. Bytes
    /// beyond the direct blocks cannot be reached and are left out.
    pub fn read_direct_data<W>(&self, inode: &Inode, w: &mut W) -> FsResult<u64>
    where
        W: Write,
    {
        let block_size = u64::from(self.block_size()?);
        let mut remaining = u64::from(inode.file_size);
        let mut written = 0;
        for block in inode.direct_blocks() {
            if remaining == 0 {
                break;
            }
            let chunk = remaining.min(block_size) as usize;
            if *block == 0 {
                w.write_all(&vec![0u8; chunk])?;
            } else {
                w.write_all(&self.block(*block)?[..chunk])?;
            }
            remaining -= chunk as u64;
            written += chunk as u64;
        }
        if remaining > 0 {
            warn!(
                "inode {}: {remaining} bytes live beyond the direct blocks and were skipped",
                inode.inode_number
            );
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{DirEntryFileType, FileKind, DIRECT_POINTERS};
    use crate::utils::image_builder::ImageBuilder;

    #[test]
    fn test_block_one_is_the_superblock() {
        for log in [0, 1, 2] {
            let bytes = ImageBuilder::new().log_block_size(log).build();
            let image = Ext2Image::new(&bytes);
            assert_eq!(image.block_size().unwrap(), 1024 << log);
            assert_eq!(image.block_offset(1).unwrap(), SUPERBLOCK_OFFSET);
        }
    }

    #[test]
    fn test_block_zero_is_buffer_start_on_1k_images() {
        let bytes = ImageBuilder::new().build();
        let image = Ext2Image::new(&bytes);
        assert_eq!(image.block_offset(0).unwrap(), 0);
        assert_eq!(image.block_offset(3).unwrap(), 3 * 1024);
    }

    #[test]
    fn test_negative_block_offset_is_rejected() {
        let bytes = ImageBuilder::new().log_block_size(2).build();
        let image = Ext2Image::new(&bytes);
        match image.block_offset(0) {
            Err(FsError::OutOfBoundsOffset { offset, .. }) => assert_eq!(offset, 1024 - 4096),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_block_past_image_end_is_rejected() {
        let bytes = ImageBuilder::new().build();
        let image = Ext2Image::new(&bytes);
        let past_end = (bytes.len() / 1024) as u32 + 1;
        assert!(matches!(
            image.block_offset(past_end),
            Err(FsError::OutOfBoundsOffset { .. })
        ));
        assert!(matches!(
            image.block_offset(u32::MAX),
            Err(FsError::OutOfBoundsOffset { .. })
        ));
    }

    #[test]
    fn test_group_descriptor_follows_superblock_block() {
        let bytes = ImageBuilder::new().build();
        let image = Ext2Image::new(&bytes);
        let gd = image.group_descriptor(FIRST_BLOCK_GROUP).unwrap();
        assert_eq!(gd.block_bitmap, 3);
        assert_eq!(gd.inode_bitmap, 4);
        assert_eq!(gd.inode_table, 5);
        assert_eq!(gd.used_dirs_count, 1);
        assert!(matches!(
            image.group_descriptor(2),
            Err(FsError::UnsupportedBlockGroup(2))
        ));
    }

    #[test]
    fn test_root_inode_points_at_root_directory_block() {
        let builder = ImageBuilder::new();
        // the root directory takes the first data block: 5 + 32 * 128 / 1024
        let root_block = 9;
        let bytes = builder.build();
        let image = Ext2Image::new(&bytes);
        let root = image.root_inode().unwrap();
        assert_eq!(root.inode_number, ROOT_INODE);
        assert!(root.is_dir());
        assert_eq!(root.direct_blocks()[0], root_block);
        assert!(root.direct_blocks()[1..].iter().all(|b| *b == 0));
        assert_eq!(root.file_size, 1024);
    }

    #[test]
    fn test_inode_zero_is_invalid() {
        let bytes = ImageBuilder::new().build();
        let image = Ext2Image::new(&bytes);
        assert!(matches!(
            image.inode(0),
            Err(FsError::InvalidInodeNumber(0))
        ));
    }

    #[test]
    fn test_last_inode_of_group_uses_last_slot() {
        let mut builder = ImageBuilder::new().inodes_per_group(16).inode_size(256);
        for i in 0..6 {
            builder.add_file(ROOT_INODE, &format!("f{i}"), b"x");
        }
        // inode numbers 11..=16, the last one fills slot 15
        let last_offset = builder.inode_offset(16);
        let bytes = builder.build();
        let image = Ext2Image::new(&bytes);
        let table = image.block_offset(5).unwrap();
        assert_eq!(last_offset, table + 15 * 256);

        let inode = image.inode(16).unwrap();
        assert_eq!(inode.inode_number, 16);
        assert!(inode.is_regular_file());
        assert_eq!(inode.file_size, 1);
        // inode 17 wraps around to slot 0, the reserved inode 1
        let wrapped = image.inode(17).unwrap();
        assert_eq!(wrapped.mode, image.inode(1).unwrap().mode);
    }

    #[test]
    fn test_unallocated_inode_is_returned_as_is() {
        let bytes = ImageBuilder::new().build();
        let image = Ext2Image::new(&bytes);
        let inode = image.inode(20).unwrap();
        assert_eq!(inode.file_kind(), FileKind::Unknown);
        assert!(inode.direct_blocks().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_inode_table_outside_image() {
        let mut bytes = ImageBuilder::new().build();
        // point the inode table far past the end of the buffer
        let gd = 2 * 1024;
        bytes[gd + 8..gd + 12].copy_from_slice(&5000u32.to_le_bytes());
        let image = Ext2Image::new(&bytes);
        assert!(matches!(
            image.inode(2),
            Err(FsError::OutOfBoundsOffset { .. })
        ));
    }

    #[test]
    fn test_lookup_scans_every_direct_block() {
        let mut builder = ImageBuilder::new();
        let docs = builder.add_dir(ROOT_INODE, "docs");
        builder.start_dir_block(ROOT_INODE);
        let late = builder.add_file(ROOT_INODE, "late", b"late");
        let bytes = builder.build();
        let image = Ext2Image::new(&bytes);
        let root = image.root_inode().unwrap();
        assert_eq!(image.lookup(&root, "docs").unwrap(), docs);
        assert_eq!(image.lookup(&root, "late").unwrap(), late);
        assert_eq!(image.lookup(&root, "missing").unwrap(), 0);
        assert_eq!(image.lookup(&root, "").unwrap(), 0);
    }

    #[test]
    fn test_lookup_first_prefix_match_wins_across_blocks() {
        let mut builder = ImageBuilder::new();
        let first = builder.add_file(ROOT_INODE, "report-2023", b"old");
        builder.start_dir_block(ROOT_INODE);
        let exact = builder.add_file(ROOT_INODE, "report", b"new");
        let bytes = builder.build();
        let image = Ext2Image::new(&bytes);
        let root = image.root_inode().unwrap();
        // "report" is a prefix of "report-2023", which sits in an earlier block
        assert_eq!(image.lookup(&root, "report").unwrap(), first);
        assert_ne!(first, exact);
        assert_eq!(image.lookup(&root, "report-2023").unwrap(), first);
    }

    #[test]
    fn test_lookup_skips_rest_of_undecodable_block() {
        let mut builder = ImageBuilder::new();
        builder.add_file(ROOT_INODE, "early", b"");
        builder.start_dir_block(ROOT_INODE);
        let late = builder.add_file(ROOT_INODE, "late", b"");
        let mut bytes = builder.build();
        let first_block = {
            let image = Ext2Image::new(&bytes);
            let root = image.root_inode().unwrap();
            image.block_offset(root.direct_blocks()[0]).unwrap()
        };
        // "." gets a rec_len of 0, hiding everything after it in that block
        bytes[first_block + 4..first_block + 6].copy_from_slice(&0u16.to_le_bytes());

        let image = Ext2Image::new(&bytes);
        let root = image.root_inode().unwrap();
        assert_eq!(image.lookup(&root, "early").unwrap(), 0);
        assert_eq!(image.lookup(&root, "late").unwrap(), late);
        assert!(matches!(
            image.entries(&root),
            Err(FsError::MalformedImage(_))
        ));
    }

    #[test]
    fn test_lookup_ignores_indirect_blocks() {
        let mut builder = ImageBuilder::new();
        let hidden = builder.add_file(ROOT_INODE, "hidden", b"");
        let bytes = {
            // move the root's only directory block behind the first indirect pointer
            let root_block = 9;
            builder.set_block_pointer(ROOT_INODE, 0, 0);
            builder.set_block_pointer(ROOT_INODE, DIRECT_POINTERS, root_block);
            builder.build()
        };
        let image = Ext2Image::new(&bytes);
        let root = image.root_inode().unwrap();
        assert_eq!(image.lookup(&root, "hidden").unwrap(), 0);
        assert_ne!(hidden, 0);
    }

    #[test]
    fn test_entries_lists_live_entries() {
        let mut builder = ImageBuilder::new();
        builder.add_dir(ROOT_INODE, "docs");
        builder.add_file(ROOT_INODE, "a.txt", b"a");
        let bytes = builder.build();
        let image = Ext2Image::new(&bytes);
        let root = image.root_inode().unwrap();
        let entries = image.entries(&root).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name_lossy()).collect();
        assert_eq!(names, vec![".", "..", "docs", "a.txt"]);
        assert_eq!(entries[2].file_type, DirEntryFileType::Directory);
        assert_eq!(entries[3].file_type, DirEntryFileType::RegularFile);
        assert_eq!(entries[0].inode, ROOT_INODE);
    }

    #[test]
    fn test_read_direct_data() {
        let contents: Vec<u8> = (0..2500u32).map(|i| (i % 251) as u8).collect();
        let mut builder = ImageBuilder::new();
        let file = builder.add_file(ROOT_INODE, "data.bin", &contents);
        let bytes = builder.build();
        let image = Ext2Image::new(&bytes);
        let inode = image.inode(file).unwrap();
        let mut out = Vec::new();
        assert_eq!(image.read_direct_data(&inode, &mut out).unwrap(), 2500);
        assert_eq!(out, contents);
    }

    #[test]
    fn test_read_direct_data_holes_and_truncation() {
        let block_size = 1024;
        let contents = vec![7u8; block_size * (DIRECT_POINTERS + 2)];
        let mut builder = ImageBuilder::new().inodes_per_group(64);
        let file = builder.add_file(ROOT_INODE, "big", &contents);
        builder.set_block_pointer(file, 1, 0);
        let bytes = builder.build();
        let image = Ext2Image::new(&bytes);
        let inode = image.inode(file).unwrap();
        let mut out = Vec::new();
        let written = image.read_direct_data(&inode, &mut out).unwrap();
        assert_eq!(written as usize, block_size * DIRECT_POINTERS);
        assert!(out[..block_size].iter().all(|b| *b == 7));
        assert!(out[block_size..2 * block_size].iter().all(|b| *b == 0));
        assert!(out[2 * block_size..].iter().all(|b| *b == 7));
    }
}
