//! build small single-group ext2 images in memory, for tests and doc examples
//!
//! The layout mirrors what `mke2fs` produces for a tiny image:
//! - block 1: superblock (byte 1024)
//! - block 2: group descriptor table
//! - block 3: block bitmap
//! - block 4: inode bitmap
//! - block 5..: inode table, then data blocks
//!
//! Blocks are numbered with the superblock's block as block 1, so every
//! offset agrees with [block_offset](crate::fs::Ext2Image::block_offset).
use std::collections::HashMap;

use crate::fs::{DirEntryFileType, DIRECT_POINTERS, EXT2_MAGIC, ROOT_INODE, SUPERBLOCK_OFFSET};

use super::fs_size_calculator::{dir_entry_rec_len, inode_table_blocks};

const BLOCK_BITMAP_BLOCK: u32 = 3;
const INODE_BITMAP_BLOCK: u32 = 4;
const INODE_TABLE_BLOCK: u32 = 5;
const FIRST_NON_RESERVED_INODE: u32 = 11;
const DIR_MODE: u16 = 0o040755;
const FILE_MODE: u16 = 0o100644;

/// where the next entry of a directory goes
#[derive(Debug, Clone, Copy)]
struct DirTail {
    block: u32,
    used: usize,
    last_entry: Option<usize>,
}

/// In-memory ext2 image generator.
/// # Example
/// ```
/// use ext2cat::{fs::{Ext2Image, ROOT_INODE}, utils::image_builder::ImageBuilder};
/// let mut builder = ImageBuilder::new();
/// let docs = builder.add_dir(ROOT_INODE, "docs");
/// let readme = builder.add_file(docs, "readme", b"hello");
/// let bytes = builder.build();
/// let image = Ext2Image::new(&bytes);
/// assert_eq!(image.resolve("/docs/readme").unwrap(), readme);
/// ```
#[derive(Debug)]
pub struct ImageBuilder {
    log_block_size: u32,
    inodes_per_group: u32,
    inode_size: u16,
    volume_name: String,
    /// data blocks and inode records, keyed by block number
    blocks: HashMap<u32, Vec<u8>>,
    inodes: HashMap<u32, Vec<u8>>,
    dir_tails: HashMap<u32, DirTail>,
    next_inode: u32,
    next_block: Option<u32>,
    used_dirs: u16,
}

impl Default for ImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// configuration, only meaningful before the first inode is added
impl ImageBuilder {
    /// a 1 KiB block image with 32 inodes of 128 bytes and an empty root directory
    pub fn new() -> Self {
        ImageBuilder {
            log_block_size: 0,
            inodes_per_group: 32,
            inode_size: 128,
            volume_name: String::new(),
            blocks: HashMap::new(),
            inodes: HashMap::new(),
            dir_tails: HashMap::new(),
            next_inode: FIRST_NON_RESERVED_INODE,
            next_block: None,
            used_dirs: 0,
        }
    }

    pub fn log_block_size(mut self, log_block_size: u32) -> Self {
        self.log_block_size = log_block_size;
        self
    }

    pub fn inodes_per_group(mut self, inodes_per_group: u32) -> Self {
        self.inodes_per_group = inodes_per_group;
        self
    }

    pub fn inode_size(mut self, inode_size: u16) -> Self {
        self.inode_size = inode_size;
        self
    }

    pub fn volume_name(mut self, name: &str) -> Self {
        self.volume_name = name.to_string();
        self
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        1024 << self.log_block_size
    }

    /// byte offset of block `block` in the built image, block 1 being the superblock's
    pub fn block_offset(&self, block: u32) -> usize {
        SUPERBLOCK_OFFSET + self.block_size() * (block as usize - 1)
    }

    /// byte offset of the record of inode `inode` in the built image
    pub fn inode_offset(&self, inode: u32) -> usize {
        let slot = ((inode - 1) % self.inodes_per_group) as usize;
        self.block_offset(INODE_TABLE_BLOCK) + slot * self.inode_size as usize
    }

    fn inode_table_blocks(&self) -> u32 {
        inode_table_blocks(
            self.inodes_per_group,
            self.inode_size,
            self.block_size() as u32,
        ) as u32
    }
}

/// populating the tree
impl ImageBuilder {
    /// create a directory named `name` inside `parent`, returning its inode number
    pub fn add_dir(&mut self, parent: u32, name: &str) -> u32 {
        self.ensure_root();
        let inode = self.allocate_inode();
        self.init_dir(inode, parent);
        self.add_entry(parent, name, inode, DirEntryFileType::Directory);
        inode
    }

    /// create a regular file holding `contents` inside `parent`
    ///
    /// Contents beyond the direct blocks are not stored, but `i_size` still
    /// records the full length.
    pub fn add_file(&mut self, parent: u32, name: &str, contents: &[u8]) -> u32 {
        self.ensure_root();
        let inode = self.allocate_inode();
        self.write_inode_header(inode, FILE_MODE, contents.len() as u32, 1);
        let block_size = self.block_size();
        for (index, chunk) in contents
            .chunks(block_size)
            .take(DIRECT_POINTERS)
            .enumerate()
        {
            let block = self.allocate_block();
            self.block_mut(block)[..chunk.len()].copy_from_slice(chunk);
            self.set_block_pointer(inode, index, block);
        }
        self.add_entry(parent, name, inode, DirEntryFileType::RegularFile);
        inode
    }

    /// append a raw directory entry to `dir`, spilling into a new direct block when full
    pub fn add_entry(&mut self, dir: u32, name: &str, inode: u32, file_type: DirEntryFileType) {
        self.ensure_root();
        let block_size = self.block_size();
        let needed = dir_entry_rec_len(name.len());
        let tail = match self.dir_tails.get(&dir) {
            Some(tail) if tail.used + needed <= block_size => *tail,
            _ => self.open_dir_block(dir),
        };

        let offset = tail.used;
        let block = self.block_mut(tail.block);
        if let Some(last) = tail.last_entry {
            let rec_len = (offset - last) as u16;
            block[last + 4..last + 6].copy_from_slice(&rec_len.to_le_bytes());
        }
        let rec_len = (block_size - offset) as u16;
        block[offset..offset + 4].copy_from_slice(&inode.to_le_bytes());
        block[offset + 4..offset + 6].copy_from_slice(&rec_len.to_le_bytes());
        block[offset + 6] = name.len() as u8;
        block[offset + 7] = file_type as u8;
        block[offset + 8..offset + 8 + name.len()].copy_from_slice(name.as_bytes());

        self.dir_tails.insert(
            dir,
            DirTail {
                block: tail.block,
                used: offset + needed,
                last_entry: Some(offset),
            },
        );
    }

    /// make later entries of `dir` go to a fresh direct block, returning its number
    pub fn start_dir_block(&mut self, dir: u32) -> u32 {
        self.open_dir_block(dir).block
    }

    fn open_dir_block(&mut self, dir: u32) -> DirTail {
        let index = self.direct_blocks_in_use(dir);
        let block = self.allocate_block();
        self.set_block_pointer(dir, index, block);
        let size = self.read_inode_u32(dir, 4) + self.block_size() as u32;
        self.write_inode_u32(dir, 4, size);
        let tail = DirTail {
            block,
            used: 0,
            last_entry: None,
        };
        self.dir_tails.insert(dir, tail);
        tail
    }

    /// overwrite direct pointer `index` of `inode`
    pub fn set_block_pointer(&mut self, inode: u32, index: usize, block: u32) {
        self.write_inode_u32(inode, 40 + index * 4, block);
    }

    /// serialize the image
    pub fn build(mut self) -> Vec<u8> {
        self.ensure_root();
        let block_size = self.block_size();
        let last_block = self.next_block.unwrap_or_else(|| self.first_data_block());
        let mut image = vec![0u8; self.block_offset(last_block)];

        // superblock
        let sb = SUPERBLOCK_OFFSET;
        let allocated_inodes = self.next_inode - 1;
        put_u32(&mut image, sb, self.inodes_per_group);
        put_u32(&mut image, sb + 4, last_block);
        put_u32(&mut image, sb + 12, 0);
        put_u32(
            &mut image,
            sb + 16,
            self.inodes_per_group.saturating_sub(allocated_inodes),
        );
        put_u32(&mut image, sb + 20, 1);
        put_u32(&mut image, sb + 24, self.log_block_size);
        put_u32(&mut image, sb + 32, block_size as u32 * 8);
        put_u32(&mut image, sb + 40, self.inodes_per_group);
        image[sb + 56..sb + 58].copy_from_slice(&EXT2_MAGIC.to_le_bytes());
        put_u32(&mut image, sb + 76, 1);
        put_u32(&mut image, sb + 84, FIRST_NON_RESERVED_INODE);
        image[sb + 88..sb + 90].copy_from_slice(&self.inode_size.to_le_bytes());
        let name = self.volume_name.as_bytes();
        let name_len = name.len().min(16);
        image[sb + 120..sb + 120 + name_len].copy_from_slice(&name[..name_len]);

        // the single group descriptor
        let gd = self.block_offset(2);
        put_u32(&mut image, gd, BLOCK_BITMAP_BLOCK);
        put_u32(&mut image, gd + 4, INODE_BITMAP_BLOCK);
        put_u32(&mut image, gd + 8, INODE_TABLE_BLOCK);
        image[gd + 16..gd + 18].copy_from_slice(&self.used_dirs.to_le_bytes());

        for (inode, record) in &self.inodes {
            let offset = self.inode_offset(*inode);
            image[offset..offset + record.len()].copy_from_slice(record);
        }
        for (block, data) in &self.blocks {
            let offset = self.block_offset(*block);
            image[offset..offset + data.len()].copy_from_slice(data);
        }
        image
    }
}

impl ImageBuilder {
    fn ensure_root(&mut self) {
        if self.inodes.contains_key(&ROOT_INODE) {
            return;
        }
        self.init_dir(ROOT_INODE, ROOT_INODE);
    }

    fn init_dir(&mut self, inode: u32, parent: u32) {
        self.write_inode_header(inode, DIR_MODE, 0, 2);
        self.used_dirs += 1;
        self.open_dir_block(inode);
        self.add_entry(inode, ".", inode, DirEntryFileType::Directory);
        self.add_entry(inode, "..", parent, DirEntryFileType::Directory);
    }

    fn allocate_inode(&mut self) -> u32 {
        let inode = self.next_inode;
        assert!(
            inode <= self.inodes_per_group,
            "fixture inode table is full ({} inodes)",
            self.inodes_per_group
        );
        self.next_inode += 1;
        inode
    }

    fn first_data_block(&self) -> u32 {
        INODE_TABLE_BLOCK + self.inode_table_blocks()
    }

    fn allocate_block(&mut self) -> u32 {
        let block = self.next_block.unwrap_or_else(|| self.first_data_block());
        self.next_block = Some(block + 1);
        let block_size = self.block_size();
        self.blocks.insert(block, vec![0u8; block_size]);
        block
    }

    fn block_mut(&mut self, block: u32) -> &mut Vec<u8> {
        let block_size = self.block_size();
        self.blocks
            .entry(block)
            .or_insert_with(|| vec![0u8; block_size])
    }

    fn direct_blocks_in_use(&self, inode: u32) -> usize {
        (0..DIRECT_POINTERS)
            .take_while(|index| self.read_inode_u32(inode, 40 + index * 4) != 0)
            .count()
    }

    fn write_inode_header(&mut self, inode: u32, mode: u16, size: u32, links: u16) {
        let record = self.inode_record(inode);
        record[0..2].copy_from_slice(&mode.to_le_bytes());
        record[4..8].copy_from_slice(&size.to_le_bytes());
        record[26..28].copy_from_slice(&links.to_le_bytes());
    }

    fn inode_record(&mut self, inode: u32) -> &mut Vec<u8> {
        let inode_size = self.inode_size as usize;
        self.inodes
            .entry(inode)
            .or_insert_with(|| vec![0u8; inode_size])
    }

    fn read_inode_u32(&self, inode: u32, offset: usize) -> u32 {
        self.inodes
            .get(&inode)
            .map(|record| {
                u32::from_le_bytes([
                    record[offset],
                    record[offset + 1],
                    record[offset + 2],
                    record[offset + 3],
                ])
            })
            .unwrap_or(0)
    }

    fn write_inode_u32(&mut self, inode: u32, offset: usize, value: u32) {
        self.inode_record(inode)[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }
}

fn put_u32(image: &mut [u8], offset: usize, value: u32) {
    image[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
