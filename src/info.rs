//! describe the geometry of an image
use std::{io::Write, path::Path};

use byte_unit::Byte;

use crate::{fs::FIRST_BLOCK_GROUP, image_file::ImageFile, utils::fs_size_calculator};

/// print the superblock and the first group descriptor of the image to `out`
pub fn info<P, W>(image_file_path: P, out: &mut W) -> anyhow::Result<()>
where
    P: AsRef<Path>,
    W: Write,
{
    let image_file = ImageFile::open(image_file_path)?;
    let image = image_file.image();
    let superblock = image.superblock()?;
    let group = image.group_descriptor(FIRST_BLOCK_GROUP)?;
    let block_size = superblock.block_size();
    let image_size = image.as_bytes().len();
    let table_size =
        fs_size_calculator::inode_table_size(superblock.inodes_per_group, superblock.inode_size());

    writeln!(out, "volume name:       {}", superblock.volume_name)?;
    writeln!(
        out,
        "image size:        {}",
        Byte::from_bytes(image_size as _).get_appropriate_unit(true)
    )?;
    writeln!(
        out,
        "block size:        {}",
        Byte::from_bytes(block_size as _).get_appropriate_unit(true)
    )?;
    writeln!(
        out,
        "blocks:            {} ({} free)",
        superblock.blocks_count, superblock.free_blocks_count
    )?;
    writeln!(
        out,
        "inodes:            {} ({} free)",
        superblock.inodes_count, superblock.free_inodes_count
    )?;
    writeln!(out, "first data block:  {}", superblock.first_data_block)?;
    writeln!(out, "blocks per group:  {}", superblock.blocks_per_group)?;
    writeln!(out, "inodes per group:  {}", superblock.inodes_per_group)?;
    writeln!(out, "first inode:       {}", superblock.first_ino)?;
    writeln!(out, "inode size:        {}", superblock.inode_size())?;
    writeln!(out, "revision:          {}", superblock.rev_level)?;
    writeln!(out, "inode table block: {}", group.inode_table)?;
    writeln!(
        out,
        "inode table size:  {} ({} blocks)",
        Byte::from_bytes(table_size as _).get_appropriate_unit(true),
        fs_size_calculator::inode_table_blocks(
            superblock.inodes_per_group,
            superblock.inode_size(),
            block_size
        )
    )?;
    writeln!(out, "directories:       {}", group.used_dirs_count)?;
    Ok(())
}
