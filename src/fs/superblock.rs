use crate::utils::byte_reader::{read_fixed, read_le_u16, read_le_u32, trim_nul_padded};

use super::{
    FsError, FsResult, EXT2_MAGIC, GOOD_OLD_INODE_SIZE, MAX_LOG_BLOCK_SIZE, MIN_BLOCK_SIZE,
    SUPERBLOCK_OFFSET, SUPERBLOCK_SIZE,
};

/// The superblock of an ext2 image, decoded field by field from byte 1024.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuperBlock {
    pub inodes_count: u32,
    pub blocks_count: u32,
    pub free_blocks_count: u32,
    pub free_inodes_count: u32,
    pub first_data_block: u32,
    /// block size is `1024 << log_block_size`
    pub log_block_size: u32,
    pub blocks_per_group: u32,
    pub inodes_per_group: u32,
    pub magic: u16,
    pub rev_level: u32,
    pub first_ino: u32,
    /// raw `s_inode_size`, meaningless on revision 0 images
    pub raw_inode_size: u16,
    pub volume_name: String,
}

impl SuperBlock {
    /// decode and sanity check the superblock of `image`
    pub fn parse(image: &[u8]) -> FsResult<Self> {
        if image.len() < SUPERBLOCK_OFFSET + SUPERBLOCK_SIZE {
            return Err(FsError::MalformedImage(format!(
                "image of {} bytes is too short to hold a superblock",
                image.len()
            )));
        }
        let field = |offset: usize| SUPERBLOCK_OFFSET + offset;
        let superblock = SuperBlock {
            inodes_count: read_le_u32(image, field(0))?,
            blocks_count: read_le_u32(image, field(4))?,
            free_blocks_count: read_le_u32(image, field(12))?,
            free_inodes_count: read_le_u32(image, field(16))?,
            first_data_block: read_le_u32(image, field(20))?,
            log_block_size: read_le_u32(image, field(24))?,
            blocks_per_group: read_le_u32(image, field(32))?,
            inodes_per_group: read_le_u32(image, field(40))?,
            magic: read_le_u16(image, field(56))?,
            rev_level: read_le_u32(image, field(76))?,
            first_ino: read_le_u32(image, field(84))?,
            raw_inode_size: read_le_u16(image, field(88))?,
            volume_name: trim_nul_padded(&read_fixed::<16>(image, field(120))?),
        };
        superblock.validate()?;
        Ok(superblock)
    }

    fn validate(&self) -> FsResult<()> {
        if self.magic != EXT2_MAGIC {
            return Err(FsError::MalformedImage(format!(
                "bad superblock magic {:#06x}, expected {EXT2_MAGIC:#06x}",
                self.magic
            )));
        }
        if self.log_block_size > MAX_LOG_BLOCK_SIZE {
            return Err(FsError::MalformedImage(format!(
                "unsupported s_log_block_size {}",
                self.log_block_size
            )));
        }
        if self.inodes_per_group == 0 {
            return Err(FsError::MalformedImage(
                "s_inodes_per_group is zero".to_string(),
            ));
        }
        if self.inode_size() < GOOD_OLD_INODE_SIZE {
            return Err(FsError::MalformedImage(format!(
                "inode record size {} is smaller than {GOOD_OLD_INODE_SIZE}",
                self.inode_size()
            )));
        }
        Ok(())
    }

    /// block size in bytes
    #[inline]
    pub fn block_size(&self) -> u32 {
        MIN_BLOCK_SIZE << self.log_block_size
    }

    /// bytes per on-disk inode record
    #[inline]
    pub fn inode_size(&self) -> u16 {
        if self.rev_level == 0 {
            GOOD_OLD_INODE_SIZE
        } else {
            self.raw_inode_size
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::image_builder::ImageBuilder;

    #[test]
    fn test_superblock_parsing() {
        let image = ImageBuilder::new().volume_name("fixture").build();
        let superblock = SuperBlock::parse(&image).unwrap();
        assert_eq!(superblock.magic, EXT2_MAGIC);
        assert_eq!(superblock.block_size(), 1024);
        assert_eq!(superblock.inode_size(), 128);
        assert_eq!(superblock.inodes_per_group, 32);
        assert_eq!(superblock.volume_name, "fixture");
    }

    #[test]
    fn test_block_size_follows_log_block_size() {
        for (log, size) in [(0, 1024), (1, 2048), (2, 4096)] {
            let superblock = SuperBlock {
                log_block_size: log,
                ..Default::default()
            };
            assert_eq!(superblock.block_size(), size);
        }
    }

    #[test]
    fn test_revision_zero_uses_fixed_inode_size() {
        let superblock = SuperBlock {
            rev_level: 0,
            raw_inode_size: 0,
            ..Default::default()
        };
        assert_eq!(superblock.inode_size(), GOOD_OLD_INODE_SIZE);
        let superblock = SuperBlock {
            rev_level: 1,
            raw_inode_size: 256,
            ..Default::default()
        };
        assert_eq!(superblock.inode_size(), 256);
    }

    #[test]
    fn test_short_image_is_malformed() {
        let image = vec![0u8; 1500];
        assert!(matches!(
            SuperBlock::parse(&image),
            Err(FsError::MalformedImage(_))
        ));
    }

    #[test]
    fn test_bad_magic_is_malformed() {
        let mut image = ImageBuilder::new().build();
        image[SUPERBLOCK_OFFSET + 56] = 0;
        assert!(matches!(
            SuperBlock::parse(&image),
            Err(FsError::MalformedImage(_))
        ));
    }

    #[test]
    fn test_zero_inodes_per_group_is_malformed() {
        let mut image = ImageBuilder::new().build();
        image[SUPERBLOCK_OFFSET + 40..SUPERBLOCK_OFFSET + 44].fill(0);
        assert!(matches!(
            SuperBlock::parse(&image),
            Err(FsError::MalformedImage(_))
        ));
    }
}
