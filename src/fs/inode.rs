use crate::utils::byte_reader::{read_le_u16, read_le_u32};

use super::{filekind::FileKind, FsResult, BLOCK_POINTERS, DIRECT_POINTERS};

/// The fixed 128 byte head of an on-disk inode, copied out of the inode table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inode {
    pub inode_number: u32,
    pub mode: u16,
    /// low 32 bits of the file size
    pub file_size: u32,
    pub hard_links: u16,
    /// `i_block`: 12 direct pointers, then the indirect ones (never followed)
    pub block_pointers: [u32; BLOCK_POINTERS],
}

impl Inode {
    /// decode the record of inode `inode_number` found at `offset`
    pub fn parse(image: &[u8], offset: usize, inode_number: u32) -> FsResult<Self> {
        let mut block_pointers = [0u32; BLOCK_POINTERS];
        for (index, pointer) in block_pointers.iter_mut().enumerate() {
            *pointer = read_le_u32(image, offset + 40 + index * 4)?;
        }
        Ok(Inode {
            inode_number,
            mode: read_le_u16(image, offset)?,
            file_size: read_le_u32(image, offset + 4)?,
            hard_links: read_le_u16(image, offset + 26)?,
            block_pointers,
        })
    }

    /// the direct pointers in slot order, zero meaning unused
    #[inline]
    pub fn direct_blocks(&self) -> &[u32] {
        &self.block_pointers[..DIRECT_POINTERS]
    }

    pub fn file_kind(&self) -> FileKind {
        FileKind::from_mode(self.mode)
    }

    pub fn is_dir(&self) -> bool {
        self.file_kind() == FileKind::Directory
    }

    pub fn is_regular_file(&self) -> bool {
        self.file_kind() == FileKind::RegularFile
    }
}
