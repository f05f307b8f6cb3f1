//! read-only access to an ext2 image held in memory
pub mod block_group;
pub mod directory;
pub mod error;
pub mod filekind;
pub mod fs_layout;
pub mod inode;
pub mod path;
mod resolver;
pub mod superblock;

pub use block_group::*;
pub use directory::*;
pub use error::*;
pub use filekind::*;
pub use fs_layout::*;
pub use inode::*;
pub use path::*;
pub use superblock::*;

/// the primary superblock always starts 1024 bytes into the image
pub const SUPERBLOCK_OFFSET: usize = 1024;
pub const SUPERBLOCK_SIZE: usize = 1024;
pub const EXT2_MAGIC: u16 = 0xef53;
/// inode number of the root directory "/"
pub const ROOT_INODE: u32 = 2;
/// only these `i_block` slots are ever followed
pub const DIRECT_POINTERS: usize = 12;
/// `i_block` holds 12 direct, 1 indirect, 1 double and 1 triple indirect pointer
pub const BLOCK_POINTERS: usize = 15;
/// record size of revision 0 images, which lack `s_inode_size`
pub const GOOD_OLD_INODE_SIZE: u16 = 128;
const MIN_BLOCK_SIZE: u32 = 1024;
const MAX_LOG_BLOCK_SIZE: u32 = 6;
