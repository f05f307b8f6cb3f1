//! Read-only path resolution over ext2 images held in memory.
pub mod cat;
pub mod cli_interface;
pub mod fs;
pub mod image_file;
pub mod info;
pub mod ls;
pub mod resolve;
pub mod utils;
pub use fs::{Ext2Image, FsError, ROOT_INODE};
