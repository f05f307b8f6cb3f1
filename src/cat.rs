//! print a file stored in an image, the way `cat` would
use std::{io::Write, path::Path};

use anyhow::anyhow;
use log::info;

use crate::image_file::ImageFile;

/// copy the contents of `file_path` inside the image to `out`
/// # Params
/// - `image_file_path`: the path of the image file
/// - `file_path`: the absolute path of a regular file inside the image
/// - `out`: where the file contents go
///
/// # Return
/// the number of bytes written, or an error if the path does not resolve
/// or names a directory
pub fn cat<P, W>(image_file_path: P, file_path: &str, out: &mut W) -> anyhow::Result<u64>
where
    P: AsRef<Path>,
    W: Write,
{
    let image_file = ImageFile::open(image_file_path)?;
    let image = image_file.image();
    let inode_number = image.resolve(file_path)?;
    if inode_number == 0 {
        return Err(anyhow!("{file_path}: No such file or directory"));
    }
    let inode = image.inode(inode_number)?;
    if inode.is_dir() {
        return Err(anyhow!("{file_path}: Is a directory"));
    }
    info!(
        "cat {file_path}: inode {inode_number}, {} bytes",
        inode.file_size
    );
    let written = image.read_direct_data(&inode, out)?;
    out.flush()?;
    Ok(written)
}
