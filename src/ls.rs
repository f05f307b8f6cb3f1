//! list a directory stored in an image
use std::{io::Write, path::Path};

use anyhow::anyhow;

use crate::{fs::FileKind, image_file::ImageFile};

/// write one `inode  type  name` line per entry of `dir_path` to `out`
/// # Return
/// the number of entries listed
pub fn ls<P, W>(image_file_path: P, dir_path: &str, out: &mut W) -> anyhow::Result<usize>
where
    P: AsRef<Path>,
    W: Write,
{
    let image_file = ImageFile::open(image_file_path)?;
    let image = image_file.image();
    let inode_number = image.resolve(dir_path)?;
    if inode_number == 0 {
        return Err(anyhow!("{dir_path}: No such file or directory"));
    }
    let dir = image.inode(inode_number)?;
    if !dir.is_dir() {
        return Err(anyhow!("{dir_path}: Not a directory"));
    }
    let entries = image.entries(&dir)?;
    for entry in &entries {
        writeln!(
            out,
            "{:>8}  {:<8} {}",
            entry.inode,
            FileKind::from(entry.file_type).to_string(),
            entry.name_lossy()
        )?;
    }
    Ok(entries.len())
}
