//! look up the inode number of a path inside an image
use std::path::Path;

use crate::image_file::ImageFile;

/// resolve `file_path` inside the image at `image_file_path`
/// # Params
/// - `image_file_path`: the path of the image file
/// - `file_path`: the absolute path inside the image, like **/etc/hosts**
///
/// # Return
/// the inode number, `0` if the path does not exist
pub fn resolve<P>(image_file_path: P, file_path: &str) -> anyhow::Result<u32>
where
    P: AsRef<Path>,
{
    let image_file = ImageFile::open(image_file_path)?;
    Ok(image_file.image().resolve(file_path)?)
}
