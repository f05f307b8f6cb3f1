//! map an image file into memory, read-only
use std::{
    fs::OpenOptions,
    io::{Seek, SeekFrom},
    path::Path,
};

use log::info;
use memmap2::{Mmap, MmapOptions};

use crate::fs::Ext2Image;

/// An image file mapped into memory. The mapping lives as long as this value
/// and every [Ext2Image] borrowed from it.
#[derive(Debug)]
pub struct ImageFile {
    mmap: Mmap,
}

impl ImageFile {
    /// open the image at `image_path` for reading and map it
    /// # Params
    /// - `image_path`: the path of the image file,\
    /// or of a block device such as **/dev/sda1**
    pub fn open<P>(image_path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let mut file = OpenOptions::new().read(true).open(image_path.as_ref())?;
        // block devices report a metadata length of 0
        let len = usize::try_from(file.seek(SeekFrom::End(0))?)?;
        // Safety
        // The image must not be modified by another process while it is
        // mapped; this program never writes to it.
        let mmap = unsafe { MmapOptions::new().len(len).map(&file)? };
        info!(
            "mapped {} ({} bytes)",
            image_path.as_ref().display(),
            mmap.len()
        );
        Ok(ImageFile { mmap })
    }

    #[inline]
    pub fn image(&self) -> Ext2Image<'_> {
        Ext2Image::new(&self.mmap)
    }
}
