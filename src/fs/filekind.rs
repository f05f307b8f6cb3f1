use std::fmt;

/// an enum to describe the type of a file
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum FileKind {
    /// an regular file
    RegularFile,
    /// a directory
    Directory,
    /// a symbolic link
    SymbolicLink,
    CharDevice,
    BlockDevice,
    NamedPipe,
    Socket,
    /// Unknown
    #[default]
    Unknown,
}

impl FileKind {
    /// decode the format bits of an inode's `i_mode`
    pub fn from_mode(mode: u16) -> Self {
        match u32::from(mode) & libc::S_IFMT as u32 {
            m if m == libc::S_IFREG as u32 => FileKind::RegularFile,
            m if m == libc::S_IFDIR as u32 => FileKind::Directory,
            m if m == libc::S_IFLNK as u32 => FileKind::SymbolicLink,
            m if m == libc::S_IFCHR as u32 => FileKind::CharDevice,
            m if m == libc::S_IFBLK as u32 => FileKind::BlockDevice,
            m if m == libc::S_IFIFO as u32 => FileKind::NamedPipe,
            m if m == libc::S_IFSOCK as u32 => FileKind::Socket,
            _ => FileKind::Unknown,
        }
    }
}

/// the `file_type` byte stored in a directory entry
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum DirEntryFileType {
    Unknown = 0,
    RegularFile = 1,
    Directory = 2,
    CharDevice = 3,
    BlockDevice = 4,
    NamedPipe = 5,
    Socket = 6,
    SymbolicLink = 7,
}

impl From<u8> for DirEntryFileType {
    fn from(raw: u8) -> Self {
        match raw {
            1 => DirEntryFileType::RegularFile,
            2 => DirEntryFileType::Directory,
            3 => DirEntryFileType::CharDevice,
            4 => DirEntryFileType::BlockDevice,
            5 => DirEntryFileType::NamedPipe,
            6 => DirEntryFileType::Socket,
            7 => DirEntryFileType::SymbolicLink,
            _ => DirEntryFileType::Unknown,
        }
    }
}

/// implement a trait to convert [DirEntryFileType] to [FileKind]
impl From<DirEntryFileType> for FileKind {
    fn from(file_type: DirEntryFileType) -> Self {
        match file_type {
            DirEntryFileType::RegularFile => FileKind::RegularFile,
            DirEntryFileType::Directory => FileKind::Directory,
            DirEntryFileType::SymbolicLink => FileKind::SymbolicLink,
            DirEntryFileType::CharDevice => FileKind::CharDevice,
            DirEntryFileType::BlockDevice => FileKind::BlockDevice,
            DirEntryFileType::NamedPipe => FileKind::NamedPipe,
            DirEntryFileType::Socket => FileKind::Socket,
            DirEntryFileType::Unknown => FileKind::Unknown,
        }
    }
}

/// short names as printed by `ls`
impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::RegularFile => "file",
            FileKind::Directory => "dir",
            FileKind::SymbolicLink => "symlink",
            FileKind::CharDevice => "chardev",
            FileKind::BlockDevice => "blockdev",
            FileKind::NamedPipe => "fifo",
            FileKind::Socket => "socket",
            FileKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
