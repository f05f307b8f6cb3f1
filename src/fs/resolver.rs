//! walk a path from the root directory down to its inode number
use log::debug;

use super::{
    fs_layout::Ext2Image,
    path::{split_path, PathComponents, PathToken},
    FsResult, Inode, ROOT_INODE,
};

/// where a resolution stands
#[derive(Debug)]
enum ResolveState {
    /// nothing has been read yet, the walk starts at `root`
    Start { root: u32 },
    /// `dir` is scanned for the next component; `resolved` is its inode number
    Descending { dir: Inode, resolved: u32 },
    /// final answer, 0 when a component is missing
    Done(u32),
}

impl<'a> Ext2Image<'a> {
    /// Inode number of the file at `path`, or 0 when it does not resolve.
    ///
    /// The walk starts at [ROOT_INODE]. `"/"` resolves to the root itself.
    /// Each resolved inode is read and scanned as a directory for the next
    /// component whether or not it is one, and a missing component ends the
    /// walk with 0. Errors only come from reading the image.
    pub fn resolve(&self, path: &str) -> FsResult<u32> {
        self.resolve_from(ROOT_INODE, path)
    }

    /// like [resolve](Self::resolve), but starting from the directory `root`
    pub fn resolve_from(&self, root: u32, path: &str) -> FsResult<u32> {
        let mut components = split_path(path);
        debug!("resolving {path:?}: {} component(s)", components.len());
        let mut state = ResolveState::Start { root };
        loop {
            state = match state {
                ResolveState::Done(inode) => {
                    debug!("{path:?} resolved to inode {inode}");
                    return Ok(inode);
                }
                state => self.step(state, &mut components)?,
            };
        }
    }

    fn step(
        &self,
        state: ResolveState,
        components: &mut PathComponents<'_>,
    ) -> FsResult<ResolveState> {
        Ok(match state {
            ResolveState::Start { root } => ResolveState::Descending {
                dir: self.inode(root)?,
                resolved: root,
            },
            ResolveState::Descending { dir, resolved } => match components.next_token() {
                PathToken::EndOfPath => ResolveState::Done(resolved),
                PathToken::Name(name) => match self.lookup(&dir, name)? {
                    0 => ResolveState::Done(0),
                    next => ResolveState::Descending {
                        dir: self.inode(next)?,
                        resolved: next,
                    },
                },
            },
            done @ ResolveState::Done(_) => done,
        })
    }
}
