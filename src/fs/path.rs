//! split a slash separated path into the names to look up, root first
const SEPARATOR: char = '/';

/// one step of a tokenized path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathToken<'a> {
    /// a single name, never empty and never containing `/`
    Name(&'a str),
    /// every name has been handed out
    EndOfPath,
}

/// The components of one path, consumed front to back.
///
/// Empty segments are dropped, so `"/a//b/"` yields `a`, `b` and `"/"`
/// yields nothing but [PathToken::EndOfPath]. The leading `/` is optional;
/// paths are always taken relative to the root directory.
#[derive(Debug, Clone)]
pub struct PathComponents<'a> {
    names: Vec<&'a str>,
    next: usize,
}

/// tokenize `path`
/// # Example
/// ```
/// use ext2cat::fs::{split_path, PathToken};
/// let mut components = split_path("/a/b/c");
/// assert_eq!(components.next_token(), PathToken::Name("a"));
/// assert_eq!(components.next_token(), PathToken::Name("b"));
/// assert_eq!(components.next_token(), PathToken::Name("c"));
/// assert_eq!(components.next_token(), PathToken::EndOfPath);
/// ```
pub fn split_path(path: &str) -> PathComponents<'_> {
    PathComponents {
        names: path
            .split(SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .collect(),
        next: 0,
    }
}

impl<'a> PathComponents<'a> {
    /// take the next name, or [PathToken::EndOfPath] once all are taken
    pub fn next_token(&mut self) -> PathToken<'a> {
        match self.names.get(self.next) {
            Some(name) => {
                self.next += 1;
                PathToken::Name(*name)
            }
            None => PathToken::EndOfPath,
        }
    }

    /// number of names, including those already taken
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// the names not taken yet
    pub fn remaining(&self) -> &[&'a str] {
        &self.names[self.next..]
    }
}

impl<'a> Iterator for PathComponents<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            PathToken::Name(name) => Some(name),
            PathToken::EndOfPath => None,
        }
    }
}
