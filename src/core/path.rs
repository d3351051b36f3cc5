//! Relative-path segment model for roam.
//!
//! A [RelPath] is the current location expressed as an ordered list of
//! segments below the root boundary. The empty list is the root itself.
//! Navigation never mutates a path in place; every transition produces a
//! new [RelPath].
//!
//! [resolve_under_root] applies `.`/`..`/plain-segment semantics from a
//! user-typed relative path on top of a base path. Popping past the root
//! is an error, never a clamp, and absolute-looking input is rejected
//! unconditionally.

use std::fmt;

/// A location relative to the root boundary, as ordered segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RelPath {
    segments: Vec<String>,
}

impl RelPath {
    /// The root location (empty segment list).
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Splits a string on `/`, dropping empty segments.
    ///
    /// `"a//b/"` and `"a/b"` produce the same path.
    pub fn parse(path: &str) -> Self {
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
        Self { segments }
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Joins the segments with `/`. The root joins to the empty string.
    pub fn joined(&self) -> String {
        self.segments.join("/")
    }

    /// The path one segment deeper.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_owned());
        Self { segments }
    }

    /// The path one segment up, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Errors from [resolve_under_root].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A `..` segment would escape the root boundary.
    AboveRoot,
    /// The input is absolute or a remote spec; only root-relative
    /// paths are accepted.
    AbsoluteInput,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::AboveRoot => write!(f, "path escapes the root boundary"),
            PathError::AbsoluteInput => write!(f, "absolute paths are not allowed here"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves a user-typed relative path against `base`.
///
/// `.` keeps the current level, `..` pops one segment and fails with
/// [PathError::AboveRoot] when there is nothing left to pop. Input with a
/// leading separator, a drive letter or `remote:` syntax is rejected with
/// [PathError::AbsoluteInput].
pub fn resolve_under_root(base: &RelPath, input: &str) -> Result<RelPath, PathError> {
    if looks_absolute(input) {
        return Err(PathError::AbsoluteInput);
    }

    let mut segments = base.segments().to_vec();
    for segment in input.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(PathError::AboveRoot);
                }
            }
            name => segments.push(name.to_owned()),
        }
    }
    Ok(RelPath::from_segments(segments))
}

/// True for input that names a location outside the root-relative space:
/// leading separators, Windows drive prefixes and `remote:path` specs.
fn looks_absolute(input: &str) -> bool {
    input.starts_with('/') || input.starts_with('\\') || input.contains(':')
}
