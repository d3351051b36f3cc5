//! Directory listing model for roam.
//!
//! An [Entry] is one row of a listing: the synthetic parent marker, a
//! subdirectory or a file. A [Listing] is the ordered view over one
//! location: parent marker first (when not at the root), then
//! subdirectories, then files.
//!
//! Ordering is ordinal (byte-wise): uppercase names sort before
//! lowercase, so a directory holding `B`, `a` and `note.txt` lists as
//! `B/`, `a/`, `note.txt`. The collation is fixed here rather than
//! inherited from the platform.

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Synthetic `../` row that navigates to the parent location.
    Parent,
    Directory(String),
    File(String),
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Parent => "..",
            Entry::Directory(name) | Entry::File(name) => name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Parent | Entry::Directory(_))
    }

    /// Row text as shown in the pane. Directories carry a trailing `/`
    /// when `dir_marker` is set; the parent marker is always `../`.
    pub fn display_text(&self, dir_marker: bool) -> String {
        match self {
            Entry::Parent => "../".to_owned(),
            Entry::Directory(name) => {
                if dir_marker {
                    format!("{name}/")
                } else {
                    name.clone()
                }
            }
            Entry::File(name) => name.clone(),
        }
    }
}

/// Unordered listing output of a backend adapter: directory names and
/// file names, split but not yet sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListing {
    pub dirs: Vec<String>,
    pub files: Vec<String>,
}

/// The ordered result of listing one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    entries: Vec<Entry>,
}

impl Listing {
    /// Builds a listing from raw backend output.
    ///
    /// The parent marker leads when `with_parent` is set, followed by
    /// directories, then files, each group sorted ordinally.
    pub fn build(raw: RawListing, with_parent: bool) -> Self {
        let RawListing { mut dirs, mut files } = raw;
        dirs.sort_unstable();
        files.sort_unstable();

        let mut entries =
            Vec::with_capacity(dirs.len() + files.len() + usize::from(with_parent));
        if with_parent {
            entries.push(Entry::Parent);
        }
        entries.extend(dirs.into_iter().map(Entry::Directory));
        entries.extend(files.into_iter().map(Entry::File));
        Self { entries }
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Entry> {
        self.entries.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(dirs: &[&str], files: &[&str]) -> RawListing {
        RawListing {
            dirs: dirs.iter().map(|s| s.to_string()).collect(),
            files: files.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn empty_directory() {
        let listing = Listing::build(raw(&[], &[]), false);
        assert!(listing.is_empty());

        let listing = Listing::build(raw(&[], &[]), true);
        assert_eq!(listing.entries(), &[Entry::Parent]);
    }

    #[test]
    fn files_only() {
        let listing = Listing::build(raw(&[], &["b.txt", "a.txt"]), false);
        assert_eq!(
            listing.entries(),
            &[
                Entry::File("a.txt".into()),
                Entry::File("b.txt".into()),
            ]
        );
    }

    #[test]
    fn dirs_only() {
        let listing = Listing::build(raw(&["zed", "arch"], &[]), false);
        assert_eq!(
            listing.entries(),
            &[
                Entry::Directory("arch".into()),
                Entry::Directory("zed".into()),
            ]
        );
    }

    #[test]
    fn dirs_before_files_parent_first() {
        let listing = Listing::build(raw(&["src"], &["Cargo.toml"]), true);
        assert_eq!(
            listing.entries(),
            &[
                Entry::Parent,
                Entry::Directory("src".into()),
                Entry::File("Cargo.toml".into()),
            ]
        );
    }

    #[test]
    fn ordinal_collation_uppercase_first() {
        // Ordinal sort: ASCII uppercase precedes lowercase.
        let listing = Listing::build(raw(&["a", "B"], &["note.txt"]), false);
        let names: Vec<&str> = listing.entries().iter().map(|e| e.name()).collect();
        assert_eq!(names, ["B", "a", "note.txt"]);

        let listing = Listing::build(raw(&[], &["apple", "Banana"]), false);
        let names: Vec<&str> = listing.entries().iter().map(|e| e.name()).collect();
        assert_eq!(names, ["Banana", "apple"]);
    }

    #[test]
    fn display_text_markers() {
        assert_eq!(Entry::Parent.display_text(false), "../");
        assert_eq!(Entry::Directory("src".into()).display_text(true), "src/");
        assert_eq!(Entry::Directory("src".into()).display_text(false), "src");
        assert_eq!(Entry::File("a.rs".into()).display_text(true), "a.rs");
    }
}
