//! Backend adapters for roam.
//!
//! A navigator session drives exactly one backend, picked at startup:
//! the local filesystem, or an rclone remote reached through `rclone lsf`.
//! Both adapters produce a flat, top-level [RawListing]; ordering is
//! imposed later by [crate::core::Listing], never assumed from the
//! backend.

use crate::core::listing::RawListing;
use crate::core::path::RelPath;

use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Buffer size for reading rclone output.
const BUFREADER_SIZE: usize = 32768;

/// Which adapter a session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Local,
    Remote,
}

/// CLI-level backend choice; `Auto` inspects the root spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindOverride {
    #[default]
    Auto,
    Local,
    Remote,
}

/// The immutable root boundary a session is confined to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootSpec {
    Local(PathBuf),
    Remote { remote: String, path: String },
}

impl RootSpec {
    pub fn kind(&self) -> BackendKind {
        match self {
            RootSpec::Local(_) => BackendKind::Local,
            RootSpec::Remote { .. } => BackendKind::Remote,
        }
    }

    /// Stable identity string used in cache keys and the location bar.
    pub fn identity(&self) -> String {
        match self {
            RootSpec::Local(path) => path.display().to_string(),
            RootSpec::Remote { remote, path } => format!("{remote}:{path}"),
        }
    }

    /// Fully-qualified location string for a relative path under this
    /// root: a filesystem join for local roots, `/`-concatenation after
    /// the `remote:path` prefix for remote ones.
    pub fn qualified(&self, rel: &RelPath) -> String {
        match self {
            RootSpec::Local(path) => {
                let mut full = path.clone();
                for segment in rel.segments() {
                    full.push(segment);
                }
                full.display().to_string()
            }
            RootSpec::Remote { remote, path } => {
                let joined = rel.joined();
                match (path.is_empty(), joined.is_empty()) {
                    (true, true) => format!("{remote}:"),
                    (true, false) => format!("{remote}:{joined}"),
                    (false, true) => format!("{remote}:{path}"),
                    (false, false) => format!("{remote}:{path}/{joined}"),
                }
            }
        }
    }

    /// Local directory for a relative path; `None` for remote roots.
    pub fn local_dir(&self, rel: &RelPath) -> Option<PathBuf> {
        match self {
            RootSpec::Local(path) => {
                let mut full = path.clone();
                for segment in rel.segments() {
                    full.push(segment);
                }
                Some(full)
            }
            RootSpec::Remote { .. } => None,
        }
    }
}

/// Picks the backend for a root spec. An explicit override always wins;
/// otherwise a drive path or an existing local directory means local,
/// `token:rest` means remote, anything else falls back to local.
pub fn detect_kind(root: &str, over: KindOverride) -> BackendKind {
    match over {
        KindOverride::Local => BackendKind::Local,
        KindOverride::Remote => BackendKind::Remote,
        KindOverride::Auto => {
            if looks_like_drive(root) || Path::new(root).is_dir() {
                BackendKind::Local
            } else if looks_like_remote_spec(root) {
                BackendKind::Remote
            } else {
                BackendKind::Local
            }
        }
    }
}

/// Validates and normalizes the root argument into a [RootSpec].
pub fn parse_root(root: &str, kind: BackendKind) -> Result<RootSpec, String> {
    match kind {
        BackendKind::Local => {
            let path = PathBuf::from(root);
            if !path.is_dir() {
                return Err(format!("'{root}' is not an existing directory"));
            }
            let path = path.canonicalize().unwrap_or(path);
            Ok(RootSpec::Local(path))
        }
        BackendKind::Remote => {
            let (remote, path) = root
                .split_once(':')
                .ok_or_else(|| format!("'{root}' is not a remote spec (expected remote:path)"))?;
            if remote.is_empty() || !is_remote_name(remote) {
                return Err(format!("'{root}' has an invalid remote name"));
            }
            Ok(RootSpec::Remote {
                remote: remote.to_owned(),
                path: path.trim_matches('/').to_owned(),
            })
        }
    }
}

fn looks_like_drive(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'\\' || bytes[2] == b'/')
}

fn is_remote_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn looks_like_remote_spec(s: &str) -> bool {
    matches!(s.split_once(':'), Some((name, _)) if !name.is_empty() && is_remote_name(name))
}

/// Lists the immediate children of a local directory, split into
/// directories and files. Symlinks count as directories when their
/// target is one.
pub fn list_local(dir: &Path) -> io::Result<RawListing> {
    let mut raw = RawListing::default();

    for entry in std::fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let name = entry.file_name().to_string_lossy().into_owned();

        let is_dir = match entry.file_type() {
            Ok(ft) if ft.is_symlink() => std::fs::metadata(entry.path())
                .map(|md| md.is_dir())
                .unwrap_or(false),
            Ok(ft) => ft.is_dir(),
            Err(_) => continue,
        };

        if is_dir {
            raw.dirs.push(name);
        } else {
            raw.files.push(name);
        }
    }
    Ok(raw)
}

/// Runs `rclone lsf` against a fully-qualified remote location and
/// returns the raw output lines (directories carry a trailing `/`).
///
/// The spawned process is killed as soon as `cancel` is observed set;
/// cancellation surfaces as an error so callers never treat a partial
/// listing as complete.
pub fn run_lsf(spec: &str, cancel: &Arc<AtomicBool>) -> io::Result<Vec<String>> {
    let mut proc = match Command::new("rclone")
        .arg("lsf")
        .arg("--")
        .arg(spec)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(proc) => proc,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(io::Error::other(
                "rclone was not found in PATH. Please install rclone",
            ));
        }
        Err(e) => return Err(io::Error::other(format!("failed to spawn rclone: {e}"))),
    };

    let mut lines = Vec::new();
    if let Some(stdout) = proc.stdout.take() {
        let reader = BufReader::with_capacity(BUFREADER_SIZE, stdout);
        for line in reader.lines() {
            if cancel.load(Ordering::Relaxed) {
                let _ = proc.kill();
                let _ = proc.wait();
                return Err(io::Error::other("listing cancelled"));
            }
            lines.push(line?);
        }
    }

    let status = proc.wait()?;
    if cancel.load(Ordering::Relaxed) {
        return Err(io::Error::other("listing cancelled"));
    }
    if !status.success() {
        return Err(io::Error::other(format!(
            "rclone lsf failed for '{spec}' ({status})"
        )));
    }
    Ok(lines)
}

/// Splits `rclone lsf` output lines into directories (trailing `/`,
/// stripped) and files.
pub fn partition_lsf(lines: Vec<String>) -> RawListing {
    let mut raw = RawListing::default();
    for line in lines {
        let line = line.trim_end_matches(['\r']);
        if line.is_empty() {
            continue;
        }
        match line.strip_suffix('/') {
            Some(dir) => raw.dirs.push(dir.to_owned()),
            None => raw.files.push(line.to_owned()),
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn detect_kind_override_wins() {
        assert_eq!(
            detect_kind("gdrive:backup", KindOverride::Local),
            BackendKind::Local
        );
        assert_eq!(detect_kind("/tmp", KindOverride::Remote), BackendKind::Remote);
    }

    #[test]
    fn detect_kind_auto_rules() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let local = tmp.path().to_string_lossy().into_owned();

        assert_eq!(detect_kind(&local, KindOverride::Auto), BackendKind::Local);
        assert_eq!(
            detect_kind("gdrive:backup/2024", KindOverride::Auto),
            BackendKind::Remote
        );
        assert_eq!(detect_kind("C:\\data", KindOverride::Auto), BackendKind::Local);
        // Neither an existing dir nor a remote spec: default local.
        assert_eq!(
            detect_kind("no/such/dir-here", KindOverride::Auto),
            BackendKind::Local
        );
        Ok(())
    }

    #[test]
    fn parse_root_local_requires_directory() {
        assert!(parse_root("/path/does/not/exist", BackendKind::Local).is_err());
    }

    #[test]
    fn parse_root_remote_spec() {
        let spec = parse_root("gdrive:backup/2024/", BackendKind::Remote).unwrap();
        assert_eq!(
            spec,
            RootSpec::Remote {
                remote: "gdrive".into(),
                path: "backup/2024".into(),
            }
        );
        assert!(parse_root("not-a-spec", BackendKind::Remote).is_err());
        assert!(parse_root(":missing-name", BackendKind::Remote).is_err());
    }

    #[test]
    fn qualified_remote_paths() {
        let spec = RootSpec::Remote {
            remote: "gd".into(),
            path: "backup".into(),
        };
        assert_eq!(spec.qualified(&RelPath::root()), "gd:backup");
        assert_eq!(spec.qualified(&RelPath::parse("a/b")), "gd:backup/a/b");

        let bare = RootSpec::Remote {
            remote: "gd".into(),
            path: String::new(),
        };
        assert_eq!(bare.qualified(&RelPath::root()), "gd:");
        assert_eq!(bare.qualified(&RelPath::parse("x")), "gd:x");
    }

    #[test]
    fn list_local_splits_dirs_and_files() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        fs::create_dir(tmp.path().join("sub"))?;
        File::create(tmp.path().join("note.txt"))?;

        let raw = list_local(tmp.path())?;
        assert_eq!(raw.dirs, ["sub"]);
        assert_eq!(raw.files, ["note.txt"]);
        Ok(())
    }

    #[test]
    fn list_local_missing_dir_errors() {
        assert!(list_local(Path::new("/path/does/not/exist")).is_err());
    }

    #[test]
    fn partition_lsf_trailing_slash() {
        let raw = partition_lsf(vec![
            "docs/".into(),
            "readme.md".into(),
            String::new(),
            "src/".into(),
        ]);
        assert_eq!(raw.dirs, ["docs", "src"]);
        assert_eq!(raw.files, ["readme.md"]);
    }
}
