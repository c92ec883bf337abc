//! Configuration files on disk for tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A configuration file written into its own temporary directory.
///
/// The directory and file are removed when the fixture is dropped.
///
/// # Examples
///
/// ```rust
/// use test_support::ConfFile;
///
/// let conf = ConfFile::new("chrony.conf", "logdir /var/log/chrony\n").expect("write");
/// assert!(conf.path().ends_with("chrony.conf"));
/// ```
#[derive(Debug)]
pub struct ConfFile {
    _dir: TempDir,
    path: PathBuf,
}

impl ConfFile {
    /// Write `contents` to a file called `name` in a fresh directory.
    pub fn new(name: &str, contents: &str) -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(name);
        fs::write(&path, contents)?;
        Ok(Self { _dir: dir, path })
    }

    /// A path inside a fresh directory where no file exists.
    pub fn missing(name: &str) -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(name);
        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::ConfFile;

    #[test]
    fn writes_contents() {
        let conf = ConfFile::new("a.conf", "port 123\n").unwrap();
        assert_eq!(std::fs::read_to_string(conf.path()).unwrap(), "port 123\n");
    }

    #[test]
    fn missing_path_does_not_exist() {
        let conf = ConfFile::missing("none.conf").unwrap();
        assert!(!conf.path().exists());
    }

    #[test]
    fn removed_on_drop() {
        let conf = ConfFile::new("a.conf", "").unwrap();
        let path = conf.path().to_path_buf();
        drop(conf);
        assert!(!path.exists());
    }
}
