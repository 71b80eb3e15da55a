use std::{fs::{self, File}, io::Write, path::{Path, PathBuf}};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Create the directory if it doesn’t exist; error if a non-directory exists there.
pub(crate) fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            return Err(Error::Config(format!("path exists but is not a directory: {}", path.display())));
        }
    } else {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Error unless the file already exists.
pub(crate) fn require_file_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Write-then-rename wrapper so readers never observe a half-written output file.
pub(crate) struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl PendingWrite {
    pub(crate) fn open(target: &Path) -> Result<Self> {
        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        ensure_dir_exists(parent)?;
        let tmp = NamedTempFile::new_in(parent)?;
        Ok(Self { target: target.to_path_buf(), tmp })
    }

    /// Flush, fsync (best effort) and atomically move into place.
    pub(crate) fn finalize(mut self) -> Result<()> {
        self.tmp.flush()?;
        self.tmp.as_file().sync_all().ok();
        self.tmp.persist(&self.target).map_err(|e| Error::Io(e.error))?;
        if let Some(dir) = self.target.parent() {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(())
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.tmp.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.tmp.flush() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_write_only_appears_after_finalize() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out.svg");

        let mut pending = PendingWrite::open(&target).unwrap();
        pending.write_all(b"<svg/>").unwrap();
        assert!(!target.exists());

        pending.finalize().unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "<svg/>");
    }

    #[test]
    fn ensure_dir_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, "x").unwrap();

        assert!(ensure_dir_exists(&file).is_err());
        assert!(ensure_dir_exists(&dir.path().join("a/b")).is_ok());
        assert!(matches!(require_file_exists(&dir.path().join("missing")), Err(Error::FileNotFound(_))));
    }
}
