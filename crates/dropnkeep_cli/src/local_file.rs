//! Files on disk as dropped files.

use dropnkeep_core::{DroppedFile, FileReadError, NamedFile};
use std::io;
use std::path::{Path, PathBuf};

/// A file whose size is taken from metadata at construction.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
    size: u64,
}

impl LocalFile {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = std::fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("`{}` is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path,
            name,
            size: metadata.len(),
        })
    }
}

impl NamedFile for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }
}

impl DroppedFile for LocalFile {
    fn size(&self) -> u64 {
        self.size
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, FileReadError> {
        std::fs::read(&self.path).map_err(|err| FileReadError::new(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::LocalFile;
    use dropnkeep_core::{DroppedFile, NamedFile};
    use futures::executor::block_on;

    #[test]
    fn reports_name_size_and_bytes() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("Groceries.txt");
        std::fs::write(&path, b"milk").expect("write file");

        let file = LocalFile::open(&path).expect("open file");
        assert_eq!(file.name(), "Groceries.txt");
        assert_eq!(file.size(), 4);
        assert_eq!(block_on(file.read_bytes()).expect("read bytes"), b"milk");
    }

    #[test]
    fn vanished_file_surfaces_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("gone.txt");
        std::fs::write(&path, b"x").expect("write file");
        let file = LocalFile::open(&path).expect("open file");
        std::fs::remove_file(&path).expect("remove file");

        assert!(block_on(file.read_bytes()).is_err());
    }

    #[test]
    fn directories_are_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(LocalFile::open(dir.path()).is_err());
    }
}
