use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Opens the byte sink a session writes to.
///
/// The engine does not care where the bytes end up; implementations decide
/// between directories, devices or in-memory buffers.
pub trait StorageProvider: Send + Sync {
    fn open_sink(&self, target: &str) -> io::Result<Box<dyn Write + Send>>;
}

/// Writes log files into the first usable directory of a candidate list.
///
/// Candidates are tried in order and the first one that exists as a
/// directory wins (e.g. a removable card listed before internal storage).
/// When none exists, the first candidate is created.
#[derive(Debug, Clone)]
pub struct FileStorage {
    roots: Vec<PathBuf>,
}

impl FileStorage {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Storage rooted at a single directory.
    pub fn in_dir(root: impl Into<PathBuf>) -> Self {
        Self { roots: vec![root.into()] }
    }

    /// The directory new files are created in.
    pub fn choose_root(&self) -> io::Result<&Path> {
        if let Some(existing) = self.roots.iter().find(|root| root.is_dir()) {
            return Ok(existing);
        }
        let first = self.roots.first().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no storage roots configured")
        })?;
        fs::create_dir_all(first)?;
        Ok(first)
    }

    /// Full path a target name resolves to.
    pub fn path_for(&self, target: &str) -> io::Result<PathBuf> {
        Ok(self.choose_root()?.join(target))
    }
}

impl StorageProvider for FileStorage {
    fn open_sink(&self, target: &str) -> io::Result<Box<dyn Write + Send>> {
        let path = self.path_for(target)?;
        tracing::debug!(path = %path.display(), "creating log file");
        Ok(Box::new(File::create(path)?))
    }
}
