use crate::pipeline::filename::is_safe_name;
use log::{debug, warn};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;

/// Sub-folders of the upload root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folder {
    Signatures,
    Pdfs,
}

impl Folder {
    fn dir_name(self) -> &'static str {
        match self {
            Folder::Signatures => "signatures",
            Folder::Pdfs => "pdfs",
        }
    }
}

/// Flat file storage under the configured upload directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates the store and its folders.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let store = Self { root: root.into() };
        for folder in [Folder::Signatures, Folder::Pdfs] {
            fs::create_dir_all(store.root.join(folder.dir_name()))?;
        }
        Ok(store)
    }

    /// Location of `name` in `folder`. Names that could escape the folder
    /// are rejected.
    pub fn path(&self, folder: Folder, name: &str) -> io::Result<PathBuf> {
        if !is_safe_name(name) {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("unsafe file name `{name}`"),
            ));
        }
        Ok(self.root.join(folder.dir_name()).join(name))
    }

    pub fn save(&self, folder: Folder, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.path(folder, name)?;
        fs::write(&path, bytes)?;
        debug!("Stored {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    pub fn read(&self, folder: Folder, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path(folder, name)?)
    }

    pub fn exists(&self, folder: Folder, name: &str) -> bool {
        self.path(folder, name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Removes `name`. Returns `false` when there was nothing to remove.
    pub fn delete(&self, folder: Folder, name: &str) -> io::Result<bool> {
        match fs::remove_file(self.path(folder, name)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Best-effort removal used by cascades; failures are only logged.
    pub fn discard(&self, folder: Folder, name: &str) {
        if let Err(e) = self.delete(folder, name) {
            warn!("Could not remove {}/{}: {}", folder.dir_name(), name, e);
        }
    }
}
