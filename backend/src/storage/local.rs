use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Subfolder that segregates stored uploads by the caller's authentication
/// status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    User,
    Guest,
}

impl Partition {
    pub fn from_auth(is_authenticated: bool) -> Self {
        if is_authenticated {
            Partition::User
        } else {
            Partition::Guest
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Partition::User => "user",
            Partition::Guest => "guest",
        }
    }
}

/// Filesystem store rooted at the configured upload folder. Files are only
/// ever added, never rewritten by the service itself; a duplicate filename
/// within a partition overwrites the earlier upload.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Pre-creates both partition directories at startup.
    pub fn ensure_partitions(&self) -> io::Result<()> {
        for partition in [Partition::User, Partition::Guest] {
            fs::create_dir_all(self.root.join(partition.as_str()))?;
        }
        Ok(())
    }

    /// Resolves the partition directory for an upload and makes sure it
    /// exists. `create_dir_all` succeeds when the directory is already
    /// there, so two first-time uploads racing each other are safe.
    pub fn destination_dir(&self, is_authenticated: bool) -> io::Result<PathBuf> {
        let dir = self
            .root
            .join(Partition::from_auth(is_authenticated).as_str());
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn save(&self, directory: &Path, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = directory.join(filename);
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Maps a request path like `guest/selfie.png` to a file under the
    /// root. Anything that is not a non-empty chain of plain components
    /// (`..`, absolute prefixes, drive letters) is unresolvable.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative);
        let mut components = relative.components().peekable();
        components.peek()?;
        if components.all(|c| matches!(c, Component::Normal(_))) {
            Some(self.root.join(relative))
        } else {
            None
        }
    }
}
