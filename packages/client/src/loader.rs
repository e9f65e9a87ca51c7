//! Named resource loading
//!
//! Credential material is read through a `ResourceLoader` so builders never
//! touch the filesystem themselves.

use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while loading a named resource
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// No resource exists under the name
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
    /// The resource exists but could not be read
    #[error("Failed to read resource {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Loads the bytes of a named resource
pub trait ResourceLoader {
    /// Load the full contents of `name`.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError::ResourceNotFound` if nothing exists under `name`
    /// and `LoaderError::Io` for any other read failure.
    fn load_bytes(&self, name: &str) -> Result<Vec<u8>, LoaderError>;

    /// Load `name` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Fails like `load_bytes`, and with `LoaderError::Io` of kind
    /// `InvalidData` if the contents are not UTF-8.
    fn load_text(&self, name: &str) -> Result<String, LoaderError> {
        let bytes = self.load_bytes(name)?;
        String::from_utf8(bytes).map_err(|e| LoaderError::Io {
            name: name.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })
    }
}

/// Filesystem loader resolving relative names against a root directory
#[derive(Debug, Clone)]
pub struct FsResourceLoader {
    root: PathBuf,
}

impl FsResourceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Loader rooted at the process working directory
    #[must_use]
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for FsResourceLoader {
    fn default() -> Self {
        Self::current_dir()
    }
}

impl ResourceLoader for FsResourceLoader {
    fn load_bytes(&self, name: &str) -> Result<Vec<u8>, LoaderError> {
        let path = self.resolve(name);
        tracing::debug!("Loading resource {}", path.display());

        std::fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LoaderError::ResourceNotFound(name.to_string()),
            _ => LoaderError::Io {
                name: name.to_string(),
                source,
            },
        })
    }
}
