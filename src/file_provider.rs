//! Directory-scoped file access
//!
//! A [`FileProvider`] answers questions about files relative to a root
//! directory. Lookups never escape the root: absolute sub-paths and `..`
//! components that climb above it resolve to a missing file.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Metadata about a file looked up through a [`FileProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    name: String,
    physical_path: Option<PathBuf>,
    exists: bool,
    is_directory: bool,
}

impl FileInfo {
    /// A file that could not be found (or lies outside the provider root).
    pub fn not_found(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            physical_path: None,
            exists: false,
            is_directory: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The location of the file on disk, when it has one.
    pub fn physical_path(&self) -> Option<&Path> {
        self.physical_path.as_deref()
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Whether this entry is an existing regular file that can be read.
    pub fn is_readable_file(&self) -> bool {
        self.exists && !self.is_directory && self.physical_path.is_some()
    }

    /// Reads the whole file as UTF-8 text.
    pub fn read_to_string(&self) -> io::Result<String> {
        match &self.physical_path {
            Some(path) if self.exists => fs::read_to_string(path),
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{}' does not exist", self.name),
            )),
        }
    }
}

/// Read-only access to files below a root directory.
pub trait FileProvider {
    /// Looks up `subpath` relative to the provider root.
    fn file_info(&self, subpath: &str) -> FileInfo;

    /// The physical root directory, if the provider is backed by one.
    fn root(&self) -> Option<&Path>;
}

/// A [`FileProvider`] backed by a directory on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalFileProvider {
    root: PathBuf,
}

impl PhysicalFileProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a provider only when `root` is an existing directory.
    pub fn for_existing_dir(root: impl Into<PathBuf>) -> Option<Self> {
        let root = root.into();
        if root.is_dir() { Some(Self::new(root)) } else { None }
    }

    fn resolve(&self, subpath: &str) -> Option<PathBuf> {
        let relative = subpath.trim_start_matches(['/', '\\']);
        let mut resolved = self.root.clone();
        let mut depth = 0usize;

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if depth == 0 {
                        return None;
                    }
                    resolved.pop();
                    depth -= 1;
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        Some(resolved)
    }
}

impl FileProvider for PhysicalFileProvider {
    fn file_info(&self, subpath: &str) -> FileInfo {
        let Some(path) = self.resolve(subpath) else {
            return FileInfo::not_found(subpath);
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| subpath.to_string());

        match fs::metadata(&path) {
            Ok(metadata) => FileInfo {
                name,
                physical_path: Some(path),
                exists: true,
                is_directory: metadata.is_dir(),
            },
            Err(_) => FileInfo {
                name,
                physical_path: Some(path),
                exists: false,
                is_directory: false,
            },
        }
    }

    fn root(&self) -> Option<&Path> {
        Some(&self.root)
    }
}
