//! Image source dispatch
//!
//! The public entry points accept a disk image in three representations:
//! a filesystem path, an in-memory buffer, or an already-open disk
//! handle. [`ImageSource`] models the three as a tagged union, resolved
//! exactly once at the boundary instead of being re-dispatched through
//! every internal call.

use crate::{BufferDisk, DiskConfig, FileDisk};
use partinfo_core::{Disk, Result};
use std::path::{Path, PathBuf};

/// A disk image in one of its three accepted representations
pub enum ImageSource<'a> {
    /// Path to an image file, opened read-only for the duration of one call
    Path(PathBuf),
    /// In-memory image contents
    Buffer(&'a [u8]),
    /// An already-open disk handle, used as-is
    Disk(&'a mut dyn Disk),
}

impl From<&Path> for ImageSource<'_> {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for ImageSource<'_> {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&str> for ImageSource<'_> {
    fn from(path: &str) -> Self {
        ImageSource::Path(PathBuf::from(path))
    }
}

impl<'a> From<&'a [u8]> for ImageSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ImageSource::Buffer(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for ImageSource<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        ImageSource::Buffer(bytes)
    }
}

impl<'a> From<&'a mut dyn Disk> for ImageSource<'a> {
    fn from(disk: &'a mut dyn Disk) -> Self {
        ImageSource::Disk(disk)
    }
}

impl<'a> From<&'a mut FileDisk> for ImageSource<'a> {
    fn from(disk: &'a mut FileDisk) -> Self {
        ImageSource::Disk(disk)
    }
}

impl<'a, 'b> From<&'a mut BufferDisk<'b>> for ImageSource<'a> {
    fn from(disk: &'a mut BufferDisk<'b>) -> Self {
        ImageSource::Disk(disk)
    }
}

/// Run `f` against the disk behind an image source
///
/// A path is opened read-only and the handle is released when the call
/// returns, on every exit path. Buffers and open handles are used
/// directly.
pub fn with_disk<T>(
    source: ImageSource<'_>,
    f: impl FnOnce(&mut dyn Disk) -> Result<T>,
) -> Result<T> {
    match source {
        ImageSource::Path(path) => {
            let mut disk = FileDisk::open(&path, DiskConfig::default())?;
            f(&mut disk)
        }
        ImageSource::Buffer(bytes) => {
            let mut disk = BufferDisk::new(bytes);
            f(&mut disk)
        }
        ImageSource::Disk(disk) => f(disk),
    }
}
