//! File-backed disk source

use crate::mmap::MmapStream;
use partinfo_core::{ReadSeek, Result, MAX_MMAP_SIZE};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Configuration for opening a file-backed disk
#[derive(Debug, Clone)]
pub struct DiskConfig {
    /// Use memory mapping instead of buffered file reads
    pub use_mmap: bool,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self { use_mmap: true }
    }
}

/// A disk image opened read-only from a path
///
/// The underlying file handle (or mapping) is released when the value is
/// dropped, on every exit path.
///
/// # Example
///
/// ```rust,no_run
/// use partinfo_disk::{DiskConfig, FileDisk};
/// use std::path::Path;
///
/// let disk = FileDisk::open(Path::new("disk.img"), DiskConfig::default()).unwrap();
/// println!("{} bytes", disk.length());
/// ```
pub struct FileDisk {
    stream: Box<dyn ReadSeek>,
    length: u64,
}

impl FileDisk {
    /// Open a disk image file read-only
    ///
    /// Memory mapping is used when enabled and applicable; block devices
    /// and oversized files fall back to plain file reads.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or mapped
    pub fn open(path: &Path, config: DiskConfig) -> Result<Self> {
        let file = File::open(path)?;
        let metadata = file.metadata()?;
        let length = metadata.len();

        let stream: Box<dyn ReadSeek> =
            if config.use_mmap && metadata.is_file() && length <= MAX_MMAP_SIZE {
                Box::new(MmapStream::from_file(&file)?)
            } else {
                Box::new(file)
            };

        Ok(Self { stream, length })
    }

    /// Wrap any readable and seekable stream as a disk
    pub fn from_stream<S: Read + Seek + Send + 'static>(stream: S, length: u64) -> Self {
        Self {
            stream: Box::new(stream),
            length,
        }
    }

    /// Get the total size of the disk in bytes
    pub fn length(&self) -> u64 {
        self.length
    }
}

impl Read for FileDisk {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Seek for FileDisk {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.stream.seek(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partinfo_core::Disk;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn temp_image() -> NamedTempFile {
        let mut tmpfile = NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0u8..=255).cycle().take(1000).collect();
        tmpfile.write_all(&data).unwrap();
        tmpfile.flush().unwrap();
        tmpfile
    }

    #[test]
    fn test_file_disk_open_with_mmap() {
        let tmpfile = temp_image();
        let mut disk = FileDisk::open(tmpfile.path(), DiskConfig { use_mmap: true }).unwrap();

        assert_eq!(disk.length(), 1000);
        let bytes = disk.read_vec(0, 10).unwrap();
        assert_eq!(bytes, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_file_disk_open_without_mmap() {
        let tmpfile = temp_image();
        let mut disk = FileDisk::open(tmpfile.path(), DiskConfig { use_mmap: false }).unwrap();

        let bytes = disk.read_vec(256, 4).unwrap();
        assert_eq!(bytes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_file_disk_from_stream() {
        let data: Vec<u8> = (0..100).collect();
        let mut disk = FileDisk::from_stream(Cursor::new(data), 100);

        assert_eq!(disk.length(), 100);
        let bytes = disk.read_vec(50, 2).unwrap();
        assert_eq!(bytes, vec![50, 51]);
    }

    #[test]
    fn test_file_disk_exact_read_contract() {
        let tmpfile = temp_image();
        let mut disk = FileDisk::open(tmpfile.path(), DiskConfig::default()).unwrap();

        // 1000-byte image: a 512-byte read at 600 must fail, not truncate
        assert!(disk.read_vec(600, 512).is_err());
    }
}
