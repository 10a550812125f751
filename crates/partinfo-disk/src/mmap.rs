//! Memory-mapped stream over a disk image file

use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// A read-only stream backed by a memory-mapped file.
///
/// Positional reads against a mapped image avoid a syscall per sector,
/// which matters when the EBR chain walk issues many small dependent
/// reads.
///
/// # Example
///
/// ```rust,no_run
/// use partinfo_disk::MmapStream;
/// use std::path::Path;
///
/// let stream = MmapStream::open(Path::new("disk.img")).unwrap();
/// ```
pub struct MmapStream {
    mmap: Mmap,
    position: u64,
}

impl MmapStream {
    /// Open a file with memory mapping
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a regular file, exceeds the
    /// mapping size ceiling, or cannot be mapped.
    ///
    /// # Safety
    ///
    /// Uses `unsafe` for memory mapping because:
    /// - The OS guarantees memory safety for valid file descriptors
    /// - We validate the file is a regular file before mapping
    /// - The mapping is read-only
    /// - File must not be truncated during access (caller responsibility)
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_file(&file)
    }

    /// Create a memory-mapped stream from an existing file
    ///
    /// Same validation as `open()`.
    pub fn from_file(file: &File) -> io::Result<Self> {
        let metadata = file.metadata()?;

        // Devices, pipes and directories cannot be mapped
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Only regular files can be memory-mapped",
            ));
        }

        use partinfo_core::MAX_MMAP_SIZE;
        if metadata.len() > MAX_MMAP_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "File size {} exceeds memory mapping limit {} (16 GB)",
                    metadata.len(),
                    MAX_MMAP_SIZE
                ),
            ));
        }

        // SAFETY: the file descriptor is valid (File::open succeeded), the
        // target is a regular file within the size ceiling, and the mapping
        // is read-only.
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap, position: 0 })
    }

    /// Get the length of the mapped region
    pub fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    /// Check if the mapped region is empty
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Get the current position
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Get remaining bytes from current position
    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.position)
    }
}

impl Read for MmapStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining() as usize;
        if remaining == 0 {
            return Ok(0); // EOF
        }

        let to_read = buf.len().min(remaining);
        let start = self.position as usize;

        buf[..to_read].copy_from_slice(&self.mmap[start..start + to_read]);
        self.position += to_read as u64;

        Ok(to_read)
    }
}

impl Seek for MmapStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(offset) => self.len() as i64 + offset,
            SeekFrom::Current(offset) => self.position as i64 + offset,
        };

        if new_pos < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Seek before beginning of file",
            ));
        }

        // Seeking past EOF is allowed; the next read reports EOF
        self.position = new_pos as u64;
        Ok(self.position)
    }
}
