//! Core traits for disk access

use crate::error::Result;
use std::io::{Read, Seek, SeekFrom};

/// Random byte-range reads against a disk image
///
/// The backing store may be a file, an in-memory buffer, or a block
/// device; the resolver only needs positional reads. Reads fill the
/// destination buffer exactly or fail — there is no partial-read
/// contract.
pub trait Disk {
    /// Fill `buf` with the bytes starting at `offset`
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()>;

    /// Read `length` bytes starting at `offset` into a fresh buffer
    fn read_vec(&mut self, offset: u64, length: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; length];
        self.read_at(offset, &mut buf)?;
        Ok(buf)
    }
}

/// Blanket implementation for any seekable stream
///
/// This is what makes `File`, `Cursor`, and the disk wrappers in
/// `partinfo-disk` all usable as disks without adapter types.
impl<T: Read + Seek> Disk for T {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.seek(SeekFrom::Start(offset))?;
        self.read_exact(buf)?;
        Ok(())
    }
}

/// Combined trait for Read + Seek
pub trait ReadSeek: Read + Seek + Send {}

/// Blanket implementation for any type that implements Read + Seek
impl<T: Read + Seek + Send> ReadSeek for T {}
