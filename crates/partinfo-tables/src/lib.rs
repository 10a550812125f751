//! # Partinfo Tables
//!
//! MBR and GPT partition table resolution for raw disk images.
//!
//! The two entry points accept an image as a path, an in-memory buffer,
//! or an already-open disk handle:
//! - [`get_partitions`] resolves the full ordered partition list;
//! - [`get`] resolves one partition by its Linux-style number
//!   (`/dev/sdaN` convention, logical partitions starting at 5).
//!
//! `get_partitions(image)[n - 1]` is not always `get(image, n)`: on a
//! disk with no primaries and one extended partition holding one logical
//! partition, the list is `[extended, logical]`, while `get(image, 1)`
//! returns the extended entry and `get(image, 5)` the logical one. The
//! list always holds primary (or extended) entries first and then the
//! logical ones, even when the extended partition is not physically last
//! on the disk.
//!
//! ## Example
//!
//! ```rust,no_run
//! use partinfo_tables::{get, get_partitions, ResolveOptions};
//!
//! let table = get_partitions("disk.img", &ResolveOptions::default()).unwrap();
//! println!("{}: {} partitions", table.kind, table.partitions.len());
//!
//! let root = get("disk.img", 2).unwrap();
//! println!("partition 2 spans [{}, {})", root.offset, root.offset + root.size);
//! ```

pub mod gpt;
pub mod mbr;
pub mod resolver;

pub use partinfo_core::{Error, PartitionEntry, PartitionTable, PartitionType, Result, TableKind};
pub use partinfo_disk::ImageSource;
pub use resolver::{ResolveOptions, GPT_SCAN_SIZE, MBR_FIRST_LOGICAL_PARTITION};

use partinfo_disk::with_disk;

/// Resolve a single partition by its 1-based number
///
/// The image may be a path, a byte buffer, or an open disk handle; a
/// path is opened read-only and released on every exit path. The EBR
/// chain is walked only when a logical number (≥ 5) is requested, and
/// only as far as needed.
///
/// # Errors
///
/// `InvalidArgument` when `partition_number` is 0, `PartitionNotFound`
/// when the table has no such entry, `InvalidTable`/`Io` when the image
/// cannot be decoded or read.
pub fn get<'a>(
    image: impl Into<ImageSource<'a>>,
    partition_number: u32,
) -> Result<PartitionEntry> {
    with_disk(image.into(), |disk| {
        resolver::resolve_number(disk, partition_number)
    })
}

/// Resolve the full partition table of an image
///
/// Accepts the same image representations as [`get`]. Options control
/// where the table is read from and, for MBR disks, whether extended and
/// logical partitions appear in the output.
pub fn get_partitions<'a>(
    image: impl Into<ImageSource<'a>>,
    options: &ResolveOptions,
) -> Result<PartitionTable> {
    with_disk(image.into(), |disk| {
        resolver::resolve_partitions(disk, options)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mbr::testutil::build_sector;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    /// No primaries, one extended partition with a single logical one
    fn extended_only_image() -> Vec<u8> {
        const EXT_LBA: u32 = 2048;
        let ext_base = EXT_LBA as usize * 512;

        let mut image = vec![0u8; ext_base + 512];
        image[..512].copy_from_slice(&build_sector(&[(0x0F, EXT_LBA, 8192)]));
        image[ext_base..ext_base + 512].copy_from_slice(&build_sector(&[(0x83, 8, 1024)]));
        image
    }

    #[test]
    fn test_get_partitions_from_buffer() {
        let image = extended_only_image();

        let table = get_partitions(&image, &ResolveOptions::default()).unwrap();

        assert_eq!(table.kind, TableKind::Mbr);
        let indices: Vec<u32> = table.partitions.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 5]);
    }

    #[test]
    fn test_get_by_number_from_buffer() {
        let image = extended_only_image();

        // 1 is the extended partition, 5 the logical one
        let extended = get(&image, 1).unwrap();
        assert_eq!(extended.partition_type, PartitionType::Mbr(0x0F));
        assert_eq!(extended.offset, 2048 * 512);

        let logical = get(&image, 5).unwrap();
        assert_eq!(logical.partition_type, PartitionType::Mbr(0x83));
        assert_eq!(logical.offset, (2048 + 8) * 512);

        for number in [2, 3, 4, 6] {
            let err = get(&image, number).unwrap_err();
            assert!(
                matches!(err, Error::PartitionNotFound(n) if n == number),
                "number {}",
                number
            );
        }
    }

    #[test]
    fn test_get_rejects_zero() {
        let image = extended_only_image();
        assert!(matches!(
            get(&image, 0).unwrap_err(),
            Error::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_get_matches_get_partitions_for_primaries() {
        let image = build_sector(&[(0x83, 2048, 1024), (0x0C, 4096, 2048)]);

        let table = get_partitions(&image, &ResolveOptions::default()).unwrap();
        for n in 1..=2u32 {
            let partition = get(&image, n).unwrap();
            assert_eq!(partition, table.partitions[n as usize - 1]);
        }
    }

    #[test]
    fn test_entry_points_from_path() {
        let image = extended_only_image();
        let mut tmpfile = NamedTempFile::new().unwrap();
        tmpfile.write_all(&image).unwrap();
        tmpfile.flush().unwrap();

        let table = get_partitions(tmpfile.path(), &ResolveOptions::default()).unwrap();
        assert_eq!(table.partitions.len(), 2);

        let logical = get(tmpfile.path(), 5).unwrap();
        assert_eq!(logical.index, 5);
    }

    #[test]
    fn test_entry_points_from_open_disk() {
        let image = extended_only_image();
        let mut cursor = Cursor::new(image);

        let disk: &mut dyn partinfo_core::Disk = &mut cursor;
        let table = get_partitions(disk, &ResolveOptions::default()).unwrap();
        assert_eq!(table.partitions.len(), 2);
    }

    #[test]
    fn test_unrecognized_image_is_invalid_table() {
        let image = vec![0u8; 512];
        let err = get_partitions(&image, &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidTable(_)));
    }
}
