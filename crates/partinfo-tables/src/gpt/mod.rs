//! GPT (GUID Partition Table) decoding
//!
//! A GPT disk hides its real table behind a protective MBR; the header
//! sits at LBA 1 *in units of the logical block size*, which a raw image
//! does not declare anywhere. [`GptTable::detect`] therefore probes the
//! candidate block sizes in ascending order against one scanned region.

pub mod types;

use partinfo_core::{checked_mul_u64, Error, Result, MAX_GPT_ENTRY_COUNT};
pub use types::{type_guid_name, GptHeader, GptPartitionEntry};
use uuid::Uuid;

/// Logical block sizes a disk image may plausibly use
pub const CANDIDATE_BLOCK_SIZES: [u64; 4] = [512, 1024, 2048, 4096];

/// A decoded GPT partition table
///
/// # Structure
///
/// ```text
/// LBA 0:    Protective MBR
/// LBA 1:    Primary GPT header
/// LBA 2+:   Partition entry array (typically 128 entries)
/// ```
#[derive(Debug, Clone)]
pub struct GptTable {
    block_size: u64,
    entries: Vec<GptPartitionEntry>,
    header: GptHeader,
}

impl GptTable {
    /// Decode a GPT from a region scanned from the start of the disk,
    /// assuming the given logical block size
    ///
    /// The header is expected at `block_size` bytes into the buffer
    /// (LBA 1) and the entry array wherever the header places it. Unused
    /// entries (nil type GUID) are dropped; the rest keep array order.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature is missing at that offset,
    /// either CRC32 check fails, or the declared entry array does not
    /// fit inside the scanned region.
    pub fn parse_at(buf: &[u8], block_size: u64) -> Result<Self> {
        let header_offset = block_size as usize;
        if buf.len() < header_offset + GptHeader::HEADER_SIZE {
            return Err(Error::invalid_table(format!(
                "scan region too small for a GPT header at block size {}",
                block_size
            )));
        }

        let header_bytes = &buf[header_offset..];
        let header = GptHeader::from_bytes(header_bytes).ok_or_else(|| {
            Error::invalid_table(format!(
                "GPT signature not found at block size {}",
                block_size
            ))
        })?;

        if !header.verify_header_crc32(header_bytes) {
            return Err(Error::invalid_table(format!(
                "GPT header CRC32 mismatch at block size {}",
                block_size
            )));
        }

        if header.entry_count > MAX_GPT_ENTRY_COUNT {
            return Err(Error::invalid_table(format!(
                "GPT declares {} partition entries, more than the {} supported",
                header.entry_count, MAX_GPT_ENTRY_COUNT
            )));
        }

        let entry_size = header.entry_size as usize;
        if entry_size < GptPartitionEntry::ENTRY_SIZE {
            return Err(Error::invalid_table(format!(
                "GPT partition entry size {} is smaller than the {}-byte minimum",
                entry_size,
                GptPartitionEntry::ENTRY_SIZE
            )));
        }

        let entries_offset = checked_mul_u64(header.entries_lba, block_size, "GPT entry array offset")?;
        let entries_len = header.entry_count as u64 * header.entry_size as u64;
        let entries_end = entries_offset
            .checked_add(entries_len)
            .ok_or_else(|| Error::invalid_table("GPT entry array end overflows"))?;

        if entries_end > buf.len() as u64 {
            return Err(Error::invalid_table(format!(
                "GPT entry array [{}, {}) extends beyond the scanned region",
                entries_offset, entries_end
            )));
        }

        let entries_bytes = &buf[entries_offset as usize..entries_end as usize];
        if !header.verify_entries_crc32(entries_bytes) {
            return Err(Error::invalid_table(format!(
                "GPT partition entry array CRC32 mismatch at block size {}",
                block_size
            )));
        }

        let mut entries = Vec::new();
        for raw in entries_bytes.chunks_exact(entry_size) {
            let entry = GptPartitionEntry::from_bytes(raw);
            if entry.is_unused() {
                continue;
            }
            entries.push(entry);
        }

        Ok(Self {
            block_size,
            entries,
            header,
        })
    }

    /// Decode a GPT whose block size is unknown
    ///
    /// Probes 512, 1024, 2048 and 4096 in ascending order and returns
    /// the first success. When every candidate fails, the error from the
    /// *last* attempt is returned.
    pub fn detect(buf: &[u8]) -> Result<Self> {
        let mut last_error = Error::invalid_table("GPT signature not found");

        for block_size in CANDIDATE_BLOCK_SIZES {
            match Self::parse_at(buf, block_size) {
                Ok(table) => {
                    tracing::debug!(block_size, "GPT header located");
                    return Ok(table);
                }
                Err(error) => last_error = error,
            }
        }

        Err(last_error)
    }

    /// The logical block size the table was decoded at
    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Decoded entries, unused slots removed, in array order
    pub fn entries(&self) -> &[GptPartitionEntry] {
        &self.entries
    }

    /// The disk GUID
    pub fn disk_guid(&self) -> Uuid {
        self.header.disk_guid
    }

    /// The decoded header
    pub fn header(&self) -> &GptHeader {
        &self.header
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::build_gpt_region;
    use super::types::LINUX_FILESYSTEM;
    use super::*;

    #[test]
    fn test_parse_at_512() {
        let region = build_gpt_region(512, 128, &[(LINUX_FILESYSTEM, 100, 199)]);

        let table = GptTable::parse_at(&region, 512).unwrap();

        assert_eq!(table.block_size(), 512);
        assert_eq!(table.entries().len(), 1);
        assert_eq!(table.entries()[0].type_guid, LINUX_FILESYSTEM);
        assert_eq!(table.entries()[0].first_lba, 100);
        assert_eq!(table.entries()[0].size_lba(), 100);
        assert_eq!(table.disk_guid(), Uuid::from_u128(0xD15C));
    }

    #[test]
    fn test_parse_at_wrong_block_size() {
        let region = build_gpt_region(2048, 128, &[(LINUX_FILESYSTEM, 100, 199)]);

        let result = GptTable::parse_at(&region, 512);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("GPT signature not found at block size 512"));
    }

    #[test]
    fn test_detect_at_each_block_size() {
        for block_size in CANDIDATE_BLOCK_SIZES {
            // 8 entries keep the array inside a 20992-byte scan at 4096
            let region = build_gpt_region(block_size as usize, 8, &[(LINUX_FILESYSTEM, 100, 199)]);

            let table = GptTable::detect(&region).unwrap();
            assert_eq!(table.block_size(), block_size, "block size {}", block_size);
            assert_eq!(table.entries().len(), 1);
        }
    }

    #[test]
    fn test_detect_reports_last_error() {
        let region = vec![0u8; 512 * 41];

        let err = GptTable::detect(&region).unwrap_err();
        // All four candidates fail; the 4096 attempt is the one reported
        assert!(err.to_string().contains("block size 4096"));
    }

    #[test]
    fn test_header_crc_mismatch() {
        let mut region = build_gpt_region(512, 128, &[(LINUX_FILESYSTEM, 100, 199)]);
        // Corrupt a header byte outside the signature and CRC fields
        region[512 + 50] ^= 0xFF;

        let result = GptTable::parse_at(&region, 512);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("GPT header CRC32 mismatch"));
    }

    #[test]
    fn test_entries_crc_mismatch() {
        let mut region = build_gpt_region(512, 128, &[(LINUX_FILESYSTEM, 100, 199)]);
        region[2 * 512 + 40] ^= 0xFF;

        let result = GptTable::parse_at(&region, 512);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("entry array CRC32 mismatch"));
    }

    #[test]
    fn test_entry_array_beyond_region() {
        let region = build_gpt_region(512, 128, &[(LINUX_FILESYSTEM, 100, 199)]);
        // Truncate mid-array
        let truncated = &region[..4096];

        let result = GptTable::parse_at(truncated, 512);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("extends beyond the scanned region"));
    }

    #[test]
    fn test_unused_entries_skipped() {
        let region = build_gpt_region(
            512,
            128,
            &[
                (LINUX_FILESYSTEM, 100, 199),
                (Uuid::nil(), 0, 0),
                (types::LINUX_SWAP, 300, 399),
            ],
        );

        let table = GptTable::parse_at(&region, 512).unwrap();
        assert_eq!(table.entries().len(), 2);
        assert_eq!(table.entries()[1].type_guid, types::LINUX_SWAP);
    }
}
