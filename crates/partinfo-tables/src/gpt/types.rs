//! GPT header and partition entry structures

use uuid::Uuid;

/// EFI System Partition
pub const EFI_SYSTEM: Uuid = Uuid::from_u128(0xC12A7328_F81F_11D2_BA4B_00A0C93EC93B);

/// Microsoft Basic Data (FAT, NTFS, exFAT)
pub const MICROSOFT_BASIC_DATA: Uuid = Uuid::from_u128(0xEBD0A0A2_B9E5_4433_87C0_68B6B72699C7);

/// Linux filesystem
pub const LINUX_FILESYSTEM: Uuid = Uuid::from_u128(0x0FC63DAF_8483_4772_8E79_3D69D8477DE4);

/// Linux swap
pub const LINUX_SWAP: Uuid = Uuid::from_u128(0x0657FD6D_A4AB_43C4_84E5_0933C84B4F4F);

/// Human-readable name for a well-known partition type GUID
pub fn type_guid_name(guid: &Uuid) -> &'static str {
    if guid.is_nil() {
        "Unused"
    } else if *guid == EFI_SYSTEM {
        "EFI System"
    } else if *guid == MICROSOFT_BASIC_DATA {
        "Microsoft Basic Data"
    } else if *guid == LINUX_FILESYSTEM {
        "Linux filesystem"
    } else if *guid == LINUX_SWAP {
        "Linux swap"
    } else {
        "Unknown"
    }
}

/// One decoded GPT partition entry
///
/// On disk each entry is 128 bytes; GUIDs are stored in the mixed-endian
/// EFI layout and decoded to canonical form here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GptPartitionEntry {
    /// Partition type GUID
    pub type_guid: Uuid,
    /// Unique per-partition GUID
    pub unique_guid: Uuid,
    /// First LBA (inclusive)
    pub first_lba: u64,
    /// Last LBA (inclusive)
    pub last_lba: u64,
    /// Attribute flags
    pub attributes: u64,
    /// Partition name (UTF-16LE on disk, 36 characters max)
    pub name: String,
}

impl GptPartitionEntry {
    /// Minimum size of a partition entry in bytes
    pub const ENTRY_SIZE: usize = 128;

    /// Decode one partition entry
    ///
    /// The caller must supply at least [`Self::ENTRY_SIZE`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut type_guid = [0u8; 16];
        type_guid.copy_from_slice(&bytes[0..16]);

        let mut unique_guid = [0u8; 16];
        unique_guid.copy_from_slice(&bytes[16..32]);

        let first_lba = u64::from_le_bytes([
            bytes[32], bytes[33], bytes[34], bytes[35],
            bytes[36], bytes[37], bytes[38], bytes[39],
        ]);
        let last_lba = u64::from_le_bytes([
            bytes[40], bytes[41], bytes[42], bytes[43],
            bytes[44], bytes[45], bytes[46], bytes[47],
        ]);
        let attributes = u64::from_le_bytes([
            bytes[48], bytes[49], bytes[50], bytes[51],
            bytes[52], bytes[53], bytes[54], bytes[55],
        ]);

        let name = Self::parse_name(&bytes[56..128]);

        Self {
            type_guid: Uuid::from_bytes_le(type_guid),
            unique_guid: Uuid::from_bytes_le(unique_guid),
            first_lba,
            last_lba,
            attributes,
            name,
        }
    }

    /// An all-zero type GUID marks an unused entry
    pub fn is_unused(&self) -> bool {
        self.type_guid.is_nil()
    }

    /// Number of sectors spanned by this entry
    pub fn size_lba(&self) -> u64 {
        if self.last_lba >= self.first_lba {
            self.last_lba - self.first_lba + 1
        } else {
            0
        }
    }

    /// Decode the UTF-16LE partition name, stopping at the first NUL
    fn parse_name(bytes: &[u8]) -> String {
        let mut units = Vec::new();
        for pair in bytes.chunks_exact(2) {
            let unit = u16::from_le_bytes([pair[0], pair[1]]);
            if unit == 0 {
                break;
            }
            units.push(unit);
        }

        String::from_utf16_lossy(&units)
    }
}

/// A decoded GPT header
///
/// Located at LBA 1; describes where the partition entry array lives and
/// carries CRC32 checksums over itself and the array.
#[derive(Debug, Clone)]
pub struct GptHeader {
    /// GPT revision (usually 0x00010000)
    pub revision: u32,
    /// Header size in bytes (usually 92)
    pub header_size: u32,
    /// CRC32 checksum of the header
    pub header_crc32: u32,
    /// LBA of this header
    pub current_lba: u64,
    /// LBA of the backup header
    pub backup_lba: u64,
    /// First usable LBA for partitions
    pub first_usable_lba: u64,
    /// Last usable LBA for partitions
    pub last_usable_lba: u64,
    /// Disk GUID
    pub disk_guid: Uuid,
    /// Starting LBA of the partition entry array
    pub entries_lba: u64,
    /// Number of partition entries
    pub entry_count: u32,
    /// Size of each partition entry
    pub entry_size: u32,
    /// CRC32 of the partition entry array
    pub entries_crc32: u32,
}

impl GptHeader {
    /// GPT header signature
    pub const SIGNATURE: &'static [u8; 8] = b"EFI PART";

    /// Size of the fixed header fields
    pub const HEADER_SIZE: usize = 92;

    /// Decode a GPT header
    ///
    /// Returns `None` when the buffer is too short or the signature does
    /// not match.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::HEADER_SIZE {
            return None;
        }

        if &bytes[0..8] != Self::SIGNATURE {
            return None;
        }

        let u32_at = |off: usize| u32::from_le_bytes([bytes[off], bytes[off + 1], bytes[off + 2], bytes[off + 3]]);
        let u64_at = |off: usize| {
            u64::from_le_bytes([
                bytes[off], bytes[off + 1], bytes[off + 2], bytes[off + 3],
                bytes[off + 4], bytes[off + 5], bytes[off + 6], bytes[off + 7],
            ])
        };

        let mut disk_guid = [0u8; 16];
        disk_guid.copy_from_slice(&bytes[56..72]);

        Some(Self {
            revision: u32_at(8),
            header_size: u32_at(12),
            header_crc32: u32_at(16),
            current_lba: u64_at(24),
            backup_lba: u64_at(32),
            first_usable_lba: u64_at(40),
            last_usable_lba: u64_at(48),
            disk_guid: Uuid::from_bytes_le(disk_guid),
            entries_lba: u64_at(72),
            entry_count: u32_at(80),
            entry_size: u32_at(84),
            entries_crc32: u32_at(88),
        })
    }

    /// Verify the header checksum against the raw header bytes
    ///
    /// The CRC32 is computed over `header_size` bytes with the checksum
    /// field itself zeroed.
    pub fn verify_header_crc32(&self, header_bytes: &[u8]) -> bool {
        let size = self.header_size as usize;
        if size < Self::HEADER_SIZE || header_bytes.len() < size {
            return false;
        }

        let mut scratch = header_bytes[..size].to_vec();
        scratch[16..20].fill(0);

        crc32fast::hash(&scratch) == self.header_crc32
    }

    /// Verify the partition entry array checksum
    pub fn verify_entries_crc32(&self, entries_bytes: &[u8]) -> bool {
        let expected = self.entry_count as usize * self.entry_size as usize;
        if entries_bytes.len() < expected {
            return false;
        }

        crc32fast::hash(&entries_bytes[..expected]) == self.entries_crc32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_guid_names() {
        assert_eq!(type_guid_name(&Uuid::nil()), "Unused");
        assert_eq!(type_guid_name(&LINUX_FILESYSTEM), "Linux filesystem");
        assert_eq!(type_guid_name(&EFI_SYSTEM), "EFI System");
        assert_eq!(type_guid_name(&Uuid::from_u128(42)), "Unknown");
    }

    #[test]
    fn test_entry_guid_endianness() {
        // Linux filesystem type GUID in the on-disk mixed-endian layout
        let mut bytes = vec![0u8; GptPartitionEntry::ENTRY_SIZE];
        bytes[0..16].copy_from_slice(&[
            0xaf, 0x3d, 0xc6, 0x0f, 0x83, 0x84, 0x72, 0x47,
            0x8e, 0x79, 0x3d, 0x69, 0xd8, 0x47, 0x7d, 0xe4,
        ]);

        let entry = GptPartitionEntry::from_bytes(&bytes);
        assert_eq!(entry.type_guid, LINUX_FILESYSTEM);
        assert!(!entry.is_unused());
    }

    #[test]
    fn test_entry_size_lba() {
        let mut bytes = vec![0u8; GptPartitionEntry::ENTRY_SIZE];
        bytes[32..40].copy_from_slice(&100u64.to_le_bytes());
        bytes[40..48].copy_from_slice(&199u64.to_le_bytes());

        let entry = GptPartitionEntry::from_bytes(&bytes);
        assert_eq!(entry.size_lba(), 100);
    }

    #[test]
    fn test_entry_name_decoding() {
        let mut bytes = vec![0u8; GptPartitionEntry::ENTRY_SIZE];
        for (i, unit) in "rootfs".encode_utf16().enumerate() {
            bytes[56 + i * 2..56 + i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
        }

        let entry = GptPartitionEntry::from_bytes(&bytes);
        assert_eq!(entry.name, "rootfs");
    }

    #[test]
    fn test_header_signature_validation() {
        let mut bytes = vec![0u8; GptHeader::HEADER_SIZE];
        assert!(GptHeader::from_bytes(&bytes).is_none());

        bytes[0..8].copy_from_slice(b"EFI PART");
        assert!(GptHeader::from_bytes(&bytes).is_some());

        assert!(GptHeader::from_bytes(&bytes[..50]).is_none());
    }
}
