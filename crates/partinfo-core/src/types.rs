//! Core types for partition table resolution

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// On-disk identity of a partition
///
/// MBR partitions carry a single type byte; GPT partitions carry a
/// 16-byte type GUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionType {
    /// MBR partition type byte (e.g. 0x83 for Linux)
    Mbr(u8),
    /// GPT partition type GUID
    Gpt(Uuid),
}

impl fmt::Display for PartitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionType::Mbr(t) => write!(f, "0x{:02X}", t),
            PartitionType::Gpt(guid) => write!(f, "{}", guid),
        }
    }
}

/// Which partition table format a disk uses
///
/// A disk is exactly one of the two, never both: a protective MBR entry
/// (type 0xEE) reclassifies the whole disk as GPT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Mbr,
    Gpt,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Mbr => write!(f, "Master Boot Record"),
            TableKind::Gpt => write!(f, "GUID Partition Table"),
        }
    }
}

/// A resolved partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionEntry {
    /// Offset from the start of the disk in bytes
    pub offset: u64,

    /// Size of the partition in bytes
    pub size: u64,

    /// MBR type byte or GPT type GUID
    pub partition_type: PartitionType,

    /// 1-based partition number, assigned during resolution
    ///
    /// Follows the Linux `/dev/sdaN` convention: primaries and the
    /// extended partition take 1-4, logical partitions start at 5. This
    /// is the position assigned while resolving, not the raw on-disk
    /// slot number.
    pub index: u32,
}

impl fmt::Display for PartitionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Partition {} [{} @ 0x{:08X}, {} bytes]",
            self.index, self.partition_type, self.offset, self.size
        )
    }
}

/// A fully resolved partition table
///
/// `partitions` holds primary (or extended) entries first, in on-disk
/// slot order, then logical entries in chain-traversal order. Indices
/// are contiguous starting at 1 within each group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionTable {
    /// Detected table format
    pub kind: TableKind,

    /// Resolved partitions
    pub partitions: Vec<PartitionEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_type_display() {
        assert_eq!(PartitionType::Mbr(0x83).to_string(), "0x83");

        let guid = Uuid::from_u128(0x0FC63DAF_8483_4772_8E79_3D69D8477DE4);
        assert_eq!(
            PartitionType::Gpt(guid).to_string(),
            "0fc63daf-8483-4772-8e79-3d69d8477de4"
        );
    }

    #[test]
    fn test_table_kind_serde() {
        let json = serde_json::to_string(&TableKind::Gpt).unwrap();
        assert_eq!(json, "\"gpt\"");
        let kind: TableKind = serde_json::from_str("\"mbr\"").unwrap();
        assert_eq!(kind, TableKind::Mbr);
    }

    #[test]
    fn test_partition_entry_display() {
        let entry = PartitionEntry {
            offset: 0x100000,
            size: 0x200000,
            partition_type: PartitionType::Mbr(0x0C),
            index: 1,
        };
        assert_eq!(
            entry.to_string(),
            "Partition 1 [0x0C @ 0x00100000, 2097152 bytes]"
        );
    }
}
