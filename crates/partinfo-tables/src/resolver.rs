//! Partition table resolution
//!
//! Ties the decoders together: detect MBR vs. GPT from the first sector,
//! walk the EBR chain for logical partitions, and map Linux-style
//! partition numbers (`/dev/sdaN`) to single entries.

use crate::gpt::{GptPartitionEntry, GptTable};
use crate::mbr::{is_extended_type, MbrEntry, MbrTable};
use partinfo_core::{
    checked_mul_u64, Disk, Error, PartitionEntry, PartitionTable, PartitionType, Result,
    TableKind, MAX_EBR_CHAIN_LENGTH,
};

/// Highest partition number served by the 4 MBR slots
pub const MBR_LAST_PRIMARY_PARTITION: u32 = 4;

/// Partition number of the first logical partition in an EBR chain
pub const MBR_FIRST_LOGICAL_PARTITION: u32 = 5;

/// Bytes scanned from the start of the disk when decoding a GPT: enough
/// for a header plus a 128-entry array at 512-byte blocks
pub const GPT_SCAN_SIZE: usize = 512 * 41;

/// Options for [`resolve_partitions`]
///
/// `include_extended` and `get_logical` only apply to MBR disks; a GPT
/// disk has neither extended nor logical partitions and ignores both.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Byte offset of the partition table on the disk
    pub offset: u64,

    /// Include the extended partition itself in the output
    pub include_extended: bool,

    /// Walk the EBR chain and append logical partitions
    pub get_logical: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            include_extended: true,
            get_logical: true,
        }
    }
}

fn mbr_partition(entry: &MbrEntry, table_offset: u64, index: u32) -> PartitionEntry {
    PartitionEntry {
        offset: table_offset + entry.byte_offset(),
        size: entry.byte_size(),
        partition_type: PartitionType::Mbr(entry.partition_type),
        index,
    }
}

fn gpt_partition(entry: &GptPartitionEntry, block_size: u64, index: u32) -> Result<PartitionEntry> {
    Ok(PartitionEntry {
        offset: checked_mul_u64(entry.first_lba, block_size, "GPT partition offset")?,
        size: checked_mul_u64(entry.size_lba(), block_size, "GPT partition size")?,
        partition_type: PartitionType::Gpt(entry.type_guid),
        index,
    })
}

/// Resolve the full partition table of a disk
///
/// Reads one sector at `options.offset` and decodes it as an MBR. A
/// protective table (a single 0xEE entry) reclassifies the disk as GPT:
/// the scan region is then read from absolute offset 0 and the block
/// size inferred. Otherwise primaries and the extended partition are
/// emitted in slot order with contiguous 1-based indices, followed by
/// the logical partitions in chain-traversal order.
pub fn resolve_partitions(disk: &mut dyn Disk, options: &ResolveOptions) -> Result<PartitionTable> {
    let sector = disk.read_vec(options.offset, MbrTable::SECTOR_SIZE)?;
    let table = MbrTable::parse(&sector)?;

    if table.is_gpt_protective() {
        tracing::debug!(offset = options.offset, "protective MBR entry, decoding as GPT");

        let region = disk.read_vec(0, GPT_SCAN_SIZE)?;
        let gpt = GptTable::detect(&region)?;

        let partitions = gpt
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| gpt_partition(entry, gpt.block_size(), i as u32 + 1))
            .collect::<Result<Vec<_>>>()?;

        return Ok(PartitionTable {
            kind: TableKind::Gpt,
            partitions,
        });
    }

    let mut partitions = Vec::new();
    let mut extended: Option<MbrEntry> = None;

    for (position, entry) in table.entries().iter().enumerate() {
        let index = position as u32 + 1;

        if entry.is_extended() {
            extended = Some(*entry);
            if !options.include_extended {
                continue;
            }
        }
        partitions.push(mbr_partition(entry, options.offset, index));
    }

    if let Some(extended) = extended {
        if options.get_logical {
            let logical = logical_partitions(
                disk,
                MBR_FIRST_LOGICAL_PARTITION,
                extended.byte_offset(),
                extended.byte_offset(),
                None,
            )?;
            partitions.extend(logical);
        }
    }

    Ok(PartitionTable {
        kind: TableKind::Mbr,
        partitions,
    })
}

/// Walk an EBR chain and collect logical partitions
///
/// Each link is one 512-byte sector in MBR layout: its non-extended
/// entries are logical partitions at offsets relative to the link, and
/// its first extended entry points at the next link, at an offset
/// relative to the extended partition's own start (`extended_base`).
/// Entries after the link entry in the same sector are not scanned.
///
/// `limit` bounds how many links are read; when it runs out the walk
/// stops silently with what it has. This lets the number resolver read
/// just enough of the chain. The walk is additionally capped at
/// [`MAX_EBR_CHAIN_LENGTH`] links so cyclic chains terminate.
fn logical_partitions(
    disk: &mut dyn Disk,
    first_index: u32,
    chain_offset: u64,
    extended_base: u64,
    limit: Option<u32>,
) -> Result<Vec<PartitionEntry>> {
    let mut partitions = Vec::new();
    let mut index = first_index;
    let mut offset = chain_offset;
    let mut remaining = limit.unwrap_or(u32::MAX).min(MAX_EBR_CHAIN_LENGTH);

    while remaining > 0 {
        let sector = disk.read_vec(offset, MbrTable::SECTOR_SIZE)?;
        let ebr = MbrTable::parse(&sector)?;

        let mut link: Option<MbrEntry> = None;
        for entry in ebr.entries() {
            if entry.is_extended() {
                link = Some(*entry);
                break;
            }
            partitions.push(mbr_partition(entry, offset, index));
        }

        match link {
            Some(next) => {
                tracing::trace!(index, offset, "following EBR link");
                offset = extended_base + next.byte_offset();
                index += 1;
                remaining -= 1;
            }
            None => break,
        }
    }

    Ok(partitions)
}

/// Resolve a single partition by its 1-based number
///
/// Numbers follow the Linux `/dev/sdaN` convention: 1-4 address the
/// primary (or extended) slots, 5 and up address logical partitions in
/// chain order. The EBR chain is only walked when a logical number is
/// requested, and only as far as that number requires.
pub fn resolve_number(disk: &mut dyn Disk, number: u32) -> Result<PartitionEntry> {
    if number < 1 {
        return Err(Error::invalid_argument(
            "the partition number must be at least 1",
        ));
    }

    let options = ResolveOptions {
        offset: 0,
        include_extended: true,
        get_logical: false,
    };
    let table = resolve_partitions(disk, &options)?;

    if table.kind == TableKind::Gpt || number <= MBR_LAST_PRIMARY_PARTITION {
        return table
            .partitions
            .get(number as usize - 1)
            .cloned()
            .ok_or(Error::PartitionNotFound(number));
    }

    let extended = table
        .partitions
        .iter()
        .find(|p| matches!(p.partition_type, PartitionType::Mbr(t) if is_extended_type(t)))
        .ok_or(Error::PartitionNotFound(number))?;

    let position = number - MBR_FIRST_LOGICAL_PARTITION;
    let logical = logical_partitions(
        disk,
        MBR_FIRST_LOGICAL_PARTITION,
        extended.offset,
        extended.offset,
        Some(position + 1),
    )?;

    logical
        .get(position as usize)
        .cloned()
        .ok_or(Error::PartitionNotFound(number))
}
