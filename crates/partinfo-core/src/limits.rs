//! Parsing limits and overflow-checked helpers
//!
//! Named ceilings that keep malformed or hostile disk images from driving
//! the resolver into unbounded loops or allocations.

use crate::Error;

/// Maximum number of EBR links followed in one chain
///
/// Well-formed chains are short; a cyclic chain would otherwise loop
/// forever since each link points at the next sector to read.
pub const MAX_EBR_CHAIN_LENGTH: u32 = 4096;

/// Maximum GPT partition entries honored from a header (128 is the
/// universal default, padded for unusual tables)
pub const MAX_GPT_ENTRY_COUNT: u32 = 256;

/// Maximum file size for memory mapping (16 GB - practical limit for most systems)
pub const MAX_MMAP_SIZE: u64 = 16 * 1024 * 1024 * 1024;

/// Safely multiply two u64 values with overflow checking
pub fn checked_mul_u64(a: u64, b: u64, context: &str) -> crate::Result<u64> {
    a.checked_mul(b)
        .ok_or_else(|| Error::invalid_table(format!("{}: multiplication overflow", context)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_mul_u64() {
        assert_eq!(checked_mul_u64(1000, 512, "test").unwrap(), 512_000);
        assert!(checked_mul_u64(u64::MAX, 2, "test").is_err());
    }
}
