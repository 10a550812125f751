//! Partinfo error types

use thiserror::Error;

/// The main error type for partition table resolution
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error propagated verbatim from the underlying disk
    #[error("Disk I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither a valid MBR nor a valid GPT structure could be decoded
    #[error("Invalid partition table: {0}")]
    InvalidTable(String),

    /// The requested partition number has no corresponding entry
    #[error("Partition not found: {0}")]
    PartitionNotFound(u32),

    /// The caller supplied an unusable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for partition table resolution
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid partition table error
    pub fn invalid_table(msg: impl Into<String>) -> Self {
        Error::InvalidTable(msg.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
