//! # Partinfo Core
//!
//! Core traits, types, and error handling for partition table resolution.
//!
//! This crate provides the foundational abstractions shared by the
//! partinfo workspace:
//! - **Disk**: random byte-range reads against an image
//! - **PartitionEntry / PartitionTable**: the resolved data model
//! - **Error**: the resolution error taxonomy
//! - **limits**: parsing ceilings for hostile images
//!
//! ## Example
//!
//! ```rust
//! use partinfo_core::{Disk, Result};
//! use std::io::Cursor;
//!
//! fn first_sector(disk: &mut dyn Disk) -> Result<Vec<u8>> {
//!     disk.read_vec(0, 512)
//! }
//!
//! let mut image = Cursor::new(vec![0u8; 1024]);
//! assert_eq!(first_sector(&mut image).unwrap().len(), 512);
//! ```

pub mod error;
pub mod limits;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use error::{Error, Result};
pub use limits::*;
pub use traits::{Disk, ReadSeek};
pub use types::{PartitionEntry, PartitionTable, PartitionType, TableKind};
