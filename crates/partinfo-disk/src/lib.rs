//! # Partinfo Disk
//!
//! Concrete disk sources for partition table resolution.
//!
//! A disk image can arrive in three representations: a path on the
//! filesystem, an in-memory byte buffer, or an already-open [`Disk`]
//! handle. This crate provides a wrapper for each ([`FileDisk`],
//! [`BufferDisk`], and the handle itself) plus [`ImageSource`], the
//! tagged union the entry points dispatch on exactly once.
//!
//! ## Example
//!
//! ```rust,no_run
//! use partinfo_disk::{DiskConfig, FileDisk};
//! use partinfo_core::Disk;
//! use std::path::Path;
//!
//! let mut disk = FileDisk::open(Path::new("disk.img"), DiskConfig::default()).unwrap();
//! let sector = disk.read_vec(0, 512).unwrap();
//! assert_eq!(sector.len(), 512);
//! ```
//!
//! [`Disk`]: partinfo_core::Disk

pub mod buffer;
pub mod file;
pub mod mmap;
pub mod source;

pub use buffer::BufferDisk;
pub use file::{DiskConfig, FileDisk};
pub use mmap::MmapStream;
pub use source::{with_disk, ImageSource};
