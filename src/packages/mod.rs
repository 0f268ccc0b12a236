// src/packages/mod.rs

//! Source package reading
//!
//! The payload and the header of a source RPM are read independently:
//! [`payload`] turns the payload into named byte buffers, [`rpm`] reads the
//! declared sources, patches and file modes from the header.

pub mod cpio;
pub mod payload;
pub mod rpm;
pub mod traits;

pub use payload::DecodedEntries;
pub use traits::{FileRole, PackageFileInfo, SourcePackage};
