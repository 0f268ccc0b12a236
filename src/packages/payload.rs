// src/packages/payload.rs

//! Source RPM payload decoding
//!
//! The payload is normalized to a cpio stream by an external converter
//! (`rpm2cpio` by default) and then read entry by entry into memory.
//! Nothing is written to disk here.

use crate::error::{Error, Result};
use crate::packages::cpio::CpioReader;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Archive member names mapped to their full content
///
/// Iteration is in name order, so repeated runs visit entries identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedEntries {
    entries: BTreeMap<String, Vec<u8>>,
}

impl DecodedEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; a repeated name replaces the earlier content
    pub fn insert(&mut self, name: impl Into<String>, content: Vec<u8>) {
        let name = name.into();
        if self.entries.insert(name.clone(), content).is_some() {
            debug!("Archive repeats entry '{}', keeping the last one", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_slice()))
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<u8>)> for DecodedEntries {
    fn from_iter<I: IntoIterator<Item = (N, Vec<u8>)>>(iter: I) -> Self {
        let mut entries = Self::new();
        for (name, content) in iter {
            entries.insert(name, content);
        }
        entries
    }
}

/// Run the external converter and capture the cpio stream it prints
///
/// The converter gets the package path as its only argument. It runs to
/// completion with no timeout.
pub fn convert_to_cpio(package: &Path, converter: &str) -> Result<Vec<u8>> {
    let program = which::which(converter).map_err(|e| {
        Error::ConversionError(format!(
            "could not convert to cpio ({} not found, is it installed?): {}",
            converter, e
        ))
    })?;

    debug!("Running {} {}", program.display(), package.display());

    let output = Command::new(&program)
        .arg(package)
        .output()
        .map_err(|e| {
            Error::ConversionError(format!(
                "could not convert to cpio (maybe {} is missing): {}",
                converter, e
            ))
        })?;

    if !output.status.success() {
        return Err(Error::ConversionError(format!(
            "{} failed on {} ({}): {}",
            converter,
            package.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    debug!("{} produced {} bytes of cpio", converter, output.stdout.len());
    Ok(output.stdout)
}

/// Decode a cpio stream into memory
///
/// Only regular files carry content worth materializing; other member
/// types are skipped.
pub fn decode_archive<R: Read>(reader: R) -> Result<DecodedEntries> {
    decode_entries(CpioReader::new(reader))
}

/// Decode an in-memory cpio archive, bounding every member by its length
pub fn decode_bytes(data: &[u8]) -> Result<DecodedEntries> {
    decode_entries(CpioReader::with_len(data, data.len() as u64))
}

fn decode_entries<R: Read>(mut cpio: CpioReader<R>) -> Result<DecodedEntries> {
    let mut entries = DecodedEntries::new();

    while let Some((entry, content)) = cpio
        .next_entry()
        .map_err(|e| Error::ArchiveError(format!("CPIO error: {}", e)))?
    {
        if !entry.is_regular_file() {
            warn!("Skipping non-regular archive member '{}' (mode {:o})", entry.name, entry.mode);
            continue;
        }
        entries.insert(entry.name, content);
    }

    debug!("Decoded {} archive entries", entries.len());
    Ok(entries)
}

/// Convert a source package and decode its payload
pub fn decode_package(package: &Path, converter: &str) -> Result<DecodedEntries> {
    let cpio = convert_to_cpio(package, converter)?;
    decode_bytes(&cpio)
}
