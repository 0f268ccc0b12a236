// src/packages/traits.rs

//! Read contract for source package metadata

use std::collections::HashMap;

/// What a file inside a source package is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    /// The build recipe (`*.spec`)
    Spec,
    /// Declared as a `SourceN:` file
    Source,
    /// Declared as a `PatchN:` file
    Patch,
    /// Embedded but not declared as a source or patch
    Other,
}

impl std::fmt::Display for FileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spec => write!(f, "spec"),
            Self::Source => write!(f, "source"),
            Self::Patch => write!(f, "patch"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Metadata about a file embedded in a source package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFileInfo {
    pub name: String,
    /// Permission bits only (`mode & 0o7777`)
    pub mode: u32,
    pub role: FileRole,
}

/// Common interface for source package metadata readers
///
/// Names are compared exactly as stored in the package header.
pub trait SourcePackage {
    /// Get the package name
    fn name(&self) -> &str;

    /// Declared source file names, in header order
    fn sources(&self) -> &[String];

    /// Declared patch file names, in header order
    fn patches(&self) -> &[String];

    /// Files physically embedded in the package
    fn files(&self) -> &[PackageFileInfo];

    /// Map file names to permission bits for O(1) lookup
    fn file_modes(&self) -> HashMap<&str, u32> {
        self.files()
            .iter()
            .map(|f| (f.name.as_str(), f.mode))
            .collect()
    }
}

/// Decide the role of an embedded file from the declared lists
pub fn role_for(name: &str, sources: &[String], patches: &[String]) -> FileRole {
    if sources.iter().any(|s| s == name) {
        FileRole::Source
    } else if patches.iter().any(|p| p == name) {
        FileRole::Patch
    } else if name.ends_with(".spec") {
        FileRole::Spec
    } else {
        FileRole::Other
    }
}
