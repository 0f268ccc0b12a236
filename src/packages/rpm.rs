// src/packages/rpm.rs

//! RPM source package metadata reader

use crate::error::{Error, Result};
use crate::packages::traits::{role_for, PackageFileInfo, SourcePackage};
use rpm::{IndexTag, Package};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Permission bits of a file mode (strips the file type)
const PERMISSION_MASK: u32 = 0o7777;

/// Source RPM metadata, read independently of the payload
#[derive(Debug, Clone)]
pub struct RpmSourcePackage {
    package_path: PathBuf,
    name: String,
    version: String,
    release: Option<String>,
    sources: Vec<String>,
    patches: Vec<String>,
    files: Vec<PackageFileInfo>,
}

impl RpmSourcePackage {
    /// Parse the header of a source RPM
    pub fn parse(path: &Path) -> Result<Self> {
        debug!("Parsing source RPM metadata: {}", path.display());

        let file = File::open(path)
            .map_err(|e| Error::InitError(format!("Failed to open RPM file: {}", e)))?;
        let mut buf_reader = BufReader::new(file);

        let pkg = Package::parse(&mut buf_reader)
            .map_err(|e| Error::InitError(format!("Failed to parse RPM, invalid package?: {}", e)))?;

        let name = pkg
            .metadata
            .get_name()
            .map_err(|e| Error::InitError(format!("Failed to get package name: {}", e)))?
            .to_string();

        let version = pkg
            .metadata
            .get_version()
            .map_err(|e| Error::InitError(format!("Failed to get package version: {}", e)))?
            .to_string();

        let release = pkg.metadata.get_release().ok().map(|s| s.to_string());

        let sources = Self::string_array(&pkg, IndexTag::RPMTAG_SOURCE, "source");
        let patches = Self::string_array(&pkg, IndexTag::RPMTAG_PATCH, "patch");
        let files = Self::extract_files(&pkg, &sources, &patches)?;

        debug!(
            "Parsed source RPM: {} version {} ({} sources, {} patches, {} files)",
            name,
            version,
            sources.len(),
            patches.len(),
            files.len()
        );

        Ok(Self {
            package_path: path.to_path_buf(),
            name,
            version,
            release,
            sources,
            patches,
            files,
        })
    }

    /// A missing tag means the package declares nothing of that kind
    fn string_array(pkg: &Package, tag: IndexTag, label: &str) -> Vec<String> {
        match pkg.metadata.header.get_entry_data_as_string_array(tag) {
            Ok(values) => values.to_vec(),
            Err(e) => {
                debug!("No {} entries in header: {}", label, e);
                Vec::new()
            }
        }
    }

    /// Extract the embedded file list with permission bits
    fn extract_files(
        pkg: &Package,
        sources: &[String],
        patches: &[String],
    ) -> Result<Vec<PackageFileInfo>> {
        let entries = pkg
            .metadata
            .get_file_entries()
            .map_err(|e| Error::InitError(format!("Failed to read file entries: {}", e)))?;

        Ok(entries
            .into_iter()
            .map(|entry| {
                let name = entry.path.to_string_lossy().to_string();
                let role = role_for(&name, sources, patches);
                PackageFileInfo {
                    mode: (entry.mode.raw_mode() as u32) & PERMISSION_MASK,
                    name,
                    role,
                }
            })
            .collect())
    }

    /// Path the metadata was read from
    pub fn package_path(&self) -> &Path {
        &self.package_path
    }

    /// Get the package version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Get the package release
    pub fn release(&self) -> Option<&str> {
        self.release.as_deref()
    }
}

impl SourcePackage for RpmSourcePackage {
    fn name(&self) -> &str {
        &self.name
    }

    fn sources(&self) -> &[String] {
        &self.sources
    }

    fn patches(&self) -> &[String] {
        &self.patches
    }

    fn files(&self) -> &[PackageFileInfo] {
        &self.files
    }
}
