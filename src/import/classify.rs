// src/import/classify.rs

//! Name-based classification of package files
//!
//! Two decisions are made purely from file names: which declared sources
//! stay out of git, and which top-level directory an entry lands in.

use crate::error::{Error, Result};
use crate::hash::Hasher;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Substring marking a source as a tar-family archive
pub const ARCHIVE_INDICATOR: &str = ".tar";

/// Extension of the build recipe
pub const SPEC_EXTENSION: &str = ".spec";

/// A declared source kept out of version control
///
/// The hasher starts unseeded; it is fed once the content is known.
#[derive(Debug, Clone)]
pub struct ExcludedSource {
    pub name: String,
    pub hasher: Hasher,
}

impl ExcludedSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hasher: Hasher::new(),
        }
    }
}

/// Top-level directory an entry is written under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Specs,
    Sources,
}

/// Whether a source name looks like a tar archive
///
/// The indicator may appear anywhere in the name, so `foo.tarball-notes`
/// or `x.tar.gz.sig` count too.
pub fn is_archive_like(name: &str) -> bool {
    name.contains(ARCHIVE_INDICATOR)
}

/// Pick the excluded sources out of the declared source list
pub fn classify_sources(sources: &[String]) -> Vec<ExcludedSource> {
    sources
        .iter()
        .filter(|name| is_archive_like(name))
        .map(|name| {
            debug!("Excluding archive source from git: {}", name);
            ExcludedSource::new(name.as_str())
        })
        .collect()
}

/// Route an entry by name alone
pub fn destination_for(name: &str) -> Destination {
    if name.ends_with(SPEC_EXTENSION) {
        Destination::Specs
    } else {
        Destination::Sources
    }
}

/// Clean an archive member name into a relative path
///
/// Leading `/` and `.` components are dropped. A `..` component or a name
/// with nothing left after cleaning is rejected.
pub fn entry_path(name: &str) -> Result<PathBuf> {
    let mut path = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => {
                return Err(Error::ArchiveError(format!(
                    "archive entry '{}' points outside its directory",
                    name
                )));
            }
        }
    }
    if path.as_os_str().is_empty() {
        return Err(Error::ArchiveError(format!("archive entry '{}' has no file name", name)));
    }
    Ok(path)
}

/// Relative path of an entry inside the working tree
pub fn destination_path(name: &str, specs_dir: &str, sources_dir: &str) -> Result<PathBuf> {
    let relative = entry_path(name)?;
    Ok(match destination_for(name) {
        Destination::Specs => PathBuf::from(specs_dir).join(relative),
        Destination::Sources => PathBuf::from(sources_dir).join(relative),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(excluded: &[ExcludedSource]) -> Vec<&str> {
        excluded.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_is_archive_like() {
        assert!(is_archive_like("foo-1.0.tar.gz"));
        assert!(is_archive_like("foo-1.0.tar.xz"));
        assert!(is_archive_like("foo-1.0.tar"));
        assert!(!is_archive_like("foo-1.0.tgz"));
        assert!(!is_archive_like("foo.conf"));
        assert!(!is_archive_like("fix.patch"));
    }

    #[test]
    fn test_indicator_anywhere_in_name() {
        assert!(is_archive_like("foo-1.0.tar.gz.asc"));
        assert!(is_archive_like("notes.tarball.txt"));
        assert!(is_archive_like(".tar"));
    }

    #[test]
    fn test_classify_sources() {
        let sources = vec![
            "foo-1.0.tar.gz".to_string(),
            "foo.conf".to_string(),
            "vendor.tar.xz".to_string(),
        ];
        let excluded = classify_sources(&sources);
        assert_eq!(names(&excluded), vec!["foo-1.0.tar.gz", "vendor.tar.xz"]);
        assert!(excluded.iter().all(|s| s.hasher.bytes_consumed() == 0));
    }

    #[test]
    fn test_classify_no_sources() {
        assert!(classify_sources(&[]).is_empty());
    }

    #[test]
    fn test_destination_for() {
        assert_eq!(destination_for("foo.spec"), Destination::Specs);
        assert_eq!(destination_for("foo.spec.in"), Destination::Sources);
        assert_eq!(destination_for("foo-1.0.tar.gz"), Destination::Sources);
        assert_eq!(destination_for("spec"), Destination::Sources);
    }

    #[test]
    fn test_destination_path() {
        assert_eq!(
            destination_path("foo.spec", "SPECS", "SOURCES").unwrap(),
            PathBuf::from("SPECS/foo.spec")
        );
        assert_eq!(
            destination_path("bar.patch", "SPECS", "SOURCES").unwrap(),
            PathBuf::from("SOURCES/bar.patch")
        );
        assert_eq!(
            destination_path("patches/fix.patch", "SPECS", "SOURCES").unwrap(),
            PathBuf::from("SOURCES/patches/fix.patch")
        );
    }

    #[test]
    fn test_absolute_name_stays_under_directory() {
        assert_eq!(
            destination_path("/tmp/escaped.txt", "SPECS", "SOURCES").unwrap(),
            PathBuf::from("SOURCES/tmp/escaped.txt")
        );
        assert_eq!(
            destination_path("./foo.spec", "SPECS", "SOURCES").unwrap(),
            PathBuf::from("SPECS/foo.spec")
        );
        assert_eq!(entry_path("a/./b//c").unwrap(), PathBuf::from("a/b/c"));
    }

    #[test]
    fn test_parent_components_rejected() {
        for name in ["../pwn", "a/../../pwn", "patches/.."] {
            let result = destination_path(name, "SPECS", "SOURCES");
            assert!(matches!(result, Err(Error::ArchiveError(_))), "{}", name);
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        for name in ["", "/", "./."] {
            assert!(matches!(entry_path(name), Err(Error::ArchiveError(_))), "{:?}", name);
        }
    }
}
