// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use srpm_import::packages::traits::{role_for, PackageFileInfo};
use srpm_import::{DecodedEntries, ImportPlan, PackageReference, SourcePackage};

/// Source package metadata assembled in memory.
#[derive(Debug, Clone, Default)]
pub struct TestPackage {
    pub name: String,
    pub sources: Vec<String>,
    pub patches: Vec<String>,
    pub files: Vec<PackageFileInfo>,
}

impl TestPackage {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn source(mut self, name: &str) -> Self {
        self.sources.push(name.to_string());
        self
    }

    pub fn patch(mut self, name: &str) -> Self {
        self.patches.push(name.to_string());
        self
    }

    pub fn file(mut self, name: &str, mode: u32) -> Self {
        let role = role_for(name, &self.sources, &self.patches);
        self.files.push(PackageFileInfo {
            name: name.to_string(),
            mode,
            role,
        });
        self
    }
}

impl SourcePackage for TestPackage {
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

/// Build a cpio newc archive holding regular files.
pub fn cpio_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut out = Vec::new();
    for (name, data) in files {
        push_record(&mut out, name, 0o100644, data);
    }
    push_record(&mut out, "TRAILER!!!", 0, b"");
    out
}

fn push_record(out: &mut Vec<u8>, name: &str, mode: u32, data: &[u8]) {
    let header = format!(
        "070701{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}{:08x}",
        0,
        mode,
        0,
        0,
        1,
        0,
        data.len(),
        0,
        0,
        0,
        0,
        name.len() + 1,
        0
    );
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(name.as_bytes());
    out.push(0);
    while out.len() % 4 != 0 {
        out.push(0);
    }
    out.extend_from_slice(data);
    while out.len() % 4 != 0 {
        out.push(0);
    }
}

pub const SPEC: &[u8] = b"Name: foo\nVersion: 1.0\nSource0: foo-1.0.tar.gz\nPatch0: bar.patch\n";
pub const TARBALL: &[u8] = b"\x1f\x8b\x08\x00 pretend this is a tarball";
pub const PATCH: &[u8] = b"--- a/foo.c\n+++ b/foo.c\n@@ -1 +1 @@\n-old\n+new\n";

/// The `foo.spec` / `foo-1.0.tar.gz` / `bar.patch` package.
pub fn foo_package() -> TestPackage {
    TestPackage::new("foo")
        .source("foo-1.0.tar.gz")
        .patch("bar.patch")
        .file("foo.spec", 0o644)
        .file("foo-1.0.tar.gz", 0o644)
        .file("bar.patch", 0o600)
}

pub fn foo_entries() -> DecodedEntries {
    vec![
        ("foo.spec", SPEC.to_vec()),
        ("foo-1.0.tar.gz", TARBALL.to_vec()),
        ("bar.patch", PATCH.to_vec()),
    ]
    .into_iter()
    .collect()
}

pub fn foo_plan(version: u32) -> ImportPlan<TestPackage> {
    ImportPlan::new(
        PackageReference::new("/srv/srpms/foo-1.0-1.el9.src.rpm", version),
        foo_package(),
        foo_entries(),
    )
}
