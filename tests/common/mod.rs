#![allow(dead_code)]

use std::path::{Path, PathBuf};

use covgate::model::{CoverageData, CoverageModel, FileCoverage};
use tempfile::TempDir;

/// Path to a checked-in fixture.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Build a validated model from `(path, [(line, hits)])` records.
pub fn model(files: &[(&str, &[(u32, u64)])]) -> CoverageModel {
    CoverageModel::new(CoverageData {
        files: files
            .iter()
            .map(|&(path, hits)| FileCoverage::from_hits(path, hits))
            .collect(),
    })
    .unwrap()
}

/// Write a minimal Cobertura report into a fresh temp dir.
/// The caller must hold onto `TempDir` to keep the file alive.
pub fn write_report(files: &[(&str, &[(u32, u64)])]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coverage.xml");

    let mut xml = String::from("<?xml version=\"1.0\"?>\n<coverage>\n<packages><package name=\"p\"><classes>\n");
    for (filename, hits) in files {
        xml.push_str(&format!("<class name=\"{filename}\" filename=\"{filename}\"><lines>\n"));
        for (number, count) in hits.iter() {
            xml.push_str(&format!("<line number=\"{number}\" hits=\"{count}\"/>\n"));
        }
        xml.push_str("</lines></class>\n");
    }
    xml.push_str("</classes></package></packages>\n</coverage>\n");

    std::fs::write(&path, xml).unwrap();
    (dir, path)
}
