//  UTILITIES.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 22:05:09
//  Last edited:
//    19 Oct 2026, 22:12:36
//  Auto updated?
//    Yes
//
//  Description:
//!   Utilities for tests that run on the sample Kite files in the
//!   repository.
//

use std::fs::{self, DirEntry, ReadDir};
use std::path::{Path, PathBuf};


/***** CONSTANTS *****/
/// The directory with the sample files that are valid Kite programs.
pub const TESTS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../tests/kite");
/// The directory with the sample files that are not.
pub const FAIL_TESTS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../tests/kite/fail");





/***** LIBRARY *****/
/// Runs the given closure on every valid sample Kite file.
///
/// # Arguments
/// - `callback`: Called with the path and the contents of every file.
///
/// # Panics
/// This function panics if the directory cannot be read or contains no Kite files.
#[inline]
pub fn test_on_kite_files<F: FnMut(PathBuf, String)>(callback: F) { test_on_kite_files_in(TESTS_DIR, callback) }

/// Runs the given closure on every Kite file (`*.kite`) directly in the given directory.
///
/// Files are visited in alphabetical order, so failures are reproducible.
///
/// # Arguments
/// - `dir`: The directory to search.
/// - `callback`: Called with the path and the contents of every file.
///
/// # Panics
/// This function panics if the directory cannot be read or contains no Kite files.
pub fn test_on_kite_files_in<F: FnMut(PathBuf, String)>(dir: impl AsRef<Path>, mut callback: F) {
    let dir: &Path = dir.as_ref();
    let entries: ReadDir = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => panic!("Failed to read tests directory '{}': {}", dir.display(), err),
    };

    let mut paths: Vec<PathBuf> = entries
        .map(|entry: Result<DirEntry, _>| match entry {
            Ok(entry) => entry.path(),
            Err(err) => panic!("Failed to read entry in tests directory '{}': {}", dir.display(), err),
        })
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "kite"))
        .collect();
    paths.sort();
    if paths.is_empty() {
        panic!("No Kite files found in tests directory '{}'", dir.display());
    }

    for path in paths {
        let raw: String = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => panic!("Failed to read test file '{}': {}", path.display(), err),
        };
        println!("{}", (0..80).map(|_| '-').collect::<String>());
        println!("Testing '{}'", path.display());
        callback(path, raw);
    }
}
