//! Artifact archive unpacking and APK lookup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::GhaError;

/// Unpack the zip archive at `zip_path` into `dest`.
///
/// Entries escaping the destination directory are skipped.
pub fn extract_archive(zip_path: &Path, dest: &Path) -> Result<(), GhaError> {
    let file = fs::File::open(zip_path)
        .map_err(|e| GhaError::Extraction(format!("failed to open archive: {e}")))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| GhaError::Extraction(format!("failed to read archive: {e}")))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| GhaError::Extraction(format!("failed to read archive entry: {e}")))?;

        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(name = %entry.name(), "Skipping archive entry with unsafe path");
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .map_err(|e| GhaError::Extraction(format!("failed to create directory: {e}")))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| GhaError::Extraction(format!("failed to create directory: {e}")))?;
        }
        let mut out = fs::File::create(&out_path)
            .map_err(|e| GhaError::Extraction(format!("failed to create file: {e}")))?;
        io::copy(&mut entry, &mut out)
            .map_err(|e| GhaError::Extraction(format!("failed to write file: {e}")))?;
    }

    Ok(())
}

/// Search `dir` recursively for the first file with the given extension.
pub fn find_file_with_extension(dir: &Path, extension: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if let Some(found) = find_file_with_extension(&path, extension) {
                return Some(found);
            }
        } else if path.extension().is_some_and(|e| e == extension) {
            return Some(path);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
