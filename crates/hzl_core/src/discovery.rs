//! Video discovery from command-line input.
//!
//! Resolves the ordered file list the session is constructed from:
//! either an explicit list of files, or a recursive folder scan filtered
//! by extension. When both are given the folder wins, matching the
//! original tool.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::DiscoveryError;

/// File extensions treated as video when scanning a folder.
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm", "m4v", "ts"];

/// Resolve the video list from `--filepath`/`--folder` input.
///
/// Folder scans are recursive and sorted for a deterministic labelling
/// order; explicit files keep their argument order and must exist.
pub fn resolve_file_list(
    filepaths: &[PathBuf],
    folder: Option<&Path>,
    extensions: &[String],
) -> Result<Vec<PathBuf>, DiscoveryError> {
    if let Some(folder) = folder {
        return scan_folder(folder, extensions);
    }

    for path in filepaths {
        if !path.is_file() {
            return Err(DiscoveryError::FileNotFound(path.clone()));
        }
    }

    Ok(filepaths.to_vec())
}

/// Recursively collect video files under a folder.
pub fn scan_folder(folder: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !folder.is_dir() {
        return Err(DiscoveryError::FolderNotFound(folder.to_path_buf()));
    }

    let mut videos = Vec::new();
    walk(folder, extensions, &mut videos)?;
    videos.sort();

    if videos.is_empty() {
        return Err(DiscoveryError::NoVideosFound(folder.to_path_buf()));
    }

    tracing::info!("Found {} video(s) under {}", videos.len(), folder.display());
    Ok(videos)
}

fn walk(
    dir: &Path,
    extensions: &[String],
    out: &mut Vec<PathBuf>,
) -> Result<(), DiscoveryError> {
    let entries = fs::read_dir(dir).map_err(|e| DiscoveryError::ScanFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| DiscoveryError::ScanFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();

        if path.is_dir() {
            walk(&path, extensions, out)?;
        } else if is_video(&path, extensions) {
            out.push(path);
        }
    }

    Ok(())
}

fn is_video(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            extensions.iter().any(|ext| ext.eq_ignore_ascii_case(&e))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn exts() -> Vec<String> {
        DEFAULT_VIDEO_EXTENSIONS
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn explicit_files_must_exist() {
        let result = resolve_file_list(&[PathBuf::from("/nonexistent/a.mp4")], None, &exts());
        assert!(matches!(result, Err(DiscoveryError::FileNotFound(_))));
    }

    #[test]
    fn explicit_files_keep_argument_order() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("b.mp4");
        let a = dir.path().join("a.mp4");
        File::create(&b).unwrap();
        File::create(&a).unwrap();

        let resolved = resolve_file_list(&[b.clone(), a.clone()], None, &exts()).unwrap();
        assert_eq!(resolved, vec![b, a]);
    }

    #[test]
    fn folder_scan_is_recursive_filtered_and_sorted() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        File::create(dir.path().join("b.mp4")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        File::create(nested.join("a.MKV")).unwrap();

        let resolved = scan_folder(dir.path(), &exts()).unwrap();
        assert_eq!(resolved.len(), 2);
        assert!(resolved[0].ends_with("b.mp4"));
        assert!(resolved[1].ends_with("nested/a.MKV"));
    }

    #[test]
    fn folder_wins_over_explicit_files() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("only.mp4")).unwrap();

        let resolved = resolve_file_list(
            &[PathBuf::from("/nonexistent/a.mp4")],
            Some(dir.path()),
            &exts(),
        )
        .unwrap();
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn empty_folder_is_an_error() {
        let dir = tempdir().unwrap();
        let result = scan_folder(dir.path(), &exts());
        assert!(matches!(result, Err(DiscoveryError::NoVideosFound(_))));
    }
}
