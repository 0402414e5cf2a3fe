use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::error::GeoViewError;

/// File extension of candidate files, compared case-insensitively
pub const GEOJSON_EXTENSION: &str = "geojson";

/// Options for [`list_candidates_with`]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ListingOptions {
    /// Maximum number of directory levels below the root to descend into.
    /// `Some(0)` only lists the root itself. [`None`] means unlimited.
    pub max_depth: Option<usize>,
}

/// Recursively list all `.geojson` files below `root` with default options.
/// See [`list_candidates_with`].
pub fn list_candidates(root: &Path) -> Result<Vec<PathBuf>, GeoViewError> {
    list_candidates_with(root, &ListingOptions::default())
}

/// Recursively list all files below `root` whose extension is `geojson` in
/// any letter case. The returned paths are relative to `root` and sorted
/// ascending by their string form.
///
/// Symbolic links are followed. A directory is only skipped if it is one of
/// its own ancestors, so link cycles terminate while aliases of other
/// directories are still listed under their own name. Subdirectories that
/// cannot be read are skipped.
///
/// # Errors
/// Returns [`GeoViewError::SourceUnavailable`] if `root` does not exist or
/// cannot be read.
pub fn list_candidates_with(
    root: &Path,
    options: &ListingOptions,
) -> Result<Vec<PathBuf>, GeoViewError> {
    let source_name = root.display().to_string();
    let canonical_root =
        fs::canonicalize(root).map_err(|e| GeoViewError::unavailable(&source_name, e))?;
    if !canonical_root.is_dir() {
        return Err(GeoViewError::unavailable(&source_name, "not a directory"));
    }

    let mut result = Vec::new();

    // every directory carries the canonical paths from the root down to itself
    let mut stack = vec![(root.to_path_buf(), vec![canonical_root])];
    while let Some((dir, ancestors)) = stack.pop() {
        let depth = ancestors.len() - 1;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if depth == 0 => return Err(GeoViewError::unavailable(&source_name, e)),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();

            // follows symbolic links
            let metadata = match fs::metadata(&path) {
                Ok(m) => m,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping dangling entry");
                    continue;
                }
            };

            if metadata.is_dir() {
                if options.max_depth.is_some_and(|max| depth >= max) {
                    continue;
                }
                let Ok(canonical) = fs::canonicalize(&path) else {
                    continue;
                };
                if ancestors.contains(&canonical) {
                    warn!(path = %path.display(), "skipping link cycle");
                    continue;
                }
                let mut chain = ancestors.clone();
                chain.push(canonical);
                stack.push((path, chain));
            } else if metadata.is_file() && has_geojson_extension(&path) {
                if let Ok(relative) = path.strip_prefix(root) {
                    result.push(relative.to_path_buf());
                }
            }
        }
    }

    result.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
    debug!(root = %source_name, candidates = result.len(), "listed candidates");
    Ok(result)
}

fn has_geojson_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(GEOJSON_EXTENSION))
}
