use std::collections::HashSet;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::MeasurementError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Skip entries on a different device than the root.
    pub same_filesystem: bool,
    pub follow_links: bool,
}

/// Totals gathered by a directory walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirUsage {
    pub bytes: u64,
    pub files: u64,
    /// Entries below the root that could not be read.
    pub unreadable: u64,
}

/// Sum the apparent size of every regular file below `root`.
///
/// The root must be a readable directory. Anything unreadable deeper in the
/// tree is skipped and counted in [`DirUsage::unreadable`].
pub fn measure_dir_size(root: &Path, options: WalkOptions) -> Result<DirUsage, MeasurementError> {
    let read_err = |source| MeasurementError::Read {
        path: root.to_path_buf(),
        source,
    };

    let root_meta = fs::metadata(root).map_err(read_err)?;
    if !root_meta.is_dir() {
        return Err(MeasurementError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    let root_dev = file_id(&root_meta).map(|(dev, _)| dev);
    let root_entries = fs::read_dir(root).map_err(read_err)?;

    let mut usage = DirUsage::default();
    let mut visited: HashSet<(u64, u64)> = HashSet::new();
    visited.extend(file_id(&root_meta));

    let mut pending: Vec<PathBuf> = Vec::new();
    let mut current = Some((root.to_path_buf(), root_entries));

    while let Some((dir, entries)) = current.take() {
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    skip(&mut usage, &dir, &err);
                    continue;
                }
            };
            let path = entry.path();
            let meta = match fs::symlink_metadata(&path) {
                Ok(m) => m,
                Err(err) => {
                    skip(&mut usage, &path, &err);
                    continue;
                }
            };

            let meta = if meta.file_type().is_symlink() {
                if !options.follow_links {
                    continue;
                }
                match fs::metadata(&path) {
                    Ok(m) => m,
                    Err(err) => {
                        debug!("ignoring dangling link {}: {}", path.display(), err);
                        continue;
                    }
                }
            } else {
                meta
            };

            if options.same_filesystem && file_id(&meta).map(|(dev, _)| dev) != root_dev {
                debug!("skipping {} on another filesystem", path.display());
                continue;
            }

            if meta.is_dir() {
                if options.follow_links {
                    if let Some(id) = file_id(&meta) {
                        if !visited.insert(id) {
                            debug!("already visited {}", path.display());
                            continue;
                        }
                    }
                }
                pending.push(path);
            } else if meta.is_file() {
                usage.bytes = usage.bytes.saturating_add(meta.len());
                usage.files += 1;
            }
        }

        while let Some(next) = pending.pop() {
            match fs::read_dir(&next) {
                Ok(entries) => {
                    current = Some((next, entries));
                    break;
                }
                Err(err) => skip(&mut usage, &next, &err),
            }
        }
    }

    debug!(
        "{}: {} bytes in {} files, {} unreadable",
        root.display(),
        usage.bytes,
        usage.files,
        usage.unreadable
    );
    Ok(usage)
}

fn skip(usage: &mut DirUsage, path: &Path, err: &std::io::Error) {
    warn!("skipping {}: {}", path.display(), err);
    usage.unreadable += 1;
}

#[cfg(unix)]
fn file_id(meta: &Metadata) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    Some((meta.dev(), meta.ino()))
}

#[cfg(not(unix))]
fn file_id(_meta: &Metadata) -> Option<(u64, u64)> {
    None
}
