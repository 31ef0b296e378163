//! Directory-ancestry resolver.
//!
//! Walks from the edited file's directory towards the filesystem root,
//! looking at each directory's immediate entries for a formatter config file
//! and for the project override file. Both searches share one walk: the
//! walk ends in the first directory where either is found.

use crate::formatter::Formatter;
use crate::project::PROJECT_CONFIG_FILE_NAME;
use crate::tools::fs::FsAdapter;
use std::path::{Path, PathBuf};

/// A formatter config file found during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredConfig {
    /// Formatter the config file belongs to.
    pub formatter: Formatter,

    /// Location of the config file.
    pub path: PathBuf,
}

/// Outcome of one ancestry walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestryScan {
    /// Nearest formatter config file, if any.
    pub discovered: Option<DiscoveredConfig>,

    /// Location of the project override file, if found.
    pub project_config_file: Option<PathBuf>,

    /// First directory the walk visited.
    pub search_root: Option<PathBuf>,
}

/// Walks the ancestry of `start` looking for config files of `candidates`.
///
/// `start` may be a file or a directory; paths that are not directories
/// (including ones that don't exist yet) are skipped. The filesystem root
/// itself is not inspected. A directory that cannot be listed is treated as
/// empty and the walk continues upwards.
///
/// Within one directory, candidates are tested in slice order, so an earlier
/// candidate wins a tie. Entries are compared in sorted order.
pub fn scan_ancestry(fs: &dyn FsAdapter, start: &Path, candidates: &[Formatter]) -> AncestryScan {
    let mut scan = AncestryScan::default();

    for dir in start.ancestors() {
        if dir.parent().is_none() {
            break;
        }
        if !fs.is_dir(dir) {
            continue;
        }
        if scan.search_root.is_none() {
            scan.search_root = Some(dir.to_path_buf());
        }

        let mut entries = match fs.list_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };
        entries.sort();

        if scan.discovered.is_none() {
            scan.discovered = candidates.iter().find_map(|formatter| {
                entries
                    .iter()
                    .find(|entry| formatter.matches_config_file(entry))
                    .map(|entry| DiscoveredConfig {
                        formatter: *formatter,
                        path: dir.join(entry),
                    })
            });
        }

        if scan.project_config_file.is_none()
            && entries.iter().any(|entry| entry == PROJECT_CONFIG_FILE_NAME)
        {
            scan.project_config_file = Some(dir.join(PROJECT_CONFIG_FILE_NAME));
        }

        if scan.discovered.is_some() || scan.project_config_file.is_some() {
            break;
        }
    }

    scan
}
