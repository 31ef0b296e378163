//! Formatter selection policy.
//!
//! A formatter whose config file sits closest to the edited file always
//! wins. Without such a config file, the first formatter in precedence
//! order that has a resolvable executable is chosen.

use crate::formatter::Formatter;
use crate::project::ProjectConfig;
use crate::resolver::scan_ancestry;
use crate::settings::GlobalSettings;
use crate::tools::fs::FsAdapter;
use std::path::{Path, PathBuf};

/// Result of formatter resolution for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Selected formatter, if any.
    pub formatter: Option<Formatter>,

    /// Config file of the selected formatter, when selection came from it.
    pub config_file: Option<PathBuf>,

    /// Parsed project override config.
    pub project_config: Option<ProjectConfig>,

    /// First directory visited by the walk. Used as the tool's working
    /// directory and as the location of the temporary copy.
    pub search_root: Option<PathBuf>,
}

/// Returns the first candidate, in order, that is usable.
pub fn first_usable(
    candidates: &[Formatter],
    settings: &GlobalSettings,
    project: Option<&ProjectConfig>,
) -> Option<Formatter> {
    candidates
        .iter()
        .copied()
        .find(|formatter| formatter.is_usable(settings, project))
}

/// Selects a formatter among `candidates`.
///
/// With a `source` location the ancestry walk runs first and a discovered
/// config file decides outright, even if that formatter has no executable.
/// Otherwise the first usable candidate wins, taking the project override
/// into account when one was found.
#[tracing::instrument(level = "debug", skip(fs, settings, candidates))]
pub fn resolve(
    fs: &dyn FsAdapter,
    settings: &GlobalSettings,
    source: Option<&Path>,
    candidates: &[Formatter],
) -> Resolution {
    let Some(source) = source else {
        return Resolution {
            formatter: first_usable(candidates, settings, None),
            ..Default::default()
        };
    };

    let scan = scan_ancestry(fs, source, candidates);
    let project_config = scan
        .project_config_file
        .as_deref()
        .and_then(|path| ProjectConfig::load(fs, path));

    if let Some(discovered) = scan.discovered {
        tracing::debug!(
            formatter = %discovered.formatter,
            config = %discovered.path.display(),
            "selected by config file"
        );
        return Resolution {
            formatter: Some(discovered.formatter),
            config_file: Some(discovered.path),
            project_config,
            search_root: scan.search_root,
        };
    }

    let formatter = first_usable(candidates, settings, project_config.as_ref());
    tracing::debug!(formatter = ?formatter, "selected by precedence");

    Resolution {
        formatter,
        config_file: None,
        project_config,
        search_root: scan.search_root,
    }
}
