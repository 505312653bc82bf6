//! Which changed paths trigger a sync.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::config;
use crate::{Error, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Watch-set variants. Paths are relative to the watch root.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// An explicit list of files.
    Files(Vec<PathBuf>),
    /// Glob patterns; `*` stays within one directory, `**` crosses them.
    Globs(Vec<Pattern>),
}

impl Trigger {
    pub fn files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Trigger::Files(files.into_iter().map(|f| normalize(f.as_ref())).collect())
    }

    pub fn globs<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Trigger::Globs(patterns))
    }

    /// Explicit files win over patterns when both are configured. An empty
    /// watch set is a configuration error.
    pub fn from_config(cfg: &config::Sync) -> Result<Self> {
        if !cfg.files.is_empty() {
            Ok(Self::files(&cfg.files))
        } else if !cfg.patterns.is_empty() {
            Self::globs(&cfg.patterns)
        } else {
            Err(Error::Config(
                "sync needs at least one file or pattern to watch".to_string(),
            ))
        }
    }

    /// Whether a path relative to the watch root triggers a sync.
    pub fn matches(&self, relative: &Path) -> bool {
        let relative = normalize(relative);
        match self {
            Trigger::Files(files) => files.iter().any(|f| *f == relative),
            Trigger::Globs(patterns) => patterns
                .iter()
                .any(|p| p.matches_path_with(&relative, MATCH_OPTIONS)),
        }
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
