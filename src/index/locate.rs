use std::path::{Path, PathBuf};

use tracing::debug;

use super::INDEX_FILE;
use crate::config::Config;
use crate::error::Result;
use crate::pathutil::{is_within_root, owner_matches};

/// Finds the index file that applies to a directory.
pub struct IndexLocator<'a> {
    config: &'a Config,
}

impl<'a> IndexLocator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Nearest index at or above `start`, falling back once to a search
    /// starting at the home directory.
    pub fn locate(&self, start: &Path) -> Result<Option<PathBuf>> {
        if let Some(found) = self.search_upward(start)? {
            return Ok(Some(found));
        }

        let Some(home) = self.config.home.as_deref() else {
            debug!("no index above {} and no home directory", start.display());
            return Ok(None);
        };

        debug!("no index above {}, retrying from {}", start.display(), home.display());
        if !home.is_dir() {
            return Ok(None);
        }
        if !is_within_root(&self.config.root, home)? {
            return self.check_dir(home);
        }
        self.search_upward(home)
    }

    /// Walk from `start` toward the root boundary, checking each directory.
    fn search_upward(&self, start: &Path) -> Result<Option<PathBuf>> {
        let root = self.config.root.as_path();
        let mut dir = Some(start);

        while let Some(current) = dir {
            if !is_within_root(root, current)? {
                debug!("{} is outside {}", current.display(), root.display());
                break;
            }
            if let Some(found) = self.check_dir(current)? {
                return Ok(Some(found));
            }
            if current == root {
                break;
            }
            dir = current.parent();
        }
        Ok(None)
    }

    /// The index file directly inside `dir`, if present and acceptable.
    fn check_dir(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let candidate = dir.join(INDEX_FILE);
        if !candidate.is_file() {
            return Ok(None);
        }
        if self.config.require_owner_match {
            if let Some(uid) = self.config.user {
                if !owner_matches(dir, INDEX_FILE, uid)? {
                    debug!("skipping {}: owned by another user", candidate.display());
                    return Ok(None);
                }
            }
        }
        debug!("found index {}", candidate.display());
        Ok(Some(candidate))
    }
}
