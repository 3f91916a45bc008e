//! Locator configuration: filesystem root boundary, home directory and
//! ownership policy.

use crate::pathutil::current_uid;
use std::path::{Path, PathBuf};

/// Environment variable overriding the filesystem root boundary.
pub const ROOT_ENV: &str = "TOX_ROOT";

/// Configuration threaded through the locator and chain loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Ancestor searches never leave this directory.
    pub root: PathBuf,
    /// Fallback search origin and the point where deep chains stop.
    pub home: Option<PathBuf>,
    /// Identity compared against index file owners.
    pub user: Option<u32>,
    /// Skip index files owned by another user.
    pub require_owner_match: bool,
}

impl Config {
    /// Build a configuration from `HOME` and `TOX_ROOT`.
    pub fn from_env() -> Self {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .filter(|h| h.is_absolute() && h.is_dir())
            .or_else(dirs::home_dir);
        let root = std::env::var_os(ROOT_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/"));
        Self::new(root, home)
    }

    /// Build a configuration for an explicit root and home.
    pub fn new(root: impl Into<PathBuf>, home: Option<PathBuf>) -> Self {
        let root = normalize(root.into());
        let home = home.map(normalize);
        let user = current_uid();
        Config {
            root,
            home,
            user,
            require_owner_match: cfg!(unix),
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = normalize(root.into());
        self
    }

    pub fn with_owner_check(mut self, required: bool) -> Self {
        self.require_owner_match = required;
        self
    }

    /// Whether `dir` is the configured home directory.
    pub fn is_home(&self, dir: &Path) -> bool {
        self.home.as_deref() == Some(dir)
    }
}

/// Canonicalize when possible so later prefix comparisons agree with
/// canonicalized search paths.
fn normalize(path: PathBuf) -> PathBuf {
    path.canonicalize().unwrap_or(path)
}
