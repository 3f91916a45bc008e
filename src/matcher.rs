//! Conjunctive fragment-level glob matching over an index chain.

use globset::{Glob, GlobMatcher};
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, ToxError};
use crate::index::IndexStore;

/// Whether a pattern carries a glob metacharacter.
pub fn has_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?'])
}

/// Wrap a bare pattern as `*pattern*` so it acts as a substring query.
pub fn auto_wildcard(pattern: &str) -> Cow<'_, str> {
    if has_glob(pattern) {
        Cow::Borrowed(pattern)
    } else {
        Cow::Owned(format!("*{pattern}*"))
    }
}

/// A compiled set of patterns that must all match.
pub struct PatternMatcher {
    patterns: Vec<String>,
    globs: Vec<GlobMatcher>,
    cwd: PathBuf,
}

impl PatternMatcher {
    /// Compile `patterns`. Relative entries stay relative only when `cwd`
    /// is their index root and they name an existing directory.
    pub fn new<S: AsRef<str>>(patterns: &[S], cwd: &Path) -> Result<Self> {
        let mut globs = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(&auto_wildcard(pattern)).map_err(|source| ToxError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
            globs.push(glob.compile_matcher());
        }
        Ok(Self {
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            globs,
            cwd: cwd.to_path_buf(),
        })
    }

    /// The patterns as given, space-joined.
    pub fn describe(&self) -> String {
        self.patterns.join(" ")
    }

    /// Every pattern must match at least one fragment of `entry`.
    pub fn is_match(&self, entry: &str) -> bool {
        self.globs.iter().all(|glob| {
            entry
                .split('/')
                .filter(|frag| !frag.is_empty())
                .any(|frag| glob.is_match(frag))
        })
    }

    /// Matches from `store` and every outer store, deduplicated by rendered
    /// text. Local entries come first in index order; outer levels always
    /// render absolute.
    pub fn match_chain(&self, store: &IndexStore, render_absolute: bool) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (level, current) in store.chain().enumerate() {
            for rendered in self.match_store(current, render_absolute || level > 0) {
                if seen.insert(rendered.clone()) {
                    out.push(rendered);
                }
            }
        }
        out
    }

    /// Matches from a single store, ignoring its outer link.
    pub fn match_store(&self, store: &IndexStore, render_absolute: bool) -> Vec<String> {
        store
            .entries()
            .filter(|entry| self.is_match(entry))
            .map(|entry| self.render(store, entry, render_absolute))
            .collect()
    }

    fn render(&self, store: &IndexStore, entry: &str, render_absolute: bool) -> String {
        if entry.starts_with('/') {
            return entry.to_string();
        }
        let absolute = store.absolute(entry);
        if !render_absolute && self.cwd.join(entry) == absolute && absolute.is_dir() {
            return entry.to_string();
        }
        absolute.to_string_lossy().into_owned()
    }
}
