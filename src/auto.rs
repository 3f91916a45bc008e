//! Per-directory `.tox-auto` metadata: tags and a free-text description.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::index::IndexStore;

/// File name of a directory's metadata file.
pub const AUTO_FILE: &str = ".tox-auto";

/// Line prefix holding space-separated tags.
pub const TAGS_MARKER: &str = "#tags:";

/// Line prefix holding the description.
pub const DESC_MARKER: &str = "#desc:";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoMetadata {
    pub tags: Vec<String>,
    pub description: Option<String>,
}

impl AutoMetadata {
    /// Parse metadata text. The first occurrence of each marker wins.
    pub fn parse(content: &str) -> Self {
        let mut tags = None;
        let mut description = None;
        for line in content.lines() {
            if tags.is_none() {
                if let Some(rest) = line.strip_prefix(TAGS_MARKER) {
                    tags = Some(rest.split_whitespace().map(String::from).collect());
                    continue;
                }
            }
            if description.is_none() {
                if let Some(rest) = line.strip_prefix(DESC_MARKER) {
                    description = Some(rest.trim().to_string());
                }
            }
        }
        AutoMetadata {
            tags: tags.unwrap_or_default(),
            description,
        }
    }

    /// Metadata for `dir`, or `None` when the file is missing or unreadable.
    pub fn load(dir: &Path) -> Option<Self> {
        let path = dir.join(AUTO_FILE);
        if !path.is_file() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(content) => Some(Self::parse(&content)),
            Err(e) => {
                warn!("ignoring metadata {}: {e}", path.display());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.description.is_none()
    }

    /// Whether `re` matches any tag or the description.
    pub fn is_match(&self, re: &Regex) -> bool {
        self.tags.iter().any(|t| re.is_match(t))
            || self.description.as_deref().is_some_and(|d| re.is_match(d))
    }
}

/// A directory together with whatever metadata it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirInfo {
    pub dir: PathBuf,
    pub meta: Option<AutoMetadata>,
}

/// Metadata for each listed absolute directory.
pub fn report<I, P>(dirs: I) -> Vec<DirInfo>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    dirs.into_iter()
        .map(|d| {
            let dir = d.into();
            let meta = AutoMetadata::load(&dir);
            DirInfo { dir, meta }
        })
        .collect()
}

/// Every directory in the chain whose metadata matches `re`.
pub fn grep(store: &IndexStore, re: &Regex) -> Vec<DirInfo> {
    store
        .chain()
        .flat_map(|s| s.entries().map(move |e| s.absolute(e)))
        .filter_map(|dir| {
            let meta = AutoMetadata::load(&dir)?;
            meta.is_match(re).then(|| DirInfo {
                dir,
                meta: Some(meta),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_markers() {
        let m = AutoMetadata::parse("junk\n#tags: rust cli\n#desc:  a tool \n");
        assert_eq!(m.tags, vec!["rust", "cli"]);
        assert_eq!(m.description.as_deref(), Some("a tool"));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let m = AutoMetadata::parse("#tags: a\n#tags: b\n#desc: one\n#desc: two\n");
        assert_eq!(m.tags, vec!["a"]);
        assert_eq!(m.description.as_deref(), Some("one"));
    }

    #[test]
    fn test_empty_content() {
        assert!(AutoMetadata::parse("").is_empty());
    }

    #[test]
    fn test_regex_over_tags_and_description() {
        let m = AutoMetadata::parse("#tags: web api\n#desc: billing service\n");
        assert!(m.is_match(&Regex::new("^api$").unwrap()));
        assert!(m.is_match(&Regex::new("bill").unwrap()));
        assert!(!m.is_match(&Regex::new("cli").unwrap()));
    }
}
