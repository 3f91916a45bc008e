use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::{AddOutcome, RemoveOutcome, INDEX_FILE, PROTECT_SENTINEL};
use crate::error::{Result, ToxError};
use crate::pathutil::is_hidden;

/// One parsed index file.
///
/// Entries are kept sorted and free of duplicates at all times, so the
/// in-memory order is the persisted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStore {
    path: PathBuf,
    root: PathBuf,
    protect: bool,
    entries: Vec<String>,
    outer: Option<Box<IndexStore>>,
}

impl IndexStore {
    /// Read and parse the index file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ToxError::fs(path, e))?;
        Ok(Self::parse(path, &content))
    }

    /// Parse index content belonging to the file at `path`.
    pub fn parse(path: &Path, content: &str) -> Self {
        let mut lines = content.lines().filter(|l| !l.trim().is_empty()).peekable();
        let protect = lines
            .peek()
            .is_some_and(|first| first.starts_with(PROTECT_SENTINEL));
        if protect {
            lines.next();
        }

        let mut entries: Vec<String> = lines.map(|l| l.trim_end().to_string()).collect();
        entries.sort();
        entries.dedup();

        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        IndexStore {
            path: path.to_path_buf(),
            root,
            protect,
            entries,
            outer: None,
        }
    }

    /// Create an empty index in `dir`. Refuses to replace an existing one.
    pub fn create(dir: &Path, protect: bool) -> Result<Self> {
        if !dir.is_dir() {
            return Err(ToxError::NotADirectory(dir.to_path_buf()));
        }
        let dir = dir.canonicalize().map_err(|e| ToxError::fs(dir, e))?;
        let path = dir.join(INDEX_FILE);
        if path.exists() {
            return Err(ToxError::IndexExists(path));
        }
        let store = IndexStore {
            path,
            root: dir,
            protect,
            entries: Vec::new(),
            outer: None,
        };
        store.save()?;
        Ok(store)
    }

    /// Remove the backing file. Protected indices are never removed.
    pub fn delete_file(self) -> Result<()> {
        if self.protect {
            return Err(ToxError::Protected(self.path));
        }
        fs::remove_file(&self.path).map_err(|e| ToxError::fs(&self.path, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the index lives in; relative entries are anchored here.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_protected(&self) -> bool {
        self.protect
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.binary_search_by(|e| e.as_str().cmp(entry)).is_ok()
    }

    pub fn outer(&self) -> Option<&IndexStore> {
        self.outer.as_deref()
    }

    pub(crate) fn set_outer(&mut self, outer: Option<IndexStore>) {
        self.outer = outer.map(Box::new);
    }

    /// The outer store (with its own chain) in place of this one; this
    /// store itself when there is no outer.
    pub fn skip_local(mut self) -> IndexStore {
        match self.outer.take() {
            Some(outer) => *outer,
            None => self,
        }
    }

    /// Iterate this store followed by every outer store.
    pub fn chain(&self) -> impl Iterator<Item = &IndexStore> {
        std::iter::successors(Some(self), |s| s.outer())
    }

    /// True when no store in the chain holds any entry.
    pub fn chain_is_empty(&self) -> bool {
        self.chain().all(IndexStore::is_empty)
    }

    /// Absolute location of an entry.
    pub fn absolute(&self, entry: &str) -> PathBuf {
        if entry.starts_with('/') {
            PathBuf::from(entry)
        } else if entry == "." {
            self.root.clone()
        } else {
            self.root.join(entry)
        }
    }

    /// Entry text for an absolute directory: relative to the root when it
    /// lies beneath it, otherwise the absolute path itself.
    pub fn relativize(&self, dir: &Path) -> String {
        match dir.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.to_string_lossy().into_owned(),
            Err(_) => dir.to_string_lossy().into_owned(),
        }
    }

    /// Insert in sorted position. Returns false if already present.
    pub fn insert(&mut self, entry: String) -> bool {
        match self.entries.binary_search(&entry) {
            Ok(_) => false,
            Err(pos) => {
                self.entries.insert(pos, entry);
                true
            }
        }
    }

    /// Remove an entry. Returns false if it was absent.
    pub fn remove(&mut self, entry: &str) -> bool {
        match self.entries.binary_search_by(|e| e.as_str().cmp(entry)) {
            Ok(pos) => {
                self.entries.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Tag `dir` and persist.
    pub fn add_dir(&mut self, dir: &Path) -> Result<AddOutcome> {
        let dir = existing_dir(dir)?;
        let entry = self.relativize(&dir);
        if !self.insert(entry.clone()) {
            return Ok(AddOutcome::AlreadyPresent(entry));
        }
        self.save()?;
        Ok(AddOutcome::Added(entry))
    }

    /// Tag `dir` and every non-hidden directory beneath it, then persist once.
    /// Returns the entries that were not already present.
    pub fn add_tree(&mut self, dir: &Path) -> Result<Vec<String>> {
        let dir = existing_dir(dir)?;
        let walker = WalkDir::new(&dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || (e.file_type().is_dir() && !is_hidden(&e.file_name().to_string_lossy()))
            });

        let mut added = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("skipping unreadable directory: {e}");
                    continue;
                }
            };
            let rel = self.relativize(entry.path());
            if self.insert(rel.clone()) {
                added.push(rel);
            }
        }

        if !added.is_empty() {
            self.save()?;
        }
        Ok(added)
    }

    /// Untag `dir` and persist. The directory need not exist any more.
    pub fn del_dir(&mut self, dir: &Path) -> Result<RemoveOutcome> {
        let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let entry = self.relativize(&dir);
        if !self.remove(&entry) {
            return Ok(RemoveOutcome::NotFound(entry));
        }
        self.save()?;
        Ok(RemoveOutcome::Removed(entry))
    }

    /// Drop every entry that no longer names an existing directory.
    pub fn clean(&mut self) -> Result<Vec<String>> {
        let (kept, removed): (Vec<String>, Vec<String>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| self.absolute(e).is_dir());
        self.entries = kept;
        if !removed.is_empty() {
            self.save()?;
        }
        Ok(removed)
    }

    /// Render the file content: sentinel (if protected) then one entry per line.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if self.protect {
            out.push_str(PROTECT_SENTINEL);
            out.push('\n');
        }
        for entry in &self.entries {
            out.push_str(entry);
            out.push('\n');
        }
        out
    }

    /// Persist atomically: write a sibling temp file, then rename it over
    /// the index.
    pub fn save(&self) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ToxError::fs(dir, e))?;
        tmp.write_all(self.to_text().as_bytes())
            .map_err(|e| ToxError::fs(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| ToxError::fs(&self.path, e.error))?;
        debug!("wrote {} entries to {}", self.entries.len(), self.path.display());
        Ok(())
    }
}

fn existing_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(ToxError::NotADirectory(dir.to_path_buf()));
    }
    dir.canonicalize().map_err(|e| ToxError::fs(dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(content: &str) -> IndexStore {
        IndexStore::parse(Path::new("/work/.tox-index"), content)
    }

    #[test]
    fn test_parse_sorts_and_dedups() {
        let s = store("b\na\n\nb\nc/d\n");
        assert_eq!(s.entries().collect::<Vec<_>>(), vec!["a", "b", "c/d"]);
        assert_eq!(s.root(), Path::new("/work"));
        assert!(!s.is_protected());
    }

    #[test]
    fn test_parse_protect_sentinel() {
        let s = store("#protect\nx\ny\n");
        assert!(s.is_protected());
        assert_eq!(s.len(), 2);
        assert!(s.to_text().starts_with("#protect\n"));
    }

    #[test]
    fn test_sentinel_only_on_first_line() {
        let s = store("x\n#protect\n");
        assert!(!s.is_protected());
        assert!(s.contains("#protect"));
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut s = store("a\nc\n");
        assert!(s.insert("b".into()));
        assert!(!s.insert("c".into()));
        assert_eq!(s.entries().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_relativize_and_absolute() {
        let s = store("");
        assert_eq!(s.relativize(Path::new("/work/a/b")), "a/b");
        assert_eq!(s.relativize(Path::new("/work")), ".");
        assert_eq!(s.relativize(Path::new("/elsewhere")), "/elsewhere");
        assert_eq!(s.absolute("a/b"), PathBuf::from("/work/a/b"));
        assert_eq!(s.absolute("."), PathBuf::from("/work"));
        assert_eq!(s.absolute("/elsewhere"), PathBuf::from("/elsewhere"));
    }

    #[test]
    fn test_chain_is_empty() {
        let mut local = store("");
        assert!(local.chain_is_empty());
        local.set_outer(Some(IndexStore::parse(Path::new("/.tox-index"), "x\n")));
        assert!(!local.chain_is_empty());
        assert_eq!(local.chain().count(), 2);
    }
}
