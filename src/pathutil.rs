//! Pure path helpers: root containment, ownership and user identity.

use crate::error::{Result, ToxError};
use std::path::{Path, PathBuf};

/// True iff the canonical form of `path` lies under the canonical form of `root`.
pub fn is_within_root(root: &Path, path: &Path) -> Result<bool> {
    let root = root.canonicalize().map_err(|e| ToxError::fs(root, e))?;
    let path = path.canonicalize().map_err(|e| ToxError::fs(path, e))?;
    Ok(path.starts_with(root))
}

/// True iff `dir/filename` is owned by `uid`.
#[cfg(unix)]
pub fn owner_matches(dir: &Path, filename: &str, uid: u32) -> Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let target = dir.join(filename);
    let meta = std::fs::metadata(&target).map_err(|e| ToxError::fs(&target, e))?;
    Ok(meta.uid() == uid)
}

/// Ownership is not tracked on this platform; every file matches.
#[cfg(not(unix))]
pub fn owner_matches(dir: &Path, filename: &str, _uid: u32) -> Result<bool> {
    let target = dir.join(filename);
    std::fs::metadata(&target).map_err(|e| ToxError::fs(&target, e))?;
    Ok(true)
}

/// Effective uid of the running process.
#[cfg(unix)]
pub fn current_uid() -> Option<u32> {
    Some(nix::unistd::geteuid().as_raw())
}

#[cfg(not(unix))]
pub fn current_uid() -> Option<u32> {
    None
}

/// Join a relative path onto `base`; absolute paths pass through.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Whether a file name is hidden (dot-prefixed).
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
