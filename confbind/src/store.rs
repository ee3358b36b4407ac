//! Atomic persistence of property data to disk.

use std::fs::{self, File};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{BindError, BindResult};
use crate::props::{self, FILE_COMMENT, PropertyMap};
use crate::system::SystemAccess;

/// Persist `data` to `target` in the textual property format.
///
/// Missing parent directories are created first. Where `system` reports
/// working atomic-rename semantics the data is written to a temporary file
/// in the same directory and renamed over `target`, so a concurrent reader
/// sees either the prior content or the new content, never a torn mix.
/// On the Windows family the file is overwritten in place instead; that
/// path carries no atomicity guarantee.
///
/// Concurrent writers are not serialised: last writer wins.
///
/// # Errors
///
/// Returns [`BindError::Io`] when the data cannot be written and
/// [`BindError::Rename`] when a complete temporary file could not replace
/// `target`. In the rename case the temporary file is left in place for
/// diagnosis; `target` keeps its prior content.
pub fn persist(target: &Path, data: &PropertyMap, system: &dyn SystemAccess) -> BindResult<()> {
    ensure_parent(target);
    if system.supports_atomic_replace() {
        persist_atomic(target, data)
    } else {
        debug!(path = %target.display(), "atomic replace unsupported; overwriting in place");
        persist_in_place(target, data)
    }
}

/// Best-effort creation of `target`'s parent directory chain.
///
/// Failures are logged and otherwise ignored; the subsequent open reports
/// the real error with the path the caller asked for.
pub(crate) fn ensure_parent(target: &Path) {
    let Some(parent) = target.parent() else {
        return;
    };
    if parent.as_os_str().is_empty() {
        return;
    }
    if let Err(err) = fs::create_dir_all(parent) {
        debug!(dir = %parent.display(), %err, "could not create parent directory");
    }
}

fn persist_atomic(target: &Path, data: &PropertyMap) -> BindResult<()> {
    let parent = target
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    // Same directory as the target, so the rename stays on one filesystem.
    let mut temp = NamedTempFile::new_in(parent).map_err(|e| BindError::io(parent, e))?;
    props::write_props(&mut temp, data, Some(FILE_COMMENT))
        .map_err(|e| BindError::io(temp.path(), e))?;
    if let Err(persist_err) = temp.persist(target) {
        let from = persist_err.file.path().to_path_buf();
        // Leave the complete temporary file behind rather than discarding
        // the only copy of the new content.
        if persist_err.file.keep().is_err() {
            debug!(temp = %from.display(), "could not retain temporary file after failed rename");
        }
        return Err(BindError::Rename {
            from,
            to: target.to_path_buf(),
            source: persist_err.error,
        });
    }
    Ok(())
}

fn persist_in_place(target: &Path, data: &PropertyMap) -> BindResult<()> {
    let file = File::create(target).map_err(|e| BindError::io(target, e))?;
    props::write_props(file, data, Some(FILE_COMMENT)).map_err(|e| BindError::io(target, e))
}
