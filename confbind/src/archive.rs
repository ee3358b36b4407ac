//! Packaging of property data as a single entry in a ZIP container.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{BindError, BindResult};
use crate::props::{self, FILE_COMMENT, PropertyMap};
use crate::store::ensure_parent;

/// Write `data` as one archive entry named `entry_name` at `target`.
///
/// The entry's content is the same textual property format that
/// [`persist`](crate::persist) writes. Missing parent directories are
/// created first. The container is created directly at `target` with no
/// atomicity guarantee: a failure mid-write can leave a partial or corrupt
/// archive behind.
///
/// Each call writes a fresh single-entry archive; there is no incremental
/// construction.
///
/// # Errors
///
/// Returns [`BindError::Io`] when the file cannot be created or written and
/// [`BindError::Archive`] when the container writer fails.
pub fn pack_entry(target: &Path, entry_name: &str, data: &PropertyMap) -> BindResult<()> {
    ensure_parent(target);
    let bytes = props::to_bytes(data, Some(FILE_COMMENT));
    let file = File::create(target).map_err(|e| BindError::io(target, e))?;
    let mut container = ZipWriter::new(file);
    container
        .start_file(entry_name, SimpleFileOptions::default())
        .map_err(|e| BindError::archive(target, e))?;
    container
        .write_all(&bytes)
        .map_err(|e| BindError::io(target, e))?;
    container
        .finish()
        .map_err(|e| BindError::archive(target, e))?;
    Ok(())
}
