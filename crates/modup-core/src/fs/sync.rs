//! Additive synchronization of resource directory trees.

use anyhow::Context;
use std::fs;
use std::path::Path;

/// Recursively copy every file and subdirectory from `src` into `dst`.
///
/// Files already present at the destination are overwritten; entries that
/// exist only at the destination are left untouched (the sync adds and
/// replaces, it never deletes). Returns the number of files copied.
///
/// The traversal aborts on the first error, with the failing path named
/// in the error chain. Entry types other than files and directories are
/// an error.
pub fn sync_tree(src: &Path, dst: &Path) -> anyhow::Result<u64> {
    let meta = fs::metadata(src)
        .with_context(|| format!("Failed to stat source directory: {}", src.display()))?;
    if !meta.is_dir() {
        anyhow::bail!("Source path is not a directory: {}", src.display());
    }
    fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create directory: {}", dst.display()))?;
    sync_entries(src, dst)
}

fn sync_entries(src: &Path, dst: &Path) -> anyhow::Result<u64> {
    let mut copied = 0;
    for entry in
        fs::read_dir(src).with_context(|| format!("Failed to read dir: {}", src.display()))?
    {
        let entry =
            entry.with_context(|| format!("Failed to read dir entry: {}", src.display()))?;
        let ty = entry
            .file_type()
            .with_context(|| format!("Failed to stat dir entry: {}", entry.path().display()))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        if ty.is_dir() {
            fs::create_dir_all(&to)
                .with_context(|| format!("Failed to create directory: {}", to.display()))?;
            copied += sync_entries(&from, &to)?;
        } else if ty.is_file() {
            fs::copy(&from, &to).with_context(|| {
                format!(
                    "Failed to copy file from {} to {}",
                    from.display(),
                    to.display()
                )
            })?;
            copied += 1;
        } else {
            anyhow::bail!("Unsupported filesystem entry type at {}", from.display());
        }
    }
    Ok(copied)
}
