//! All-or-nothing replacement of an installed binary.

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Overwrite `dst` with the contents of `src`.
///
/// The candidate is first copied to a temp name next to `dst` and then
/// renamed over it, so a failed copy never leaves a partial file swapped
/// in. Permission bits, including the executable bit, travel with the
/// copy.
pub fn replace_file(src: &Path, dst: &Path) -> anyhow::Result<()> {
    let tmp = unique_temp_path(dst)?;

    if let Err(err) = fs::copy(src, &tmp).with_context(|| {
        format!(
            "Failed to copy {} to temp file {}",
            src.display(),
            tmp.display()
        )
    }) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }

    if let Err(err) = fs::rename(&tmp, dst).with_context(|| {
        format!(
            "Failed to move {} into place at {}",
            tmp.display(),
            dst.display()
        )
    }) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }

    Ok(())
}

fn unique_temp_path(dst: &Path) -> anyhow::Result<PathBuf> {
    let parent = dst
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Destination path has no parent: {}", dst.display()))?;
    let base = dst
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Destination path has no filename: {}", dst.display()))?;

    for attempt in 0u32..1000 {
        let name = if attempt == 0 {
            format!(".{}.tmp.{}", base.to_string_lossy(), std::process::id())
        } else {
            format!(
                ".{}.tmp.{}.{}",
                base.to_string_lossy(),
                std::process::id(),
                attempt
            )
        };
        let candidate = parent.join(name);
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    anyhow::bail!("Failed to allocate a unique temp path for {}", dst.display());
}
