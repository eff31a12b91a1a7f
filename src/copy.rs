//! File replication from the main worktree into a new one.
//!
//! Copies use copy-on-write (reflink) where the filesystem supports it and
//! fall back to a regular copy otherwise. Nothing is rolled back on failure:
//! a failed copy can leave a partially populated destination.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;
use ignore::WalkBuilder;

use crate::styling::{eprintln, warning_message};

/// Copy each top-level `names` entry of `src` that exists to the same name
/// under `dst`, recursing into directories.
///
/// Missing entries are skipped silently; any other stat error is fatal.
pub fn copy_items(src: &Path, dst: &Path, names: &[&str]) -> anyhow::Result<()> {
    for name in names {
        let source = src.join(name);
        let metadata = match fs::symlink_metadata(&source) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", source.display()));
            }
        };

        let target = dst.join(name);
        if metadata.is_dir() {
            copy_dir_recursive(&source, &target)?;
        } else {
            copy_file(&source, &target)?;
        }
        log::debug!("copied {name}");
    }
    Ok(())
}

/// Walk `src` and copy every file whose basename is in `basenames` to the same
/// relative path under `dst`.
///
/// Ignore files are not consulted: the basenames worth copying (`.env`) are
/// usually gitignored. `.git` is never descended into. Entries the walker
/// cannot read are reported as warnings and skipped.
pub fn copy_matching_files(src: &Path, dst: &Path, basenames: &[&str]) -> anyhow::Result<()> {
    if basenames.is_empty() {
        return Ok(());
    }

    let walker = WalkBuilder::new(src)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                eprintln!("{}", warning_message(format!("skipping unreadable path: {e}")));
                continue;
            }
        };

        if entry.file_type().is_none_or(|ft| ft.is_dir()) {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !basenames.contains(&name) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("{} is outside {}", entry.path().display(), src.display()))?;
        copy_file(entry.path(), &dst.join(relative))?;
        log::debug!("copied {}", relative.display());
    }
    Ok(())
}

/// Copy one file, replacing any existing target and keeping the source's mode.
///
/// Parent directories are created as needed and the new file is synced to disk.
pub fn copy_file(src: &Path, dst: &Path) -> anyhow::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    #[cfg(unix)]
    {
        if fs::symlink_metadata(src)?.file_type().is_symlink() {
            return copy_symlink(src, dst);
        }
    }

    match fs::remove_file(dst) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to replace {}", dst.display()));
        }
    }

    reflink_copy::reflink_or_copy(src, dst)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))?;

    let permissions = fs::metadata(src)?.permissions();
    fs::set_permissions(dst, permissions)
        .with_context(|| format!("Failed to set permissions on {}", dst.display()))?;

    fs::File::open(dst)
        .and_then(|file| file.sync_all())
        .with_context(|| format!("Failed to sync {}", dst.display()))?;
    Ok(())
}

/// Copy a directory tree, preserving directory modes and recreating symlinks.
fn copy_dir_recursive(src: &Path, dst: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create directory {}", dst.display()))?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            copy_file(&src_path, &dst_path)?;
        }
    }

    fs::set_permissions(dst, fs::metadata(src)?.permissions())
        .with_context(|| format!("Failed to set permissions on {}", dst.display()))?;
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> anyhow::Result<()> {
    let link_target = fs::read_link(src)?;
    match fs::remove_file(dst) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    std::os::unix::fs::symlink(&link_target, dst)
        .with_context(|| format!("Failed to create symlink {}", dst.display()))
}
