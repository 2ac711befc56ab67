use std::{
    io,
    path::{Path, PathBuf},
};

use walkdir::{DirEntry, WalkDir};

const SKIPPED_DIRS: &[&str] = &["target", "build"];

/// Hidden directories and build output are not entered.
fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// Descriptor files under `dir` whose extension is in `extensions`, sorted by path.
/// Symlinks are not followed.
pub fn collect_descriptor_files(dir: &Path, extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir).into_iter().filter_entry(|entry| {
        let skip = is_skipped_dir(entry);
        if skip {
            log::trace!("skipping {}", entry.path().display());
        }
        !skip
    });

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}
