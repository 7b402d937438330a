/// Icon lookup next to a metainfo file
///
/// Source trees keep the app icon close to the metainfo file, e.g.
///
/// ```text
/// data/io.github.example.metainfo.xml
/// data/icons/hicolor/scalable/apps/io.github.example.svg
/// ```
///
/// The icon name is derived from the metainfo file name and searched for
/// recursively under the metainfo file's directory.

use std::path::{Path, PathBuf};

use tokio::task;
use walkdir::WalkDir;

const METAINFO_TOKEN: &str = "metainfo";
const ICON_EXTENSION: &str = "svg";

/// Derive the icon file name from a metainfo file name
///
/// `io.github.example.metainfo.xml` becomes `io.github.example.svg`.
/// Returns `None` when the name does not contain `metainfo`.
pub fn expected_icon_name(metainfo_file_name: &str) -> Option<String> {
    let index = metainfo_file_name.find(METAINFO_TOKEN)?;
    Some(format!("{}{}", &metainfo_file_name[..index], ICON_EXTENSION))
}

/// Search the directory containing `metainfo_path` for the matching icon
///
/// Each directory's files are checked before its subdirectories are
/// descended into, in file-name order, and the walk stops at the first
/// match. Symlinks are not followed, so nothing outside the metainfo
/// directory is searched. Unreadable entries are skipped. A missing icon
/// is `None`, never an error.
pub fn resolve_icon(metainfo_path: &Path, max_depth: Option<usize>) -> Option<PathBuf> {
    let file_name = metainfo_path.file_name()?.to_str()?;
    let Some(icon_name) = expected_icon_name(file_name) else {
        tracing::debug!(file_name, "file name has no metainfo token, skipping icon lookup");
        return None;
    };
    let root = metainfo_path.parent()?;

    let mut walker = WalkDir::new(root).follow_links(false).sort_by(|a, b| {
        let a_is_file = a.file_type().is_file();
        let b_is_file = b.file_type().is_file();
        b_is_file
            .cmp(&a_is_file)
            .then_with(|| a.file_name().cmp(b.file_name()))
    });
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let found = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == icon_name.as_str())
        .map(|entry| entry.into_path());

    match &found {
        Some(path) => tracing::debug!(icon = %path.display(), "resolved icon"),
        None => tracing::debug!(%icon_name, root = %root.display(), "no icon found"),
    }
    found
}

/// Run `resolve_icon` on the blocking pool
pub async fn resolve_icon_async(
    metainfo_path: PathBuf,
    max_depth: Option<usize>,
) -> Option<PathBuf> {
    // A panicking walk is treated like a missing icon
    task::spawn_blocking(move || resolve_icon(&metainfo_path, max_depth))
        .await
        .unwrap_or_default()
}
