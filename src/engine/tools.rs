//! Path utilities: input filtering and output placement.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::WorkItem;
use crate::utils::config::SplitConsts;

/// True for files with the input extension (`.pdf`, any case).
pub fn is_qualifying_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(SplitConsts::INPUT_EXTENSION))
}

/// Folder the chunks of `item` go to: `output_root` joined with the input's folder relative
/// to its root. Two inputs with the same stem can land in the same folder (same-named files
/// under different roots, `x.pdf` next to `x.PDF`); see [`find_output_collision`].
pub fn output_dir_for(item: &WorkItem, output_root: &Path) -> PathBuf {
    let rel = item.relative_dir();
    if rel.as_os_str().is_empty() {
        output_root.to_path_buf()
    } else {
        output_root.join(rel)
    }
}

/// Chunk file name for pages `start..=end` (1-based) of a document with stem `stem`.
pub fn chunk_file_name(stem: &str, start: u32, end: u32) -> String {
    format!("{stem}_{start}-{end}.{}", SplitConsts::INPUT_EXTENSION)
}

/// 1-based inclusive page ranges of at most `chunk_size` pages covering `total_pages`.
/// Empty when the document has no pages.
pub fn page_ranges(total_pages: u32, chunk_size: usize) -> Vec<(u32, u32)> {
    let step = u32::try_from(chunk_size.max(1)).unwrap_or(u32::MAX);
    let mut ranges = Vec::new();
    let mut start = 1_u32;
    while start <= total_pages {
        let end = start.saturating_add(step - 1).min(total_pages);
        ranges.push((start, end));
        match end.checked_add(1) {
            Some(next) => start = next,
            None => break,
        }
    }
    ranges
}

/// Chunk file stem of `item` (its file stem, lossy).
pub fn chunk_stem(item: &WorkItem) -> Option<String> {
    item.input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
}

/// First pair of items that are different files but would write chunks with the same names
/// into the same folder. Names are compared case-insensitively, since the output folder may
/// live on a case-insensitive filesystem. The same input listed twice is not a collision.
pub fn find_output_collision<'a>(
    items: &'a [WorkItem],
    output_root: &Path,
) -> Option<(&'a WorkItem, &'a WorkItem)> {
    let mut owners: HashMap<String, (PathBuf, &'a WorkItem)> = HashMap::with_capacity(items.len());
    for item in items {
        let Some(stem) = chunk_stem(item) else {
            continue;
        };
        let key = output_dir_for(item, output_root)
            .join(stem)
            .to_string_lossy()
            .to_lowercase();
        let canonical = item
            .input
            .canonicalize()
            .unwrap_or_else(|_| item.input.clone());
        if let Some((owner, first)) = owners.get(&key) {
            if *owner != canonical {
                return Some((*first, item));
            }
            continue;
        }
        owners.insert(key, (canonical, item));
    }
    None
}
