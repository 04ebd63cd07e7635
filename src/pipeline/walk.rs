//! Job discovery: turn input paths (files and folders) into [`WorkItem`]s.

use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::WorkItem;
use crate::engine::tools::is_qualifying_file;

/// One result from a directory walk: either a file to consider or an error with optional path.
pub enum WalkOutcome {
    Ok(PathBuf),
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`]. Directories are dropped here.
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> Option<WalkOutcome> {
    match r {
        Ok(entry) if entry.file_type().is_dir() => None,
        Ok(entry) => Some(WalkOutcome::Ok(entry.into_path())),
        Err(err) => Some(WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        }),
    }
}

/// Enumerates work items from input paths. Read-only, single-threaded.
///
/// Items come out in input order; within a folder, in lexicographic file-name order, so two
/// calls over the same tree give the same sequence. Duplicate inputs produce duplicate items
/// unless [`JobSource::dedupe`] is enabled.
#[derive(Clone, Debug)]
pub struct JobSource {
    chunk_size: usize,
    dedupe: bool,
    follow_links: bool,
}

impl JobSource {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            dedupe: false,
            follow_links: false,
        }
    }

    /// Keep only the first item for each canonical input path.
    pub fn dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    pub fn follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    pub fn enumerate<P: AsRef<Path>>(&self, inputs: &[P]) -> Vec<WorkItem> {
        let mut items = Vec::new();
        let mut skipped: Vec<(PathBuf, String)> = Vec::new();

        for input in inputs {
            let input = input.as_ref();
            if input.is_dir() {
                self.walk_dir(input, &mut items, &mut skipped);
            } else if input.is_file() && is_qualifying_file(input) {
                let root = input.parent().unwrap_or(Path::new("")).to_path_buf();
                items.push(WorkItem::new(input, root, self.chunk_size));
            } else {
                skipped.push((input.to_path_buf(), "not a PDF or folder".to_string()));
            }
        }

        log_skipped_paths(&skipped);

        if self.dedupe {
            dedupe_items(items)
        } else {
            items
        }
    }

    /// Walk `dir` recursively. Every qualifying file gets `dir` itself as its root.
    fn walk_dir(
        &self,
        dir: &Path,
        items: &mut Vec<WorkItem>,
        skipped: &mut Vec<(PathBuf, String)>,
    ) {
        let walker = walkdir::WalkDir::new(dir)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_map(to_outcome_walkdir);

        for outcome in walker {
            match outcome {
                WalkOutcome::Ok(path) => {
                    if is_qualifying_file(&path) {
                        items.push(WorkItem::new(path, dir, self.chunk_size));
                    }
                }
                WalkOutcome::Err { msg, path } => {
                    let path = path.unwrap_or_else(|| dir.to_path_buf());
                    skipped.push((path, msg));
                }
            }
        }
    }
}

/// Drop items whose input resolves to a path already seen. Inputs that cannot be
/// canonicalized are compared as given.
fn dedupe_items(items: Vec<WorkItem>) -> Vec<WorkItem> {
    let before = items.len();
    let mut seen: HashSet<PathBuf> = HashSet::with_capacity(before);
    let kept: Vec<WorkItem> = items
        .into_iter()
        .filter(|item| {
            let key = item
                .input
                .canonicalize()
                .unwrap_or_else(|_| item.input.clone());
            seen.insert(key)
        })
        .collect();
    if kept.len() < before {
        debug!("Dedupe dropped {} duplicate input(s)", before - kept.len());
    }
    kept
}

fn log_skipped_paths(skipped: &[(PathBuf, String)]) {
    if skipped.is_empty() {
        return;
    }
    for (path, msg) in skipped {
        debug!("skipped: {} ({})", path.display(), msg);
    }
    warn!(
        "Skipped {} input path(s) that are not PDFs or could not be read",
        skipped.len()
    );
}
