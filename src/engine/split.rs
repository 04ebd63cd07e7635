//! PDF split transform: one input document into fixed-size page-range chunks.

use log::debug;
use lopdf::Document;
use std::fs;
use std::path::{Path, PathBuf};

use crate::WorkItem;
use crate::engine::tools::{chunk_file_name, chunk_stem, output_dir_for, page_ranges};
use crate::error::{JobError, SplitError};
use crate::pipeline::Transform;

/// Splits each item into `{stem}_{start}-{end}.pdf` files under the output root, mirroring
/// the input's folder relative to its root. Holds no mutable state, so one instance serves
/// every worker.
#[derive(Clone, Debug)]
pub struct PdfSplitter {
    output_root: PathBuf,
}

impl PdfSplitter {
    pub fn new(output_root: impl AsRef<Path>) -> Self {
        Self {
            output_root: output_root.as_ref().to_path_buf(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Split `item` and return the chunk files written, in page order. A document without
    /// pages yields no files.
    pub fn split(&self, item: &WorkItem) -> Result<Vec<PathBuf>, SplitError> {
        let doc = Document::load(&item.input).map_err(|source| SplitError::Load {
            path: item.input.clone(),
            source,
        })?;
        let total_pages = u32::try_from(doc.get_pages().len()).unwrap_or(u32::MAX);

        let out_dir = output_dir_for(item, &self.output_root);
        fs::create_dir_all(&out_dir).map_err(|source| SplitError::CreateDir {
            path: out_dir.clone(),
            source,
        })?;

        let stem = chunk_stem(item).ok_or_else(|| SplitError::NoFileName(item.input.clone()))?;

        let ranges = page_ranges(total_pages, item.chunk_size);
        let mut outputs = Vec::with_capacity(ranges.len());
        for (start, end) in ranges {
            let out_file = out_dir.join(chunk_file_name(&stem, start, end));
            let mut part = extract_pages(&doc, total_pages, start, end);
            part.save(&out_file).map_err(|e| SplitError::Save {
                path: out_file.clone(),
                message: e.to_string(),
            })?;
            outputs.push(out_file);
        }
        debug!(
            "{}: {} page(s) -> {} chunk(s)",
            item.input.display(),
            total_pages,
            outputs.len()
        );
        Ok(outputs)
    }
}

impl Transform for PdfSplitter {
    fn apply(&self, item: &WorkItem) -> Result<Vec<PathBuf>, JobError> {
        Ok(self.split(item)?)
    }
}

/// Copy of `doc` holding only pages `start..=end` (1-based).
fn extract_pages(doc: &Document, total_pages: u32, start: u32, end: u32) -> Document {
    let mut part = doc.clone();
    let outside: Vec<u32> = (1..=total_pages)
        .filter(|p| *p < start || *p > end)
        .collect();
    if !outside.is_empty() {
        part.delete_pages(&outside);
        part.prune_objects();
    }
    part
}
