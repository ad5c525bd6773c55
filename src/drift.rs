//! Drift detection
//!
//! Compares freshly projected schemas with the files on disk without
//! writing anything. A published tree is in sync when every file is
//! byte-identical to what the projector would write now.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::{ChangeTag, TextDiff};
use tracing::warn;

use crate::checksum::Checksum;
use crate::error::{RapError, Result};
use crate::projector::SchemaProjector;
use crate::schema::{GeneratedSchema, SchemaKind};

/// State of one published file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriftStatus {
    InSync,
    /// The file differs from the fresh projection
    Drifted {
        on_disk: Checksum,
        added: usize,
        removed: usize,
        diff: String,
    },
    Missing,
}

/// Drift result for one schema kind
#[derive(Debug, Clone)]
pub struct DriftEntry {
    pub kind: SchemaKind,
    pub path: PathBuf,
    pub expected: Checksum,
    pub status: DriftStatus,
}

impl DriftEntry {
    pub fn is_in_sync(&self) -> bool {
        self.status == DriftStatus::InSync
    }
}

/// Drift results for every published kind
#[derive(Debug, Clone, Default)]
pub struct DriftReport {
    pub entries: Vec<DriftEntry>,
}

impl DriftReport {
    pub fn has_drift(&self) -> bool {
        self.entries.iter().any(|e| !e.is_in_sync())
    }
}

/// Check every published kind under `output_dir`
pub fn check_all(projector: &SchemaProjector<'_>, output_dir: &Path) -> Result<DriftReport> {
    let mut report = DriftReport::default();
    for kind in SchemaKind::all() {
        let generated = projector.generate(*kind)?;
        let path = output_dir.join(kind.relative_path());
        report.entries.push(compare(&generated, &path)?);
    }
    Ok(report)
}

/// Compare one generated schema with the file at `path`
pub fn compare(generated: &GeneratedSchema, path: &Path) -> Result<DriftEntry> {
    let status = match fs::read_to_string(path) {
        Ok(on_disk) if generated.checksum.verify(&on_disk) => DriftStatus::InSync,
        Ok(on_disk) => {
            let (added, removed) = count_changes(&on_disk, &generated.text);
            DriftStatus::Drifted {
                on_disk: Checksum::of_text(&on_disk),
                added,
                removed,
                diff: unified_diff(&on_disk, &generated.text, path),
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "Published schema is missing");
            DriftStatus::Missing
        }
        Err(e) => return Err(RapError::io(path, e)),
    };

    Ok(DriftEntry {
        kind: generated.kind,
        path: path.to_path_buf(),
        expected: generated.checksum.clone(),
        status,
    })
}

/// Unified diff from the file on disk to the fresh projection
pub fn unified_diff(on_disk: &str, generated: &str, path: &Path) -> String {
    let on_disk_label = format!("a/{}", path.display());
    let generated_label = format!("b/{}", path.display());
    TextDiff::from_lines(on_disk, generated)
        .unified_diff()
        .context_radius(3)
        .header(&on_disk_label, &generated_label)
        .to_string()
}

/// Lines (added, removed) going from `old` to `new`
fn count_changes(old: &str, new: &str) -> (usize, usize) {
    let diff = TextDiff::from_lines(old, new);
    diff.iter_all_changes().fold((0, 0), |(added, removed), change| match change.tag() {
        ChangeTag::Insert => (added + 1, removed),
        ChangeTag::Delete => (added, removed + 1),
        ChangeTag::Equal => (added, removed),
    })
}
