//! Manifest indexing for the CelebA-Spoof archive
//!
//! The archive ships a flat manifest (`info.csv`) enumerating every sample's
//! identity class, spoof label, and image path. This module parses that
//! manifest, groups rows by identity class, and partitions each class's rows
//! into train/test by a fixed ratio at a deterministic position, flattening
//! the selected rows into parallel (path, label) sequences for constant-time
//! positional lookup.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::error::{Result, SpoofError};

/// Field order of `info.csv`. The manifest carries no header row; field
/// meanings are fixed by this constant.
pub const MANIFEST_FIELDS: [&str; 5] = ["index", "train", "spoof", "class", "path"];

/// One parsed row of the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestRow {
    /// Row ordinal as recorded in the manifest.
    pub index: usize,
    /// Train flag exactly as recorded in the manifest. The computed split is
    /// position-based and does not consult this field.
    pub train: String,
    /// Spoof label: 0 for a genuine capture, 1 for a presentation attack.
    pub spoof: u8,
    /// Identity class the row belongs to.
    pub class: String,
    /// Image path relative to the dataset root.
    pub path: String,
}

/// The materialized, filtered view of the manifest.
///
/// Built once at construction time and immutable thereafter. `paths` and
/// `labels` are index-aligned; `classes` is the full sorted class set of the
/// manifest, independent of any `chosen_classes` filter.
#[derive(Debug, Clone)]
pub struct DatasetIndex {
    /// All class labels present in the manifest, sorted lexicographically.
    pub classes: Vec<String>,
    /// Selected image paths in class-sorted, then manifest, order.
    pub paths: Vec<String>,
    /// Spoof labels aligned with `paths`.
    pub labels: Vec<u8>,
}

/// Read all manifest rows in file order.
///
/// Fails with [`SpoofError::NotFound`] if the manifest is absent and with
/// [`SpoofError::Parse`] on a row missing a required field or carrying a
/// non-numeric `index`/`spoof`. An empty manifest yields an empty vector.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestRow>> {
    if !path.exists() {
        return Err(SpoofError::NotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| SpoofError::Parse {
            line: 0,
            message: e.to_string(),
        })?;

    let mut rows = Vec::new();
    for (line_no, record) in reader.records().enumerate() {
        let line = line_no + 1;
        let record = record.map_err(|e| SpoofError::Parse {
            line,
            message: e.to_string(),
        })?;
        rows.push(parse_row(&record, line)?);
    }

    Ok(rows)
}

fn parse_row(record: &csv::StringRecord, line: usize) -> Result<ManifestRow> {
    let field = |i: usize| {
        record.get(i).ok_or_else(|| SpoofError::Parse {
            line,
            message: format!("missing field '{}'", MANIFEST_FIELDS[i]),
        })
    };

    let index = field(0)?.parse::<usize>().map_err(|e| SpoofError::Parse {
        line,
        message: format!("invalid index: {}", e),
    })?;
    let train = field(1)?.to_string();
    let spoof = field(2)?.parse::<u8>().map_err(|e| SpoofError::Parse {
        line,
        message: format!("invalid spoof label: {}", e),
    })?;
    let class = field(3)?.to_string();
    let path = field(4)?.to_string();

    Ok(ManifestRow {
        index,
        train,
        spoof,
        class,
        path,
    })
}

/// Group rows by identity class, preserving intra-class manifest order.
fn group_by_class(rows: Vec<ManifestRow>) -> HashMap<String, Vec<ManifestRow>> {
    let mut groups: HashMap<String, Vec<ManifestRow>> = HashMap::new();
    for row in rows {
        groups.entry(row.class.clone()).or_default().push(row);
    }
    groups
}

impl DatasetIndex {
    /// Build the index from the manifest on disk.
    ///
    /// Groups rows by class, walks classes in sorted order, and for each
    /// retained class takes the prefix `[0, split)` of its rows when
    /// `want_train` is set, or the suffix `[split, end)` otherwise, where
    /// `split = floor(count * train_split)`. `chosen_classes`, when present,
    /// restricts which classes contribute rows; the `classes` field always
    /// reflects the full manifest.
    pub fn build(
        manifest_path: &Path,
        chosen_classes: Option<&HashSet<String>>,
        want_train: bool,
        train_split: f64,
    ) -> Result<Self> {
        if !(train_split > 0.0 && train_split < 1.0) {
            return Err(SpoofError::Config(format!(
                "train_split must be in (0, 1) exclusive, got {}",
                train_split
            )));
        }

        let rows = read_manifest(manifest_path)?;
        let groups = group_by_class(rows);

        let mut classes: Vec<String> = groups.keys().cloned().collect();
        classes.sort();
        debug!("Manifest contains {} classes", classes.len());

        let mut paths = Vec::new();
        let mut labels = Vec::new();

        for class in &classes {
            if let Some(chosen) = chosen_classes {
                if !chosen.contains(class) {
                    continue;
                }
            }

            let class_rows = &groups[class];
            let split = (class_rows.len() as f64 * train_split) as usize;
            let selected = if want_train {
                &class_rows[..split]
            } else {
                &class_rows[split..]
            };

            for row in selected {
                paths.push(row.path.clone());
                labels.push(row.spoof);
            }
        }

        debug!(
            "Indexed {} samples for the {} partition",
            paths.len(),
            if want_train { "train" } else { "test" }
        );

        Ok(Self {
            classes,
            paths,
            labels,
        })
    }

    /// Number of selected samples.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the index holds no samples.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of classes in the full manifest, regardless of filtering.
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }
}
