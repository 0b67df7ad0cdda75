//! Dataset module for CelebA-Spoof data handling
//!
//! This module provides functionality for:
//! - Parsing the `info.csv` manifest into a per-class index
//! - Deterministic train/test partitioning by a fixed per-class ratio
//! - Lazy, positional retrieval of decoded (image, label) samples
//! - One-time archive download and extraction into the dataset root
//!
//! ## Split Strategy
//!
//! Each identity class's manifest rows are partitioned at
//! `floor(count * train_split)`: the prefix forms the train partition, the
//! suffix the test partition. Classes are walked in sorted order, so the
//! flattened index is fully deterministic for a given manifest.

pub mod download;
pub mod loader;
pub mod manifest;

// Re-export main types for convenience
pub use download::{download_and_extract, ARCHIVE_NAME, ARCHIVE_URL, DATA_DIR};
pub use loader::{DatasetStats, ImageTransform, LabelTransform, SpoofDataset, SpoofDatasetBuilder};
pub use manifest::{read_manifest, DatasetIndex, ManifestRow, MANIFEST_FIELDS};
