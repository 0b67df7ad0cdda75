//! # CelebA-Spoof Dataset
//!
//! A Rust library for indexing and lazily loading the resized CelebA-Spoof
//! face anti-spoofing dataset: labeled face images split per identity class
//! into train/test partitions, with on-demand image decoding and optional
//! transform hooks.
//!
//! ## Features
//!
//! - **Deterministic indexing**: the `info.csv` manifest is grouped by
//!   identity class and partitioned at a fixed per-class ratio, so sample
//!   order is reproducible across runs.
//! - **Lazy loading**: images are decoded one at a time on access, nothing
//!   is cached.
//! - **Transform hooks**: opaque image/label functions applied per access.
//! - **One-time setup**: optional archive download and extraction, skipped
//!   once materialized.
//!
//! ## Modules
//!
//! - `dataset`: manifest indexing, the dataset accessor, archive download
//! - `utils`: error types and logging helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use celeba_spoof::SpoofDataset;
//!
//! let dataset = SpoofDataset::builder("data/celeba-spoof")
//!     .train(true)
//!     .download(true)
//!     .build()?;
//!
//! let (image, label) = dataset.get(0)?;
//! println!("{} samples, {} classes", dataset.len(), dataset.num_classes());
//! ```

pub mod dataset;
pub mod utils;

// Re-export commonly used items for convenience
pub use dataset::download::{download_and_extract, ARCHIVE_NAME, ARCHIVE_URL, DATA_DIR};
pub use dataset::loader::{
    DatasetStats, ImageTransform, LabelTransform, SpoofDataset, SpoofDatasetBuilder,
};
pub use dataset::manifest::{read_manifest, DatasetIndex, ManifestRow, MANIFEST_FIELDS};
pub use utils::error::{Result, SpoofError};

/// Name of the manifest file under the dataset root.
pub const MANIFEST_NAME: &str = "info.csv";

/// Default fraction of each class's rows allocated to the train partition.
pub const DEFAULT_TRAIN_SPLIT: f64 = 0.8;

/// Version of the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
