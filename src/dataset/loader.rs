//! CelebA-Spoof dataset accessor
//!
//! Wraps the manifest index to provide positional retrieval of decoded
//! (image, label) pairs. Images are loaded lazily, one file-system read and
//! decode per `get` call, with no caching between calls. Optional transform
//! hooks are applied to the image and label at access time.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dataset::download;
use crate::dataset::manifest::DatasetIndex;
use crate::utils::error::{Result, SpoofError};
use crate::{DEFAULT_TRAIN_SPLIT, MANIFEST_NAME};

/// Image hook applied to each decoded sample before it is returned.
pub type ImageTransform = Box<dyn Fn(DynamicImage) -> DynamicImage + Send + Sync>;

/// Label hook applied to each spoof label before it is returned.
pub type LabelTransform = Box<dyn Fn(u8) -> u8 + Send + Sync>;

/// The CelebA-Spoof dataset with lazy image loading.
///
/// Built through [`SpoofDataset::builder`]; immutable after construction, so
/// shared references may call [`get`](Self::get) concurrently.
pub struct SpoofDataset {
    root: PathBuf,
    train: bool,
    index: DatasetIndex,
    transform: Option<ImageTransform>,
    target_transform: Option<LabelTransform>,
}

/// Builder for [`SpoofDataset`], one method per construction option.
pub struct SpoofDatasetBuilder {
    root: PathBuf,
    train: bool,
    download: bool,
    transform: Option<ImageTransform>,
    target_transform: Option<LabelTransform>,
    verbose: bool,
    chosen_classes: Option<HashSet<String>>,
    train_split: f64,
}

impl SpoofDatasetBuilder {
    fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            train: true,
            download: false,
            transform: None,
            target_transform: None,
            verbose: false,
            chosen_classes: None,
            train_split: DEFAULT_TRAIN_SPLIT,
        }
    }

    /// Select the train partition (true, default) or the test partition.
    pub fn train(mut self, train: bool) -> Self {
        self.train = train;
        self
    }

    /// Fetch and extract the archive before indexing.
    pub fn download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    /// Image hook applied per `get`.
    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(DynamicImage) -> DynamicImage + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(f));
        self
    }

    /// Label hook applied per `get`.
    pub fn target_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(u8) -> u8 + Send + Sync + 'static,
    {
        self.target_transform = Some(Box::new(f));
        self
    }

    /// Enable informational logging (class count, download progress).
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Restrict indexing to a single class. A scalar is treated as a
    /// one-element set; combines with earlier `chosen_*` calls.
    pub fn chosen_class<S: Into<String>>(mut self, class: S) -> Self {
        self.chosen_classes
            .get_or_insert_with(HashSet::new)
            .insert(class.into());
        self
    }

    /// Restrict indexing to the given classes.
    pub fn chosen_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = self.chosen_classes.get_or_insert_with(HashSet::new);
        for class in classes {
            set.insert(class.into());
        }
        self
    }

    /// Fraction of each class's rows allocated to the train partition,
    /// in (0, 1) exclusive. Defaults to 0.8.
    pub fn train_split(mut self, ratio: f64) -> Self {
        self.train_split = ratio;
        self
    }

    /// Run the optional download step and build the index.
    pub fn build(self) -> Result<SpoofDataset> {
        if self.download {
            download::download_and_extract(&self.root, self.verbose)?;
        }

        let manifest_path = self.root.join(MANIFEST_NAME);
        let index = DatasetIndex::build(
            &manifest_path,
            self.chosen_classes.as_ref(),
            self.train,
            self.train_split,
        )?;

        if self.verbose {
            info!("Number of classes: {}", index.num_classes());
        }
        debug!(
            "Loaded {} {} samples from {:?}",
            index.len(),
            if self.train { "train" } else { "test" },
            self.root
        );

        Ok(SpoofDataset {
            root: self.root,
            train: self.train,
            index,
            transform: self.transform,
            target_transform: self.target_transform,
        })
    }
}

impl SpoofDataset {
    /// Start building a dataset rooted at the given directory.
    pub fn builder<P: AsRef<Path>>(root: P) -> SpoofDatasetBuilder {
        SpoofDatasetBuilder::new(root)
    }

    /// Number of samples in the selected partition.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the selected partition holds no samples.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether this dataset serves the train partition.
    pub fn is_train(&self) -> bool {
        self.train
    }

    /// Number of classes in the full manifest, regardless of filtering.
    pub fn num_classes(&self) -> usize {
        self.index.num_classes()
    }

    /// All class labels in the manifest, sorted lexicographically.
    pub fn classes(&self) -> &[String] {
        &self.index.classes
    }

    /// Image path of the i-th sample, relative to the dataset root.
    pub fn path_of(&self, index: usize) -> Result<&str> {
        self.check_bounds(index)?;
        Ok(&self.index.paths[index])
    }

    /// Untransformed spoof label of the i-th sample.
    pub fn label_of(&self, index: usize) -> Result<u8> {
        self.check_bounds(index)?;
        Ok(self.index.labels[index])
    }

    /// Retrieve the sample at `index` as a decoded (image, label) pair.
    ///
    /// Performs one file-system read and decode per call; configured
    /// transform hooks replace the image and label values before return.
    /// Decode failures (missing or corrupt file) surface as
    /// [`SpoofError::Decode`] and do not invalidate the rest of the index.
    pub fn get(&self, index: usize) -> Result<(DynamicImage, u8)> {
        self.check_bounds(index)?;

        let path = self.root.join(&self.index.paths[index]);
        let image = ImageReader::open(&path)
            .map_err(|e| SpoofError::Decode(path.clone(), e.to_string()))?
            .decode()
            .map_err(|e| SpoofError::Decode(path.clone(), e.to_string()))?;

        let image = match &self.transform {
            Some(f) => f(image),
            None => image,
        };
        let label = self.index.labels[index];
        let label = match &self.target_transform {
            Some(f) => f(label),
            None => label,
        };

        Ok((image, label))
    }

    /// Summary statistics for the selected partition.
    pub fn stats(&self) -> DatasetStats {
        let spoof_samples = self.index.labels.iter().filter(|&&l| l == 1).count();
        DatasetStats {
            total_samples: self.len(),
            num_classes: self.num_classes(),
            spoof_samples,
            genuine_samples: self.len() - spoof_samples,
        }
    }

    fn check_bounds(&self, index: usize) -> Result<()> {
        if index >= self.len() {
            return Err(SpoofError::OutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }
}

/// Statistics about a dataset partition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_samples: usize,
    pub num_classes: usize,
    pub spoof_samples: usize,
    pub genuine_samples: usize,
}

impl DatasetStats {
    /// Save statistics to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load statistics from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let stats = serde_json::from_str(&json)?;
        Ok(stats)
    }
}

impl std::fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Dataset Statistics:")?;
        writeln!(f, "  Total samples: {}", self.total_samples)?;
        writeln!(f, "  Number of classes: {}", self.num_classes)?;
        writeln!(f, "  Spoof samples: {}", self.spoof_samples)?;
        writeln!(f, "  Genuine samples: {}", self.genuine_samples)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};
    use std::fs;

    /// Set up a dataset root with a manifest and one tiny PNG per row.
    /// Rows: (class, spoof) pairs; one row per entry, in order.
    fn setup_root(dir: &Path, rows: &[(&str, u8)]) {
        fs::create_dir_all(dir.join("images")).expect("create images dir");
        let mut lines = Vec::new();
        for (i, (class, spoof)) in rows.iter().enumerate() {
            let rel = format!("images/{}_{:03}.png", class, i);
            let img = RgbImage::from_pixel(4, 4, Rgb([i as u8, *spoof * 255, 0]));
            img.save(dir.join(&rel)).expect("save image");
            lines.push(format!("{},True,{},{},{}", i, spoof, class, rel));
        }
        fs::write(dir.join("info.csv"), lines.join("\n")).expect("write manifest");
    }

    #[test]
    fn get_returns_decoded_image_and_label() {
        let temp = tempfile::tempdir().expect("tempdir");
        setup_root(temp.path(), &[("subject", 1)]);

        // A 1-row class lands entirely in the test partition.
        let dataset = SpoofDataset::builder(temp.path())
            .train(false)
            .build()
            .unwrap();

        assert_eq!(dataset.len(), 1);
        let (image, label) = dataset.get(0).unwrap();
        assert_eq!(image.dimensions(), (4, 4));
        assert_eq!(label, 1);
    }

    #[test]
    fn transform_replaces_the_image() {
        let temp = tempfile::tempdir().expect("tempdir");
        setup_root(temp.path(), &[("subject", 0)]);

        let dataset = SpoofDataset::builder(temp.path())
            .train(false)
            .transform(|img| img.resize_exact(2, 2, image::imageops::FilterType::Nearest))
            .build()
            .unwrap();

        let (image, _) = dataset.get(0).unwrap();
        assert_eq!(image.dimensions(), (2, 2));
    }

    #[test]
    fn target_transform_replaces_the_label() {
        let temp = tempfile::tempdir().expect("tempdir");
        setup_root(temp.path(), &[("subject", 0)]);

        let dataset = SpoofDataset::builder(temp.path())
            .train(false)
            .target_transform(|label| 1 - label)
            .build()
            .unwrap();

        let (_, label) = dataset.get(0).unwrap();
        assert_eq!(label, 1);
        // The raw label is untouched.
        assert_eq!(dataset.label_of(0).unwrap(), 0);
    }

    #[test]
    fn out_of_range_index_fails() {
        let temp = tempfile::tempdir().expect("tempdir");
        setup_root(temp.path(), &[("subject", 0)]);

        let dataset = SpoofDataset::builder(temp.path())
            .train(false)
            .build()
            .unwrap();

        let err = dataset.get(dataset.len()).unwrap_err();
        assert!(matches!(
            err,
            SpoofError::OutOfRange { index: 1, len: 1 }
        ));
    }

    #[test]
    fn missing_image_file_is_a_decode_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        setup_root(temp.path(), &[("subject", 0)]);
        fs::remove_file(temp.path().join("images/subject_000.png")).unwrap();

        let dataset = SpoofDataset::builder(temp.path())
            .train(false)
            .build()
            .unwrap();

        let err = dataset.get(0).unwrap_err();
        assert!(matches!(err, SpoofError::Decode(_, _)));
        // The index itself stays usable.
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn partition_selection_follows_the_split() {
        let temp = tempfile::tempdir().expect("tempdir");
        let rows: Vec<(&str, u8)> = (0..10)
            .map(|i| ("subject", (i % 2) as u8))
            .collect();
        setup_root(temp.path(), &rows);

        let train = SpoofDataset::builder(temp.path()).build().unwrap();
        let test = SpoofDataset::builder(temp.path()).train(false).build().unwrap();

        assert!(train.is_train());
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);
    }

    #[test]
    fn chosen_class_scalar_restricts_indexing() {
        let temp = tempfile::tempdir().expect("tempdir");
        setup_root(temp.path(), &[("a", 0), ("b", 1), ("b", 0)]);

        let dataset = SpoofDataset::builder(temp.path())
            .train(false)
            .chosen_class("b")
            .build()
            .unwrap();

        assert_eq!(dataset.len(), 1);
        assert!(dataset.path_of(0).unwrap().contains("b_"));
        // num_classes reflects the full manifest, not the filter.
        assert_eq!(dataset.num_classes(), 2);
        assert_eq!(dataset.classes(), ["a", "b"]);
    }

    #[test]
    fn stats_report_label_breakdown() {
        let temp = tempfile::tempdir().expect("tempdir");
        setup_root(temp.path(), &[("a", 0), ("b", 1), ("c", 1)]);

        let dataset = SpoofDataset::builder(temp.path())
            .train(false)
            .build()
            .unwrap();

        let stats = dataset.stats();
        assert_eq!(stats.total_samples, 3);
        assert_eq!(stats.num_classes, 3);
        assert_eq!(stats.spoof_samples, 2);
        assert_eq!(stats.genuine_samples, 1);

        let rendered = stats.to_string();
        assert!(rendered.contains("Total samples: 3"));

        let path = temp.path().join("stats.json");
        stats.save(&path).unwrap();
        let loaded = DatasetStats::load(&path).unwrap();
        assert_eq!(loaded.spoof_samples, 2);
    }

    #[test]
    fn dataset_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SpoofDataset>();
    }
}
