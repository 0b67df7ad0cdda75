//! Archive download and extraction
//!
//! Materializes the resized CelebA-Spoof archive under the dataset root:
//! fetch the zip from its hosted location, then unpack it next to the
//! manifest. Both steps are idempotent and skipped once their target
//! exists, so repeated construction with `download` enabled is a no-op
//! after the first run.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::ZipArchive;

use crate::utils::error::{Result, SpoofError};

/// Direct-download form of the archive's hosted location.
pub const ARCHIVE_URL: &str =
    "https://drive.google.com/uc?export=download&id=1VVIt4wuF1CW381GhzFZ9lvODECqI9EXl";

/// File name the archive is stored under inside the dataset root.
pub const ARCHIVE_NAME: &str = "celeba-spoof-resized.zip";

/// Directory the archive unpacks to, relative to the dataset root.
pub const DATA_DIR: &str = "celeba-spoof-resized";

/// Ensure the archive is downloaded and extracted under `root`.
///
/// Creates `root` if missing, fetches the zip only when
/// `root/celeba-spoof-resized.zip` is absent, and extracts only when
/// `root/celeba-spoof-resized` is absent. Returns the data directory path.
pub fn download_and_extract(root: &Path, verbose: bool) -> Result<PathBuf> {
    if !root.exists() {
        fs::create_dir_all(root)?;
    }

    let archive_path = root.join(ARCHIVE_NAME);
    if archive_path.exists() {
        debug!("Archive already present at {:?}", archive_path);
    } else {
        fetch_archive(&archive_path, verbose)?;
    }

    let data_path = root.join(DATA_DIR);
    if data_path.exists() {
        debug!("Data directory already present at {:?}", data_path);
    } else {
        extract_archive(&archive_path, root, verbose)?;
    }

    Ok(data_path)
}

/// Stream the archive from its hosted location into `target`.
fn fetch_archive(target: &Path, verbose: bool) -> Result<()> {
    if verbose {
        info!("Downloading {} to {:?}", ARCHIVE_URL, target);
    }

    let mut response = reqwest::blocking::get(ARCHIVE_URL)?;
    if !response.status().is_success() {
        return Err(SpoofError::Download(format!(
            "unexpected status {} from {}",
            response.status(),
            ARCHIVE_URL
        )));
    }

    let mut file = File::create(target)?;
    let bytes = std::io::copy(&mut response, &mut file)?;

    if verbose {
        info!("Downloaded {} bytes", bytes);
    }
    Ok(())
}

/// Unpack the zip archive into `root`.
fn extract_archive(archive_path: &Path, root: &Path, verbose: bool) -> Result<()> {
    if !archive_path.exists() {
        return Err(SpoofError::NotFound(archive_path.to_path_buf()));
    }
    if verbose {
        info!("Extracting {:?} to {:?}", archive_path, root);
    }

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| SpoofError::Archive(format!("invalid zip archive: {}", e)))?;
    let entries = archive.len();
    archive
        .extract(root)
        .map_err(|e| SpoofError::Archive(e.to_string()))?;

    if verbose {
        info!("Extracted {} entries", entries);
    }
    Ok(())
}
