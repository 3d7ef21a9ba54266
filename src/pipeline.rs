use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};

use crate::image_io;
use crate::noise::{NoiseModel, presets};
use crate::{DatasetError, DatasetResult};

pub const DEFAULT_INPUT_ROOT: &str = "../images/original";
pub const DEFAULT_OUTPUT_ROOT: &str = "../images/noisy_images";

/// All dataset generation parameters.
#[derive(Debug, Clone)]
pub struct DatasetParams {
    /// Holds one sub-folder per image category.
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    /// Applied in order to every image of every folder.
    pub models: Vec<NoiseModel>,
    /// Seeds the noise generator; `None` uses the thread-local generator.
    pub seed: Option<u64>,
}

impl Default for DatasetParams {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from(DEFAULT_INPUT_ROOT),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            models: presets::default_models(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetReport {
    pub folders: usize,
    pub images_read: usize,
    pub images_written: usize,
}

/// `<output_root>/<folder>/<canonical name>`
pub fn output_dir(output_root: &Path, folder: impl AsRef<Path>, model: &NoiseModel) -> PathBuf {
    output_root.join(folder).join(model.canonical_name())
}

/// Run [`generate`] with the generator `params.seed` asks for.
pub fn run(params: &DatasetParams) -> DatasetResult<DatasetReport> {
    match params.seed {
        Some(seed) => {
            log::info!("Seeding noise generator with {seed}");
            generate(params, &mut StdRng::seed_from_u64(seed))
        }
        None => generate(params, &mut rand::rng()),
    }
}

/// Write a noisy copy of every image under `input_root/<folder>/` to
/// `output_root/<folder>/<canonical name>/`, once per model.
///
/// Folders and images are visited in name order, so a fixed seed gives the
/// same output. The first failure aborts the run.
pub fn generate<R: Rng + ?Sized>(
    params: &DatasetParams,
    rng: &mut R,
) -> DatasetResult<DatasetReport> {
    if !params.input_root.is_dir() {
        return Err(DatasetError::MissingInput(params.input_root.clone()));
    }
    fs::create_dir_all(&params.output_root)?;

    let mut report = DatasetReport::default();
    for folder in list_dirs(&params.input_root)? {
        let Some(folder_name) = folder.file_name() else {
            continue;
        };
        let images = list_files(&folder)?;
        log::info!(
            "Processing folder: {} with {} images",
            folder_name.to_string_lossy(),
            images.len()
        );
        if images.is_empty() {
            log::warn!("No images in {}", folder.display());
        }
        report.folders += 1;

        for model in &params.models {
            let dir = output_dir(&params.output_root, folder_name, model);
            fs::create_dir_all(&dir)?;
            log::info!("  {} -> {}", model.canonical_name(), dir.display());

            for path in &images {
                let Some(image_name) = path.file_name() else {
                    continue;
                };
                let image = image_io::load_image(path)?;
                report.images_read += 1;
                log::debug!("Image {}: {:?}", image_name.to_string_lossy(), image.dim());

                let noisy = model.apply(&image, rng)?;
                image_io::save_image(&noisy, &dir.join(image_name))?;
                report.images_written += 1;
            }
        }
    }
    Ok(report)
}

fn list_dirs(root: &Path) -> DatasetResult<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        } else {
            log::warn!("Skipping non-directory entry {}", path.display());
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn list_files(dir: &Path) -> DatasetResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
