use std::fs;
use std::path::{Path, PathBuf};

use image::{imageops::FilterType, DynamicImage};
use log::{info, warn};
use nalgebra::Vector3;
use rnerf_core::{
    nerf_matrix_to_ngp, DatasetError, FrameImage, ManifestFrame, NerfDataset, Real, Split,
    TransformsManifest,
};

/// Which manifest layout the dataset root follows.
///
/// Colmap-style roots carry one `transforms.json` covering every frame;
/// Blender-style roots carry one `transforms_{split}.json` per split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetMode {
    Colmap,
    Blender,
}

/// Options for loading a NeRF dataset.
///
/// `scale` and `offset` are applied to every camera translation, see
/// [`nerf_matrix_to_ngp`].
#[derive(Debug, Clone)]
pub struct NerfReaderCfg {
    pub scale: Real,
    pub offset: Vector3<Real>,
}

impl Default for NerfReaderCfg {
    fn default() -> Self {
        Self {
            scale: 0.33,
            offset: Vector3::zeros(),
        }
    }
}

impl NerfReaderCfg {
    /// Detect the dataset layout under `dataset_path` and build the reader.
    ///
    /// Fails with [`DatasetError::NoManifest`] when the root holds neither
    /// `transforms.json` nor `transforms_train.json`.
    pub fn finalize(self, dataset_path: impl Into<PathBuf>) -> Result<NerfReader, DatasetError> {
        let dataset_path = dataset_path.into();

        let mode = if dataset_path.join("transforms.json").exists() {
            DatasetMode::Colmap
        } else if dataset_path.join("transforms_train.json").exists() {
            DatasetMode::Blender
        } else {
            return Err(DatasetError::NoManifest(dataset_path));
        };

        Ok(NerfReader {
            dataset_path,
            mode,
            scale: self.scale,
            offset: self.offset,
        })
    }
}

/// Loads nerf-compatible pose/image datasets from a root directory.
#[derive(Debug)]
pub struct NerfReader {
    dataset_path: PathBuf,
    mode: DatasetMode,
    scale: Real,
    offset: Vector3<Real>,
}

impl NerfReader {
    pub fn mode(&self) -> DatasetMode {
        self.mode
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    /// Load one split of the dataset.
    ///
    /// Frames whose image file is missing on disk are skipped with a
    /// warning; the load fails only when nothing survives.
    pub fn load(&self, split: Split) -> Result<NerfDataset, DatasetError> {
        let manifest = self.assemble_manifest(split)?;
        let mut target_size = manifest.image_size();
        let mut frames = manifest.frames;

        if self.mode == DatasetMode::Colmap {
            frames = self.apply_colmap_split(frames, split)?;
        }

        info!("loading {split} split: {} frame(s)", frames.len());

        let mut poses = Vec::with_capacity(frames.len());
        let mut images = Vec::with_capacity(frames.len());
        for frame in &frames {
            let path = self.resolve_image_path(&frame.file_path);
            if !path.exists() {
                warn!("{} does not exist, skipping frame", path.display());
                continue;
            }

            let image = read_frame_image(&path, target_size)?;
            if target_size.is_none() {
                // first decoded image fixes the target size for the rest
                target_size = Some((image.height, image.width));
            }

            poses.push(nerf_matrix_to_ngp(
                &frame.transform_matrix,
                self.scale,
                &self.offset,
            ));
            images.push(image);
        }

        if poses.len() < frames.len() {
            warn!("dropped {} frame(s) with missing images", frames.len() - poses.len());
        }

        NerfDataset::stack(poses, images)
    }

    fn assemble_manifest(&self, split: Split) -> Result<TransformsManifest, DatasetError> {
        match self.mode {
            DatasetMode::Colmap => self.read_manifest(self.dataset_path.join("transforms.json")),
            DatasetMode::Blender => match split {
                Split::All => self.read_merged_manifests(),
                Split::TrainVal => {
                    let mut manifest =
                        self.read_manifest(self.dataset_path.join("transforms_train.json"))?;
                    let val = self.read_manifest(self.dataset_path.join("transforms_val.json"))?;
                    manifest.frames.extend(val.frames);
                    Ok(manifest)
                }
                other => {
                    self.read_manifest(self.dataset_path.join(format!("transforms_{other}.json")))
                }
            },
        }
    }

    /// Concatenate every `*.json` manifest under the root, in lexicographic
    /// path order so frame ordering is reproducible across platforms.
    fn read_merged_manifests(&self) -> Result<TransformsManifest, DatasetError> {
        let entries = fs::read_dir(&self.dataset_path).map_err(|source| {
            DatasetError::ManifestUnreadable {
                path: self.dataset_path.clone(),
                source,
            }
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut merged: Option<TransformsManifest> = None;
        for path in paths {
            let manifest = self.read_manifest(path)?;
            match &mut merged {
                None => merged = Some(manifest),
                Some(base) => base.frames.extend(manifest.frames),
            }
        }

        // schema detection saw transforms_train.json, so this cannot trip
        merged.ok_or_else(|| DatasetError::NoManifest(self.dataset_path.clone()))
    }

    fn read_manifest(&self, path: PathBuf) -> Result<TransformsManifest, DatasetError> {
        let text = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                DatasetError::ManifestNotFound(path.clone())
            } else {
                DatasetError::ManifestUnreadable {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        TransformsManifest::from_json(path, &text)
    }

    /// Colmap manifests carry no split files, so the split is carved out of
    /// the single frame list: `val` is the first frame, `train` the rest.
    fn apply_colmap_split(
        &self,
        mut frames: Vec<ManifestFrame>,
        split: Split,
    ) -> Result<Vec<ManifestFrame>, DatasetError> {
        match split {
            Split::Test => sample_test_pair(frames),
            Split::Train => {
                if !frames.is_empty() {
                    frames.remove(0);
                }
                Ok(frames)
            }
            Split::Val => {
                frames.truncate(1);
                Ok(frames)
            }
            Split::TrainVal | Split::All => Ok(frames),
        }
    }

    fn resolve_image_path(&self, file_path: &str) -> PathBuf {
        let mut path = self.dataset_path.join(file_path);
        if self.mode == DatasetMode::Blender && path.extension().is_none() {
            path.set_extension("png");
        }
        path
    }
}

/// Pose interpolation for the colmap test split was never finished
/// upstream; the documented behavior stops at picking two distinct frames
/// at random, which are then loaded like any other frames.
fn sample_test_pair(frames: Vec<ManifestFrame>) -> Result<Vec<ManifestFrame>, DatasetError> {
    if frames.len() < 2 {
        return Err(DatasetError::NotEnoughFrames(frames.len()));
    }
    warn!("colmap test split: pose interpolation is not implemented, loading a random frame pair");

    let mut rng = rand::thread_rng();
    let mut indices = rand::seq::index::sample(&mut rng, frames.len(), 2).into_vec();
    indices.sort_unstable();

    Ok(indices.into_iter().map(|i| frames[i].clone()).collect())
}

/// Decode an image keeping its channel depth (RGB or RGBA) and resize it to
/// the target height/width when they differ from the native size.
fn read_frame_image(path: &Path, target_size: Option<(u32, u32)>) -> Result<FrameImage, DatasetError> {
    let decoded = image::open(path).map_err(|e| DatasetError::ImageDecode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    // canonical channel order, alpha kept as a mask channel when present
    let mut decoded = match decoded {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => decoded,
        other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };

    if let Some((h, w)) = target_size {
        if decoded.height() != h || decoded.width() != w {
            decoded = decoded.resize_exact(w, h, FilterType::Triangle);
        }
    }

    let (height, width) = (decoded.height(), decoded.width());
    match decoded {
        DynamicImage::ImageRgb8(buf) => Ok(FrameImage {
            height,
            width,
            channels: 3,
            pixels: buf.into_raw(),
        }),
        DynamicImage::ImageRgba8(buf) => Ok(FrameImage {
            height,
            width,
            channels: 4,
            pixels: buf.into_raw(),
        }),
        _ => unreachable!("image was canonicalized to rgb8/rgba8"),
    }
}
