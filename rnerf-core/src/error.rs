use std::path::PathBuf;

/// Errors raised while loading a NeRF dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The root directory holds neither `transforms.json` nor
    /// `transforms_train.json`.
    #[error("cannot find transforms.json or transforms_train.json under {0}")]
    NoManifest(PathBuf),

    /// A manifest file expected for the requested split does not exist.
    #[error("manifest does not exist: {0}")]
    ManifestNotFound(PathBuf),

    /// The manifest file exists but could not be read.
    #[error("failed to read manifest {path}")]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid JSON or is missing required fields.
    #[error("malformed manifest {path}")]
    ManifestMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An image referenced by a frame exists but could not be decoded.
    #[error("failed to decode image {path}: {reason}")]
    ImageDecode { path: PathBuf, reason: String },

    /// No frame survived loading, there is nothing to stack.
    #[error("no usable frames in dataset")]
    EmptyDataset,

    /// Surviving images do not share a single H x W x C shape.
    #[error("inconsistent image shapes: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// The colmap test split needs at least two frames to sample from.
    #[error("cannot sample a test pair from {0} frame(s)")]
    NotEnoughFrames(usize),
}

impl DatasetError {
    /// True for unrecoverable setup problems (missing or unrecognized
    /// manifest files), false for unusable-content problems.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DatasetError::NoManifest(_) | DatasetError::ManifestNotFound(_)
        )
    }
}
