use serde::Deserialize;

use crate::DatasetError;

/// One entry of a `transforms*.json` manifest: an image reference and its
/// camera-to-world transform.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestFrame {
    /// Path to the image file, relative to the dataset root. Blender-style
    /// datasets omit the file extension.
    pub file_path: String,

    /// 4x4 homogeneous camera-to-world matrix, row major.
    pub transform_matrix: [[f32; 4]; 4],
}

/// A parsed `transforms*.json` manifest.
///
/// Unknown keys (intrinsics, distortion, ...) are ignored; only the image
/// size hints and the frame list matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct TransformsManifest {
    /// Image height, shared by every frame when present.
    #[serde(default)]
    pub h: Option<u32>,

    /// Image width, shared by every frame when present.
    #[serde(default)]
    pub w: Option<u32>,

    /// Per-frame poses and image references, in manifest order.
    pub frames: Vec<ManifestFrame>,
}

impl TransformsManifest {
    /// Parse a manifest from raw JSON text.
    ///
    /// Fails with [`DatasetError::ManifestMalformed`] when the text is not
    /// valid JSON or lacks the required `frames` array.
    pub fn from_json(path: impl Into<std::path::PathBuf>, text: &str) -> Result<Self, DatasetError> {
        serde_json::from_str(text).map_err(|source| DatasetError::ManifestMalformed {
            path: path.into(),
            source,
        })
    }

    /// Fixed target image size, available only when the manifest declares
    /// both dimensions.
    pub fn image_size(&self) -> Option<(u32, u32)> {
        match (self.h, self.w) {
            (Some(h), Some(w)) => Some((h, w)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: &str = "[[1,0,0,0],[0,1,0,0],[0,0,1,0],[0,0,0,1]]";

    #[test]
    fn parses_minimal_manifest() {
        let text = format!(
            r#"{{"frames": [{{"file_path": "images/r_0", "transform_matrix": {IDENTITY}}}]}}"#
        );
        let manifest = TransformsManifest::from_json("transforms.json", &text).unwrap();
        assert_eq!(manifest.frames.len(), 1);
        assert_eq!(manifest.frames[0].file_path, "images/r_0");
        assert_eq!(manifest.image_size(), None);
    }

    #[test]
    fn parses_size_and_ignores_unknown_keys() {
        let text = format!(
            r#"{{"h": 800, "w": 600, "fl_x": 1111.0, "camera_angle_x": 0.69,
                "frames": [{{"file_path": "a.png", "transform_matrix": {IDENTITY}}}]}}"#
        );
        let manifest = TransformsManifest::from_json("transforms.json", &text).unwrap();
        assert_eq!(manifest.image_size(), Some((800, 600)));
    }

    #[test]
    fn missing_frames_is_malformed() {
        let err = TransformsManifest::from_json("transforms.json", r#"{"h": 800}"#).unwrap_err();
        assert!(matches!(err, DatasetError::ManifestMalformed { .. }));
        assert!(!err.is_configuration());
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = TransformsManifest::from_json("transforms.json", "{not json").unwrap_err();
        assert!(matches!(err, DatasetError::ManifestMalformed { .. }));
    }
}
