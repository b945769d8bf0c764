use ndarray::Array4;

use crate::{mean_radius, DatasetError, Pose, Real};

/// A single decoded image in canonical channel order (RGB or RGBA),
/// tightly packed H x W x C bytes.
#[derive(Debug, Clone)]
pub struct FrameImage {
    pub height: u32,
    pub width: u32,
    pub channels: usize,
    pub pixels: Vec<u8>,
}

impl FrameImage {
    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, self.channels)
    }
}

/// The loaded dataset: N normalized poses, the matching N images stacked
/// into one N x H x W x C byte array, and the mean camera radius.
///
/// Poses and images are aligned by frame index. Immutable once built.
#[derive(Debug)]
pub struct NerfDataset {
    poses: Vec<Pose>,
    images: Array4<u8>,
    radius: Real,
}

impl NerfDataset {
    /// Stack per-frame poses and images into the batched dataset.
    ///
    /// Fails with [`DatasetError::EmptyDataset`] when no frame survived
    /// loading, and with [`DatasetError::ShapeMismatch`] when poses and
    /// images do not pair up one to one or the images do not share a
    /// single H x W x C shape.
    pub fn stack(poses: Vec<Pose>, images: Vec<FrameImage>) -> Result<Self, DatasetError> {
        if poses.len() != images.len() {
            return Err(DatasetError::ShapeMismatch {
                expected: format!("{} image(s), one per pose", poses.len()),
                got: format!("{} image(s)", images.len()),
            });
        }
        let first = images.first().ok_or(DatasetError::EmptyDataset)?;

        let (h, w, c) = first.shape();
        let mut pixels = Vec::with_capacity(images.len() * h * w * c);
        for image in &images {
            if image.shape() != (h, w, c) || image.pixels.len() != h * w * c {
                return Err(DatasetError::ShapeMismatch {
                    expected: format!("{h}x{w}x{c}"),
                    got: format!(
                        "{}x{}x{} ({} bytes)",
                        image.height,
                        image.width,
                        image.channels,
                        image.pixels.len()
                    ),
                });
            }
            pixels.extend_from_slice(&image.pixels);
        }

        let images = Array4::from_shape_vec((poses.len(), h, w, c), pixels)
            .expect("shape checked above");
        let radius = mean_radius(&poses);

        Ok(NerfDataset {
            poses,
            images,
            radius,
        })
    }

    /// Number of frames that survived loading.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Normalized camera-to-world poses, one per frame.
    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    /// The N x H x W x C image batch.
    pub fn images(&self) -> &Array4<u8> {
        &self.images
    }

    /// Mean Euclidean norm of the camera centers.
    pub fn radius(&self) -> Real {
        self.radius
    }

    pub fn height(&self) -> usize {
        self.images.dim().1
    }

    pub fn width(&self) -> usize {
        self.images.dim().2
    }

    pub fn channels(&self) -> usize {
        self.images.dim().3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nerf_matrix_to_ngp;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn pose_at(t: [f32; 3]) -> Pose {
        let raw = [
            [1.0, 0.0, 0.0, t[0]],
            [0.0, 1.0, 0.0, t[1]],
            [0.0, 0.0, 1.0, t[2]],
            [0.0, 0.0, 0.0, 1.0],
        ];
        nerf_matrix_to_ngp(&raw, 1.0, &Vector3::zeros())
    }

    fn flat_image(h: u32, w: u32, c: usize, value: u8) -> FrameImage {
        FrameImage {
            height: h,
            width: w,
            channels: c,
            pixels: vec![value; h as usize * w as usize * c],
        }
    }

    #[test]
    fn stacks_aligned_poses_and_images() {
        let poses = vec![pose_at([3.0, 4.0, 0.0]), pose_at([0.0, 0.0, 5.0])];
        let images = vec![flat_image(2, 3, 3, 10), flat_image(2, 3, 3, 20)];
        let dataset = NerfDataset::stack(poses, images).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.images().dim(), (2, 2, 3, 3));
        assert_eq!(dataset.images()[[0, 0, 0, 0]], 10);
        assert_eq!(dataset.images()[[1, 1, 2, 2]], 20);
        assert_relative_eq!(dataset.radius(), 5.0);
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let err = NerfDataset::stack(vec![], vec![]).unwrap_err();
        assert!(matches!(err, DatasetError::EmptyDataset));
        assert!(!err.is_configuration());
    }

    #[test]
    fn misaligned_pose_and_image_counts_are_an_error() {
        let poses = vec![pose_at([0.0; 3])];
        let err = NerfDataset::stack(poses, vec![]).unwrap_err();
        assert!(matches!(err, DatasetError::ShapeMismatch { .. }));
    }

    #[test]
    fn mixed_channel_counts_are_an_error() {
        let poses = vec![pose_at([0.0; 3]), pose_at([1.0, 0.0, 0.0])];
        let images = vec![flat_image(2, 2, 3, 0), flat_image(2, 2, 4, 0)];
        let err = NerfDataset::stack(poses, images).unwrap_err();
        assert!(matches!(err, DatasetError::ShapeMismatch { .. }));
    }

    #[test]
    fn mixed_sizes_are_an_error() {
        let poses = vec![pose_at([0.0; 3]), pose_at([0.0; 3])];
        let images = vec![flat_image(2, 2, 3, 0), flat_image(4, 2, 3, 0)];
        assert!(NerfDataset::stack(poses, images).is_err());
    }
}
