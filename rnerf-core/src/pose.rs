use nalgebra::Vector3;

use crate::{Pose, Real};

/// Rescale a nerf camera-to-world matrix into the ngp convention: the
/// translation becomes `t * scale + offset`, the rotation block is kept
/// as is.
pub fn nerf_matrix_to_ngp(matrix: &[[f32; 4]; 4], scale: Real, offset: &Vector3<Real>) -> Pose {
    let mut pose = Pose::from_fn(|r, c| matrix[r][c]);
    for i in 0..3 {
        pose[(i, 3)] = pose[(i, 3)] * scale + offset[i];
    }
    pose
}

/// Translation component of a camera-to-world matrix.
pub fn translation(pose: &Pose) -> Vector3<Real> {
    Vector3::new(pose[(0, 3)], pose[(1, 3)], pose[(2, 3)])
}

/// Mean Euclidean norm of the camera centers, the scene radius used to
/// bound the scene.
pub fn mean_radius(poses: &[Pose]) -> Real {
    if poses.is_empty() {
        return 0.0;
    }
    let total: Real = poses.iter().map(|p| translation(p).norm()).sum();
    total / poses.len() as Real
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn raw_pose(t: [f32; 3]) -> [[f32; 4]; 4] {
        [
            [1.0, 0.0, 0.0, t[0]],
            [0.0, 1.0, 0.0, t[1]],
            [0.0, 0.0, 1.0, t[2]],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }

    #[test]
    fn translation_is_scaled_then_shifted() {
        let offset = Vector3::new(1.0, -1.0, 0.5);
        let pose = nerf_matrix_to_ngp(&raw_pose([2.0, 4.0, -6.0]), 0.5, &offset);
        assert_relative_eq!(translation(&pose), Vector3::new(2.0, 1.0, -2.5));
    }

    #[test]
    fn rotation_block_is_untouched() {
        let mut raw = raw_pose([1.0, 2.0, 3.0]);
        raw[0][1] = 0.25;
        raw[2][0] = -0.75;
        let pose = nerf_matrix_to_ngp(&raw, 10.0, &Vector3::zeros());
        assert_eq!(pose[(0, 1)], 0.25);
        assert_eq!(pose[(2, 0)], -0.75);
        assert_eq!(pose[(3, 3)], 1.0);
    }

    #[test]
    fn scaling_is_linear_in_scale() {
        let raw = raw_pose([1.0, -2.0, 3.0]);
        let base = nerf_matrix_to_ngp(&raw, 1.0, &Vector3::zeros());
        let scaled = nerf_matrix_to_ngp(&raw, 3.0, &Vector3::zeros());
        assert_relative_eq!(translation(&scaled), translation(&base) * 3.0);
    }

    #[test]
    fn mean_radius_of_two_known_poses() {
        let a = nerf_matrix_to_ngp(&raw_pose([3.0, 4.0, 0.0]), 1.0, &Vector3::zeros());
        let b = nerf_matrix_to_ngp(&raw_pose([0.0, 0.0, 5.0]), 1.0, &Vector3::zeros());
        assert_relative_eq!(mean_radius(&[a, b]), 5.0);
    }

    #[test]
    fn mean_radius_of_nothing_is_zero() {
        assert_eq!(mean_radius(&[]), 0.0);
    }
}
