use nalgebra::Vector3;
use rnerf_core::{translation, Pose};

use crate::VizError;

/// How the pose scene is drawn.
///
/// `frustum_size` is the visual half-extent of each camera frustum;
/// `bound` is the half-extent of the wireframe scene box.
#[derive(Debug, Clone)]
pub struct PoseSceneCfg {
    pub frustum_size: f32,
    pub bound: f32,
}

impl Default for PoseSceneCfg {
    fn default() -> Self {
        Self {
            frustum_size: 0.1,
            bound: 1.0,
        }
    }
}

type Segment = [[f32; 3]; 2];

/// The 9 line segments visualizing one camera: origin to the 4 frustum
/// corners, the 4 rim edges, and a forward-direction ray.
pub fn frustum_segments(pose: &Pose, size: f32) -> Vec<Segment> {
    let pos = translation(pose);
    let x = Vector3::new(pose[(0, 0)], pose[(1, 0)], pose[(2, 0)]);
    let y = Vector3::new(pose[(0, 1)], pose[(1, 1)], pose[(2, 1)]);
    let z = Vector3::new(pose[(0, 2)], pose[(1, 2)], pose[(2, 2)]);

    let a = pos + size * x + size * y - size * z;
    let b = pos - size * x + size * y - size * z;
    let c = pos - size * x - size * y - size * z;
    let d = pos + size * x - size * y - size * z;

    let dir = (a + b + c + d) / 4.0 - pos;
    let dir = dir / (dir.norm() + 1e-8);
    let o = pos + dir * 3.0;

    [
        [pos, a],
        [pos, b],
        [pos, c],
        [pos, d],
        [a, b],
        [b, c],
        [c, d],
        [d, a],
        [pos, o],
    ]
    .into_iter()
    .map(|[p, q]| [p.into(), q.into()])
    .collect()
}

/// The 12 edges of an axis-aligned wireframe cube centered at the origin.
pub fn cube_edges(half_extent: f32) -> Vec<Segment> {
    let h = half_extent;
    let corner = |i: usize| -> [f32; 3] {
        [
            if i & 1 == 0 { -h } else { h },
            if i & 2 == 0 { -h } else { h },
            if i & 4 == 0 { -h } else { h },
        ]
    };

    let mut edges = Vec::with_capacity(12);
    for i in 0..8 {
        for axis in [1usize, 2, 4] {
            if i & axis == 0 {
                edges.push([corner(i), corner(i | axis)]);
            }
        }
    }
    edges
}

/// Log the pose scene onto an existing recording stream: one frustum per
/// camera, a coordinate-axis gizmo, and the wireframe scene bounds.
pub fn log_pose_scene(
    rec: &rerun::RecordingStream,
    poses: &[Pose],
    cfg: &PoseSceneCfg,
) -> Result<(), VizError> {
    let gray = rerun::Color::from_rgb(128, 128, 128);

    rec.log(
        "world/axes",
        &rerun::Arrows3D::from_vectors([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]])
            .with_origins([[0.0, 0.0, 0.0]; 3])
            .with_colors([
                rerun::Color::from_rgb(255, 0, 0),
                rerun::Color::from_rgb(0, 255, 0),
                rerun::Color::from_rgb(0, 0, 255),
            ]),
    )?;

    rec.log(
        "world/bounds",
        &rerun::LineStrips3D::new(cube_edges(cfg.bound).into_iter().map(|s| s.to_vec()))
            .with_colors([gray]),
    )?;
    if cfg.bound > 1.0 {
        rec.log(
            "world/unit_bounds",
            &rerun::LineStrips3D::new(cube_edges(1.0).into_iter().map(|s| s.to_vec()))
                .with_colors([gray]),
        )?;
    }

    for (i, pose) in poses.iter().enumerate() {
        let segments = frustum_segments(pose, cfg.frustum_size);
        rec.log(
            format!("world/cameras/cam_{i}"),
            &rerun::LineStrips3D::new(segments.into_iter().map(|s| s.to_vec())),
        )?;
    }

    Ok(())
}

/// Spawn the rerun viewer and show the poses. Terminal operation, meant
/// for human inspection only.
pub fn show_poses(poses: &[Pose], cfg: &PoseSceneCfg) -> Result<(), VizError> {
    log::info!("visualizing {} camera pose(s)", poses.len());
    let rec = rerun::RecordingStreamBuilder::new("rnerf_pose_viewer").spawn()?;
    log_pose_scene(&rec, poses, cfg)
}
