pub mod pose_scene;
pub use pose_scene::*;

/// Errors raised while streaming the pose scene to the viewer.
#[derive(Debug, thiserror::Error)]
pub enum VizError {
    #[error("failed to stream to the rerun viewer")]
    Recording(#[from] rerun::RecordingStreamError),
}
