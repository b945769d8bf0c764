mod dataset;
pub use dataset::*;
mod error;
pub use error::*;
mod manifest;
pub use manifest::*;
mod pose;
pub use pose::*;
mod split;
pub use split::*;

use nalgebra::Matrix4;

pub type Real = f32;
pub type Pose = Matrix4<Real>;
