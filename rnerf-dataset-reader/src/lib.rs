pub mod nerf_reader;
pub use nerf_reader::*;
