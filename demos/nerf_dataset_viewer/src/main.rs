use std::path::PathBuf;

use argh::FromArgs;
use rnerf_core::Split;
use rnerf_dataset_reader::NerfReaderCfg;
use rnerf_viz::{show_poses, PoseSceneCfg};

#[derive(FromArgs)]
/// Load a nerf-compatible dataset and visualize its camera poses.
struct Args {
    /// dataset root directory
    #[argh(positional)]
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Args = argh::from_env();

    let reader = NerfReaderCfg::default().finalize(&args.path)?;
    let dataset = reader.load(Split::All)?;

    log::info!(
        "loaded {} poses, {}x{}x{} images, radius {:.3}",
        dataset.len(),
        dataset.height(),
        dataset.width(),
        dataset.channels(),
        dataset.radius()
    );

    show_poses(dataset.poses(), &PoseSceneCfg::default())?;

    Ok(())
}
