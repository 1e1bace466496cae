use argh::FromArgs;
use std::path::PathBuf;

use pointfuse::k3d::io::ply::write_ply_ascii;
use pointfuse::pipeline::{FrameSelection, ReconstructionConfig, Reconstructor};

#[derive(FromArgs, Debug)]
/// Reconstruct a colored point cloud from an RGB-D sequence.
struct Args {
    /// path to a JSON configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// directory the association paths are relative to
    #[argh(option, short = 'i')]
    images_dir: Option<PathBuf>,

    /// path to the trajectory file
    #[argh(option)]
    trajectory: Option<PathBuf>,

    /// path to the association file
    #[argh(option)]
    associations: Option<PathBuf>,

    /// number of frames of the sequence
    #[argh(option)]
    frame_count: Option<usize>,

    /// comma separated frame indices, e.g. 2,0,1 (default: all frames)
    #[argh(option)]
    frames: Option<String>,

    /// number of worker threads
    #[argh(option, short = 'n')]
    threads: Option<usize>,

    /// path to the output PLY file
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

fn parse_frames(value: &str) -> Result<Vec<usize>, String> {
    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.trim()
                .parse::<usize>()
                .map_err(|e| format!("invalid frame index `{s}`: {e}"))
        })
        .collect()
}

fn load_config(args: &Args) -> Result<ReconstructionConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ReconstructionConfig::from_json_file(path)?,
        None => {
            // only an explicit frame list can do without the sequence length
            let frame_count = match (args.frame_count, &args.frames) {
                (Some(frame_count), _) => frame_count,
                (None, Some(_)) => 0,
                (None, None) => {
                    return Err("--frame-count is required without --config or --frames".into())
                }
            };
            ReconstructionConfig::new(
                args.images_dir
                    .clone()
                    .ok_or("--images-dir is required without --config")?,
                args.trajectory
                    .clone()
                    .ok_or("--trajectory is required without --config")?,
                args.associations
                    .clone()
                    .ok_or("--associations is required without --config")?,
                frame_count,
            )
        }
    };

    if let Some(frame_count) = args.frame_count {
        config.frame_count = frame_count;
    }
    if let Some(threads) = args.threads {
        config = config.with_num_threads(threads);
    }

    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = load_config(&args)?;
    log::info!("configuration: {:?}", config);

    let selection = match &args.frames {
        Some(frames) => FrameSelection::Indices(parse_frames(frames)?),
        None => FrameSelection::AllFrames,
    };

    let mut reconstructor = Reconstructor::new(config)?;
    println!(
        "Loaded {} poses and {} frame associations",
        reconstructor.trajectory().len(),
        reconstructor.associations().color.len()
    );

    let report = reconstructor.reconstruct(&selection);
    println!(
        "Reconstructed #{} points from {} frames",
        report.num_points,
        report.processed.len()
    );
    for skipped in report.skipped.iter() {
        println!("Skipped frame {}: {}", skipped.index, skipped.error);
    }

    if let Some((min, max)) = reconstructor.point_buffer().bounds() {
        println!("Bounds: min {:?} max {:?}", min, max);
    }

    if let Some(output) = args.output {
        write_ply_ascii(&output, reconstructor.point_buffer())?;
        println!("Wrote {}", output.display());
    }

    Ok(())
}
