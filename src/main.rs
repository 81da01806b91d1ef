use clap::{Parser, Subcommand};
use image::DynamicImage;

use std::{fs, path::PathBuf};

use framepick::{MaskInput, bbox, select::FrameSelector, tensorops};

type Backend = burn::backend::NdArray;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// composite selected frames over a constant placeholder and write the
    /// frames and per-frame masks as images
    Select {
        /// the directory containing the input frames, ordered by file name
        image_dir: PathBuf,

        /// comma-separated frame indices to keep; an unparseable value keeps
        /// every frame
        #[arg(short, long, default_value = "0,1,2")]
        indices: String,

        /// intensity of placeholder frames, in [0, 1]
        #[arg(short, long, default_value_t = 0.0)]
        fill: f64,

        /// optional inpainting mask folded into the output masks
        #[arg(long)]
        inpaint_mask: Option<PathBuf>,

        /// where to write the composited frames and masks
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// reduce mask images to bounding boxes and print the records as JSON
    Bbox {
        /// mask image paths, one box per mask
        masks: Vec<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let device = burn::backend::ndarray::NdArrayDevice::default();

    match args.command {
        Command::Select {
            image_dir,
            indices,
            fill,
            inpaint_mask,
            output_dir,
        } => {
            let mut image_files: Vec<_> = fs::read_dir(&image_dir)?
                .filter_map(|entry| Some(entry.ok()?.path()))
                .filter_map(|path| {
                    matches!(path.extension()?.to_str()?, "png" | "jpg" | "jpeg" | "webp")
                        .then_some(path)
                })
                .collect();
            image_files.sort();

            log::info!("Found {} image files.", image_files.len());

            let frames: Vec<DynamicImage> = image_files
                .iter()
                .map(image::open)
                .collect::<Result<_, _>>()?;
            let frames = tensorops::frames_to_tensor::<Backend>(&frames, &device)?;

            let aux = match &inpaint_mask {
                Some(path) => {
                    log::info!("Loading inpaint mask from {:?}", path);
                    let mask = image::open(path)?.to_luma8();
                    Some(MaskInput::Single(tensorops::mask_to_tensor::<Backend>(
                        &mask, &device,
                    )))
                }
                None => None,
            };

            let selection = FrameSelector.select(frames, &indices, fill, aux)?;

            for (index, frame) in tensorops::frames_from_data(selection.frames)?
                .into_iter()
                .enumerate()
            {
                let path = output_dir.join(format!("frame_{index:03}.png"));
                frame.save(&path)?;
                log::info!("Saved frame to {:?}", path);
            }
            for (index, mask) in tensorops::masks_from_data(selection.masks)?
                .into_iter()
                .enumerate()
            {
                let path = output_dir.join(format!("mask_{index:03}.png"));
                mask.save(&path)?;
                log::info!("Saved mask to {:?}", path);
            }
        }
        Command::Bbox { masks } => {
            let extractor = framepick::MaskBoundingBoxExtractor;
            let mut boxes = Vec::new();
            for path in &masks {
                log::debug!("Processing mask: {:?}", path);
                let mask = image::open(path)?.to_luma8();
                let mask = tensorops::mask_to_tensor::<Backend>(&mask, &device);
                boxes.extend(extractor.extract(MaskInput::Single(mask))?);
            }
            println!("{}", bbox::to_json(&boxes)?);
        }
    }

    Ok(())
}
