use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blurry_bitmap::{apply_async, BlurConfig, BlurMode, Parallelism, PixelBuffer};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "blurry-bitmap", about = "Blur an image in place.")]
struct Opt {
    /// Image to blur
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Where to save the result, defaults to `<input>_blurred.<ext>`
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Blur radius in pixels
    #[structopt(short, long, default_value = "20")]
    radius: i32,

    /// Use the circular kernel instead of the rectangular window
    #[structopt(long)]
    exact: bool,

    /// Number of worker threads, defaults to two per CPU
    #[structopt(short = "j", long)]
    threads: Option<usize>,

    /// Blur rows one by one on a single thread
    #[structopt(long, conflicts_with = "threads")]
    sequential: bool,
}

impl Opt {
    fn blur_config(&self) -> BlurConfig {
        let mode = if self.exact {
            BlurMode::Exact
        } else {
            BlurMode::Fast
        };
        let parallelism = match (self.sequential, self.threads) {
            (true, _) => Parallelism::Sequential,
            (false, Some(threads)) => Parallelism::Threads(threads),
            (false, None) => Parallelism::Auto,
        };
        BlurConfig::new(self.radius)
            .mode(mode)
            .parallelism(parallelism)
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or("image".into(), |stem| stem.to_string_lossy());
    let ext = input
        .extension()
        .map_or("png".into(), |ext| ext.to_string_lossy());
    input.with_file_name(format!("{}_blurred.{}", stem, ext))
}

fn blur_spinner() -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed_precise}]"),
    );
    spinner.set_message("blurring");
    spinner.enable_steady_tick(100);
    spinner
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    let output = opt.output_path();

    println!("Loading '{}'...", opt.input.display());
    let image = image::open(&opt.input)
        .with_context(|| format!("failed to open '{}'", opt.input.display()))?
        .to_rgb8();
    let buffer = PixelBuffer::from_rgb_image(image)?;

    let begin_time = std::time::Instant::now();
    let handle = apply_async(buffer, opt.blur_config())?;
    let spinner = blur_spinner();
    let buffer = handle.join()?;
    spinner.finish_and_clear();
    let duration = begin_time.elapsed();

    buffer
        .into_rgb_image()
        .save(&output)
        .with_context(|| format!("failed to save '{}'", output.display()))?;

    println!("Saved '{}', time used: {:?}", output.display(), duration);
    Ok(())
}
