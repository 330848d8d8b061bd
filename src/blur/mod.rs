mod util;

pub use util::{create_row_ranges, RowRange};

use std::{fmt, thread, time::Instant};

use crate::{
    core::{error::BlurError, pixel_buffer::PixelBuffer},
    engine::{BlurEngine, BlurEngineT, ExactBlur, FastBlur},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlurMode {
    /// Circular kernel, `O(r²)` mask tests per pixel.
    Exact,
    /// Clipped rectangular window, no mask.
    Fast,
}

impl Default for BlurMode {
    fn default() -> Self {
        BlurMode::Fast
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Threads(usize),
    /// Two bands per logical CPU.
    Auto,
}

impl Default for Parallelism {
    fn default() -> Self {
        Parallelism::Auto
    }
}

impl Parallelism {
    /// Number of workers to use for an image of `rows` scanlines.
    pub fn worker_count(self, rows: usize) -> usize {
        let requested = match self {
            Parallelism::Sequential => 1,
            Parallelism::Threads(0) => {
                log::warn!("0 worker threads requested, running sequentially");
                1
            }
            Parallelism::Threads(n) => n,
            Parallelism::Auto => num_cpus::get() * 2,
        };
        let rows = rows.max(1);
        if requested > rows {
            if let Parallelism::Threads(n) = self {
                log::warn!("{} worker threads requested for {} rows, using {}", n, rows, rows);
            }
        }
        requested.clamp(1, rows)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlurConfig {
    pub radius: i32,
    pub mode: BlurMode,
    pub parallelism: Parallelism,
}

impl BlurConfig {
    pub fn new(radius: i32) -> Self {
        Self {
            radius,
            mode: BlurMode::default(),
            parallelism: Parallelism::default(),
        }
    }

    pub fn mode(mut self, mode: BlurMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn exact(self) -> Self {
        self.mode(BlurMode::Exact)
    }

    pub fn fast(self) -> Self {
        self.mode(BlurMode::Fast)
    }

    pub fn parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn sequential(self) -> Self {
        self.parallelism(Parallelism::Sequential)
    }
}

/// Blurs `buffer` in place, with the fast engine when `fast` is set.
pub fn blur(buffer: &mut PixelBuffer, radius: i32, fast: bool) -> Result<(), BlurError> {
    let mode = if fast { BlurMode::Fast } else { BlurMode::Exact };
    apply(buffer, &BlurConfig::new(radius).mode(mode))
}

/// Blurs `buffer` in place.
///
/// Fails with [`BlurError::InvalidArgument`] unless `0 < radius < width` and
/// `radius < height`; the buffer is then left untouched. Rows are computed
/// into a separate buffer which is copied over `buffer` only once every row
/// has finished.
pub fn apply(buffer: &mut PixelBuffer, config: &BlurConfig) -> Result<(), BlurError> {
    let radius = validate(buffer, config.radius)?;
    let engine = create_engine(config.mode, radius);
    let num_workers = config.parallelism.worker_count(buffer.height());
    log::debug!(
        "blurring {}x{} with {:?} engine, radius {}, {} worker(s)",
        buffer.width(),
        buffer.height(),
        config.mode,
        radius,
        num_workers
    );

    let begin_time = Instant::now();
    let blurred = blur_rows(&engine, buffer, num_workers)?;
    buffer.replace_rows(&blurred);
    log::info!(
        "blurred {}x{} in {:?}",
        buffer.width(),
        buffer.height(),
        begin_time.elapsed()
    );
    Ok(())
}

/// Checks the radius against the buffer and returns it as a kernel radius.
pub fn validate(buffer: &PixelBuffer, radius: i32) -> Result<usize, BlurError> {
    if radius <= 0 {
        return Err(BlurError::invalid(format!(
            "blur radius - must be positive, got {}",
            radius
        )));
    }
    let radius = radius as usize;
    if radius >= buffer.width() {
        return Err(BlurError::invalid(format!(
            "blur radius - {} must be less than bitmap width {}",
            radius,
            buffer.width()
        )));
    }
    if radius >= buffer.height() {
        return Err(BlurError::invalid(format!(
            "blur radius - {} must be less than bitmap height {}",
            radius,
            buffer.height()
        )));
    }
    Ok(radius)
}

fn create_engine(mode: BlurMode, radius: usize) -> BlurEngine {
    match mode {
        BlurMode::Exact => {
            let engine = ExactBlur::new(radius);
            log::debug!("coefficient grid, radius {}:\n{}", radius, engine.mask());
            engine.into()
        }
        BlurMode::Fast => FastBlur::new(radius).into(),
    }
}

fn blur_rows(
    engine: &BlurEngine,
    src: &PixelBuffer,
    num_workers: usize,
) -> Result<Vec<u8>, BlurError> {
    let stride = src.stride();
    let mut blurred = vec![0_u8; src.byte_len()];

    if num_workers <= 1 {
        for (y, out_row) in blurred.chunks_mut(stride).enumerate() {
            engine.blur_row(src, y, out_row);
        }
        return Ok(blurred);
    }

    let ranges = create_row_ranges(num_workers, src.height());
    crossbeam::scope(|scope| {
        let mut rest = blurred.as_mut_slice();
        for range in ranges {
            let (band, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * stride);
            rest = tail;

            scope.spawn(move |_| {
                for (offset, out_row) in band.chunks_mut(stride).enumerate() {
                    engine.blur_row(src, range.from + offset, out_row);
                }
            });
        }
    })
    .map_err(|_| BlurError::WorkerPanicked)?;

    Ok(blurred)
}

/// A blur running on a background thread.
pub struct BlurHandle {
    handle: thread::JoinHandle<Result<PixelBuffer, BlurError>>,
}

impl BlurHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the blur and returns the rewritten buffer.
    pub fn join(self) -> Result<PixelBuffer, BlurError> {
        self.handle
            .join()
            .map_err(|_| BlurError::WorkerPanicked)?
    }
}

/// An asynchronous blur that did not start. Hands the buffer back.
pub struct Rejected {
    pub error: BlurError,
    pub buffer: PixelBuffer,
}

impl Rejected {
    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }
}

impl fmt::Debug for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .field("size", &self.buffer.size())
            .finish()
    }
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for Rejected {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Validates synchronously, then blurs on a background thread.
pub fn apply_async(buffer: PixelBuffer, config: BlurConfig) -> Result<BlurHandle, Rejected> {
    if let Err(error) = validate(&buffer, config.radius) {
        return Err(Rejected { error, buffer });
    }

    let handle = thread::spawn(move || -> Result<PixelBuffer, BlurError> {
        let mut buffer = buffer;
        apply(&mut buffer, &config)?;
        Ok(buffer)
    });

    Ok(BlurHandle { handle })
}
