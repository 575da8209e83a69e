/// Capacity of the queue feeding file paths to the loader workers.
pub const DEFAULT_PATH_QUEUE_CAPACITY: usize = 256;

/// Capacity of the queue holding decoded images awaiting accumulation.
/// Bounds the number of fully decoded images resident in memory at once.
pub const DEFAULT_IMAGE_QUEUE_CAPACITY: usize = 256;

/// Number of channels in an accumulator (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Minimum pixel count (h*w) to use row-level Rayon parallelism when
/// dividing the grand total.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;
