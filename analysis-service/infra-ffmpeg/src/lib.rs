mod capture;
mod probe;
mod process;

pub use capture::{FfmpegFrameCapture, FrameCaptureConfig};
pub use probe::{parse_duration, FfprobeDuration};
