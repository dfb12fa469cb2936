//! Frame sampling for vidwatch.
//!
//! Turns an arbitrary video byte stream into a small, evenly spaced set of
//! JPEG stills suitable for inlining into a vision model prompt.

pub mod decoder;
pub mod error;
pub mod ffmpeg;
pub mod frame;
pub mod mime_detect;
pub mod sampler;
pub mod synthetic;

pub use decoder::{VideoDecoder, VideoStream};
pub use error::SampleError;
pub use ffmpeg::FfmpegDecoder;
pub use frame::{clamp_width, encode_jpeg, fit_to_width, normalize_frame, MAX_FRAME_WIDTH};
pub use mime_detect::{detect_video_mime, temp_suffix_for};
pub use sampler::{
    frame_stride, FrameSampler, SamplerOptions, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_FRAMES,
    DEFAULT_MAX_WIDTH,
};
pub use synthetic::{DecoderStats, SyntheticDecoder};
