use std::path::Path;

use image::RgbImage;

use crate::error::SampleError;

/// Opens seekable video files for sequential frame reads.
pub trait VideoDecoder: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn VideoStream>, SampleError>;
}

/// An open video. Dropping it releases every decoder resource.
pub trait VideoStream {
    /// Total frame count as reported by the container. Zero when unknown.
    fn frame_count(&self) -> u64;

    /// Native `(width, height)` of decoded frames.
    fn dimensions(&self) -> (u32, u32);

    /// Next frame in decode order, or `None` once the stream is exhausted
    /// or a frame cannot be read.
    fn read_frame(&mut self) -> Option<RgbImage>;
}
