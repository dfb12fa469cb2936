//! Evenly spaced frame sampling.
//!
//! The input bytes are copied to a uniquely named temporary file (decoders
//! need seekable storage), decoded sequentially, and every `step`-th frame is
//! kept until `max_frames` frames are collected or the stream runs out.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use vidwatch_core::FrameSet;

use crate::decoder::VideoDecoder;
use crate::error::SampleError;
use crate::frame::{clamp_width, normalize_frame, MAX_FRAME_WIDTH};

/// Frames sampled per question unless the caller asks otherwise.
pub const DEFAULT_MAX_FRAMES: usize = 6;

/// Width cap applied to every sampled frame.
pub const DEFAULT_MAX_WIDTH: u32 = MAX_FRAME_WIDTH;

pub const DEFAULT_JPEG_QUALITY: u8 = 85;

#[derive(Debug, Clone)]
pub struct SamplerOptions {
    pub max_width: u32,
    pub jpeg_quality: u8,
    /// Directory for temporary copies; the system temp dir when `None`.
    pub temp_dir: Option<PathBuf>,
    pub temp_suffix: String,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            temp_dir: None,
            temp_suffix: ".mp4".to_string(),
        }
    }
}

/// Number of source frames between two kept samples.
pub fn frame_stride(total_frames: u64, max_frames: usize) -> u64 {
    if max_frames == 0 {
        return 1;
    }
    (total_frames / max_frames as u64).max(1)
}

pub struct FrameSampler {
    decoder: Arc<dyn VideoDecoder>,
    options: SamplerOptions,
}

impl FrameSampler {
    pub fn new(decoder: Arc<dyn VideoDecoder>) -> Self {
        Self {
            decoder,
            options: SamplerOptions::default(),
        }
    }

    /// Replace the options. `max_width` is clamped to [`MAX_FRAME_WIDTH`].
    pub fn with_options(mut self, options: SamplerOptions) -> Self {
        self.options = SamplerOptions {
            max_width: clamp_width(options.max_width),
            ..options
        };
        self
    }

    pub fn options(&self) -> &SamplerOptions {
        &self.options
    }

    /// Sample up to `max_frames` frames from a video byte stream.
    pub fn sample<R: Read>(&self, reader: R, max_frames: usize) -> Result<FrameSet, SampleError> {
        self.sample_with_suffix(reader, max_frames, &self.options.temp_suffix)
    }

    /// Like [`sample`](Self::sample), naming the temporary copy with `suffix`.
    pub fn sample_with_suffix<R: Read>(
        &self,
        mut reader: R,
        max_frames: usize,
        suffix: &str,
    ) -> Result<FrameSet, SampleError> {
        let mut temp = self.create_temp_file(suffix)?;
        let copied = std::io::copy(&mut reader, &mut temp)?;
        temp.flush()?;
        debug!(path = %temp.path().display(), bytes = copied, "Materialized video to temp file");

        let result = self.sample_path(temp.path(), max_frames);

        // Best-effort: a leftover temp file is not worth failing the request.
        let temp_path = temp.path().to_path_buf();
        if let Err(e) = temp.close() {
            warn!("Failed to remove temp video {}: {}", temp_path.display(), e);
        }

        result
    }

    /// Sample frames from a video already on local disk.
    pub fn sample_path(&self, path: &Path, max_frames: usize) -> Result<FrameSet, SampleError> {
        let mut stream = self.decoder.open(path)?;
        let total = stream.frame_count();
        let step = frame_stride(total, max_frames);
        let (width, height) = stream.dimensions();
        debug!(total, step, width, height, max_frames, "Sampling frames");

        let mut frames = FrameSet::with_capacity(max_frames.min(64));
        let mut index: u64 = 0;
        while frames.len() < max_frames {
            let Some(image) = stream.read_frame() else {
                break;
            };
            if index % step == 0 {
                frames.push(normalize_frame(
                    index,
                    image,
                    self.options.max_width,
                    self.options.jpeg_quality,
                )?);
            }
            index += 1;
        }
        drop(stream);

        info!(kept = frames.len(), decoded = index, total, "Sampled video frames");
        Ok(frames)
    }

    fn create_temp_file(&self, suffix: &str) -> std::io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("vidwatch-").suffix(suffix);
        match &self.options.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SyntheticDecoder;
    use std::io::Cursor;

    fn sampler_in(decoder: SyntheticDecoder, dir: &Path) -> FrameSampler {
        FrameSampler::new(Arc::new(decoder)).with_options(SamplerOptions {
            temp_dir: Some(dir.to_path_buf()),
            ..Default::default()
        })
    }

    fn dir_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    fn indices(frames: &FrameSet) -> Vec<u64> {
        frames.iter().map(|f| f.source_index).collect()
    }

    #[test]
    fn test_stride() {
        assert_eq!(frame_stride(300, 6), 50);
        assert_eq!(frame_stride(301, 6), 50);
        assert_eq!(frame_stride(4, 6), 1);
        assert_eq!(frame_stride(0, 6), 1);
        assert_eq!(frame_stride(10, 0), 1);
    }

    #[test]
    fn test_three_hundred_frames_spread_evenly() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = sampler_in(SyntheticDecoder::new(300, 64, 48), dir.path());

        let frames = sampler.sample(Cursor::new(b"video".to_vec()), 6).unwrap();

        assert_eq!(indices(&frames), vec![0, 50, 100, 150, 200, 250]);
    }

    #[test]
    fn test_long_video_returns_exactly_max() {
        let dir = tempfile::tempdir().unwrap();
        for total in [6u64, 7, 13, 99, 1000] {
            let sampler = sampler_in(SyntheticDecoder::new(total, 32, 32), dir.path());
            let frames = sampler.sample(Cursor::new(vec![0u8; 16]), 6).unwrap();
            assert_eq!(frames.len(), 6, "total = {total}");
            assert!(indices(&frames).windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_short_video_returns_at_most_total() {
        let dir = tempfile::tempdir().unwrap();
        for total in 1u64..6 {
            let sampler = sampler_in(SyntheticDecoder::new(total, 32, 32), dir.path());
            let frames = sampler.sample(Cursor::new(vec![1u8]), 6).unwrap();
            assert!(!frames.is_empty());
            assert!(frames.len() as u64 <= total);
        }
    }

    #[test]
    fn test_empty_video_yields_no_frames() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = sampler_in(SyntheticDecoder::new(0, 32, 32), dir.path());
        let frames = sampler.sample(Cursor::new(Vec::new()), 6).unwrap();
        assert!(frames.is_empty());
    }

    #[test]
    fn test_unknown_frame_count_takes_leading_frames() {
        let dir = tempfile::tempdir().unwrap();
        let decoder = SyntheticDecoder::new(100, 32, 32).with_reported_count(0);
        let sampler = sampler_in(decoder, dir.path());
        let frames = sampler.sample(Cursor::new(vec![1u8]), 6).unwrap();
        assert_eq!(indices(&frames), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_unreadable_frame_stops_sampling() {
        let dir = tempfile::tempdir().unwrap();
        let decoder = SyntheticDecoder::new(300, 32, 32).with_readable_frames(120);
        let sampler = sampler_in(decoder, dir.path());
        let frames = sampler.sample(Cursor::new(vec![1u8]), 6).unwrap();
        assert_eq!(indices(&frames), vec![0, 50, 100]);
    }

    #[test]
    fn test_decoding_stops_once_enough_frames_kept() {
        let dir = tempfile::tempdir().unwrap();
        let decoder = SyntheticDecoder::new(300, 32, 32);
        let stats = decoder.stats();
        let sampler = sampler_in(decoder, dir.path());
        sampler.sample(Cursor::new(vec![1u8]), 6).unwrap();
        assert_eq!(stats.frames_read(), 251);
    }

    #[test]
    fn test_frames_respect_width_cap() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = sampler_in(SyntheticDecoder::new(12, 1280, 720), dir.path());
        let frames = sampler.sample(Cursor::new(vec![1u8]), 6).unwrap();
        assert!(frames.iter().all(|f| f.width == 512 && f.height == 288));

        let sampler = sampler_in(SyntheticDecoder::new(12, 320, 200), dir.path());
        let frames = sampler.sample(Cursor::new(vec![1u8]), 6).unwrap();
        assert!(frames.iter().all(|f| f.width == 320 && f.height == 200));
    }

    #[test]
    fn test_oversized_width_option_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        for requested in [0, 1920, 4096] {
            let sampler = FrameSampler::new(Arc::new(SyntheticDecoder::new(12, 1920, 1080)))
                .with_options(SamplerOptions {
                    max_width: requested,
                    temp_dir: Some(dir.path().to_path_buf()),
                    ..Default::default()
                });
            assert_eq!(sampler.options().max_width, 512);

            let frames = sampler.sample(Cursor::new(vec![1u8]), 6).unwrap();
            assert_eq!(frames.len(), 6);
            assert!(frames.iter().all(|f| f.width == 512 && f.height == 288));
        }
    }

    #[test]
    fn test_temp_file_removed_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let decoder = SyntheticDecoder::new(30, 32, 32);
        let stats = decoder.stats();
        let sampler = sampler_in(decoder, dir.path());

        sampler.sample_with_suffix(Cursor::new(vec![7u8; 128]), 6, ".webm").unwrap();

        let opened = stats.last_path().unwrap();
        assert!(opened.to_string_lossy().ends_with(".webm"));
        assert!(!opened.exists());
        assert!(dir_is_empty(dir.path()));
        assert_eq!(stats.opened(), 1);
        assert_eq!(stats.released(), 1);
    }

    #[test]
    fn test_temp_file_removed_after_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let decoder = SyntheticDecoder::failing();
        let stats = decoder.stats();
        let sampler = sampler_in(decoder, dir.path());

        let err = sampler.sample(Cursor::new(vec![7u8; 128]), 6).unwrap_err();

        assert!(matches!(err, SampleError::Decode(_)));
        assert!(!stats.last_path().unwrap().exists());
        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_temp_file_removed_after_mid_stream_failure() {
        let dir = tempfile::tempdir().unwrap();
        let decoder = SyntheticDecoder::new(300, 32, 32).with_corrupt_frame_at(100);
        let stats = decoder.stats();
        let sampler = sampler_in(decoder, dir.path());

        let err = sampler.sample(Cursor::new(vec![7u8; 128]), 6).unwrap_err();

        assert!(matches!(err, SampleError::Encode { index: 100, .. }));
        assert_eq!(stats.frames_read(), 101);
        assert_eq!(stats.opened(), 1);
        assert_eq!(stats.released(), 1);
        assert!(!stats.last_path().unwrap().exists());
        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_missing_temp_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let sampler = sampler_in(SyntheticDecoder::new(10, 8, 8), &missing);
        let err = sampler.sample(Cursor::new(vec![1u8]), 6).unwrap_err();
        assert!(matches!(err, SampleError::Io(_)));
    }

    #[test]
    fn test_zero_max_frames() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = sampler_in(SyntheticDecoder::new(10, 8, 8), dir.path());
        let frames = sampler.sample(Cursor::new(vec![1u8]), 0).unwrap();
        assert!(frames.is_empty());
    }
}
