//! In-memory decoder producing solid grey frames.
//!
//! Lets the sampling pipeline run without ffmpeg; used by tests across the
//! workspace. Frame `n` is filled with grey level `n % 256`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use image::{Rgb, RgbImage};

use crate::decoder::{VideoDecoder, VideoStream};
use crate::error::SampleError;

/// Counters shared between a decoder and every stream it opens.
#[derive(Debug, Default)]
pub struct DecoderStats {
    opened: AtomicUsize,
    released: AtomicUsize,
    frames_read: AtomicU64,
    last_path: Mutex<Option<PathBuf>>,
}

impl DecoderStats {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read.load(Ordering::SeqCst)
    }

    /// Path handed to the most recent `open`.
    pub fn last_path(&self) -> Option<PathBuf> {
        self.last_path.lock().ok().and_then(|p| p.clone())
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticDecoder {
    frame_count: u64,
    reported_count: Option<u64>,
    readable_frames: Option<u64>,
    corrupt_frame: Option<u64>,
    width: u32,
    height: u32,
    fail_open: bool,
    stats: Arc<DecoderStats>,
}

impl SyntheticDecoder {
    pub fn new(frame_count: u64, width: u32, height: u32) -> Self {
        Self {
            frame_count,
            reported_count: None,
            readable_frames: None,
            corrupt_frame: None,
            width,
            height,
            fail_open: false,
            stats: Arc::new(DecoderStats::default()),
        }
    }

    /// Report a different total than the number of frames actually produced.
    pub fn with_reported_count(mut self, count: u64) -> Self {
        self.reported_count = Some(count);
        self
    }

    /// Fail every read after `n` frames, as a corrupt stream would.
    pub fn with_readable_frames(mut self, n: u64) -> Self {
        self.readable_frames = Some(n);
        self
    }

    /// Yield an empty 0x0 image as frame `n`, which the JPEG encoder rejects.
    pub fn with_corrupt_frame_at(mut self, n: u64) -> Self {
        self.corrupt_frame = Some(n);
        self
    }

    /// Refuse to open anything.
    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::new(0, 1, 1)
        }
    }

    pub fn stats(&self) -> Arc<DecoderStats> {
        Arc::clone(&self.stats)
    }
}

impl VideoDecoder for SyntheticDecoder {
    fn open(&self, path: &Path) -> Result<Box<dyn VideoStream>, SampleError> {
        if let Ok(mut last) = self.stats.last_path.lock() {
            *last = Some(path.to_path_buf());
        }
        if self.fail_open {
            return Err(SampleError::Decode(format!("unsupported container: {}", path.display())));
        }
        // The sampler must hand over a real file.
        std::fs::metadata(path)?;

        self.stats.opened.fetch_add(1, Ordering::SeqCst);
        let available = match self.readable_frames {
            Some(n) => n.min(self.frame_count),
            None => self.frame_count,
        };
        Ok(Box::new(SyntheticStream {
            next: 0,
            available,
            reported: self.reported_count.unwrap_or(self.frame_count),
            corrupt: self.corrupt_frame,
            width: self.width,
            height: self.height,
            stats: Arc::clone(&self.stats),
        }))
    }
}

struct SyntheticStream {
    next: u64,
    available: u64,
    reported: u64,
    corrupt: Option<u64>,
    width: u32,
    height: u32,
    stats: Arc<DecoderStats>,
}

impl VideoStream for SyntheticStream {
    fn frame_count(&self) -> u64 {
        self.reported
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn read_frame(&mut self) -> Option<RgbImage> {
        if self.next >= self.available {
            return None;
        }
        let index = self.next;
        self.next += 1;
        self.stats.frames_read.fetch_add(1, Ordering::SeqCst);
        if self.corrupt == Some(index) {
            return Some(RgbImage::new(0, 0));
        }
        let level = (index % 256) as u8;
        Some(RgbImage::from_pixel(self.width, self.height, Rgb([level, level, level])))
    }
}

impl Drop for SyntheticStream {
    fn drop(&mut self) {
        self.stats.released.fetch_add(1, Ordering::SeqCst);
    }
}
