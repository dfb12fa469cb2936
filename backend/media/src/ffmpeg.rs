//! FFmpeg-backed decoder.
//!
//! `ffprobe` reports the stream geometry and frame count; `ffmpeg` then pipes
//! raw RGB24 frames over stdout, one `width * height * 3` chunk per frame.
//! Autorotation is disabled so that decoded frames keep the coded size that
//! `ffprobe` reported, even for clips carrying a display-matrix rotation.

use std::ffi::OsString;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use image::RgbImage;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::decoder::{VideoDecoder, VideoStream};
use crate::error::SampleError;

#[derive(Debug, Clone)]
pub struct FfmpegDecoder {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl Default for FfmpegDecoder {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

impl FfmpegDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binaries(mut self, ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        self.ffmpeg = ffmpeg.into();
        self.ffprobe = ffprobe.into();
        self
    }

    /// Check that both binaries can be executed.
    pub fn check_available(&self) -> Result<(), SampleError> {
        for binary in [&self.ffmpeg, &self.ffprobe] {
            let status = Command::new(binary)
                .arg("-version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map_err(|e| SampleError::Decode(format!("failed to run {}: {e}", binary.display())))?;
            if !status.success() {
                return Err(SampleError::Decode(format!(
                    "{} -version exited with {status}",
                    binary.display()
                )));
            }
        }
        Ok(())
    }

    fn probe(&self, path: &Path) -> Result<ProbeStream, SampleError> {
        let output = Command::new(&self.ffprobe)
            .arg("-v")
            .arg("error")
            .arg("-select_streams")
            .arg("v:0")
            .arg("-count_packets")
            .arg("-show_entries")
            .arg("stream=width,height,nb_frames,nb_read_packets:stream_side_data=rotation")
            .arg("-of")
            .arg("json")
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| SampleError::Decode(format!("failed to run ffprobe: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SampleError::Decode(format!(
                "ffprobe rejected {}: {}",
                path.display(),
                stderr.trim()
            )));
        }

        let probe: ProbeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| SampleError::Decode(format!("unreadable ffprobe output: {e}")))?;

        probe
            .streams
            .into_iter()
            .next()
            .ok_or_else(|| SampleError::Decode(format!("no video stream in {}", path.display())))
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    nb_frames: Option<String>,
    nb_read_packets: Option<String>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
}

#[derive(Debug, Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

impl ProbeStream {
    /// Coded `(width, height)`, which is what ffmpeg emits with autorotation off.
    fn frame_size(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    /// Display rotation in degrees, if the container carries one.
    fn rotation(&self) -> Option<f64> {
        self.side_data_list
            .iter()
            .find_map(|d| d.rotation)
            .filter(|r| *r != 0.0)
    }

    /// Container frame count, falling back to the counted packets.
    fn frame_count(&self) -> u64 {
        [&self.nb_frames, &self.nb_read_packets]
            .into_iter()
            .filter_map(|v| v.as_deref().and_then(|s| s.parse::<u64>().ok()))
            .find(|&n| n > 0)
            .unwrap_or(0)
    }
}

/// Arguments streaming every frame of the first video stream as raw RGB24.
/// `-noautorotate` must precede `-i` to apply to that input.
fn decode_args(path: &Path) -> Vec<OsString> {
    let input_flags = ["-hide_banner", "-loglevel", "error", "-nostdin", "-noautorotate", "-i"];
    let mut args: Vec<OsString> = input_flags.into_iter().map(OsString::from).collect();
    args.push(path.as_os_str().to_owned());
    args.extend(
        ["-map", "0:v:0", "-vsync", "passthrough", "-pix_fmt", "rgb24", "-f", "rawvideo", "-"]
            .into_iter()
            .map(OsString::from),
    );
    args
}

impl VideoDecoder for FfmpegDecoder {
    fn open(&self, path: &Path) -> Result<Box<dyn VideoStream>, SampleError> {
        let probe = self.probe(path)?;
        let Some((width, height)) = probe.frame_size() else {
            return Err(SampleError::Decode(format!(
                "video stream in {} has no frame size",
                path.display()
            )));
        };
        let frame_count = probe.frame_count();
        if let Some(rotation) = probe.rotation() {
            debug!(path = %path.display(), rotation, "Decoding rotated video in coded orientation");
        }

        let mut child = Command::new(&self.ffmpeg)
            .args(decode_args(path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SampleError::Decode(format!("failed to spawn ffmpeg: {e}")))?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SampleError::Decode("ffmpeg stdout unavailable".to_string()));
        };

        debug!(path = %path.display(), width, height, frame_count, "Opened video with ffmpeg");

        Ok(Box::new(FfmpegStream {
            child,
            stdout,
            width,
            height,
            frame_count,
            frame_len: width as usize * height as usize * 3,
        }))
    }
}

struct FfmpegStream {
    child: Child,
    stdout: ChildStdout,
    width: u32,
    height: u32,
    frame_count: u64,
    frame_len: usize,
}

impl VideoStream for FfmpegStream {
    fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn read_frame(&mut self) -> Option<RgbImage> {
        let mut buffer = vec![0u8; self.frame_len];
        match self.stdout.read_exact(&mut buffer) {
            Ok(()) => RgbImage::from_raw(self.width, self.height, buffer),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => None,
            Err(e) => {
                warn!("ffmpeg frame read failed: {}", e);
                None
            }
        }
    }
}

impl Drop for FfmpegStream {
    fn drop(&mut self) {
        // The child may already have exited at end of stream.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
