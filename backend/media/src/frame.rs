use base64::{Engine, engine::general_purpose::STANDARD};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::RgbImage;

use vidwatch_core::SampleFrame;

use crate::error::SampleError;

/// Hard ceiling on the width of any frame handed to a model.
pub const MAX_FRAME_WIDTH: u32 = 512;

/// Effective width limit for a requested `max_width`: never above
/// [`MAX_FRAME_WIDTH`], and zero means the ceiling itself.
pub fn clamp_width(max_width: u32) -> u32 {
    match max_width {
        0 => MAX_FRAME_WIDTH,
        w => w.min(MAX_FRAME_WIDTH),
    }
}

/// Downscale to `max_width` (see [`clamp_width`]), keeping the aspect ratio.
/// Narrower images are returned untouched.
pub fn fit_to_width(image: RgbImage, max_width: u32) -> RgbImage {
    let max_width = clamp_width(max_width);
    let (width, height) = image.dimensions();
    if width <= max_width {
        return image;
    }
    let new_height = ((u64::from(height) * u64::from(max_width)) / u64::from(width)).max(1) as u32;
    imageops::resize(&image, max_width, new_height, FilterType::Triangle)
}

pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality).encode_image(image)?;
    Ok(buffer)
}

/// Resize, JPEG-compress and base64-encode one decoded frame.
pub fn normalize_frame(
    source_index: u64,
    image: RgbImage,
    max_width: u32,
    jpeg_quality: u8,
) -> Result<SampleFrame, SampleError> {
    let image = fit_to_width(image, max_width);
    let (width, height) = image.dimensions();
    let jpeg = encode_jpeg(&image, jpeg_quality).map_err(|source| SampleError::Encode {
        index: source_index,
        source,
    })?;

    Ok(SampleFrame {
        source_index,
        width,
        height,
        mime_type: "image/jpeg".to_string(),
        data: STANDARD.encode(jpeg),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn wide_frames_are_scaled_to_cap() {
        let image = RgbImage::from_pixel(1920, 1080, Rgb([10, 20, 30]));
        let scaled = fit_to_width(image, 512);
        assert_eq!(scaled.dimensions(), (512, 288));
    }

    #[test]
    fn narrow_frames_are_untouched() {
        let image = RgbImage::from_pixel(320, 240, Rgb([0, 0, 0]));
        let scaled = fit_to_width(image, 512);
        assert_eq!(scaled.dimensions(), (320, 240));
    }

    #[test]
    fn exact_cap_is_untouched() {
        let image = RgbImage::from_pixel(512, 100, Rgb([0, 0, 0]));
        assert_eq!(fit_to_width(image, 512).dimensions(), (512, 100));
    }

    #[test]
    fn extreme_aspect_keeps_one_row() {
        let image = RgbImage::from_pixel(4096, 2, Rgb([0, 0, 0]));
        assert_eq!(fit_to_width(image, 512).dimensions(), (512, 1));
    }

    #[test]
    fn requested_width_never_exceeds_ceiling() {
        let image = RgbImage::from_pixel(1920, 1080, Rgb([0, 0, 0]));
        assert_eq!(fit_to_width(image.clone(), 4096).dimensions(), (512, 288));
        assert_eq!(fit_to_width(image.clone(), 1920).dimensions(), (512, 288));
        assert_eq!(fit_to_width(image, 0).dimensions(), (512, 288));
    }

    #[test]
    fn clamp_width_bounds() {
        assert_eq!(clamp_width(0), 512);
        assert_eq!(clamp_width(256), 256);
        assert_eq!(clamp_width(512), 512);
        assert_eq!(clamp_width(u32::MAX), 512);
    }

    #[test]
    fn normalized_frame_is_base64_jpeg() {
        let image = RgbImage::from_pixel(1024, 768, Rgb([200, 100, 50]));
        let frame = normalize_frame(7, image, 512, 85).unwrap();
        assert_eq!(frame.source_index, 7);
        assert_eq!((frame.width, frame.height), (512, 384));
        assert_eq!(frame.mime_type, "image/jpeg");

        let bytes = STANDARD.decode(&frame.data).unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
