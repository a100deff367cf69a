//! Image preprocessing for single-image prediction.
//!
//! Decodes PNG/JPEG/BMP/GIF, converts to 8-bit grayscale, resizes when the
//! source does not already have the expected dimensions, then inverts and
//! scales every pixel the same way the training corpus was encoded.

use std::path::Path;

use image::{DynamicImage, GenericImageView};

use crate::data::encoding::scale_inverted_pixel;
use crate::data::error::DatasetError;

/// Reads the image at `path` and returns a flat row-major `Vec<f64>` of
/// length `width * height`.
pub fn load_digit_image(path: impl AsRef<Path>, width: u32, height: u32) -> Result<Vec<f64>, DatasetError> {
    let bytes = std::fs::read(path)?;
    digit_image_from_bytes(&bytes, width, height)
}

/// Same as [`load_digit_image`] for an in-memory encoded image.
pub fn digit_image_from_bytes(bytes: &[u8], width: u32, height: u32) -> Result<Vec<f64>, DatasetError> {
    let img = image::load_from_memory(bytes)?;
    Ok(grayscale_input(&img, width, height))
}

fn grayscale_input(img: &DynamicImage, width: u32, height: u32) -> Vec<f64> {
    let gray = if img.dimensions() == (width, height) {
        img.to_luma8()
    } else {
        img.resize_exact(width, height, image::imageops::FilterType::Lanczos3).to_luma8()
    };
    gray.pixels().map(|p| scale_inverted_pixel(p.0[0])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use image::{GrayImage, ImageOutputFormat, Luma};
    use std::io::Cursor;

    fn png_bytes(img: GrayImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(img).write_to(&mut buf, ImageOutputFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn inverts_and_scales_pixels_in_row_major_order() {
        let mut img = GrayImage::from_pixel(3, 2, Luma([255]));
        img.put_pixel(1, 0, Luma([0]));
        let input = digit_image_from_bytes(&png_bytes(img), 3, 2).unwrap();
        assert_eq!(input.len(), 6);
        assert_abs_diff_eq!(input[0], 0.01);
        assert_abs_diff_eq!(input[1], 1.0);
        assert!(input[2..].iter().all(|&v| (v - 0.01).abs() < 1e-12));
    }

    #[test]
    fn resizes_to_requested_shape() {
        let img = GrayImage::from_pixel(56, 56, Luma([255]));
        let input = digit_image_from_bytes(&png_bytes(img), 28, 28).unwrap();
        assert_eq!(input.len(), 784);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = digit_image_from_bytes(b"not an image", 28, 28).unwrap_err();
        assert!(matches!(err, DatasetError::Image(_)));
    }
}
