//! Image preparation: colour-space normalisation, grayscale, JPEG output.
//!
//! The only transform applied before OCR is a luminance conversion. There is
//! no denoising, thresholding, deskew, or rescaling; tesseract sees the
//! embedded image at its native resolution.

use crate::error::PdfOcrError;
use crate::pipeline::reader::{EmbeddedImage, ImageId};
use image::{DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Turn raw samples into a decodable image.
///
/// Images with fewer than four colour channels (gray, gray+alpha, RGB, RGBA)
/// are converted to RGB8, dropping alpha. Four-colour data (CMYK-style) is
/// passed through untouched as a four-channel buffer.
pub fn normalize_color_space(image: &EmbeddedImage) -> Result<DynamicImage, PdfOcrError> {
    let id = image.id;
    let (w, h) = (image.width, image.height);
    let expected = w as usize * h as usize * image.channels as usize;
    if image.samples.len() != expected {
        return Err(decode_error(
            id,
            format!(
                "expected {expected} bytes for {w}x{h}x{}, got {}",
                image.channels,
                image.samples.len()
            ),
        ));
    }

    let samples = image.samples.clone();
    let decoded = match (image.channels, image.has_alpha) {
        (1, false) => GrayImage::from_raw(w, h, samples).map(DynamicImage::ImageLuma8),
        (2, true) => GrayAlphaImage::from_raw(w, h, samples).map(DynamicImage::ImageLumaA8),
        (3, false) => RgbImage::from_raw(w, h, samples).map(DynamicImage::ImageRgb8),
        (4, true) | (4, false) => {
            RgbaImage::from_raw(w, h, samples).map(DynamicImage::ImageRgba8)
        }
        (channels, alpha) => {
            return Err(decode_error(
                id,
                format!("unsupported layout: {channels} channels, alpha={alpha}"),
            ))
        }
    }
    .ok_or_else(|| decode_error(id, "sample buffer does not match dimensions".into()))?;

    if image.colorants() < 4 {
        debug!("{}: {:?} → Rgb8", id.stem(), decoded.color());
        Ok(DynamicImage::ImageRgb8(decoded.to_rgb8()))
    } else {
        Ok(decoded)
    }
}

/// Single-channel luminance copy of `image`.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Write `image` as `{folder}/page_{p}_image_{i}.jpeg`, overwriting any
/// existing file, and return the path.
pub fn save_image(image: &GrayImage, folder: &Path, id: ImageId) -> Result<PathBuf, PdfOcrError> {
    let path = folder.join(format!("{}.jpeg", id.stem()));
    image
        .save_with_format(&path, ImageFormat::Jpeg)
        .map_err(|e| PdfOcrError::ImageWriteFailed {
            path: path.clone(),
            source: e,
        })?;
    debug!("Saved {}", path.display());
    Ok(path)
}

fn decode_error(id: ImageId, detail: String) -> PdfOcrError {
    PdfOcrError::ImageDecodeFailed {
        page: id.page_num(),
        image: id.image_num(),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ColorType;

    fn embedded(channels: u8, has_alpha: bool, samples: Vec<u8>, w: u32, h: u32) -> EmbeddedImage {
        EmbeddedImage {
            id: ImageId::new(0, 0),
            width: w,
            height: h,
            channels,
            has_alpha,
            samples,
        }
    }

    #[test]
    fn gray_becomes_rgb() {
        let img = normalize_color_space(&embedded(1, false, vec![10, 20], 2, 1)).unwrap();
        assert_eq!(img.color(), ColorType::Rgb8);
        let rgb = img.to_rgb8();
        assert_eq!(rgb.get_pixel(1, 0).0, [20, 20, 20]);
    }

    #[test]
    fn rgba_drops_alpha() {
        let img = normalize_color_space(&embedded(4, true, vec![1, 2, 3, 0], 1, 1)).unwrap();
        assert_eq!(img.color(), ColorType::Rgb8);
        assert_eq!(img.to_rgb8().get_pixel(0, 0).0, [1, 2, 3]);
    }

    #[test]
    fn four_colorants_pass_through() {
        let samples = vec![9, 8, 7, 6];
        let img = normalize_color_space(&embedded(4, false, samples.clone(), 1, 1)).unwrap();
        assert_eq!(img.color(), ColorType::Rgba8);
        assert_eq!(img.as_bytes(), samples.as_slice());
    }

    #[test]
    fn short_buffer_rejected() {
        let err = normalize_color_space(&embedded(3, false, vec![0; 5], 1, 2)).unwrap_err();
        assert!(matches!(err, PdfOcrError::ImageDecodeFailed { page: 1, image: 1, .. }));
    }

    #[test]
    fn unsupported_layout_rejected() {
        let err = normalize_color_space(&embedded(5, true, vec![0; 5], 1, 1)).unwrap_err();
        assert!(err.to_string().contains("unsupported layout"));
    }

    #[test]
    fn grayscale_uses_luminance() {
        let rgb = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, image::Rgb([255, 255, 255])));
        let gray = to_grayscale(&rgb);
        assert_eq!(gray.dimensions(), (2, 2));
        assert_eq!(gray.get_pixel(0, 0).0, [255]);
    }

    #[test]
    fn save_image_names_file_one_based() {
        let dir = tempfile::tempdir().unwrap();
        let gray = GrayImage::from_pixel(4, 4, image::Luma([128]));
        let path = save_image(&gray, dir.path(), ImageId::new(2, 0)).unwrap();
        assert_eq!(path, dir.path().join("page_3_image_1.jpeg"));
        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.width(), 4);
    }

    #[test]
    fn save_image_into_missing_folder_fails() {
        let dir = tempfile::tempdir().unwrap();
        let gray = GrayImage::new(1, 1);
        let err = save_image(&gray, &dir.path().join("nope"), ImageId::new(0, 0)).unwrap_err();
        assert!(matches!(err, PdfOcrError::ImageWriteFailed { .. }));
    }
}
