//! Image preprocessing for OCR.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::PreprocessingConfig;

/// Turns an uploaded image into a black-and-white image suited for OCR.
///
/// Steps: decode, grayscale, non-local-means denoising, Otsu binarization.
pub struct ImagePreprocessor {
    /// Run the denoising step.
    denoise: bool,
    /// Filter strength `h`.
    strength: f32,
    /// Patch side compared between pixels.
    template_window: u32,
    /// Side of the area searched for similar patches.
    search_window: u32,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with default settings (h = 30, 7x7 patches, 21x21 search).
    pub fn new() -> Self {
        Self {
            denoise: true,
            strength: 30.0,
            template_window: 7,
            search_window: 21,
        }
    }

    /// Create a preprocessor from configuration.
    pub fn from_config(config: &PreprocessingConfig) -> Self {
        Self::new()
            .with_denoise(config.denoise)
            .with_strength(config.denoise_strength)
            .with_windows(config.template_window, config.search_window)
    }

    /// Enable or disable denoising.
    pub fn with_denoise(mut self, denoise: bool) -> Self {
        self.denoise = denoise;
        self
    }

    /// Set the denoising strength `h`.
    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    /// Set template and search window sizes. Even sizes are bumped to the next odd size.
    pub fn with_windows(mut self, template_window: u32, search_window: u32) -> Self {
        self.template_window = template_window.max(1) | 1;
        self.search_window = search_window.max(1) | 1;
        self
    }

    /// Decode uploaded bytes into an image.
    pub fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, OcrError> {
        image::load_from_memory(bytes).map_err(|e| OcrError::InvalidImage(e.to_string()))
    }

    /// Decode and preprocess uploaded bytes.
    pub fn preprocess(&self, bytes: &[u8]) -> Result<GrayImage, OcrError> {
        let image = self.decode(bytes)?;
        Ok(self.preprocess_image(&image))
    }

    /// Preprocess an already decoded image.
    pub fn preprocess_image(&self, image: &DynamicImage) -> GrayImage {
        debug!("Preprocessing image: {}x{}", image.width(), image.height());

        let gray = self.to_grayscale(image);
        let cleaned = if self.denoise {
            self.non_local_means(&gray)
        } else {
            gray
        };

        self.binarize(&cleaned)
    }

    /// Convert to a single channel using BT.601 luma weights.
    pub fn to_grayscale(&self, image: &DynamicImage) -> GrayImage {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut gray = GrayImage::new(width, height);

        for (x, y, pixel) in rgb.enumerate_pixels() {
            let [r, g, b] = pixel.0;
            let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
            gray.put_pixel(x, y, Luma([luma.round().clamp(0.0, 255.0) as u8]));
        }

        gray
    }

    /// Global binarization at the Otsu level: pixels above it become white.
    pub fn binarize(&self, gray: &GrayImage) -> GrayImage {
        let level = otsu_level(gray);
        debug!("Otsu threshold level: {}", level);
        threshold(gray, level, ThresholdType::Binary)
    }

    /// Non-local-means denoising.
    ///
    /// Each output pixel is the average of pixels in the search window, weighted
    /// by `exp(-d / h^2)` where `d` is the mean squared difference of the patches
    /// around both pixels. Patch distances come from one integral image per search
    /// offset. Borders replicate the edge pixels.
    fn non_local_means(&self, gray: &GrayImage) -> GrayImage {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return gray.clone();
        }

        let w = width as usize;
        let h = height as usize;
        let tr = (self.template_window / 2) as usize;
        let sr = (self.search_window / 2) as usize;
        let pad = tr + sr;

        let pw = w + 2 * pad;
        let ph = h + 2 * pad;
        let mut padded = vec![0f32; pw * ph];
        for y in 0..ph {
            let sy = y.saturating_sub(pad).min(h - 1) as u32;
            for x in 0..pw {
                let sx = x.saturating_sub(pad).min(w - 1) as u32;
                padded[y * pw + x] = gray.get_pixel(sx, sy)[0] as f32;
            }
        }

        // Patch centers span the image plus a template radius on each side.
        let k = 2 * tr + 1;
        let rw = w + 2 * tr;
        let rh = h + 2 * tr;
        let iw = rw + 1;
        let origin = pad - tr;
        let area = (k * k) as f64;
        let h2 = (self.strength as f64).powi(2).max(f64::EPSILON);

        let mut weight_sum = vec![0f64; w * h];
        let mut value_sum = vec![0f64; w * h];
        let mut integral = vec![0f64; iw * (rh + 1)];

        let radius = sr as isize;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                for ry in 0..rh {
                    let py = origin + ry;
                    let qy = (py as isize + dy) as usize;
                    let mut row_acc = 0f64;
                    for rx in 0..rw {
                        let px = origin + rx;
                        let qx = (px as isize + dx) as usize;
                        let diff = (padded[py * pw + px] - padded[qy * pw + qx]) as f64;
                        row_acc += diff * diff;
                        integral[(ry + 1) * iw + rx + 1] = integral[ry * iw + rx + 1] + row_acc;
                    }
                }

                for y in 0..h {
                    for x in 0..w {
                        let ssd = integral[(y + k) * iw + x + k] - integral[y * iw + x + k]
                            - integral[(y + k) * iw + x]
                            + integral[y * iw + x];
                        let weight = (-(ssd / area).max(0.0) / h2).exp();

                        let qy = ((y + pad) as isize + dy) as usize;
                        let qx = ((x + pad) as isize + dx) as usize;
                        weight_sum[y * w + x] += weight;
                        value_sum[y * w + x] += weight * padded[qy * pw + qx] as f64;
                    }
                }
            }
        }

        let mut result = GrayImage::new(width, height);
        for y in 0..h {
            for x in 0..w {
                let i = y * w + x;
                let value = (value_sum[i] / weight_sum[i]).round().clamp(0.0, 255.0) as u8;
                result.put_pixel(x as u32, y as u32, Luma([value]));
            }
        }

        result
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode_png(image: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn two_tone(width: u32, height: u32, dark: u8, light: u8) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| {
            if x < width / 2 { Luma([dark]) } else { Luma([light]) }
        })
    }

    #[test]
    fn test_decode_failure() {
        let preprocessor = ImagePreprocessor::new();
        let err = preprocessor.preprocess(b"definitely not an image").unwrap_err();
        assert!(matches!(err, OcrError::InvalidImage(_)));

        let err = preprocessor.preprocess(&[]).unwrap_err();
        assert!(matches!(err, OcrError::InvalidImage(_)));
    }

    #[test]
    fn test_grayscale_weights() {
        let preprocessor = ImagePreprocessor::new();
        let rgb = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            _ => Rgb([90, 90, 90]),
        });

        let gray = preprocessor.to_grayscale(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(gray.get_pixel(0, 0)[0], 76);
        assert_eq!(gray.get_pixel(1, 0)[0], 150);
        assert_eq!(gray.get_pixel(2, 0)[0], 90);
    }

    #[test]
    fn test_binarize_separates_two_tones() {
        let preprocessor = ImagePreprocessor::new();
        let binary = preprocessor.binarize(&two_tone(8, 4, 30, 220));

        assert_eq!(binary.get_pixel(0, 0)[0], 0);
        assert_eq!(binary.get_pixel(7, 3)[0], 255);
    }

    #[test]
    fn test_denoise_keeps_flat_image() {
        let preprocessor = ImagePreprocessor::new().with_windows(3, 5);
        let flat = GrayImage::from_pixel(6, 6, Luma([128]));

        let denoised = preprocessor.non_local_means(&flat);
        assert!(denoised.pixels().all(|p| p[0] == 128));
    }

    #[test]
    fn test_denoise_suppresses_isolated_spike() {
        let preprocessor = ImagePreprocessor::new();
        let mut noisy = GrayImage::from_pixel(15, 15, Luma([100]));
        noisy.put_pixel(7, 7, Luma([200]));

        let denoised = preprocessor.non_local_means(&noisy);
        assert!(denoised.get_pixel(7, 7)[0] < 150);
        assert!((denoised.get_pixel(0, 0)[0] as i32 - 100).abs() <= 2);
    }

    #[test]
    fn test_preprocess_outputs_black_and_white() {
        let preprocessor = ImagePreprocessor::new().with_windows(3, 5);
        let bytes = encode_png(DynamicImage::ImageLuma8(two_tone(10, 6, 20, 235)));

        let result = preprocessor.preprocess(&bytes).unwrap();
        assert_eq!(result.dimensions(), (10, 6));
        assert!(result.pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert_eq!(result.get_pixel(0, 0)[0], 0);
        assert_eq!(result.get_pixel(9, 5)[0], 255);
    }

    #[test]
    fn test_even_windows_become_odd() {
        let preprocessor = ImagePreprocessor::new().with_windows(6, 20);
        assert_eq!(preprocessor.template_window, 7);
        assert_eq!(preprocessor.search_window, 21);
    }
}
