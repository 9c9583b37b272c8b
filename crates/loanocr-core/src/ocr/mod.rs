//! OCR adapter: image preprocessing and the text recognition seam.

mod preprocessing;
#[cfg(feature = "native")]
mod pure_engine;

pub use preprocessing::ImagePreprocessor;
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// An OCR engine turning an image into text.
///
/// The engine is a black box to the rest of the pipeline: any failure it
/// reports aborts the current upload.
pub trait OcrBackend {
    /// Recognize text regions in an image.
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError>;

    /// Recognize and return the full text only.
    fn extract_text(&self, image: &DynamicImage) -> Result<String, OcrError> {
        Ok(self.recognize(image)?.text)
    }
}

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Detected and recognized text boxes.
    pub boxes: Vec<TextBox>,

    /// Full text, one line per row of boxes.
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Build a result from text boxes, ordering them and rebuilding the full text.
    pub fn from_boxes(
        boxes: Vec<TextBox>,
        image_size: (u32, u32),
        processing_time_ms: u64,
    ) -> Self {
        let mut result = Self {
            boxes,
            text: String::new(),
            processing_time_ms,
            image_size,
        };
        result.sort_by_reading_order();
        result
    }

    /// Sort boxes by reading order (top-to-bottom, left-to-right).
    ///
    /// Boxes on the same row are joined with a space, rows with a newline.
    pub fn sort_by_reading_order(&mut self) {
        self.boxes.sort_by(|a, b| {
            let (ax, _, _, _) = a.rect();
            let (bx, _, _, _) = b.rect();

            match row_of(a).cmp(&row_of(b)) {
                std::cmp::Ordering::Equal => {
                    ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
                }
                other => other,
            }
        });

        let mut text = String::new();
        let mut current_row = None;
        for text_box in &self.boxes {
            let row = row_of(text_box);
            match current_row {
                Some(r) if r == row => text.push(' '),
                Some(_) => text.push('\n'),
                None => {}
            }
            text.push_str(&text_box.text);
            current_row = Some(row);
        }
        self.text = text;
    }
}

/// Boxes within 20 pixels vertically share a row.
fn row_of(text_box: &TextBox) -> i32 {
    let (_, y, _, _) = text_box.rect();
    (y / 20.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_box(x: f32, y: f32, text: &str) -> TextBox {
        TextBox {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 10.0, x, y + 10.0],
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_reading_order() {
        let result = OcrResult::from_boxes(
            vec![
                text_box(0.0, 45.0, "Mobile: 9876543210"),
                text_box(120.0, 2.0, "John Doe"),
                text_box(0.0, 5.0, "Name:"),
            ],
            (400, 100),
            12,
        );

        assert_eq!(result.text, "Name: John Doe\nMobile: 9876543210");
        assert_eq!(result.boxes[0].text, "Name:");
    }

    #[test]
    fn test_same_row_boxes_keep_full_line() {
        let result = OcrResult::from_boxes(
            vec![
                text_box(200.0, 41.0, "Bengaluru"),
                text_box(0.0, 40.0, "Address: 12 MG Road,"),
                text_box(0.0, 70.0, "Employer: Acme"),
            ],
            (400, 100),
            0,
        );

        assert_eq!(result.text, "Address: 12 MG Road, Bengaluru\nEmployer: Acme");
    }

    #[test]
    fn test_no_boxes() {
        let result = OcrResult::from_boxes(Vec::new(), (10, 20), 0);
        assert_eq!(result.text, "");
        assert_eq!(result.image_size, (10, 20));
    }
}
