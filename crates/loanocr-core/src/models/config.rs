//! Configuration structures for the intake pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the loanocr pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanOcrConfig {
    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Image preprocessing configuration.
    pub preprocessing: PreprocessingConfig,

    /// OCR text normalization configuration.
    pub normalization: NormalizationConfig,

    /// Record store configuration.
    pub store: StoreConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens emitted by the recognizer instead of blanking them.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

impl OcrConfig {
    pub fn detection_path(&self) -> PathBuf {
        self.model_dir.join(&self.detection_model)
    }

    pub fn recognition_path(&self) -> PathBuf {
        self.model_dir.join(&self.recognition_model)
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.model_dir.join(&self.dictionary)
    }

    /// Whether the detection and recognition models are on disk.
    pub fn models_present(&self) -> bool {
        self.detection_path().exists() && self.recognition_path().exists()
    }
}

/// Image preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Run non-local-means denoising before binarization.
    pub denoise: bool,

    /// Filter strength `h`; larger removes more noise and more detail.
    pub denoise_strength: f32,

    /// Side of the square patch compared between pixels (odd).
    pub template_window: u32,

    /// Side of the square area searched for similar patches (odd).
    pub search_window: u32,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            denoise: true,
            denoise_strength: 30.0,
            template_window: 7,
            search_window: 21,
        }
    }
}

/// OCR text normalization configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Only repair "example com" into "example.com" right after an `@domain` token.
    pub scoped_com_repair: bool,
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// CSV file receiving submitted applications.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("loan_applications.csv"),
        }
    }
}

impl LoanOcrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = LoanOcrConfig::default();
        assert_eq!(config.preprocessing.denoise_strength, 30.0);
        assert!(config.preprocessing.denoise);
        assert!(!config.normalization.scoped_com_repair);
        assert_eq!(config.store.path, PathBuf::from("loan_applications.csv"));
        assert_eq!(config.ocr.detection_path(), PathBuf::from("models/det.onnx"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LoanOcrConfig =
            serde_json::from_str(r#"{"store": {"path": "out/apps.csv"}}"#).unwrap();
        assert_eq!(config.store.path, PathBuf::from("out/apps.csv"));
        assert_eq!(config.preprocessing.search_window, 21);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = LoanOcrConfig::default();
        config.normalization.scoped_com_repair = true;
        config.save(&path).unwrap();

        let loaded = LoanOcrConfig::from_file(&path).unwrap();
        assert!(loaded.normalization.scoped_com_repair);
    }
}
