use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine settings, deserializable from a JSON file.
///
/// Every field has a default so a partial settings file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Maximum working photo width in pixels. Larger uploads are downscaled.
    pub max_width: usize,

    /// Maximum working photo height in pixels. Larger uploads are downscaled.
    pub max_height: usize,

    /// JPEG quality used when re-encoding an upload into the working photo.
    pub normalize_quality: u8,

    /// JPEG quality used for exported frames.
    pub export_quality: u8,

    /// Width in pixels of the darkened ring along the selection boundary.
    pub edge_ring_width: usize,

    /// Product name used as the exported filename prefix.
    pub product_name: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            normalize_quality: 92,
            export_quality: 95,
            edge_ring_width: 5,
            product_name: String::from("lithovision"),
        }
    }
}

impl RenderSettings {
    /// Load settings from a JSON file, falling back to defaults for
    /// fields the file omits.
    pub fn from_json_file(file_path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let contents = std::fs::read_to_string(file_path.as_ref())
            .map_err(|e| RenderError::Config(e.to_string()))?;
        let settings: Self =
            serde_json::from_str(&contents).map_err(|e| RenderError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(RenderError::Config(String::from(
                "max_width and max_height must be non-zero",
            )));
        }
        if self.normalize_quality > 100 || self.export_quality > 100 {
            return Err(RenderError::Config(String::from(
                "JPEG quality must be in 0..=100",
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = RenderSettings::default();
        assert_eq!(settings.max_width, 1920);
        assert_eq!(settings.max_height, 1080);
        assert_eq!(settings.normalize_quality, 92);
        assert_eq!(settings.export_quality, 95);
        assert_eq!(settings.edge_ring_width, 5);
        assert_eq!(settings.product_name, "lithovision");
    }

    #[test]
    fn partial_json_file() -> Result<(), RenderError> {
        let tmp_dir = tempfile::tempdir().map_err(|e| RenderError::Config(e.to_string()))?;
        let file_path = tmp_dir.path().join("settings.json");
        std::fs::write(&file_path, r#"{"export_quality": 80}"#)
            .map_err(|e| RenderError::Config(e.to_string()))?;

        let settings = RenderSettings::from_json_file(&file_path)?;
        assert_eq!(settings.export_quality, 80);
        assert_eq!(settings.max_width, 1920);
        Ok(())
    }

    #[test]
    fn rejects_invalid_quality() -> Result<(), RenderError> {
        let tmp_dir = tempfile::tempdir().map_err(|e| RenderError::Config(e.to_string()))?;
        let file_path = tmp_dir.path().join("settings.json");
        std::fs::write(&file_path, r#"{"export_quality": 250}"#)
            .map_err(|e| RenderError::Config(e.to_string()))?;

        let result = RenderSettings::from_json_file(&file_path);
        assert!(matches!(result, Err(RenderError::Config(_))));
        Ok(())
    }
}
