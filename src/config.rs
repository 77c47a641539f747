//! Engine configuration
//!
//! Host-supplied defaults loaded from JSON. Every field is optional; missing
//! fields take their defaults. The engine itself only reads `logging` (via
//! [`crate::logging::init`]); the other fields are defaults the host passes
//! to the explicit parameters of [`crate::Document`] and the codec.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::Gb7EncodeOptions;
use crate::curves::CurveSemantic;
use crate::error::{RastraError, Result};
use crate::resample::ResampleMethod;

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `"info"` or `"rastra=debug"`
    pub level: String,
    /// Include the event target (module path) in each line
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: false,
        }
    }
}

/// Engine-wide defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub logging: LoggingConfig,
    /// Default options for [`crate::encode_gb7`]
    pub gb7: Gb7EncodeOptions,
    /// Default for [`crate::Document::preview_curves`]
    pub curve_semantic: CurveSemantic,
    /// Default for [`crate::Document::resize`] and
    /// [`crate::Document::add_fitted_image_layer`]
    pub resample_method: ResampleMethod,
}

impl EngineConfig {
    /// Parse a JSON document
    ///
    /// # Errors
    /// `Serialization` for malformed JSON, `Config` for invalid values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            return Err(RastraError::Config {
                reason: "logging.level must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::MaskLayout;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.gb7.alpha_opaque_threshold, 128);
        assert_eq!(config.curve_semantic, CurveSemantic::Ramped);
        assert_eq!(config.resample_method, ResampleMethod::Bilinear);
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json(
            r#"{
                "logging": { "level": "rastra=debug" },
                "gb7": { "force_alpha_mask": true, "mask_layout": "plane" },
                "resample_method": "nearest"
            }"#,
        )
        .unwrap();
        assert_eq!(config.logging.level, "rastra=debug");
        assert!(!config.logging.with_target);
        assert!(config.gb7.force_alpha_mask);
        assert_eq!(config.gb7.mask_layout, MaskLayout::Plane);
        assert_eq!(config.gb7.alpha_opaque_threshold, 128);
        assert_eq!(config.resample_method, ResampleMethod::Nearest);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_json(r#"{"logging": {"level": " "}}"#).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");

        let err = EngineConfig::from_json("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_from_path_round_trip() {
        let mut config = EngineConfig::default();
        config.curve_semantic = CurveSemantic::Clamped;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(config.to_json().unwrap().as_bytes()).unwrap();

        let loaded = EngineConfig::from_path(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_defaults_drive_document_calls() {
        use crate::codec::{decode_gb7_with_mask_plane, encode_gb7};
        use crate::curves::ChannelCurves;
        use crate::engine::PixelBuffer;
        use crate::layers::Document;

        let config = EngineConfig::from_json(
            r#"{ "gb7": { "mask_layout": "plane" }, "resample_method": "nearest" }"#,
        )
        .unwrap();

        let mut doc = Document::from_rgba(PixelBuffer::from_raw(2, 1, vec![
            0, 0, 0, 255, 255, 255, 255, 0,
        ])
        .unwrap());
        doc.resize(4, 1, config.resample_method);
        let flat = doc
            .preview_curves(&ChannelCurves::default(), config.curve_semantic)
            .unwrap();
        // nearest duplicates, bilinear would blend the middle pixels
        assert_eq!(flat.pixel(1, 0), [0, 0, 0, 255]);

        let bytes = encode_gb7(&flat, &config.gb7).unwrap();
        let gray = decode_gb7_with_mask_plane(&bytes).unwrap();
        assert!(gray.is_opaque_at(1, 0));
        assert!(!gray.is_opaque_at(2, 0));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EngineConfig::from_path(Path::new("/nonexistent/rastra.json")).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
