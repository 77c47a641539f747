//! Error handling for Rastra
//!
//! Every error carries a stable code and, where it makes sense, recovery
//! suggestions the host can surface to the user.

use thiserror::Error;

/// Result type alias for Rastra operations
pub type Result<T> = std::result::Result<T, RastraError>;

/// Main error type for Rastra operations
#[derive(Error, Debug)]
pub enum RastraError {
    // GB7 Format Errors
    #[error("Not a GB7 stream: bad magic {found:02X?}")]
    InvalidMagic { found: Vec<u8> },

    #[error("GB7 reserved header field must be 0x0000, found {value:#06X}")]
    ReservedNotZero { value: u16 },

    #[error("GB7 stream truncated: need {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Image {width}x{height} exceeds the GB7 limit of 65535x65535")]
    DimensionsTooLarge { width: u32, height: u32 },

    // Buffer Errors
    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    // Document Errors
    #[error("Layer not found: {id}")]
    LayerNotFound { id: String },

    #[error("No active layer selected")]
    NoActiveLayer,

    #[error("Dimension mismatch: expected {}x{}, got {}x{}", expected.0, expected.1, actual.0, actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RastraError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            RastraError::InvalidMagic { .. } => "INVALID_MAGIC",
            RastraError::ReservedNotZero { .. } => "RESERVED_NOT_ZERO",
            RastraError::Truncated { .. } => "TRUNCATED",
            RastraError::DimensionsTooLarge { .. } => "DIMENSIONS_TOO_LARGE",
            RastraError::BufferSizeMismatch { .. } => "BUFFER_SIZE_MISMATCH",
            RastraError::LayerNotFound { .. } => "LAYER_NOT_FOUND",
            RastraError::NoActiveLayer => "NO_ACTIVE_LAYER",
            RastraError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            RastraError::Config { .. } => "CONFIG_ERROR",
            RastraError::Io(_) => "IO_ERROR",
            RastraError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error came from parsing or producing a GB7 stream
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            RastraError::InvalidMagic { .. }
                | RastraError::ReservedNotZero { .. }
                | RastraError::Truncated { .. }
                | RastraError::DimensionsTooLarge { .. }
        )
    }

    /// Check if this error is recoverable
    ///
    /// Format errors are always recoverable: the host rejects the file and
    /// keeps the current document.
    pub fn is_recoverable(&self) -> bool {
        match self {
            _ if self.is_format_error() => true,
            RastraError::LayerNotFound { .. } => true,
            RastraError::NoActiveLayer => true,
            RastraError::DimensionMismatch { .. } => true,
            RastraError::Config { .. } => true,
            _ => false,
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            RastraError::InvalidMagic { .. } => vec![
                "The file is not a GB7 image",
                "Open it with a generic image decoder instead",
            ],
            RastraError::ReservedNotZero { .. } => vec![
                "The file was written by an incompatible GB7 encoder",
                "Re-export the image from its source",
            ],
            RastraError::Truncated { .. } => vec![
                "The file is incomplete - try downloading or copying it again",
            ],
            RastraError::DimensionsTooLarge { .. } => vec![
                "Scale the image below 65536 pixels per side before exporting",
                "Export to a generic raster format instead",
            ],
            RastraError::NoActiveLayer => vec!["Select a layer before applying curves or filters"],
            RastraError::DimensionMismatch { .. } => vec![
                "Resample the buffer to the document size before committing",
            ],
            _ => vec![],
        }
    }
}
