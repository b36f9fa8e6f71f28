//! Errors reported by rendering, logo loading and export.

use thiserror::Error;

/// Why an export could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPrecondition {
    /// No QR code has been rendered successfully in this session.
    NotGenerated,
    /// A QR code was rendered once, but there is no surface to read now.
    CanvasNotFound,
}

impl std::fmt::Display for ExportPrecondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportPrecondition::NotGenerated => f.write_str("Generate a QR code first to download it."),
            ExportPrecondition::CanvasNotFound => f.write_str("QR code not found for download."),
        }
    }
}

#[derive(Error, Debug)]
pub enum QrError {
    #[error("Please enter content to generate the QR code.")]
    Validation,
    #[error("Error generating QR code: {0}")]
    Render(String),
    #[error("{0}")]
    ExportPrecondition(ExportPrecondition),
    #[error("Could not decode logo image: {0}")]
    LogoDecode(#[source] image::ImageError),
    #[error("Could not read logo file: {0}")]
    LogoRead(String),
    #[error("Could not encode PNG: {0}")]
    Encode(#[source] image::ImageError),
    #[error("Could not save file: {0}")]
    Save(#[from] std::io::Error),
    #[error("Invalid color '{0}', expected #rrggbb or #rgb")]
    InvalidColor(String),
    #[error(transparent)]
    Settings(#[from] serde_json::Error),
}

impl From<ExportPrecondition> for QrError {
    fn from(value: ExportPrecondition) -> Self {
        QrError::ExportPrecondition(value)
    }
}
