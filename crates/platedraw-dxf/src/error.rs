//! Export error types.

use platedraw_core::DimensionError;
use thiserror::Error;

/// Errors from exporting one part or writing the batch archive.
///
/// Per-part failures (`UnknownShape`, `InvalidDimension`) are skippable:
/// the batch logs a warning and moves on. `Dxf`, `Zip` and `Io` indicate
/// the output sink itself failed and abort the DXF artifact.
#[derive(Error, Debug)]
pub enum GeometryError {
    /// The shape tag matched none of the supported outlines.
    #[error("unknown shape '{0}'")]
    UnknownShape(String),
    /// A required dimension was zero or negative.
    #[error(transparent)]
    InvalidDimension(#[from] DimensionError),
    /// The DXF serializer failed.
    #[error("DXF write failed: {0}")]
    Dxf(#[from] dxf::DxfError),
    /// The archive writer failed.
    #[error("zip write failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GeometryError {
    /// Whether the batch should skip this part and continue.
    pub fn is_part_level(&self) -> bool {
        matches!(
            self,
            GeometryError::UnknownShape(_) | GeometryError::InvalidDimension(_)
        )
    }
}
