//! # Platedraw DXF
//!
//! Geometry-only DXF export for the cutting path: the part contour on one
//! layer, its holes on another, in native millimeters with no scaling and
//! no dimension or annotation entities. Exported files are batched into a
//! timestamped zip archive, one entry per part.

pub mod archive;
pub mod error;
pub mod writer;

pub use archive::{archive_filename, GeometryArchive};
pub use error::GeometryError;
pub use writer::{export_part, export_part_with, GeometryFile, LayerScheme};
