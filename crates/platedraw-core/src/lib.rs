//! # Platedraw Core
//!
//! Shared value types and input normalization for the drawing generators.
//!
//! ## Core Components
//!
//! - **Part model**: the four supported flat-part shapes (rectangle, circle,
//!   right triangle, trapezoid), circular holes, and the part descriptor that
//!   both export paths consume.
//! - **Record normalization**: turns producer-facing raw records (string-keyed
//!   maps with locale-formatted numbers) into canonical [`PartDescriptor`]s.
//!   This is the single place the PDF and DXF paths agree on input
//!   interpretation.
//! - **Number formatting**: the millimeter display policy shared by dimension
//!   labels, hole call-outs and the footer table.
//!
//! All dimensions are millimeters. Descriptors are immutable per render call
//! and never cached across parts.

pub mod error;
pub mod format;
pub mod part;
pub mod record;

pub use error::{DimensionError, NormalizeError};
pub use format::{format_mm, parse_mm, DecimalStyle};
pub use part::{sanitize_filename, Hole, PartDescriptor, Shape};
pub use record::{normalize, raw_thickness, RawRecord};
