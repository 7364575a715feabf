//! Flat-part value types shared by both export paths.

use crate::error::DimensionError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A circular hole in a part, in the part's own local frame.
///
/// Coordinates follow the same convention the shape uses for its outline:
/// the local origin is the shape's bottom-left bounding corner. Holes are
/// expected, but not required, to lie inside the shape's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    /// Hole diameter (mm).
    pub diameter: f64,
    /// X position of the hole center (mm).
    pub x: f64,
    /// Y position of the hole center (mm).
    pub y: f64,
}

/// The supported flat-part outlines.
///
/// All dimensions are raw millimeters. `Unknown` carries a shape tag that
/// did not match the fixed set; it exists only so malformed external input
/// flows through the pipeline to a placeholder page / export failure instead
/// of aborting the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned rectangle.
    Rectangle { width: f64, height: f64 },
    /// Full circle.
    Circle { diameter: f64 },
    /// Right triangle with the right angle at the local origin.
    RightTriangle { base: f64, height: f64 },
    /// Isosceles trapezoid, large base down.
    Trapezoid {
        large_base: f64,
        small_base: f64,
        height: f64,
    },
    /// A shape tag outside the known set, kept for error reporting.
    Unknown(String),
}

impl Shape {
    /// Short lowercase name used in log and placeholder messages.
    pub fn display_name(&self) -> &str {
        match self {
            Shape::Rectangle { .. } => "rectangle",
            Shape::Circle { .. } => "circle",
            Shape::RightTriangle { .. } => "right triangle",
            Shape::Trapezoid { .. } => "trapezoid",
            Shape::Unknown(tag) => tag.as_str(),
        }
    }

    /// Check that every required dimension is strictly positive.
    ///
    /// `Unknown` passes; the dispatch sites reject it separately so the
    /// reported error names the tag rather than a dimension.
    pub fn validate(&self) -> Result<(), DimensionError> {
        let reject = |shape, field, value: f64| {
            if value <= 0.0 {
                Err(DimensionError { shape, field, value })
            } else {
                Ok(())
            }
        };
        match *self {
            Shape::Rectangle { width, height } => {
                reject("rectangle", "width", width)?;
                reject("rectangle", "height", height)
            }
            Shape::Circle { diameter } => reject("circle", "diameter", diameter),
            Shape::RightTriangle { base, height } => {
                reject("right triangle", "base", base)?;
                reject("right triangle", "height", height)
            }
            Shape::Trapezoid {
                large_base,
                small_base,
                height,
            } => {
                reject("trapezoid", "large base", large_base)?;
                reject("trapezoid", "small base", small_base)?;
                reject("trapezoid", "height", height)
            }
            Shape::Unknown(_) => Ok(()),
        }
    }

    /// Raw bounding extents (mm) before any page scaling.
    pub fn extents(&self) -> (f64, f64) {
        match *self {
            Shape::Rectangle { width, height } => (width, height),
            Shape::Circle { diameter } => (diameter, diameter),
            Shape::RightTriangle { base, height } => (base, height),
            Shape::Trapezoid {
                large_base, height, ..
            } => (large_base, height),
            Shape::Unknown(_) => (0.0, 0.0),
        }
    }

    /// Closed outline vertices in local millimeters for the polygonal
    /// variants. Circles (and unknown tags) have no polygon outline.
    pub fn outline(&self) -> Option<Vec<(f64, f64)>> {
        match *self {
            Shape::Rectangle { width, height } => Some(vec![
                (0.0, 0.0),
                (width, 0.0),
                (width, height),
                (0.0, height),
            ]),
            Shape::RightTriangle { base, height } => {
                Some(vec![(0.0, 0.0), (base, 0.0), (0.0, height)])
            }
            Shape::Trapezoid {
                large_base,
                small_base,
                height,
            } => {
                let inset = (large_base - small_base) / 2.0;
                Some(vec![
                    (0.0, 0.0),
                    (large_base, 0.0),
                    (large_base - inset, height),
                    (inset, height),
                ])
            }
            Shape::Circle { .. } | Shape::Unknown(_) => None,
        }
    }
}

/// A fully normalized part, immutable for the duration of one render call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDescriptor {
    /// Part name; sanitized before use as a filename.
    pub name: String,
    /// Outline geometry.
    pub shape: Shape,
    /// Material thickness (mm). `None` when the record had no thickness,
    /// which routes the part into the sentinel "no-thickness" group.
    pub thickness: Option<f64>,
    /// Number of pieces to cut; display only.
    pub quantity: u32,
    /// Holes in input order.
    pub holes: Vec<Hole>,
}

static FILENAME_SANITIZER: OnceLock<Regex> = OnceLock::new();

/// Collapse every run of non-word characters (except `.` and `-`) to a
/// single underscore, so part names are safe as archive entry names.
pub fn sanitize_filename(name: &str) -> String {
    let re = FILENAME_SANITIZER.get_or_init(|| Regex::new(r"[^\w.-]+").expect("valid pattern"));
    re.replace_all(name, "_").into_owned()
}
