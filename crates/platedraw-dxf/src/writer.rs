//! Per-part DXF generation.
//!
//! Geometry is written in native millimeters, unscaled, with the part's
//! local origin at the DXF origin. Contours become closed LWPOLYLINEs
//! (a CIRCLE for the circular blank); holes become CIRCLEs on their own
//! layer so downstream CAM can select them independently.

use chrono::{DateTime, Local, Utc};
use dxf::entities::{Circle, Entity, EntityType, LwPolyline};
use dxf::enums::AcadVersion;
use dxf::tables::Layer;
use dxf::{Color, Drawing, LwPolylineVertex, Point};
use tracing::debug;

use platedraw_core::{sanitize_filename, PartDescriptor, Shape};

use crate::error::GeometryError;

/// Layer names and colors for the export.
///
/// The dimension and annotation layers are defined but disabled by
/// default: this export feeds cutting, and measured geometry must carry
/// no text or dimension entities that a CAM import could mistake for
/// toolpaths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerScheme {
    pub contour: &'static str,
    pub contour_color: u8,
    pub holes: &'static str,
    pub holes_color: u8,
    /// When set, an empty layer reserved for dimension entities.
    pub dimensions: Option<&'static str>,
    /// When set, an empty layer reserved for annotation text.
    pub annotations: Option<&'static str>,
}

impl Default for LayerScheme {
    fn default() -> Self {
        Self {
            contour: "CONTOUR",
            contour_color: 1,
            holes: "HOLES",
            holes_color: 3,
            dimensions: None,
            annotations: None,
        }
    }
}

/// One exported part: the archive entry name and the DXF bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Export one part with the default layer scheme.
pub fn export_part(part: &PartDescriptor) -> Result<GeometryFile, GeometryError> {
    export_part_with(part, LayerScheme::default())
}

/// Export one part as a standalone DXF file.
///
/// Output is a pure function of the descriptor: identical descriptors
/// produce byte-identical files, so header timestamps are pinned.
pub fn export_part_with(
    part: &PartDescriptor,
    scheme: LayerScheme,
) -> Result<GeometryFile, GeometryError> {
    if let Shape::Unknown(tag) = &part.shape {
        return Err(GeometryError::UnknownShape(tag.clone()));
    }
    part.shape.validate()?;

    let mut drawing = Drawing::new();
    drawing.header.version = AcadVersion::R2000;
    pin_header_dates(&mut drawing);

    add_layer(&mut drawing, scheme.contour, scheme.contour_color);
    if !part.holes.is_empty() {
        add_layer(&mut drawing, scheme.holes, scheme.holes_color);
    }
    // Reserved layers stay empty; geometry-only export never writes to them.
    for reserved in [scheme.dimensions, scheme.annotations].into_iter().flatten() {
        add_layer(&mut drawing, reserved, 7);
    }

    let contour = match part.shape.outline() {
        Some(points) => closed_polyline(&points),
        None => {
            // Only the circle lacks a polygon outline at this point.
            let Shape::Circle { diameter } = part.shape else {
                unreachable!("non-circle shapes have outlines");
            };
            let radius = diameter / 2.0;
            circle_entity(radius, radius, radius)
        }
    };
    add_on_layer(&mut drawing, contour, scheme.contour);

    for hole in &part.holes {
        let entity = circle_entity(hole.x, hole.y, hole.diameter / 2.0);
        add_on_layer(&mut drawing, entity, scheme.holes);
    }

    let mut bytes = Vec::new();
    drawing.save(&mut bytes)?;
    debug!(
        part = %part.name,
        holes = part.holes.len(),
        size = bytes.len(),
        "exported DXF geometry"
    );

    Ok(GeometryFile {
        filename: format!("{}.dxf", sanitize_filename(&part.name)),
        bytes,
    })
}

fn pin_header_dates(drawing: &mut Drawing) {
    let epoch_utc = DateTime::<Utc>::UNIX_EPOCH;
    let epoch_local = DateTime::<Local>::from(epoch_utc);
    drawing.header.creation_date = epoch_local;
    drawing.header.creation_date_universal = epoch_utc;
    drawing.header.update_date = epoch_local;
    drawing.header.update_date_universal = epoch_utc;
}

fn add_layer(drawing: &mut Drawing, name: &str, color_index: u8) {
    let mut layer = Layer::default();
    layer.name = name.to_string();
    layer.color = Color::from_index(color_index);
    drawing.add_layer(layer);
}

fn add_on_layer(drawing: &mut Drawing, mut entity: Entity, layer: &str) {
    entity.common.layer = layer.to_string();
    drawing.add_entity(entity);
}

fn closed_polyline(points: &[(f64, f64)]) -> Entity {
    let mut polyline = LwPolyline::default();
    polyline.vertices = points
        .iter()
        .map(|&(x, y)| LwPolylineVertex {
            x,
            y,
            id: 0,
            starting_width: 0.0,
            ending_width: 0.0,
            bulge: 0.0,
        })
        .collect();
    polyline.flags = 1; // closed
    Entity::new(EntityType::LwPolyline(polyline))
}

fn circle_entity(x: f64, y: f64, radius: f64) -> Entity {
    let mut circle = Circle::default();
    circle.center = Point::new(x, y, 0.0);
    circle.radius = radius;
    Entity::new(EntityType::Circle(circle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use platedraw_core::Hole;

    fn part(shape: Shape, holes: Vec<Hole>) -> PartDescriptor {
        PartDescriptor {
            name: "Plate 01/A".into(),
            shape,
            thickness: Some(3.0),
            quantity: 1,
            holes,
        }
    }

    fn load(bytes: &[u8]) -> Drawing {
        Drawing::load(&mut std::io::Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_rectangle_entities_and_layers() {
        let p = part(
            Shape::Rectangle {
                width: 100.0,
                height: 50.0,
            },
            vec![
                Hole { diameter: 8.0, x: 10.0, y: 25.0 },
                Hole { diameter: 8.0, x: 90.0, y: 25.0 },
            ],
        );
        let file = export_part(&p).unwrap();
        assert_eq!(file.filename, "Plate_01_A.dxf");

        let drawing = load(&file.bytes);
        let entities: Vec<&Entity> = drawing.entities().collect();
        assert_eq!(entities.len(), 3);
        let contour: Vec<_> = entities
            .iter()
            .filter(|e| e.common.layer == "CONTOUR")
            .collect();
        let holes: Vec<_> = entities
            .iter()
            .filter(|e| e.common.layer == "HOLES")
            .collect();
        assert_eq!(contour.len(), 1);
        assert_eq!(holes.len(), 2);
        assert!(matches!(contour[0].specific, EntityType::LwPolyline(_)));
        assert!(matches!(holes[0].specific, EntityType::Circle(_)));
    }

    #[test]
    fn test_circle_contour_is_centered_in_bounding_box() {
        let p = part(Shape::Circle { diameter: 50.0 }, vec![]);
        let file = export_part(&p).unwrap();
        let drawing = load(&file.bytes);
        let entity = drawing.entities().next().unwrap();
        match &entity.specific {
            EntityType::Circle(circle) => {
                assert_eq!(circle.center.x, 25.0);
                assert_eq!(circle.center.y, 25.0);
                assert_eq!(circle.radius, 25.0);
            }
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn test_geometry_is_unscaled() {
        let p = part(
            Shape::Rectangle {
                width: 2000.0,
                height: 3.0,
            },
            vec![],
        );
        let drawing = load(&export_part(&p).unwrap().bytes);
        let entity = drawing.entities().next().unwrap();
        match &entity.specific {
            EntityType::LwPolyline(poly) => {
                assert_eq!(poly.vertices[1].x, 2000.0);
                assert_eq!(poly.vertices[2].y, 3.0);
                assert_eq!(poly.flags, 1);
            }
            other => panic!("expected polyline, got {other:?}"),
        }
    }

    #[test]
    fn test_holes_layer_absent_without_holes() {
        let p = part(
            Shape::RightTriangle {
                base: 80.0,
                height: 60.0,
            },
            vec![],
        );
        let drawing = load(&export_part(&p).unwrap().bytes);
        let names: Vec<&str> = drawing.layers().map(|l| l.name.as_str()).collect();
        assert!(names.contains(&"CONTOUR"));
        assert!(!names.contains(&"HOLES"));
    }

    #[test]
    fn test_reserved_layers_are_created_empty() {
        let scheme = LayerScheme {
            dimensions: Some("DIMENSIONS"),
            annotations: Some("ANNOTATIONS"),
            ..LayerScheme::default()
        };
        let p = part(Shape::Circle { diameter: 50.0 }, vec![]);
        let drawing = load(&export_part_with(&p, scheme).unwrap().bytes);
        let names: Vec<&str> = drawing.layers().map(|l| l.name.as_str()).collect();
        assert!(names.contains(&"DIMENSIONS"));
        assert!(names.contains(&"ANNOTATIONS"));
        assert_eq!(drawing.entities().count(), 1);
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        let p = part(Shape::Unknown("pentagon".into()), vec![]);
        match export_part(&p) {
            Err(GeometryError::UnknownShape(tag)) => assert_eq!(tag, "pentagon"),
            other => panic!("expected UnknownShape, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_dimension_is_rejected() {
        let p = part(
            Shape::Rectangle {
                width: 0.0,
                height: 50.0,
            },
            vec![],
        );
        assert!(matches!(
            export_part(&p),
            Err(GeometryError::InvalidDimension(_))
        ));
    }

    #[test]
    fn test_export_is_byte_identical() {
        let p = part(
            Shape::Trapezoid {
                large_base: 120.0,
                small_base: 60.0,
                height: 40.0,
            },
            vec![Hole { diameter: 6.0, x: 60.0, y: 20.0 }],
        );
        let first = export_part(&p).unwrap();
        let second = export_part(&p).unwrap();
        assert_eq!(first, second);
    }
}
