//! Chained dimension construction.
//!
//! A chain runs along one axis: the edge at 0, every hole-center coordinate
//! on that axis, and the overall extent. Adjacent pairs become dimension
//! segments labelled with their span. Coordinates are raw millimeters; the
//! renderer applies the page scale when drawing.

use platedraw_core::{format_mm, DecimalStyle};

/// Spans at or below this are collapsed instead of labelled.
pub const DIM_EPSILON_MM: f64 = 0.01;

/// One dimension segment along an axis, in raw millimeters.
#[derive(Debug, Clone, PartialEq)]
pub struct DimSegment {
    pub start: f64,
    pub end: f64,
    pub label: String,
}

/// A solved chain: the deduplicated coordinates (for extension lines) and
/// the labelled segments between them.
#[derive(Debug, Clone, PartialEq)]
pub struct DimChain {
    pub points: Vec<f64>,
    pub segments: Vec<DimSegment>,
}

/// Build the dimension chain for one axis.
///
/// Coordinates are the union of 0, the feature positions and `max_extent`,
/// with exact duplicates removed. Segments whose span does not exceed
/// [`DIM_EPSILON_MM`] are dropped (a hole centered on the part edge produces
/// no zero-length segment) while their coordinate keeps its extension line.
pub fn chain(features: &[f64], max_extent: f64, style: DecimalStyle) -> DimChain {
    let mut points: Vec<f64> = Vec::with_capacity(features.len() + 2);
    points.push(0.0);
    points.extend_from_slice(features);
    points.push(max_extent);
    points.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    points.dedup();

    let segments = points
        .windows(2)
        .filter(|pair| pair[1] - pair[0] > DIM_EPSILON_MM)
        .map(|pair| DimSegment {
            start: pair[0],
            end: pair[1],
            label: format_mm(pair[1] - pair[0], style),
        })
        .collect();

    DimChain { points, segments }
}

/// The overall dimension for one axis, drawn one lane further out than the
/// chain and emitted regardless of whether any holes exist.
pub fn total_span(max_extent: f64, style: DecimalStyle) -> DimSegment {
    DimSegment {
        start: 0.0,
        end: max_extent,
        label: format_mm(max_extent, style),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(chain: &DimChain) -> Vec<&str> {
        chain.segments.iter().map(|s| s.label.as_str()).collect()
    }

    #[test]
    fn test_two_holes_three_segments() {
        // 100 mm wide part, holes at 10 and 90.
        let c = chain(&[10.0, 90.0], 100.0, DecimalStyle::Comma);
        assert_eq!(c.points, vec![0.0, 10.0, 90.0, 100.0]);
        assert_eq!(labels(&c), vec!["10", "80", "10"]);

        let total = total_span(100.0, DecimalStyle::Comma);
        assert_eq!(total.label, "100");
        assert_eq!((total.start, total.end), (0.0, 100.0));
    }

    #[test]
    fn test_duplicate_coordinates_collapse() {
        let c = chain(&[25.0, 25.0, 75.0], 100.0, DecimalStyle::Comma);
        assert_eq!(c.points, vec![0.0, 25.0, 75.0, 100.0]);
        assert_eq!(labels(&c), vec!["25", "50", "25"]);
    }

    #[test]
    fn test_edge_hole_produces_no_zero_segment() {
        let c = chain(&[0.0, 50.0], 100.0, DecimalStyle::Comma);
        assert_eq!(c.points, vec![0.0, 50.0, 100.0]);
        assert_eq!(labels(&c), vec!["50", "50"]);
    }

    #[test]
    fn test_epsilon_suppresses_tiny_segments() {
        let c = chain(&[0.005], 100.0, DecimalStyle::Comma);
        // The coordinate survives for its extension line, the segment does not.
        assert_eq!(c.points.len(), 3);
        assert_eq!(labels(&c), vec!["99,995"]);
    }

    #[test]
    fn test_no_features_yields_single_segment() {
        let c = chain(&[], 40.0, DecimalStyle::Comma);
        assert_eq!(labels(&c), vec!["40"]);
    }

    #[test]
    fn test_labels_follow_decimal_style() {
        let c = chain(&[12.5], 100.0, DecimalStyle::Point);
        assert_eq!(labels(&c), vec!["12.5", "87.5"]);
        let c = chain(&[12.5], 100.0, DecimalStyle::Comma);
        assert_eq!(labels(&c), vec!["12,5", "87,5"]);
    }
}
