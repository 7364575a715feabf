//! Single-page drawing renderer.
//!
//! One [`PageCanvas`] renders one part onto one A4 content stream: title
//! header, footer table, shape outline, holes, dimension chains and the
//! diameter call-out. The header and footer are drawn unconditionally;
//! invalid or unrecognized shapes get a placeholder message where the
//! drawing would be, so every input record is accounted for on paper.

use pdf_writer::{Content, Name, Str};
use tracing::{debug, warn};

use platedraw_core::{format_mm, DecimalStyle, Hole, PartDescriptor, Shape};

use crate::dimension::{chain, total_span};
use crate::layout::{
    solve, FOOTER_BAND, HEADER_BAND, HOLE_DIM_LANE, MARGIN, MM, OVERSHOOT, PAGE_HEIGHT,
    PAGE_WIDTH, TOTAL_DIM_LANE,
};
use crate::text::{encode_win_ansi, string_width, Font};

/// 45 degree dimension tick length.
const TICK: f64 = 2.0 * MM;
/// Circle approximation constant for cubic Beziers.
const BEZIER_K: f64 = 0.552_284_749_831;

const DIM_FONT_SIZE: f64 = 10.0;

/// Renderer for one part page.
pub struct PageCanvas {
    content: Content,
    style: DecimalStyle,
}

impl PageCanvas {
    pub fn new(style: DecimalStyle) -> Self {
        Self {
            content: Content::new(),
            style,
        }
    }

    /// Render the full page for one part and return the content stream.
    pub fn render_part(mut self, part: &PartDescriptor) -> Vec<u8> {
        debug!(
            part = %part.name,
            shape = part.shape.display_name(),
            holes = part.holes.len(),
            "rendering drawing page"
        );
        self.header(&part.name);
        self.footer(part);

        if let Shape::Unknown(tag) = &part.shape {
            warn!(part = %part.name, tag = %tag, "unrecognized shape, placeholder page");
            let message = format!("Shape '{tag}' is not recognized.");
            self.centered_text(PAGE_WIDTH / 2.0, PAGE_HEIGHT / 2.0, Font::Regular, 12.0, &message);
            return self.content.finish();
        }
        if let Err(err) = part.shape.validate() {
            warn!(part = %part.name, %err, "invalid dimensions, placeholder page");
            let message = format!("Invalid data for shape: '{}'", part.shape.display_name());
            self.centered_text(PAGE_WIDTH / 2.0, PAGE_HEIGHT / 2.0, Font::Bold, 14.0, &message);
            return self.content.finish();
        }

        match part.shape {
            Shape::Rectangle { width, height } => self.rectangle(width, height, &part.holes),
            Shape::Circle { diameter } => self.circle(diameter, &part.holes),
            Shape::RightTriangle { base, height } => self.right_triangle(base, height, &part.holes),
            Shape::Trapezoid {
                large_base,
                small_base,
                height,
            } => self.trapezoid(large_base, small_base, height, &part.holes),
            Shape::Unknown(_) => unreachable!("handled above"),
        }
        self.content.finish()
    }

    // ------------------------------------------------------------------
    // Page furniture
    // ------------------------------------------------------------------

    fn header(&mut self, name: &str) {
        let title = format!("Part Drawing: {name}");
        let y_text = PAGE_HEIGHT - HEADER_BAND + 10.0 * MM;
        self.centered_text(PAGE_WIDTH / 2.0, y_text, Font::Bold, 14.0, &title);
        let y_rule = PAGE_HEIGHT - HEADER_BAND;
        self.line(MARGIN, y_rule, PAGE_WIDTH - MARGIN, y_rule);
    }

    /// Footer table: part name, thickness and quantity in three columns
    /// split at 60 % and 80 % of the usable width.
    fn footer(&mut self, part: &PartDescriptor) {
        let total_w = PAGE_WIDTH - 2.0 * MARGIN;
        let block_h = 12.0 * MM;
        let y = FOOTER_BAND - block_h - 5.0 * MM;

        self.content
            .rect(pt(MARGIN), pt(y), pt(total_w), pt(block_h))
            .stroke();
        let col2 = MARGIN + total_w * 0.60;
        let col3 = MARGIN + total_w * 0.80;
        self.line(col2, y, col2, y + block_h);
        self.line(col3, y, col3, y + block_h);

        let y_caption = y + block_h - 4.0 * MM;
        let y_value = y + 4.0 * MM;
        let right = PAGE_WIDTH - MARGIN;
        let centers = [
            (MARGIN + col2) / 2.0,
            (col2 + col3) / 2.0,
            (col3 + right) / 2.0,
        ];

        let thickness = match part.thickness {
            Some(value) => format!("{} mm", format_mm(value, self.style)),
            None => "-".to_string(),
        };
        let quantity = part.quantity.to_string();
        let captions = ["PART NAME / IDENTIFIER", "THICKNESS", "QUANTITY"];
        let values = [part.name.as_str(), thickness.as_str(), quantity.as_str()];

        for ((center, caption), value) in centers.iter().zip(captions).zip(values) {
            self.centered_text(*center, y_caption, Font::Regular, 7.0, caption);
            self.centered_text(*center, y_value, Font::Bold, 10.0, value);
        }
    }

    // ------------------------------------------------------------------
    // Shape pages
    // ------------------------------------------------------------------

    /// Rectangle: hole chains on both axes at the inner lane, overall
    /// dimensions at the outer lane, diameter call-out on the first hole.
    fn rectangle(&mut self, width: f64, height: f64, holes: &[Hole]) {
        let p = solve(width, height, TOTAL_DIM_LANE, TOTAL_DIM_LANE);
        let (x0, y0) = p.origin();
        let s = p.scale;

        self.content
            .rect(pt(x0), pt(y0), pt(p.scaled_w), pt(p.scaled_h))
            .stroke();

        if !holes.is_empty() {
            for hole in holes {
                self.stroke_circle(x0 + hole.x * s, y0 + hole.y * s, hole.diameter / 2.0 * s);
            }

            let y_lane = y0 - HOLE_DIM_LANE;
            let xs: Vec<f64> = holes.iter().map(|h| h.x).collect();
            let x_chain = chain(&xs, width, self.style);
            for &coord in &x_chain.points {
                self.line(x0 + coord * s, y0, x0 + coord * s, y_lane - OVERSHOOT);
            }
            for seg in &x_chain.segments {
                self.horizontal_dimension(x0 + seg.start * s, x0 + seg.end * s, y_lane, &seg.label);
            }

            let x_lane = x0 - HOLE_DIM_LANE;
            let ys: Vec<f64> = holes.iter().map(|h| h.y).collect();
            let y_chain = chain(&ys, height, self.style);
            for &coord in &y_chain.points {
                self.line(x0, y0 + coord * s, x_lane - OVERSHOOT, y0 + coord * s);
            }
            for seg in &y_chain.segments {
                self.vertical_dimension(y0 + seg.start * s, y0 + seg.end * s, x_lane, &seg.label);
            }

            // One sample call-out: the first hole stands for all of them.
            let first = holes[0];
            self.hole_callout(
                x0 + first.x * s,
                y0 + first.y * s,
                first.diameter / 2.0 * s,
                first.diameter,
            );
        }

        let y_total = y0 - TOTAL_DIM_LANE;
        self.line(x0, y0, x0, y_total - OVERSHOOT);
        self.line(x0 + p.scaled_w, y0, x0 + p.scaled_w, y_total - OVERSHOOT);
        let span = total_span(width, self.style);
        self.horizontal_dimension(x0, x0 + p.scaled_w, y_total, &span.label);

        let x_total = x0 - TOTAL_DIM_LANE;
        self.line(x0, y0, x_total - OVERSHOOT, y0);
        self.line(x0, y0 + p.scaled_h, x_total - OVERSHOOT, y0 + p.scaled_h);
        let span = total_span(height, self.style);
        self.vertical_dimension(y0, y0 + p.scaled_h, x_total, &span.label);
    }

    /// Circle: one diameter dimension below, holes placed from the
    /// bounding-box corner, no chaining.
    fn circle(&mut self, diameter: f64, holes: &[Hole]) {
        let p = solve(diameter, diameter, 2.0 * HOLE_DIM_LANE, 2.0 * HOLE_DIM_LANE);
        let s = p.scale;
        let radius = p.scaled_w / 2.0;
        let cx = p.block_x + HOLE_DIM_LANE + radius;
        let cy = p.block_y + HOLE_DIM_LANE + radius;
        self.stroke_circle(cx, cy, radius);

        let (x0, y0) = (cx - radius, cy - radius);
        for hole in holes {
            self.stroke_circle(x0 + hole.x * s, y0 + hole.y * s, hole.diameter / 2.0 * s);
        }

        let y_dim = cy - radius - HOLE_DIM_LANE;
        self.line(cx - radius, cy - radius, cx - radius, y_dim - OVERSHOOT);
        self.line(cx + radius, cy - radius, cx + radius, y_dim - OVERSHOOT);
        let label = format!("Ø {}", format_mm(diameter, self.style));
        self.horizontal_dimension(cx - radius, cx + radius, y_dim, &label);
    }

    /// Right triangle: right angle at the drawing origin, overall base and
    /// height dimensions only. Holes are drawn but not chained.
    fn right_triangle(&mut self, base: f64, height: f64, holes: &[Hole]) {
        let p = solve(base, height, HOLE_DIM_LANE, HOLE_DIM_LANE);
        let (x0, y0) = p.origin();
        let s = p.scale;
        let (db, dh) = (p.scaled_w, p.scaled_h);

        self.stroke_polygon(&[(x0, y0), (x0 + db, y0), (x0, y0 + dh)]);
        for hole in holes {
            self.stroke_circle(x0 + hole.x * s, y0 + hole.y * s, hole.diameter / 2.0 * s);
        }

        let y_dim = y0 - HOLE_DIM_LANE;
        self.line(x0, y0, x0, y_dim - OVERSHOOT);
        self.line(x0 + db, y0, x0 + db, y_dim - OVERSHOOT);
        self.horizontal_dimension(x0, x0 + db, y_dim, &format_mm(base, self.style));

        let x_dim = x0 - HOLE_DIM_LANE;
        self.line(x0, y0, x_dim - OVERSHOOT, y0);
        self.line(x0, y0 + dh, x_dim - OVERSHOOT, y0 + dh);
        self.vertical_dimension(y0, y0 + dh, x_dim, &format_mm(height, self.style));
    }

    /// Trapezoid: large base dimensioned below, small base above, height at
    /// the left. Holes are drawn but not chained.
    fn trapezoid(&mut self, large_base: f64, small_base: f64, height: f64, holes: &[Hole]) {
        let p = solve(large_base, height, HOLE_DIM_LANE, 2.0 * HOLE_DIM_LANE);
        let s = p.scale;
        let x0 = p.block_x + HOLE_DIM_LANE / 2.0;
        let y0 = p.block_y + HOLE_DIM_LANE;
        let (dlb, dh) = (p.scaled_w, p.scaled_h);
        let inset = (dlb - small_base * s) / 2.0;

        let p1 = (x0, y0);
        let p2 = (x0 + dlb, y0);
        let p3 = (x0 + dlb - inset, y0 + dh);
        let p4 = (x0 + inset, y0 + dh);
        self.stroke_polygon(&[p1, p2, p3, p4]);
        for hole in holes {
            self.stroke_circle(x0 + hole.x * s, y0 + hole.y * s, hole.diameter / 2.0 * s);
        }

        let y_below = y0 - HOLE_DIM_LANE;
        self.line(p1.0, p1.1, p1.0, y_below - OVERSHOOT);
        self.line(p2.0, p2.1, p2.0, y_below - OVERSHOOT);
        self.horizontal_dimension(p1.0, p2.0, y_below, &format_mm(large_base, self.style));

        let y_above = p3.1 + HOLE_DIM_LANE;
        self.line(p4.0, p4.1, p4.0, y_above + OVERSHOOT);
        self.line(p3.0, p3.1, p3.0, y_above + OVERSHOOT);
        self.horizontal_dimension(p4.0, p3.0, y_above, &format_mm(small_base, self.style));

        let x_left = p1.0.min(p4.0) - HOLE_DIM_LANE;
        self.line(p1.0, p1.1, x_left - OVERSHOOT, p1.1);
        self.line(p4.0, p4.1, x_left - OVERSHOOT, p4.1);
        self.vertical_dimension(p1.1, p4.1, x_left, &format_mm(height, self.style));
    }

    // ------------------------------------------------------------------
    // Dimension primitives
    // ------------------------------------------------------------------

    /// Horizontal dimension line with 45 degree end ticks and the label
    /// centered just above the line.
    fn horizontal_dimension(&mut self, x1: f64, x2: f64, y: f64, label: &str) {
        let center = (x1 + x2) / 2.0;
        self.line(x1, y, x2, y);
        self.line(x1, y - TICK / 2.0, x1 + TICK / 2.0, y + TICK / 2.0);
        self.line(x2, y - TICK / 2.0, x2 - TICK / 2.0, y + TICK / 2.0);
        self.centered_text(center, y + 1.0 * MM, Font::Regular, DIM_FONT_SIZE, label);
    }

    /// Vertical dimension line; the label is rotated 90 degrees and sits in
    /// a white knockout box over the line.
    fn vertical_dimension(&mut self, y1: f64, y2: f64, x: f64, label: &str) {
        let width = string_width(label, Font::Regular, DIM_FONT_SIZE);
        let center = (y1 + y2) / 2.0;

        self.line(x, y1, x, y2);
        self.line(x - TICK / 2.0, y1, x + TICK / 2.0, y1 + TICK / 2.0);
        self.line(x - TICK / 2.0, y2, x + TICK / 2.0, y2 - TICK / 2.0);

        // Rotate the frame 90 degrees about the label center.
        self.content.save_state();
        self.content
            .transform([0.0, 1.0, -1.0, 0.0, pt(x), pt(center)]);
        self.content.set_fill_gray(1.0);
        self.content
            .rect(
                pt(-width / 2.0 - 1.0 * MM),
                pt(-DIM_FONT_SIZE / 2.0),
                pt(width + 2.0 * MM),
                pt(DIM_FONT_SIZE),
            )
            .fill_nonzero();
        self.content.set_fill_gray(0.0);
        self.show_text(-width / 2.0, -1.5 * MM, Font::Regular, DIM_FONT_SIZE, label);
        self.content.restore_state();
    }

    /// Leader from the hole rim at 45 degrees with a horizontal landing and
    /// the diameter text above it.
    fn hole_callout(&mut self, cx: f64, cy: f64, radius: f64, diameter: f64) {
        let label = format!("Ø {}", format_mm(diameter, self.style));
        let width = string_width(&label, Font::Regular, DIM_FONT_SIZE);

        let rim = (cx + radius * std::f64::consts::FRAC_1_SQRT_2,
                   cy + radius * std::f64::consts::FRAC_1_SQRT_2);
        let elbow = (rim.0 + 4.0 * MM, rim.1 + 4.0 * MM);
        let end_x = elbow.0 + width + 2.0 * MM;

        self.content
            .move_to(pt(rim.0), pt(rim.1))
            .line_to(pt(elbow.0), pt(elbow.1))
            .line_to(pt(end_x), pt(elbow.1))
            .stroke();
        self.show_text(elbow.0 + 1.0 * MM, elbow.1 + 1.0 * MM, Font::Regular, DIM_FONT_SIZE, &label);
    }

    // ------------------------------------------------------------------
    // Drawing primitives
    // ------------------------------------------------------------------

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.content
            .move_to(pt(x1), pt(y1))
            .line_to(pt(x2), pt(y2))
            .stroke();
    }

    fn stroke_polygon(&mut self, points: &[(f64, f64)]) {
        let mut iter = points.iter();
        if let Some(&(x, y)) = iter.next() {
            self.content.move_to(pt(x), pt(y));
            for &(x, y) in iter {
                self.content.line_to(pt(x), pt(y));
            }
            self.content.close_path().stroke();
        }
    }

    fn stroke_circle(&mut self, cx: f64, cy: f64, r: f64) {
        let k = BEZIER_K * r;
        self.content
            .move_to(pt(cx + r), pt(cy))
            .cubic_to(pt(cx + r), pt(cy + k), pt(cx + k), pt(cy + r), pt(cx), pt(cy + r))
            .cubic_to(pt(cx - k), pt(cy + r), pt(cx - r), pt(cy + k), pt(cx - r), pt(cy))
            .cubic_to(pt(cx - r), pt(cy - k), pt(cx - k), pt(cy - r), pt(cx), pt(cy - r))
            .cubic_to(pt(cx + k), pt(cy - r), pt(cx + r), pt(cy - k), pt(cx + r), pt(cy))
            .stroke();
    }

    fn show_text(&mut self, x: f64, y: f64, font: Font, size: f64, text: &str) {
        let bytes = encode_win_ansi(text);
        self.content
            .begin_text()
            .set_font(Name(font.resource_name()), size as f32)
            .next_line(pt(x), pt(y))
            .show(Str(&bytes))
            .end_text();
    }

    fn centered_text(&mut self, x: f64, y: f64, font: Font, size: f64, text: &str) {
        let width = string_width(text, font, size);
        self.show_text(x - width / 2.0, y, font, size, text);
    }
}

fn pt(value: f64) -> f32 {
    value as f32
}
