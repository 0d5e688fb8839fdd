use egui::Pos2;
use egui::emath::TSTransform;

use super::{Parallelogram, Segment, distance_to_line_segment};
use crate::stroke::Stroke;

/// Does the inked shape of `stroke` overlap `region`?
///
/// `stroke_to_region` maps stroke coordinates into the region's coordinate space.
/// The inked shape is the sample polyline grown by half the brush size, so a
/// single-sample stroke is a dot of that radius. Strokes without samples never hit.
pub fn stroke_intersects(
    stroke: &Stroke,
    region: &Parallelogram,
    stroke_to_region: &TSTransform,
) -> bool {
    let points: Vec<Pos2> = stroke
        .inputs()
        .positions()
        .map(|pos| stroke_to_region.mul_pos(pos))
        .collect();
    if points.is_empty() {
        return false;
    }
    let radius = stroke.brush().size() / 2.0 * stroke_to_region.scaling;

    let stroke_bounds = super::calculate_bounds(&points, radius);
    if !stroke_bounds.intersects(region.bounding_rect()) {
        return false;
    }

    if points.iter().any(|point| region.contains(*point)) {
        return true;
    }

    let edges = region.edges();
    if points.len() == 1 {
        return edges
            .iter()
            .any(|edge| distance_to_line_segment(points[0], edge.start, edge.end) <= radius);
    }

    points.windows(2).any(|pair| {
        let piece = Segment::new(pair[0], pair[1]);
        edges
            .iter()
            .any(|edge| segment_distance(&piece, edge) <= radius)
    })
}

/// Shortest distance between two segments, zero when they cross.
pub fn segment_distance(a: &Segment, b: &Segment) -> f32 {
    if segments_cross(a, b) {
        return 0.0;
    }
    distance_to_line_segment(a.start, b.start, b.end)
        .min(distance_to_line_segment(a.end, b.start, b.end))
        .min(distance_to_line_segment(b.start, a.start, a.end))
        .min(distance_to_line_segment(b.end, a.start, a.end))
}

fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn segments_cross(a: &Segment, b: &Segment) -> bool {
    let d1 = cross(b.start, b.end, a.start);
    let d2 = cross(b.start, b.end, a.end);
    let d3 = cross(a.start, a.end, b.start);
    let d4 = cross(a.start, a.end, b.end);
    // Collinear and touching cases fall through to the distance checks.
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}
