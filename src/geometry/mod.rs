use egui::{Pos2, Rect, Vec2};

pub mod hit_testing;

pub use hit_testing::stroke_intersects;

/// A directed line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Pos2,
    pub end: Pos2,
}

impl Segment {
    pub fn new(start: Pos2, end: Pos2) -> Self {
        Self { start, end }
    }

    pub fn vector(&self) -> Vec2 {
        self.end - self.start
    }

    pub fn length(&self) -> f32 {
        self.vector().length()
    }

    pub fn midpoint(&self) -> Pos2 {
        self.start.lerp(self.end, 0.5)
    }
}

/// An oriented rectangle: a parallelogram without shear.
///
/// `rotation` is the angle of the width axis in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parallelogram {
    pub center: Pos2,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
}

impl Parallelogram {
    /// The region swept by `segment` grown by `padding` on every side.
    ///
    /// A degenerate segment gives a `2 * padding` square around the point.
    pub fn from_segment_and_padding(segment: Segment, padding: f32) -> Self {
        let length = segment.length();
        let rotation = if length > 0.0 {
            segment.vector().angle()
        } else {
            0.0
        };
        Self {
            center: segment.midpoint(),
            width: length + 2.0 * padding,
            height: 2.0 * padding,
            rotation,
        }
    }

    fn axes(&self) -> (Vec2, Vec2) {
        let along = Vec2::angled(self.rotation);
        (along, along.rot90())
    }

    /// Corners in winding order.
    pub fn corners(&self) -> [Pos2; 4] {
        let (along, across) = self.axes();
        let half_w = along * (self.width / 2.0);
        let half_h = across * (self.height / 2.0);
        [
            self.center - half_w - half_h,
            self.center + half_w - half_h,
            self.center + half_w + half_h,
            self.center - half_w + half_h,
        ]
    }

    pub fn edges(&self) -> [Segment; 4] {
        let [a, b, c, d] = self.corners();
        [
            Segment::new(a, b),
            Segment::new(b, c),
            Segment::new(c, d),
            Segment::new(d, a),
        ]
    }

    pub fn contains(&self, point: Pos2) -> bool {
        let (along, across) = self.axes();
        let offset = point - self.center;
        offset.dot(along).abs() <= self.width / 2.0 && offset.dot(across).abs() <= self.height / 2.0
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::from_points(&self.corners())
    }
}

/// Calculate distance from a point to a line segment
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = (point_vec.dot(line_vec) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallelogram_from_horizontal_segment() {
        let segment = Segment::new(Pos2::new(0.0, 0.0), Pos2::new(10.0, 0.0));
        let region = Parallelogram::from_segment_and_padding(segment, 2.0);

        assert_eq!(region.center, Pos2::new(5.0, 0.0));
        assert_eq!(region.width, 14.0);
        assert_eq!(region.height, 4.0);
        assert!(region.contains(Pos2::new(-1.5, 1.5)));
        assert!(region.contains(Pos2::new(11.9, -1.9)));
        assert!(!region.contains(Pos2::new(5.0, 2.5)));
    }

    #[test]
    fn test_parallelogram_from_degenerate_segment_is_square() {
        let point = Pos2::new(3.0, 4.0);
        let region = Parallelogram::from_segment_and_padding(Segment::new(point, point), 1.0);
        let bounds = region.bounding_rect();

        assert!((bounds.width() - 2.0).abs() < 1e-5);
        assert!((bounds.height() - 2.0).abs() < 1e-5);
        assert!(region.contains(point));
    }

    #[test]
    fn test_distance_to_line_segment() {
        let start = Pos2::new(0.0, 0.0);
        let end = Pos2::new(10.0, 0.0);
        assert_eq!(distance_to_line_segment(Pos2::new(5.0, 3.0), start, end), 3.0);
        assert_eq!(distance_to_line_segment(Pos2::new(13.0, 4.0), start, end), 5.0);
        assert_eq!(distance_to_line_segment(Pos2::new(0.0, 2.0), start, start), 2.0);
    }
}
