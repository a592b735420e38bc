use nalgebra as na;

/// Analysis polygon. Tracks are only eligible for speed timing while their
/// bbox center lies inside it, and the two reference lines are expressed as
/// fractions of its vertical extent.
#[derive(Debug, Clone)]
pub struct Region {
    poly: Vec<na::Point2<f32>>,
    top: f32,
    bottom: f32,
}

impl Region {
    pub fn new(poly: Vec<na::Point2<f32>>) -> Self {
        let mut top = f32::INFINITY;
        let mut bottom = f32::NEG_INFINITY;

        for p in &poly {
            top = top.min(p.y);
            bottom = bottom.max(p.y);
        }

        Self { poly, top, bottom }
    }

    /// Whole frame minus a uniform padding, the default when no region was
    /// configured for a source.
    pub fn from_frame(width: f32, height: f32, padding: f32) -> Self {
        Self::new(vec![
            na::Point2::new(padding, padding),
            na::Point2::new(width - padding, padding),
            na::Point2::new(width - padding, height - padding),
            na::Point2::new(padding, height - padding),
        ])
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Pixel row of a reference line given as a fraction of the region height.
    #[inline]
    pub fn line_y(&self, pct: f32) -> f32 {
        self.top + self.height() * pct
    }

    /// Ray-casting point-in-polygon test. A degenerate polygon (fewer than
    /// three vertices) contains nothing.
    pub fn contains(&self, p: na::Point2<f32>) -> bool {
        let n = self.poly.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut p1 = self.poly[0];
        let mut xints = 0.0;

        for i in 1..=n {
            let p2 = self.poly[i % n];

            if p.y > f32::min(p1.y, p2.y)
                && p.y <= f32::max(p1.y, p2.y)
                && p.x <= f32::max(p1.x, p2.x)
            {
                if (p1.y - p2.y).abs() > f32::EPSILON {
                    xints = (p.y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
                }

                if (p1.x - p2.x).abs() < f32::EPSILON || p.x <= xints {
                    inside = !inside;
                }
            }

            p1 = p2;
        }

        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_frame_interior() {
        let region = Region::from_frame(640., 480., 10.);

        assert!(region.contains(na::Point2::new(320., 240.)));
        assert!(!region.contains(na::Point2::new(5., 240.)));
        assert!(!region.contains(na::Point2::new(320., 680.)));
    }

    #[test]
    fn line_rows_follow_region_extent() {
        let region = Region::from_frame(640., 500., 0.);

        assert_eq!(region.line_y(0.0), 0.0);
        assert_eq!(region.line_y(0.4), 200.0);
        assert_eq!(region.line_y(0.7), 350.0);
        assert_eq!(region.line_y(1.0), 500.0);
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let empty = Region::new(vec![]);
        assert!(!empty.contains(na::Point2::new(0., 0.)));

        let segment = Region::new(vec![na::Point2::new(0., 0.), na::Point2::new(100., 0.)]);
        assert!(!segment.contains(na::Point2::new(50., 0.)));
    }

    #[test]
    fn padded_region_offsets_lines() {
        let region = Region::from_frame(640., 480., 40.);

        assert_eq!(region.height(), 400.0);
        assert_eq!(region.line_y(0.5), 240.0);
    }
}
