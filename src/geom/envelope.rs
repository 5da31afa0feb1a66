use geo_types::{Coord, Line, LineString, Polygon};

/// Axis-aligned bounding rectangle with an explicit "null" (empty) state.
///
/// The null state is distinct from a degenerate point envelope: a point
/// envelope intersects itself, a null envelope intersects nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    bounds: Option<[f64; 4]>, // min_x, min_y, max_x, max_y
}

impl Envelope {
    pub fn null() -> Self {
        Self { bounds: None }
    }

    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            bounds: Some([min_x.min(max_x), min_y.min(max_y), min_x.max(max_x), min_y.max(max_y)]),
        }
    }

    pub fn of_coord(c: Coord<f64>) -> Self {
        Self::new(c.x, c.y, c.x, c.y)
    }

    pub fn of_line(line: &Line<f64>) -> Self {
        Self::of_segment(line.start, line.end)
    }

    pub fn of_segment(p0: Coord<f64>, p1: Coord<f64>) -> Self {
        Self::new(p0.x.min(p1.x), p0.y.min(p1.y), p0.x.max(p1.x), p0.y.max(p1.y))
    }

    pub fn of_coords(coords: &[Coord<f64>]) -> Self {
        let mut env = Self::null();
        for &c in coords {
            env.expand_to_include(c);
        }
        env
    }

    pub fn of_polygon(poly: &Polygon<f64>) -> Self {
        Self::of_coords(&poly.exterior().0)
    }

    pub fn of_line_string(ls: &LineString<f64>) -> Self {
        Self::of_coords(&ls.0)
    }

    pub fn is_null(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn min_x(&self) -> f64 {
        self.bounds.map(|b| b[0]).unwrap_or(f64::NAN)
    }

    pub fn min_y(&self) -> f64 {
        self.bounds.map(|b| b[1]).unwrap_or(f64::NAN)
    }

    pub fn max_x(&self) -> f64 {
        self.bounds.map(|b| b[2]).unwrap_or(f64::NAN)
    }

    pub fn max_y(&self) -> f64 {
        self.bounds.map(|b| b[3]).unwrap_or(f64::NAN)
    }

    pub fn width(&self) -> f64 {
        self.bounds.map(|b| b[2] - b[0]).unwrap_or(0.0)
    }

    pub fn height(&self) -> f64 {
        self.bounds.map(|b| b[3] - b[1]).unwrap_or(0.0)
    }

    pub fn center(&self) -> Option<Coord<f64>> {
        self.bounds.map(|b| Coord {
            x: (b[0] + b[2]) / 2.0,
            y: (b[1] + b[3]) / 2.0,
        })
    }

    pub fn expand_to_include(&mut self, c: Coord<f64>) {
        match &mut self.bounds {
            None => self.bounds = Some([c.x, c.y, c.x, c.y]),
            Some(b) => {
                b[0] = b[0].min(c.x);
                b[1] = b[1].min(c.y);
                b[2] = b[2].max(c.x);
                b[3] = b[3].max(c.y);
            }
        }
    }

    pub fn expand_to_include_envelope(&mut self, other: &Envelope) {
        if let Some(o) = other.bounds {
            match &mut self.bounds {
                None => self.bounds = Some(o),
                Some(b) => {
                    b[0] = b[0].min(o[0]);
                    b[1] = b[1].min(o[1]);
                    b[2] = b[2].max(o[2]);
                    b[3] = b[3].max(o[3]);
                }
            }
        }
    }

    /// Returns a copy grown by `dist` on every side. Null stays null.
    pub fn expanded_by(&self, dist: f64) -> Envelope {
        match self.bounds {
            None => *self,
            Some(b) => Envelope::new(b[0] - dist, b[1] - dist, b[2] + dist, b[3] + dist),
        }
    }

    pub fn intersects(&self, other: &Envelope) -> bool {
        match (self.bounds, other.bounds) {
            (Some(a), Some(b)) => a[0] <= b[2] && b[0] <= a[2] && a[1] <= b[3] && b[1] <= a[3],
            _ => false,
        }
    }

    pub fn contains_coord(&self, c: Coord<f64>) -> bool {
        match self.bounds {
            Some(b) => c.x >= b[0] && c.x <= b[2] && c.y >= b[1] && c.y <= b[3],
            None => false,
        }
    }

    pub fn contains_envelope(&self, other: &Envelope) -> bool {
        match (self.bounds, other.bounds) {
            (Some(a), Some(b)) => b[0] >= a[0] && b[2] <= a[2] && b[1] >= a[1] && b[3] <= a[3],
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_envelope_intersects_nothing() {
        let null = Envelope::null();
        let point = Envelope::of_coord(Coord { x: 1.0, y: 1.0 });
        assert!(!null.intersects(&point));
        assert!(!null.intersects(&null));
        // A degenerate point envelope is not null: it intersects itself.
        assert!(point.intersects(&point));
    }

    #[test]
    fn test_expand_from_null() {
        let mut env = Envelope::null();
        env.expand_to_include(Coord { x: 3.0, y: 4.0 });
        assert!(!env.is_null());
        assert_eq!(env.min_x(), 3.0);
        assert_eq!(env.max_y(), 4.0);
        env.expand_to_include(Coord { x: -1.0, y: 10.0 });
        assert_eq!(env.min_x(), -1.0);
        assert_eq!(env.max_y(), 10.0);
    }

    #[test]
    fn test_intersects_edge_touch() {
        let a = Envelope::new(0.0, 0.0, 1.0, 1.0);
        let b = Envelope::new(1.0, 1.0, 2.0, 2.0);
        assert!(a.intersects(&b));
        let c = Envelope::new(1.0 + 1e-9, 0.0, 2.0, 1.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_contains() {
        let a = Envelope::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains_envelope(&Envelope::new(1.0, 1.0, 9.0, 9.0)));
        assert!(!a.contains_envelope(&Envelope::new(1.0, 1.0, 11.0, 9.0)));
        assert!(!a.contains_envelope(&Envelope::null()));
    }
}
