use serde::{Deserialize, Serialize};

/// A fixed 2D point on the traced polygon, in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f32,
    pub y: f32,
}

impl Waypoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    TooFewWaypoints,
}

/// The ordered, cyclic waypoint sequence: segment `i` runs from
/// `waypoint[i]` to `waypoint[(i + 1) % len]`. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracePath {
    waypoints: Vec<Waypoint>,
}

impl TracePath {
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints);
        }
        Ok(Self { waypoints })
    }

    /// The default rectangle path, sized for an 800x660 surface.
    pub fn rectangle() -> Self {
        Self {
            waypoints: vec![
                Waypoint::new(100.0, 100.0),
                Waypoint::new(700.0, 100.0),
                Waypoint::new(700.0, 560.0),
                Waypoint::new(100.0, 560.0),
            ],
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the last segment, i.e. `len() - 1`.
    pub fn last_segment(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Endpoints of segment `i`. Panics if `i >= len()`; segment indices
    /// are controller-owned and never exceed the waypoint count.
    pub fn segment(&self, i: usize) -> (Waypoint, Waypoint) {
        let n = self.waypoints.len();
        (self.waypoints[i], self.waypoints[(i + 1) % n])
    }

    /// Point at fraction `t` along segment `i`, with `t` clamped to [0, 1].
    pub fn point_along(&self, i: usize, t: f32) -> Waypoint {
        let (a, b) = self.segment(i);
        let t = t.clamp(0.0, 1.0);
        Waypoint::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_paths() {
        assert_eq!(
            TracePath::new(vec![Waypoint::new(0.0, 0.0)]),
            Err(PathError::TooFewWaypoints)
        );
        assert!(TracePath::new(vec![Waypoint::new(0.0, 0.0), Waypoint::new(1.0, 0.0)]).is_ok());
    }

    #[test]
    fn final_segment_wraps_to_first_waypoint() {
        let path = TracePath::rectangle();
        let (from, to) = path.segment(path.last_segment());
        assert_eq!(from, Waypoint::new(100.0, 560.0));
        assert_eq!(to, Waypoint::new(100.0, 100.0));
    }

    #[test]
    fn point_along_interpolates_and_clamps() {
        let path = TracePath::rectangle();
        let mid = path.point_along(0, 0.5);
        assert_eq!(mid, Waypoint::new(400.0, 100.0));

        let clamped = path.point_along(0, 7.5);
        assert_eq!(clamped, Waypoint::new(700.0, 100.0));
    }
}
