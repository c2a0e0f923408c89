//! In-memory use of the triangulation networks.
//!
//! The database applies these networks when converting coordinates and
//! heights. Doing the same here lets a generated network be spot-checked
//! against known control points before the migration ships.

use crate::error::{Error, Result};
use crate::model::{AffineParams, Point};

// Points on a shared edge must land in one of the neighbouring triangles.
const EDGE_TOLERANCE: f64 = 1e-9;

/// Barycentric weights of `p` in triangle `t`, `None` for a degenerate triangle.
pub fn barycentric(t: &[Point; 3], p: Point) -> Option<[f64; 3]> {
    let [a, b, c] = *t;
    let det = (b.n - c.n) * (a.e - c.e) + (c.e - b.e) * (a.n - c.n);
    if det == 0.0 {
        return None;
    }
    let w1 = ((b.n - c.n) * (p.e - c.e) + (c.e - b.e) * (p.n - c.n)) / det;
    let w2 = ((c.n - a.n) * (p.e - c.e) + (a.e - c.e) * (p.n - c.n)) / det;
    Some([w1, w2, 1.0 - w1 - w2])
}

fn weights_inside(t: &[Point; 3], p: Point) -> Option<[f64; 3]> {
    barycentric(t, p).filter(|w| w.iter().all(|&x| x >= -EDGE_TOLERANCE))
}

/// Affine triangles of one direction, in source coordinates.
#[derive(Debug, Clone, Default)]
pub struct AffineNetwork {
    triangles: Vec<([Point; 3], AffineParams)>,
}

impl AffineNetwork {
    pub fn new(triangles: Vec<([Point; 3], AffineParams)>) -> Self {
        Self { triangles }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn transform(&self, p: Point) -> Result<Point> {
        self.triangles
            .iter()
            .find(|(corners, _)| weights_inside(corners, p).is_some())
            .map(|(_, params)| params.apply(p))
            .ok_or(Error::OutsideNetwork { x: p.e, y: p.n })
    }
}

/// Height triangles with the N2000 - N60 difference at each corner.
#[derive(Debug, Clone, Default)]
pub struct HeightNetwork {
    triangles: Vec<([Point; 3], [f64; 3])>,
}

impl HeightNetwork {
    pub fn new(triangles: Vec<([Point; 3], [f64; 3])>) -> Self {
        Self { triangles }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Height difference at `p`, linearly interpolated inside its triangle.
    pub fn correction_at(&self, p: Point) -> Result<f64> {
        self.triangles
            .iter()
            .find_map(|(corners, diffs)| {
                weights_inside(corners, p)
                    .map(|w| w[0] * diffs[0] + w[1] * diffs[1] + w[2] * diffs[2])
            })
            .ok_or(Error::OutsideNetwork { x: p.e, y: p.n })
    }

    pub fn to_n2000(&self, p: Point, n60: f64) -> Result<f64> {
        Ok(n60 + self.correction_at(p)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> [Point; 3] {
        [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ]
    }

    fn shift(delta_e: f64, delta_n: f64) -> AffineParams {
        AffineParams {
            a1: 1.0,
            a2: 0.0,
            delta_e,
            b1: 0.0,
            b2: 1.0,
            delta_n,
        }
    }

    #[test]
    fn test_barycentric_corners() {
        let t = unit_triangle();
        let w = barycentric(&t, Point::new(10.0, 0.0)).unwrap();
        assert!((w[0]).abs() < 1e-12);
        assert!((w[1] - 1.0).abs() < 1e-12);
        assert!((w[2]).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_triangle() {
        let line = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        ];
        assert!(barycentric(&line, Point::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_affine_picks_containing_triangle() {
        let other = [
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let network = AffineNetwork::new(vec![
            (unit_triangle(), shift(100.0, 0.0)),
            (other, shift(0.0, 100.0)),
        ]);

        assert_eq!(
            network.transform(Point::new(1.0, 1.0)).unwrap(),
            Point::new(101.0, 1.0)
        );
        assert_eq!(
            network.transform(Point::new(9.0, 9.0)).unwrap(),
            Point::new(9.0, 109.0)
        );
    }

    #[test]
    fn test_point_outside_network() {
        let network = AffineNetwork::new(vec![(unit_triangle(), shift(1.0, 1.0))]);
        assert!(matches!(
            network.transform(Point::new(20.0, 20.0)),
            Err(Error::OutsideNetwork { .. })
        ));
    }

    #[test]
    fn test_height_interpolation() {
        let network = HeightNetwork::new(vec![(unit_triangle(), [0.2, 0.4, 0.6])]);

        // corner value
        assert!((network.correction_at(Point::new(0.0, 10.0)).unwrap() - 0.6).abs() < 1e-12);

        // midpoint of the first edge
        let h = network.to_n2000(Point::new(5.0, 0.0), 100.0).unwrap();
        assert!((h - 100.3).abs() < 1e-9, "got {h}");
    }

    #[test]
    fn test_empty_networks() {
        let affine = AffineNetwork::default();
        let height = HeightNetwork::default();

        assert!(affine.is_empty() && height.is_empty());
        assert!(matches!(
            height.correction_at(Point::new(0.0, 0.0)),
            Err(Error::OutsideNetwork { .. })
        ));
    }
}
