use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

pub type PointId = i64;

/// Planar coordinate, easting first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub e: f64,
    pub n: f64,
}

impl Point {
    pub fn new(e: f64, n: f64) -> Self {
        Self { e, n }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Srid {
    Kkj,
    EtrsTm35Fin,
}

impl Srid {
    pub fn code(self) -> u32 {
        match self {
            Srid::Kkj => 2393,
            Srid::EtrsTm35Fin => 3067,
        }
    }
}

impl fmt::Display for Srid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.code())
    }
}

/// Transform direction of an affine triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    KkjToTm35Fin,
    Tm35FinToKkj,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::KkjToTm35Fin => "KKJ_TO_TM35FIN",
            Direction::Tm35FinToKkj => "TM35FIN_TO_KKJ",
        }
    }

    pub fn source_srid(self) -> Srid {
        match self {
            Direction::KkjToTm35Fin => Srid::Kkj,
            Direction::Tm35FinToKkj => Srid::EtrsTm35Fin,
        }
    }
}

/// Corner of the KKJ / ETRS-TM35FIN triangulation, known in both systems.
#[derive(Debug, Clone, PartialEq)]
pub struct KkjEtrsPoint {
    pub id: PointId,
    pub kkj: Point,
    pub etrs: Point,
}

impl KkjEtrsPoint {
    pub fn coord(&self, srid: Srid) -> Point {
        match srid {
            Srid::Kkj => self.kkj,
            Srid::EtrsTm35Fin => self.etrs,
        }
    }
}

/// Corner of the N60 / N2000 height triangulation.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightPoint {
    pub id: PointId,
    pub coord: Point,
    pub n60: f64,
    pub n2000: f64,
    /// `n2000 - n60`
    pub diff: f64,
}

impl HeightPoint {
    pub fn new(id: PointId, coord: Point, n60: f64, n2000: f64) -> Self {
        Self {
            id,
            coord,
            n60,
            n2000,
            diff: n2000 - n60,
        }
    }
}

/// Affine coefficients of one triangle:
/// `e' = a1 * e + a2 * n + delta_e`, `n' = b1 * e + b2 * n + delta_n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineParams {
    pub a1: f64,
    pub a2: f64,
    pub delta_e: f64,
    pub b1: f64,
    pub b2: f64,
    pub delta_n: f64,
}

impl AffineParams {
    pub fn apply(&self, p: Point) -> Point {
        Point {
            e: self.a1 * p.e + self.a2 * p.n + self.delta_e,
            n: self.b1 * p.e + self.b2 * p.n + self.delta_n,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AffineTriangle {
    pub corners: [PointId; 3],
    pub params: AffineParams,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeightTriangle {
    pub corners: [PointId; 3],
}

pub trait Corner {
    fn id(&self) -> PointId;
}

impl Corner for KkjEtrsPoint {
    fn id(&self) -> PointId {
        self.id
    }
}

impl Corner for HeightPoint {
    fn id(&self) -> PointId {
        self.id
    }
}

/// Corner points in upstream file order, indexed by id.
#[derive(Debug, Clone)]
pub struct CornerTable<T> {
    dataset: &'static str,
    points: Vec<T>,
    index: BTreeMap<PointId, usize>,
}

impl<T: Corner> CornerTable<T> {
    pub fn new(dataset: &'static str, points: Vec<T>) -> Result<Self> {
        let mut index = BTreeMap::new();
        for (i, point) in points.iter().enumerate() {
            if index.insert(point.id(), i).is_some() {
                return Err(Error::DuplicateId {
                    dataset,
                    id: point.id(),
                });
            }
        }
        Ok(Self {
            dataset,
            points,
            index,
        })
    }

    /// Looks up a corner referenced by the `triangle`th triangle row.
    pub fn get(&self, id: PointId, triangle: usize) -> Result<&T> {
        self.index
            .get(&id)
            .map(|&i| &self.points[i])
            .ok_or(Error::UnknownCorner {
                dataset: self.dataset,
                triangle,
                id,
            })
    }

    pub fn resolve(&self, corners: &[PointId; 3], triangle: usize) -> Result<[&T; 3]> {
        Ok([
            self.get(corners[0], triangle)?,
            self.get(corners[1], triangle)?,
            self.get(corners[2], triangle)?,
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn height_point(id: PointId) -> HeightPoint {
        HeightPoint::new(id, Point::new(0.0, 0.0), 10.0, 10.5)
    }

    #[test]
    fn test_height_diff() {
        let point = HeightPoint::new(1, Point::new(1.0, 2.0), 12.25, 12.5);
        assert_eq!(point.diff, 0.25);
    }

    #[test]
    fn test_affine_apply() {
        let params = AffineParams {
            a1: 1.0,
            a2: 0.0,
            delta_e: 10.0,
            b1: 0.0,
            b2: 2.0,
            delta_n: -5.0,
        };
        assert_eq!(params.apply(Point::new(3.0, 4.0)), Point::new(13.0, 3.0));
    }

    #[test]
    fn test_table_keeps_file_order() {
        let table = CornerTable::new("test", vec![height_point(9), height_point(2)]).unwrap();
        let ids: Vec<_> = table.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![9, 2]);
        assert_eq!(table.get(2, 0).unwrap().id, 2);
    }

    #[test]
    fn test_duplicate_id() {
        let result = CornerTable::new("test", vec![height_point(1), height_point(1)]);
        assert!(matches!(result, Err(Error::DuplicateId { id: 1, .. })));
    }

    #[test]
    fn test_unknown_corner() {
        let table = CornerTable::new("test", vec![height_point(1), height_point(2)]).unwrap();
        let result = table.resolve(&[1, 2, 3], 7);
        assert!(matches!(
            result,
            Err(Error::UnknownCorner {
                triangle: 7,
                id: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_direction_labels() {
        assert_eq!(Direction::KkjToTm35Fin.label(), "KKJ_TO_TM35FIN");
        assert_eq!(Direction::Tm35FinToKkj.source_srid(), Srid::EtrsTm35Fin);
        assert_eq!(Srid::Kkj.to_string(), "EPSG:2393");
    }
}
