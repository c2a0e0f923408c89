//! KKJ <-> ETRS-TM35FIN affine triangulation network.

use tracing::info;

use crate::error::Result;
use crate::fetch::Fetcher;
use crate::model::{
    AffineParams, AffineTriangle, CornerTable, Direction, KkjEtrsPoint, Point, Srid,
};
use crate::parser::{parse_rows, Layout};
use crate::transform::AffineNetwork;
use crate::writer::sql::{self, InsertStatement};
use crate::writer::{Migration, SqlSink};

const BASE_URL: &str = "https://www.maanmittauslaitos.fi/sites/maanmittauslaitos.fi/files/attachments/2019/02";

pub const CORNER_POINTS_FILE: &str = "V10.05.02__common_inserts_for_kkj_etrs_triangle_corner_point_table.sql";
pub const KKJ_TO_ETRS_FILE: &str = "V10.05.03__common_inserts_for_kkj_to_etrs_triangulation_network.sql";
pub const ETRS_TO_KKJ_FILE: &str = "V10.05.04__common_inserts_for_etrs_to_kkj_triangulation_network.sql";

const CORNER_POINT_TABLE: &str = "common.kkj_etrs_triangle_corner_point";
const CORNER_POINT_COLUMNS: &[&str] = &["id", "coord_kkj", "coord_etrs"];

const NETWORK_TABLE: &str = "common.kkj_etrs_triangulation_network";
const NETWORK_COLUMNS: &[&str] = &[
    "coord1_id",
    "coord2_id",
    "coord3_id",
    "a1",
    "a2",
    "delta_e",
    "b1",
    "b2",
    "delta_n",
    "direction",
];

const VERTICES: Layout = Layout {
    dataset: "kkj_etrs_vertices",
    columns: &["id", "kkj_n", "kkj_e", "etrs_n", "etrs_e"],
};

const AFFINE_COLUMNS: &[&str] = &["c1", "c2", "c3", "a1", "a2", "delta_e", "b1", "b2", "delta_n"];

fn affine_layout(direction: Direction) -> Layout {
    Layout {
        dataset: match direction {
            Direction::KkjToTm35Fin => "kkj_to_etrs_affine",
            Direction::Tm35FinToKkj => "etrs_to_kkj_affine",
        },
        columns: AFFINE_COLUMNS,
    }
}

/// Upstream URLs of the three files.
#[derive(Debug, Clone)]
pub struct KkjEtrsSources {
    pub vertices: String,
    pub kkj_to_etrs: String,
    pub etrs_to_kkj: String,
}

impl Default for KkjEtrsSources {
    fn default() -> Self {
        Self {
            vertices: format!("{BASE_URL}/kkjEUREFFINtriangulationVertices.txt"),
            kkj_to_etrs: format!("{BASE_URL}/kkjEUREFFINaffineParametersKKJtoEUREFFIN.txt"),
            etrs_to_kkj: format!("{BASE_URL}/kkjEUREFFINaffineParametersEUREFFINtoKKJ.txt"),
        }
    }
}

pub fn parse_corner_points(text: &str) -> Result<CornerTable<KkjEtrsPoint>> {
    let points = parse_rows(text, VERTICES)?
        .iter()
        .map(|row| {
            Ok(KkjEtrsPoint {
                id: row.id(0)?,
                kkj: Point::new(row.number(2)?, row.number(1)?),
                etrs: Point::new(row.number(4)?, row.number(3)?),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    CornerTable::new(VERTICES.dataset, points)
}

pub fn parse_affine_triangles(text: &str, direction: Direction) -> Result<Vec<AffineTriangle>> {
    parse_rows(text, affine_layout(direction))?
        .iter()
        .map(|row| {
            Ok(AffineTriangle {
                corners: [row.id(0)?, row.id(1)?, row.id(2)?],
                params: AffineParams {
                    a1: row.number(3)?,
                    a2: row.number(4)?,
                    delta_e: row.number(5)?,
                    b1: row.number(6)?,
                    b2: row.number(7)?,
                    delta_n: row.number(8)?,
                },
                direction,
            })
        })
        .collect()
}

/// Corner points plus the affine triangles of both directions.
#[derive(Debug, Clone)]
pub struct KkjEtrsNetwork {
    pub points: CornerTable<KkjEtrsPoint>,
    pub kkj_to_etrs: Vec<AffineTriangle>,
    pub etrs_to_kkj: Vec<AffineTriangle>,
}

impl KkjEtrsNetwork {
    pub fn load(fetcher: &impl Fetcher, sources: &KkjEtrsSources) -> Result<Self> {
        let points = parse_corner_points(&fetcher.fetch(&sources.vertices)?)?;
        let kkj_to_etrs = parse_affine_triangles(
            &fetcher.fetch(&sources.kkj_to_etrs)?,
            Direction::KkjToTm35Fin,
        )?;
        let etrs_to_kkj = parse_affine_triangles(
            &fetcher.fetch(&sources.etrs_to_kkj)?,
            Direction::Tm35FinToKkj,
        )?;

        info!(
            "Parsed KKJ/ETRS network: {} corner points, {} + {} triangles",
            points.len(),
            kkj_to_etrs.len(),
            etrs_to_kkj.len()
        );

        Ok(Self {
            points,
            kkj_to_etrs,
            etrs_to_kkj,
        })
    }

    pub fn triangles(&self, direction: Direction) -> &[AffineTriangle] {
        match direction {
            Direction::KkjToTm35Fin => &self.kkj_to_etrs,
            Direction::Tm35FinToKkj => &self.etrs_to_kkj,
        }
    }

    pub fn migrations(&self) -> Result<Vec<Migration>> {
        Ok(vec![
            Migration {
                file_name: CORNER_POINTS_FILE,
                sql: render_corner_points(&self.points),
            },
            Migration {
                file_name: KKJ_TO_ETRS_FILE,
                sql: render_affine_triangles(&self.points, &self.kkj_to_etrs)?,
            },
            Migration {
                file_name: ETRS_TO_KKJ_FILE,
                sql: render_affine_triangles(&self.points, &self.etrs_to_kkj)?,
            },
        ])
    }

    /// Triangles of `direction` in that direction's source coordinates.
    pub fn affine_network(&self, direction: Direction) -> Result<AffineNetwork> {
        let srid = direction.source_srid();
        let triangles = self
            .triangles(direction)
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let [a, b, c] = self.points.resolve(&t.corners, i)?;
                Ok(([a.coord(srid), b.coord(srid), c.coord(srid)], t.params))
            })
            .collect::<Result<Vec<_>>>()?;

        let network = AffineNetwork::new(triangles);
        info!(
            "{} network: {} triangles in {}",
            direction.label(),
            network.len(),
            srid
        );
        Ok(network)
    }
}

pub fn render_corner_points(points: &CornerTable<KkjEtrsPoint>) -> String {
    let mut insert = InsertStatement::new(CORNER_POINT_TABLE, CORNER_POINT_COLUMNS);
    for p in points.iter() {
        insert.push(&[
            p.id.to_string(),
            sql::point(p.kkj, Srid::Kkj),
            sql::point(p.etrs, Srid::EtrsTm35Fin),
        ]);
    }
    insert.render()
}

/// Fails on the first triangle whose corners are not all in `points`.
pub fn render_affine_triangles(
    points: &CornerTable<KkjEtrsPoint>,
    triangles: &[AffineTriangle],
) -> Result<String> {
    let mut insert = InsertStatement::new(NETWORK_TABLE, NETWORK_COLUMNS);
    for (i, t) in triangles.iter().enumerate() {
        let [c1, c2, c3] = points.resolve(&t.corners, i)?;
        let p = &t.params;
        insert.push(&[
            c1.id.to_string(),
            c2.id.to_string(),
            c3.id.to_string(),
            p.a1.to_string(),
            p.a2.to_string(),
            p.delta_e.to_string(),
            p.b1.to_string(),
            p.b2.to_string(),
            p.delta_n.to_string(),
            sql::string(t.direction.label()),
        ]);
    }
    Ok(insert.render())
}

/// Fetches, renders and writes the three KKJ/ETRS migrations.
pub fn run(
    fetcher: &impl Fetcher,
    sink: &mut impl SqlSink,
    sources: &KkjEtrsSources,
) -> Result<()> {
    let network = KkjEtrsNetwork::load(fetcher, sources)?;
    for migration in network.migrations()? {
        sink.write(&migration)?;
    }
    Ok(())
}
