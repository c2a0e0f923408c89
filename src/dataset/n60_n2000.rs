//! N60 -> N2000 height correction network.

use tracing::info;

use crate::error::Result;
use crate::fetch::Fetcher;
use crate::model::{CornerTable, HeightPoint, HeightTriangle, Point, Srid};
use crate::parser::{parse_rows, Layout};
use crate::transform::HeightNetwork;
use crate::writer::sql::{self, InsertStatement};
use crate::writer::{Migration, SqlSink};

const BASE_URL: &str = "https://www.maanmittauslaitos.fi/sites/maanmittauslaitos.fi/files/attachments/2019/02";

pub const CORNER_POINTS_FILE: &str = "V10.04.02__common_inserts_for_n60_n2000_triangle_corner_point_table.sql";
pub const NETWORK_FILE: &str = "V10.04.03__common_inserts_for_n60_n2000_triangulation_network_table.sql";

const CORNER_POINT_TABLE: &str = "common.n60_n2000_triangle_corner_point";
const CORNER_POINT_COLUMNS: &[&str] = &[
    "id",
    "coord",
    "height_n60",
    "height_n2000",
    "height_diff",
];

const NETWORK_TABLE: &str = "common.n60_n2000_triangulation_network";
const NETWORK_COLUMNS: &[&str] = &["coord1_id", "coord2_id", "coord3_id", "polygon"];

const VERTICES: Layout = Layout {
    dataset: "n60_n2000_vertices",
    columns: &["id", "n", "e", "n60", "n2000"],
};

const TRIANGLES: Layout = Layout {
    dataset: "n60_n2000_network",
    columns: &["c1", "c2", "c3"],
};

#[derive(Debug, Clone)]
pub struct HeightSources {
    pub vertices: String,
    pub network: String,
}

impl Default for HeightSources {
    fn default() -> Self {
        Self {
            vertices: format!("{BASE_URL}/n60n2000triangulationVertices.txt"),
            network: format!("{BASE_URL}/n60n2000triangulationNetwork.txt"),
        }
    }
}

pub fn parse_corner_points(text: &str) -> Result<CornerTable<HeightPoint>> {
    let points = parse_rows(text, VERTICES)?
        .iter()
        .map(|row| {
            Ok(HeightPoint::new(
                row.id(0)?,
                Point::new(row.number(2)?, row.number(1)?),
                row.number(3)?,
                row.number(4)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    CornerTable::new(VERTICES.dataset, points)
}

pub fn parse_triangles(text: &str) -> Result<Vec<HeightTriangle>> {
    parse_rows(text, TRIANGLES)?
        .iter()
        .map(|row| {
            Ok(HeightTriangle {
                corners: [row.id(0)?, row.id(1)?, row.id(2)?],
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct HeightDataset {
    pub points: CornerTable<HeightPoint>,
    pub triangles: Vec<HeightTriangle>,
}

impl HeightDataset {
    pub fn load(fetcher: &impl Fetcher, sources: &HeightSources) -> Result<Self> {
        let points = parse_corner_points(&fetcher.fetch(&sources.vertices)?)?;
        let triangles = parse_triangles(&fetcher.fetch(&sources.network)?)?;

        info!(
            "Parsed N60/N2000 network: {} corner points, {} triangles",
            points.len(),
            triangles.len()
        );

        Ok(Self { points, triangles })
    }

    pub fn migrations(&self) -> Result<Vec<Migration>> {
        Ok(vec![
            Migration {
                file_name: CORNER_POINTS_FILE,
                sql: render_corner_points(&self.points),
            },
            Migration {
                file_name: NETWORK_FILE,
                sql: render_triangles(&self.points, &self.triangles)?,
            },
        ])
    }

    pub fn height_network(&self) -> Result<HeightNetwork> {
        let triangles = self
            .triangles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let [a, b, c] = self.points.resolve(&t.corners, i)?;
                Ok(([a.coord, b.coord, c.coord], [a.diff, b.diff, c.diff]))
            })
            .collect::<Result<Vec<_>>>()?;

        let network = HeightNetwork::new(triangles);
        info!(
            "N60/N2000 network: {} triangles in {}",
            network.len(),
            Srid::EtrsTm35Fin
        );
        Ok(network)
    }
}

pub fn render_corner_points(points: &CornerTable<HeightPoint>) -> String {
    let mut insert = InsertStatement::new(CORNER_POINT_TABLE, CORNER_POINT_COLUMNS);
    for p in points.iter() {
        insert.push(&[
            p.id.to_string(),
            sql::point(p.coord, Srid::EtrsTm35Fin),
            p.n60.to_string(),
            p.n2000.to_string(),
            p.diff.to_string(),
        ]);
    }
    insert.render()
}

pub fn render_triangles(
    points: &CornerTable<HeightPoint>,
    triangles: &[HeightTriangle],
) -> Result<String> {
    let mut insert = InsertStatement::new(NETWORK_TABLE, NETWORK_COLUMNS);
    for (i, t) in triangles.iter().enumerate() {
        let [c1, c2, c3] = points.resolve(&t.corners, i)?;
        insert.push(&[
            c1.id.to_string(),
            c2.id.to_string(),
            c3.id.to_string(),
            sql::triangle([c1.coord, c2.coord, c3.coord], Srid::EtrsTm35Fin),
        ]);
    }
    Ok(insert.render())
}

/// Fetches, renders and writes the two N60/N2000 migrations.
pub fn run(
    fetcher: &impl Fetcher,
    sink: &mut impl SqlSink,
    sources: &HeightSources,
) -> Result<()> {
    let dataset = HeightDataset::load(fetcher, sources)?;
    for migration in dataset.migrations()? {
        sink.write(&migration)?;
    }
    Ok(())
}
