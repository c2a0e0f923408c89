//! PostGIS flavoured SQL text.

use crate::model::{Point, Srid};

/// Multi-row `INSERT` into a fixed table and column list.
#[derive(Debug, Clone)]
pub struct InsertStatement {
    table: &'static str,
    columns: &'static [&'static str],
    tuples: Vec<String>,
}

impl InsertStatement {
    pub fn new(table: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            table,
            columns,
            tuples: Vec::new(),
        }
    }

    /// Adds one value tuple. `values` must be rendered SQL, one per column.
    pub fn push(&mut self, values: &[String]) {
        debug_assert_eq!(values.len(), self.columns.len());
        self.tuples.push(format!("({})", values.join(", ")));
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn render(&self) -> String {
        // `values` without tuples is not valid SQL
        debug_assert!(!self.is_empty(), "no tuples for {}", self.table);
        tracing::debug!("{}: {} tuples", self.table, self.len());
        format!(
            "insert into {} ({})\nvalues\n{};\n",
            self.table,
            self.columns.join(", "),
            self.tuples.join(",\n")
        )
    }
}

pub fn point(p: Point, srid: Srid) -> String {
    format!(
        "postgis.st_setsrid(postgis.st_point({}, {}), {})",
        p.e,
        p.n,
        srid.code()
    )
}

/// Triangle polygon with the ring closed on its first corner.
pub fn triangle(corners: [Point; 3], srid: Srid) -> String {
    let ring: Vec<String> = corners
        .iter()
        .chain(std::iter::once(&corners[0]))
        .map(|p| format!("{} {}", p.e, p.n))
        .collect();
    format!(
        "postgis.st_polygonfromtext('polygon(({}))', {})",
        ring.join(", "),
        srid.code()
    )
}

pub fn string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
