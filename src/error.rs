use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to fetch {url}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{dataset}: line {line} has {found} columns, expected {expected}")]
    ColumnCount {
        dataset: &'static str,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{dataset}: line {line}, column {column}: invalid number {value:?}")]
    InvalidNumber {
        dataset: &'static str,
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("{dataset}: duplicate point id {id}")]
    DuplicateId { dataset: &'static str, id: i64 },

    #[error("{dataset}: triangle {triangle} references unknown corner point {id}")]
    UnknownCorner {
        dataset: &'static str,
        triangle: usize,
        id: i64,
    },

    #[error("{dataset}: no rows")]
    EmptyDataset { dataset: &'static str },

    #[error("point ({x}, {y}) is outside the triangulation network")]
    OutsideNetwork { x: f64, y: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
