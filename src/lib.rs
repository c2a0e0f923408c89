pub mod dataset;
pub mod error;
pub mod fetch;
pub mod model;
pub mod parser;
pub mod transform;
pub mod writer;

pub use dataset::{HeightDataset, HeightSources, KkjEtrsNetwork, KkjEtrsSources};
pub use error::{Error, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use model::{Direction, Point, Srid};
pub use writer::{FileSink, MemorySink, Migration, SqlSink};
