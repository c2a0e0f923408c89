//! The two published MML networks and their migrations.

pub mod kkj_etrs;
pub mod n60_n2000;

pub use kkj_etrs::{KkjEtrsNetwork, KkjEtrsSources};
pub use n60_n2000::{HeightDataset, HeightSources};
