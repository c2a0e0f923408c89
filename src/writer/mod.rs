pub mod sql;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

/// One generated migration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub file_name: &'static str,
    pub sql: String,
}

/// Destination of generated migrations.
pub trait SqlSink {
    fn write(&mut self, migration: &Migration) -> Result<()>;
}

/// Writes each migration as a file under `dir`.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl SqlSink for FileSink {
    fn write(&mut self, migration: &Migration) -> Result<()> {
        let path = self.dir.join(migration.file_name);
        fs::write(&path, &migration.sql).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        info!("Written {:?} ({} bytes)", path, migration.sql.len());
        Ok(())
    }
}

/// Keeps migrations in memory, keyed by file name.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub files: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.files.get(file_name).map(String::as_str)
    }
}

impl SqlSink for MemorySink {
    fn write(&mut self, migration: &Migration) -> Result<()> {
        self.files
            .insert(migration.file_name.to_string(), migration.sql.clone());
        Ok(())
    }
}
