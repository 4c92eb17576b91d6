//! File-backed host services rooted at the component data directory.
//!
//! ```text
//! <data>/config.json
//! <data>/in/tables/<name>
//! <data>/out/tables/<name>
//! <data>/out/tables/<name>.manifest
//! <data>/out/state.json
//! ```

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::debug;
use serde_json::{Map, Value};

use crate::{
    error::UserError,
    manifest::{ManifestWriter, TableManifest},
    state::{STATE_FILE_NAME, StatePersister},
    tables::{TableDefinition, TableRegistry},
};

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone)]
pub struct DataDirectory {
    root: PathBuf,
}

impl DataDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn input_tables_dir(&self) -> PathBuf {
        self.root.join("in").join("tables")
    }

    pub fn output_tables_dir(&self) -> PathBuf {
        self.root.join("out").join("tables")
    }

    pub fn output_state_path(&self) -> PathBuf {
        self.root.join("out").join(STATE_FILE_NAME)
    }
}

impl TableRegistry for DataDirectory {
    fn input_table(&self, name: &str) -> Result<TableDefinition> {
        let path = self.input_tables_dir().join(name);
        if !path.is_file() {
            return Err(UserError::MissingInputTable {
                name: name.to_string(),
                path,
            }
            .into());
        }
        Ok(TableDefinition::new(name, path))
    }

    fn create_output_table(&self, name: &str) -> Result<TableDefinition> {
        let dir = self.output_tables_dir();
        fs::create_dir_all(&dir).with_context(|| format!("Creating output directory {dir:?}"))?;
        Ok(TableDefinition::new(name, dir.join(name)))
    }
}

impl ManifestWriter for DataDirectory {
    fn write_manifest(&self, table: &TableDefinition) -> Result<()> {
        let path = table.manifest_path();
        debug!("Writing manifest for '{}' to {:?}", table.name, path);
        write_json(&path, &TableManifest::for_table(table))
    }
}

impl StatePersister for DataDirectory {
    fn write_state(&self, state: &Map<String, Value>) -> Result<()> {
        let path = self.output_state_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating state directory {parent:?}"))?;
        }
        write_json(&path, state)
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Creating {path:?}"))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Writing JSON to {path:?}"))?;
    writer
        .flush()
        .with_context(|| format!("Flushing {path:?}"))
}
