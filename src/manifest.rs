//! Output table manifests.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{
    io_utils::{CSV_DELIMITER, CSV_ENCLOSURE},
    tables::TableDefinition,
};

/// Metadata the host registers alongside an output table. The CSV carries
/// its own header, so no column list is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableManifest {
    pub name: String,
    pub path: PathBuf,
    pub delimiter: String,
    pub enclosure: String,
    pub incremental: bool,
    pub primary_key: Vec<String>,
}

impl TableManifest {
    pub fn for_table(table: &TableDefinition) -> Self {
        Self {
            name: table.name.clone(),
            path: table.full_path.clone(),
            delimiter: (CSV_DELIMITER as char).to_string(),
            enclosure: (CSV_ENCLOSURE as char).to_string(),
            incremental: false,
            primary_key: Vec::new(),
        }
    }
}

pub trait ManifestWriter {
    fn write_manifest(&self, table: &TableDefinition) -> Result<()>;
}
