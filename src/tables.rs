//! Logical table names resolved to files by the host.

use std::path::PathBuf;

use anyhow::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: String,
    pub full_path: PathBuf,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>, full_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            full_path: full_path.into(),
        }
    }

    /// Location of the manifest that accompanies this table.
    pub fn manifest_path(&self) -> PathBuf {
        let mut raw = self.full_path.clone().into_os_string();
        raw.push(".manifest");
        PathBuf::from(raw)
    }
}

pub trait TableRegistry {
    /// Looks up an existing input table; a missing table is a user error.
    fn input_table(&self, name: &str) -> Result<TableDefinition>;

    /// Describes an output table. Only metadata; no file is created.
    fn create_output_table(&self, name: &str) -> Result<TableDefinition>;
}
