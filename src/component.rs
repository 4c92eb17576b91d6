//! The component run: validate, transform, then write manifest and state.

use std::io::Write;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    config::{
        self, ConfigProvider, DEFAULT_ACTION, KEY_INPUT_ENCODING, REQUIRED_IMAGE_PARAMETERS,
        REQUIRED_PARAMETERS, RunParameters,
    },
    error::UserError,
    io_utils,
    manifest::ManifestWriter,
    state::{self, StatePersister},
    tables::TableRegistry,
    transform::{self, TransformOptions, TransformSummary},
};

pub const INPUT_TABLE: &str = "input.csv";
pub const OUTPUT_TABLE: &str = "output.csv";

pub struct Component<'a> {
    config: &'a dyn ConfigProvider,
    tables: &'a dyn TableRegistry,
    manifests: &'a dyn ManifestWriter,
    state: &'a dyn StatePersister,
}

impl<'a> Component<'a> {
    pub fn new(
        config: &'a dyn ConfigProvider,
        tables: &'a dyn TableRegistry,
        manifests: &'a dyn ManifestWriter,
        state: &'a dyn StatePersister,
    ) -> Self {
        Self {
            config,
            tables,
            manifests,
            state,
        }
    }

    /// Dispatches on the configured action. Only `run` exists.
    pub fn execute_action(&self, diagnostics: &mut dyn Write) -> Result<TransformSummary> {
        match self.config.action() {
            DEFAULT_ACTION => self.run(diagnostics),
            other => Err(UserError::UnsupportedAction(other.to_string()).into()),
        }
    }

    pub fn run(&self, diagnostics: &mut dyn Write) -> Result<TransformSummary> {
        info!("Running...");
        writeln!(diagnostics, "Running...").context("Writing to diagnostics")?;
        config::validate_configuration_parameters(self.config, REQUIRED_PARAMETERS)?;
        config::validate_image_parameters(self.config, REQUIRED_IMAGE_PARAMETERS)?;
        let params = RunParameters::from_config(self.config)?;
        debug!(
            "Configuration parameters: {:?}",
            self.config.parameters().keys().collect::<Vec<_>>()
        );
        let encoding = io_utils::resolve_encoding(params.input_encoding.as_deref()).map_err(
            |err| UserError::InvalidParameter {
                name: KEY_INPUT_ENCODING.to_string(),
                reason: err.to_string(),
            },
        )?;

        let in_table = self.tables.input_table(INPUT_TABLE)?;
        info!("Input table: {:?}", in_table.full_path);
        let out_table = self.tables.create_output_table(OUTPUT_TABLE)?;
        info!("Output table: {:?}", out_table.full_path);

        let options = TransformOptions {
            print_rows: params.print_rows,
            encoding,
        };
        let summary = transform::transform_file(
            &in_table.full_path,
            &out_table.full_path,
            &options,
            diagnostics,
        )?;
        info!(
            "Wrote {} row(s) with {} column(s) to {:?}",
            summary.rows,
            summary.columns.len(),
            out_table.full_path
        );

        self.manifests
            .write_manifest(&out_table)
            .with_context(|| format!("Writing manifest for '{}'", out_table.name))?;
        self.state
            .write_state(&state::next_state())
            .context("Writing state file")?;
        info!("Manifest and state written");
        Ok(summary)
    }
}
