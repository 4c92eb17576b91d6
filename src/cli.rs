use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Append a zero-based row_number column to the component's input table",
    long_about = None
)]
pub struct Cli {
    /// Component data directory holding config.json, in/ and out/
    #[arg(long = "data-dir", env = "KBC_DATADIR", default_value = "/data")]
    pub data_dir: PathBuf,
}
