//! Component configuration (`config.json`) and the required-parameter gate.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::Result;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::UserError;

pub const KEY_API_TOKEN: &str = "#api_token";
pub const KEY_PRINT_ROWS: &str = "print_rows";
pub const KEY_DEBUG: &str = "debug";
pub const KEY_INPUT_ENCODING: &str = "input_encoding";

pub const REQUIRED_PARAMETERS: &[&str] = &[KEY_PRINT_ROWS];
pub const REQUIRED_IMAGE_PARAMETERS: &[&str] = &[];

pub const DEFAULT_ACTION: &str = "run";

/// Source of the parameters the host hands to a run.
pub trait ConfigProvider {
    fn parameters(&self) -> &Map<String, Value>;
    fn image_parameters(&self) -> &Map<String, Value>;
    fn action(&self) -> &str;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub image_parameters: Map<String, Value>,
    #[serde(default)]
    pub action: Option<String>,
}

impl Configuration {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| UserError::InvalidConfigFile {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let reader = BufReader::new(file);
        let config = serde_json::from_reader(reader).map_err(|err| {
            UserError::InvalidConfigFile {
                path: path.to_path_buf(),
                reason: err.to_string(),
            }
        })?;
        Ok(config)
    }
}

impl ConfigProvider for Configuration {
    fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }

    fn image_parameters(&self) -> &Map<String, Value> {
        &self.image_parameters
    }

    fn action(&self) -> &str {
        self.action
            .as_deref()
            .filter(|action| !action.trim().is_empty())
            .unwrap_or(DEFAULT_ACTION)
    }
}

/// Parameters the row transform reads after the gate has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParameters {
    pub print_rows: bool,
    pub debug: bool,
    pub input_encoding: Option<String>,
}

impl RunParameters {
    pub fn from_config(config: &dyn ConfigProvider) -> Result<Self> {
        let params = config.parameters();
        let print_rows = flag(params, KEY_PRINT_ROWS);
        let debug = flag(params, KEY_DEBUG);
        let input_encoding = match params.get(KEY_INPUT_ENCODING) {
            None | Some(Value::Null) => None,
            Some(Value::String(label)) => Some(label.clone()),
            Some(other) => {
                return Err(UserError::InvalidParameter {
                    name: KEY_INPUT_ENCODING.to_string(),
                    reason: format!("expected an encoding label, got {other}"),
                }
                .into());
            }
        };
        Ok(Self {
            print_rows,
            debug,
            input_encoding,
        })
    }
}

/// Fails with [`UserError::MissingParameters`] when any required key is
/// absent or `null`.
pub fn validate_configuration_parameters(
    config: &dyn ConfigProvider,
    required: &[&str],
) -> Result<(), UserError> {
    let missing = missing_keys(config.parameters(), required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(UserError::MissingParameters(missing))
    }
}

pub fn validate_image_parameters(
    config: &dyn ConfigProvider,
    required: &[&str],
) -> Result<(), UserError> {
    let missing = missing_keys(config.image_parameters(), required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(UserError::MissingImageParameters(missing))
    }
}

fn missing_keys(params: &Map<String, Value>, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|key| matches!(params.get(**key), None | Some(Value::Null)))
        .map(|key| key.to_string())
        .collect()
}

/// Reads a boolean-ish parameter by truthiness; absent or `null` is `false`.
///
/// The words `true/t/yes/y/1` and `false/f/no/n/0` are read as booleans.
/// Any other string, array or object is true when non-empty.
pub fn flag(params: &Map<String, Value>, name: &str) -> bool {
    match params.get(name) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(value)) => *value,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|value| value != 0.0),
        Some(Value::String(raw)) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" => true,
            "false" | "f" | "no" | "n" | "0" => false,
            _ => !raw.is_empty(),
        },
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(entries)) => !entries.is_empty(),
    }
}
