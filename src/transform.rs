//! Streaming row-number transform.
//!
//! Reads one record at a time, appends its zero-based position as the
//! `row_number` column and writes it straight back out. Nothing beyond the
//! current record is buffered.

use std::{
    fmt,
    io::{Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};
use itertools::Itertools;
use log::{debug, warn};

use crate::{error::UserError, io_utils};

pub const ROW_NUMBER_COLUMN: &str = "row_number";

#[derive(Debug, Clone, Copy)]
pub struct TransformOptions {
    /// Emit a `Printing line {index}: {record}` diagnostic per data row.
    pub print_rows: bool,
    pub encoding: &'static Encoding,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            print_rows: false,
            encoding: UTF_8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSummary {
    pub columns: Vec<String>,
    pub rows: u64,
}

/// Parsed input record as an ordered column → value view.
///
/// `Display` renders every column positionally as `{"col": "value", ...}`.
/// It is a row dump, not a mapping: padded short rows show `""` and a
/// duplicated header name appears once per position.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl<'a> RecordView<'a> {
    pub fn new(columns: &'a [String], values: &'a [String]) -> Self {
        Self { columns, values }
    }

    /// Value of the last column named `name`, matching mapping semantics for
    /// duplicated header names.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.columns
            .iter()
            .zip(self.values)
            .filter(|(column, _)| column.as_str() == name)
            .map(|(_, value)| value.as_str())
            .last()
    }
}

impl fmt::Display for RecordView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self
            .columns
            .iter()
            .zip(self.values)
            .map(|(column, value)| format!("{column:?}: {value:?}"))
            .join(", ");
        write!(f, "{{{body}}}")
    }
}

pub fn output_columns(input_columns: &[String]) -> Vec<String> {
    let mut columns = input_columns.to_vec();
    columns.push(ROW_NUMBER_COLUMN.to_string());
    columns
}

/// Reads and decodes the header row, dropping a UTF-8 BOM in front of the
/// first column name. An input without a header is a user error.
pub fn read_headers<R>(reader: &mut csv::Reader<R>, source: &Path) -> Result<Vec<String>>
where
    R: Read,
{
    let raw = reader
        .byte_headers()
        .with_context(|| format!("Reading header row of {source:?}"))?
        .clone();
    let mut columns = io_utils::decode_record(&raw).map_err(|err| {
        anyhow::Error::from(UserError::MalformedRecord {
            row: 0,
            reason: format!("header: {err}"),
        })
    })?;
    if let Some(first) = columns.first_mut() {
        if let Some(rest) = first.strip_prefix('\u{feff}') {
            *first = rest.to_string();
        }
    }
    if columns.is_empty() || columns == [""] {
        return Err(UserError::MissingHeader(source.to_path_buf()).into());
    }
    Ok(columns)
}

/// Copies every data record from `reader` to `writer` with its row number
/// appended. The output header is written before the first record is read.
pub fn append_row_numbers<R, W>(
    reader: &mut csv::Reader<R>,
    input_columns: &[String],
    writer: &mut csv::Writer<W>,
    options: &TransformOptions,
    diagnostics: &mut dyn Write,
) -> Result<TransformSummary>
where
    R: Read,
    W: Write,
{
    let columns = output_columns(input_columns);
    writer
        .write_record(&columns)
        .context("Writing output header")?;

    // Setting `row_number` on a mapping also replaces any input column of
    // that name.
    let shadowed = input_columns
        .iter()
        .positions(|column| column == ROW_NUMBER_COLUMN)
        .collect::<Vec<_>>();
    if !shadowed.is_empty() {
        warn!(
            "Input already has a '{ROW_NUMBER_COLUMN}' column; its values will be overwritten"
        );
    }

    let mut record = csv::ByteRecord::new();
    let mut index: u64 = 0;
    loop {
        let more = match reader.read_byte_record(&mut record) {
            Ok(more) => more,
            Err(err) if err.is_io_error() => {
                return Err(err).with_context(|| format!("Reading row {index}"));
            }
            Err(err) => {
                return Err(UserError::MalformedRecord {
                    row: index,
                    reason: err.to_string(),
                }
                .into());
            }
        };
        if !more {
            break;
        }

        let mut values = io_utils::decode_record(&record).map_err(|err| {
            UserError::MalformedRecord {
                row: index,
                reason: err.to_string(),
            }
        })?;
        if values.len() > input_columns.len() {
            return Err(UserError::ExtraFields {
                row: index,
                expected: input_columns.len(),
                found: values.len(),
            }
            .into());
        }
        values.resize(input_columns.len(), String::new());

        if options.print_rows {
            writeln!(
                diagnostics,
                "Printing line {index}: {}",
                RecordView::new(input_columns, &values)
            )
            .context("Writing row diagnostics")?;
        }

        let row_number = index.to_string();
        for position in &shadowed {
            values[*position].clone_from(&row_number);
        }
        values.push(row_number);
        writer
            .write_record(&values)
            .with_context(|| format!("Writing row {index}"))?;
        index += 1;
    }

    writer.flush().context("Flushing output table")?;
    debug!("Transformed {index} row(s)");
    Ok(TransformSummary {
        columns,
        rows: index,
    })
}

/// File-to-file transform. The output file is only created once the input
/// has been opened and its header read; both handles close on every path.
pub fn transform_file(
    input: &Path,
    output: &Path,
    options: &TransformOptions,
    diagnostics: &mut dyn Write,
) -> Result<TransformSummary> {
    let mut reader = io_utils::open_csv_reader_from_path(input, options.encoding)?;
    let input_columns = read_headers(&mut reader, input)?;
    debug!("Input columns: {:?}", input_columns);
    let mut writer = io_utils::create_csv_writer(output)?;
    append_row_numbers(
        &mut reader,
        &input_columns,
        &mut writer,
        options,
        diagnostics,
    )
    .with_context(|| format!("Transforming {input:?} into {output:?}"))
}
