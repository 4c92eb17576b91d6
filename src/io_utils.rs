//! CSV reader/writer construction and input decoding.
//!
//! Both tables use the same dialect: comma delimiter, `\n` terminator,
//! mandatory header row and minimal quoting on output. Non-UTF-8 input is
//! transcoded to UTF-8 as one stream with `encoding_rs_io`, so fields are
//! always decoded as UTF-8 and a byte-order mark is only recognised at the
//! start of the input.

use std::{
    borrow::Cow,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::{QuoteStyle, Terminator};
use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::DecodeReaderBytesBuilder;

pub const CSV_DELIMITER: u8 = b',';
pub const CSV_ENCLOSURE: u8 = b'"';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

/// Reader with the header row enabled. Records may be shorter or longer than
/// the header; the transform decides what to do with either.
pub fn open_csv_reader<R>(reader: R) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(CSV_DELIMITER)
        .quote(CSV_ENCLOSURE)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

/// Yields the input as UTF-8. UTF-8 input passes through byte for byte;
/// other encodings go through a streaming decoder that drops only that
/// encoding's own BOM at the very start.
pub fn decode_reader<'a, R>(reader: R, encoding: &'static Encoding) -> Box<dyn Read + 'a>
where
    R: Read + 'a,
{
    if encoding == UTF_8 {
        Box::new(reader)
    } else {
        Box::new(
            DecodeReaderBytesBuilder::new()
                .encoding(Some(encoding))
                .build(reader),
        )
    }
}

pub fn open_csv_reader_from_path(
    path: &Path,
    encoding: &'static Encoding,
) -> Result<csv::Reader<Box<dyn Read>>> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    Ok(open_csv_reader(decode_reader(BufReader::new(file), encoding)))
}

pub fn open_csv_writer<W>(writer: W) -> csv::Writer<W>
where
    W: Write,
{
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(CSV_DELIMITER)
        .quote(CSV_ENCLOSURE)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .double_quote(true);
    builder.from_writer(writer)
}

pub fn create_csv_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
    let file = File::create(path).with_context(|| format!("Creating output file {path:?}"))?;
    Ok(open_csv_writer(BufWriter::new(file)))
}

/// Strict UTF-8 decode of one field. No BOM handling: a leading U+FEFF in a
/// value is data.
pub fn decode_bytes(bytes: &[u8]) -> Result<String> {
    UTF_8
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
        .ok_or_else(|| anyhow!("Failed to decode text with encoding {}", UTF_8.name()))
}

pub fn decode_record(record: &csv::ByteRecord) -> Result<Vec<String>> {
    record.iter().map(decode_bytes).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_encoding_defaults_to_utf8() {
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(
            resolve_encoding(Some(" latin1 ")).unwrap(),
            encoding_rs::WINDOWS_1252
        );
        assert!(resolve_encoding(Some("klingon")).is_err());
    }

    #[test]
    fn writer_uses_minimal_quoting_and_newline_terminator() {
        let mut bytes = Vec::new();
        {
            let mut writer = open_csv_writer(&mut bytes);
            writer.write_record(["plain", "a,b", "say \"hi\""]).unwrap();
            writer.write_record(["", "x"]).unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "plain,\"a,b\",\"say \"\"hi\"\"\"\n,x\n"
        );
    }

    #[test]
    fn decode_record_rejects_invalid_utf8_and_keeps_bom_bytes() {
        let record = csv::ByteRecord::from(vec![&b"ok"[..], &b"\xff"[..]]);
        assert!(decode_record(&record).is_err());

        let record = csv::ByteRecord::from(vec![&b"\xef\xbb\xbfx"[..], &b"\xff\xfeab"[..]]);
        assert!(decode_record(&record).is_err());
        let record = csv::ByteRecord::from(vec![&b"\xef\xbb\xbfx"[..]]);
        assert_eq!(decode_record(&record).unwrap(), vec!["\u{feff}x"]);
    }

    #[test]
    fn decode_reader_transcodes_without_sniffing_midstream_bytes() {
        let mut text = String::new();
        decode_reader(&b"\xff\xfeid\n1,\xff\xfeab\n"[..], encoding_rs::WINDOWS_1252)
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "\u{ff}\u{fe}id\n1,\u{ff}\u{fe}ab\n");

        let mut raw = Vec::new();
        decode_reader(&b"\xef\xbb\xbfa\n\xff\n"[..], UTF_8)
            .read_to_end(&mut raw)
            .unwrap();
        assert_eq!(raw, b"\xef\xbb\xbfa\n\xff\n");
    }
}
