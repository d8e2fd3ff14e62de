//! CSV ingestion: bytes in, a named [`Dataset`] out.
//!
//! The first row is always treated as the header. Blank lines are skipped
//! by the reader; a line of empty fields is a real all-null row. The
//! delimiter defaults by file extension (`.tsv` gets a tab, everything
//! else a comma) and the input encoding defaults to UTF-8 with a
//! label-based override, both overridable by the caller.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};
use log::info;

use crate::data::{Cell, RecordSet};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

/// One uploaded file, parsed: the seeded table name plus its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub table_name: String,
    pub records: RecordSet,
}

/// Seeds the table name from the upload's file name, minus its extension.
/// No identifier validation happens here; a bad name is rejected by the
/// engine when the table is created.
pub fn default_table_name(file_name: &str) -> String {
    let trimmed = file_name
        .strip_suffix(".csv")
        .or_else(|| file_name.strip_suffix(".tsv"))
        .unwrap_or(file_name);
    trimmed.to_string()
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'")),
        None => Ok(UTF_8),
    }
}

pub fn resolve_delimiter(file_name: &str, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| {
        match Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
            _ => DEFAULT_CSV_DELIMITER,
        }
    })
}

/// Parses an on-disk file, resolving delimiter and encoding from the path.
pub fn parse_file(path: &Path) -> Result<Dataset> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Input path {path:?} has no usable file name"))?;
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
    );
    parse_source(file_name, reader, None, None)
}

/// Parses any byte source under the given upload file name.
pub fn parse_source<R: Read>(
    file_name: &str,
    source: R,
    delimiter: Option<u8>,
    encoding_label: Option<&str>,
) -> Result<Dataset> {
    let delimiter = resolve_delimiter(file_name, delimiter);
    let encoding = resolve_encoding(encoding_label)?;
    let records = parse_records(source, delimiter, encoding)
        .with_context(|| format!("Parsing CSV upload '{file_name}'"))?;
    info!(
        "Parsed '{}': {} column(s), {} row(s)",
        file_name,
        records.column_count(),
        records.row_count()
    );
    Ok(Dataset {
        table_name: default_table_name(file_name),
        records,
    })
}

/// Reads header plus data rows into a [`RecordSet`].
///
/// Rows narrower than the header are padded with nulls and wider rows are
/// truncated, so one malformed line cannot skew column alignment for the
/// statements built later.
pub fn parse_records<R: Read>(
    source: R,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<RecordSet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(source);

    let header_record = reader.byte_headers()?.clone();
    let headers = header_record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect::<Result<Vec<_>>>()
        .context("Decoding header row")?;
    let mut records = RecordSet::new(headers);

    let mut record = csv::ByteRecord::new();
    let mut line = 1usize;
    while reader
        .read_byte_record(&mut record)
        .with_context(|| format!("Reading row {}", line + 1))?
    {
        line += 1;
        let cells = record
            .iter()
            .map(|field| {
                let decoded = decode_bytes(field, encoding)?;
                Ok(Cell::from_field(&decoded))
            })
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Decoding row {line}"))?;
        records.push_row(cells);
    }

    Ok(records)
}

fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}
