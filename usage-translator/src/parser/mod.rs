//! Usage report reader.
//!
//! The report is a comma-delimited text file whose first line is a header.
//! Every other non-blank line holds exactly [`FIELD_COUNT`] positional fields
//! (see [`COLUMNS`]). There is no quoting or escaping: a value containing a
//! comma shifts every later field, which surfaces as a
//! [`ReportError::FieldCount`] for that line.

use std::path::Path;

use crate::error::{ReportError, ReportResult};
use crate::models::InputRecord;

/// Column names in report order.
pub const COLUMNS: [&str; 11] = [
    "partnerId",
    "partnerGuid",
    "accountId",
    "accountGuid",
    "username",
    "domains",
    "itemname",
    "plan",
    "itemType",
    "partNumber",
    "itemCount",
];

/// Number of fields on every data line.
pub const FIELD_COUNT: usize = COLUMNS.len();

/// Report text with the encoding it was decoded from.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub records: Vec<InputRecord>,
    pub encoding: String,
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 (with or without BOM) is always reported as `utf-8`; chardet
/// only guesses for anything else.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(strip_bom(bytes)).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        // Already failed UTF-8 validation above.
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "windows-1252".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes with the given encoding label, falling back to lossy UTF-8
/// for labels `encoding_rs` does not know.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let text = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        label => match encoding_rs::Encoding::for_label(label.as_bytes()) {
            Some(encoding) => encoding.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// Read and parse a report file.
pub fn read_report(path: &Path) -> ReportResult<ParseResult> {
    let bytes = std::fs::read(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let result = parse_report_bytes(&bytes)?;
    tracing::info!(
        path = %path.display(),
        encoding = %result.encoding,
        rows = result.records.len(),
        "read usage report"
    );
    Ok(result)
}

/// Parse report bytes, detecting their encoding.
pub fn parse_report_bytes(bytes: &[u8]) -> ReportResult<ParseResult> {
    if let Ok(content) = std::str::from_utf8(strip_bom(bytes)) {
        return Ok(ParseResult {
            records: parse_report(content)?,
            encoding: "utf-8".to_string(),
        });
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    Ok(ParseResult {
        records: parse_report(&content)?,
        encoding,
    })
}

/// Parse report text. The header line is required and discarded.
pub fn parse_report(content: &str) -> ReportResult<Vec<InputRecord>> {
    if content.lines().next().is_none() {
        return Err(ReportError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if is_blank(&row) {
            continue;
        }
        let line = row.position().map_or(0, csv::Position::line);
        records.push(parse_row(&row, line)?);
    }

    Ok(records)
}

fn is_blank(row: &csv::StringRecord) -> bool {
    row.iter().all(|field| field.trim().is_empty()) && row.len() <= 1
}

fn parse_row(row: &csv::StringRecord, line: u64) -> ReportResult<InputRecord> {
    if row.len() != FIELD_COUNT {
        return Err(ReportError::FieldCount {
            line,
            expected: FIELD_COUNT,
            found: row.len(),
        });
    }

    let text = |i: usize| row[i].to_string();
    let integer = |i: usize| -> ReportResult<i64> {
        row[i].trim().parse().map_err(|_| ReportError::InvalidInteger {
            line,
            column: COLUMNS[i],
            value: row[i].to_string(),
        })
    };

    let part_number = if row[9].trim().is_empty() {
        None
    } else {
        Some(text(9))
    };

    Ok(InputRecord {
        partner_id: integer(0)?,
        partner_guid: text(1),
        account_id: integer(2)?,
        account_guid: text(3),
        username: text(4),
        domains: text(5),
        item_name: text(6),
        plan: text(7),
        item_type: integer(8)?,
        part_number,
        item_count: integer(10)?,
        line,
    })
}
