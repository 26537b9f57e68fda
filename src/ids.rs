//! Identifier list loading.
//! - `.csv` files: header row, then one value per row from the chosen column.
//! - Anything else: one identifier per line.
//!
//! Values are trimmed and empty ones skipped; order and duplicates are kept.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::BatchError;
use crate::fs_ops::io_error_with_help;

/// Load identifiers from `path`. `csv_column` selects a header column for CSV
/// input; when absent or not found the first column is used.
pub fn load_ids(path: &Path, csv_column: Option<&str>) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(BatchError::IdsFileNotFound(path.to_path_buf()).into());
    }
    let content = fs::read_to_string(path).map_err(io_error_with_help("read IDs file", path))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let ids = if is_csv {
        ids_from_csv(content, csv_column)
            .with_context(|| format!("parse CSV IDs file '{}'", path.display()))?
    } else {
        ids_from_lines(content)
    };
    debug!(path = %path.display(), count = ids.len(), csv = is_csv, "loaded identifiers");
    Ok(ids)
}

/// Plain-line format.
pub fn ids_from_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// CSV format with a header row. Quoted fields may span lines.
pub fn ids_from_csv(content: &str, column: Option<&str>) -> Result<Vec<String>> {
    let mut rows = parse_csv_records(content)?.into_iter();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };

    let idx = column
        .and_then(|c| header.iter().position(|h| h.trim() == c))
        .unwrap_or(0);

    Ok(rows
        .filter_map(|row| row.into_iter().nth(idx))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect())
}

/// Split CSV text into records. Double-quoted fields keep commas, `""`
/// escapes and line breaks. Blank lines are skipped.
fn parse_csv_records(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1usize;
    let mut quote_line = 0usize;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    cur.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if cur.trim().is_empty() => {
                cur.clear();
                in_quotes = true;
                quoted = true;
                quote_line = line;
            }
            _ if in_quotes => cur.push(c),
            ',' => fields.push(std::mem::take(&mut cur)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut cur));
                push_record(&mut records, std::mem::take(&mut fields), quoted);
                quoted = false;
            }
            _ => cur.push(c),
        }
    }
    if in_quotes {
        bail!("unterminated quoted field starting on line {quote_line}");
    }
    if !cur.is_empty() || !fields.is_empty() || quoted {
        fields.push(cur);
        push_record(&mut records, fields, quoted);
    }
    Ok(records)
}

fn push_record(records: &mut Vec<Vec<String>>, fields: Vec<String>, quoted: bool) {
    let blank = !quoted && fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        records.push(fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn lines_trimmed_and_blank_skipped() {
        let ids = ids_from_lines("  A \n\nB\r\n   \nA\n");
        assert_eq!(ids, vec!["A", "B", "A"]);
    }

    #[test]
    fn csv_uses_named_column() {
        let csv = "name,id\nfoo,001\nbar, 002 \nbaz,\n";
        assert_eq!(ids_from_csv(csv, Some("id")).unwrap(), vec!["001", "002"]);
    }

    #[test]
    fn csv_unknown_column_falls_back_to_first() {
        let csv = "name,id\nfoo,001\nbar,002\n";
        assert_eq!(ids_from_csv(csv, Some("missing")).unwrap(), vec!["foo", "bar"]);
        assert_eq!(ids_from_csv(csv, None).unwrap(), vec!["foo", "bar"]);
    }

    #[test]
    fn csv_quoted_fields() {
        let csv = "id,note\n\"a,b\",x\n\"say \"\"hi\"\"\",y\n";
        assert_eq!(ids_from_csv(csv, None).unwrap(), vec!["a,b", "say \"hi\""]);
    }

    #[test]
    fn csv_header_only_or_empty() {
        assert!(ids_from_csv("", None).unwrap().is_empty());
        assert!(ids_from_csv("id\n", None).unwrap().is_empty());
    }

    #[test]
    fn csv_quoted_field_spans_lines() {
        let csv = "id,note\r\n\"a\nb\",first\r\n\r\nc,\"multi\nline note\"\r\n";
        assert_eq!(ids_from_csv(csv, None).unwrap(), vec!["a\nb", "c"]);
        assert_eq!(ids_from_csv(csv, Some("note")).unwrap(), vec!["first", "multi\nline note"]);
    }

    #[test]
    fn csv_unterminated_quote_is_error() {
        let err = ids_from_csv("id\nok\n\"never closed\nmore\n", None).unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn load_dispatches_on_extension() {
        let td = assert_fs::TempDir::new().unwrap();
        let csv = td.child("ids.CSV");
        csv.write_str("\u{feff}id\nX\nY\n").unwrap();
        assert_eq!(load_ids(csv.path(), None).unwrap(), vec!["X", "Y"]);

        let other = td.child("ids.list");
        other.write_str("id\nX\n").unwrap();
        assert_eq!(load_ids(other.path(), None).unwrap(), vec!["id", "X"]);
    }

    #[test]
    fn missing_file_is_typed_error() {
        let td = assert_fs::TempDir::new().unwrap();
        let err = load_ids(&td.path().join("nope.txt"), None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BatchError>(),
            Some(BatchError::IdsFileNotFound(_))
        ));
    }
}
