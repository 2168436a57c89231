//! Newline-delimited JSON reading and writing.

use crate::domain::errors::DatasetError;
use crate::domain::record::Record;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Parses one JSON object per non-blank line. `origin` names the source in
/// I/O errors.
///
/// Lines are handled as bytes so that invalid UTF-8 is reported as a
/// malformed line. There is no partial recovery: the first malformed line
/// aborts the load.
pub fn read_records<R: BufRead>(reader: R, origin: &Path) -> Result<Vec<Record>, DatasetError> {
    let mut records = Vec::new();
    for (idx, line) in reader.split(b'\n').enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| DatasetError::Io {
            path: origin.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_slice(trimmed).map_err(|source| {
            DatasetError::MalformedLine {
                line: line_no,
                source,
            }
        })?;
        match value {
            Value::Object(fields) => records.push(Record::from(fields)),
            _ => return Err(DatasetError::NotAnObject { line: line_no }),
        }
    }
    Ok(records)
}

pub fn load_jsonl(path: &Path) -> Result<Vec<Record>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_records(BufReader::new(file), path)
}

/// Zero records is never a valid input for training or scoring.
pub fn ensure_not_empty(records: &[Record]) -> Result<(), DatasetError> {
    if records.is_empty() {
        Err(DatasetError::Empty)
    } else {
        Ok(())
    }
}

pub(crate) fn create_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Writes one compact JSON object per line, creating parent directories.
pub fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> Result<(), DatasetError> {
    let io_err = |source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    };
    create_parent_dir(path).map_err(io_err)?;
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    for item in items {
        serde_json::to_writer(&mut writer, item).map_err(|e| io_err(e.into()))?;
        writer.write_all(b"\n").map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(input: &[u8]) -> Result<Vec<Record>, DatasetError> {
        read_records(Cursor::new(input), Path::new("memory.jsonl"))
    }

    #[test]
    fn test_read_records_skips_blank_lines() {
        let input = b"{\"score\": 1}\n\n   \n{\"score\": 2}\r\n";
        let records = read(input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].number("score"), Some(2.0));
    }

    #[test]
    fn test_malformed_line_aborts_with_line_number() {
        let input = b"{\"score\": 1}\n{not json}\n{\"score\": 3}\n";
        match read(input) {
            Err(DatasetError::MalformedLine { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed line error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_line_is_rejected() {
        let input = b"{\"score\": 1}\n[1, 2, 3]\n";
        assert!(matches!(
            read(input),
            Err(DatasetError::NotAnObject { line: 2 })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_a_malformed_line() {
        let input = b"{\"score\": 1}\n{\"name\": \"\xff\"}\n{\"score\": 3}\n";
        match read(input) {
            Err(DatasetError::MalformedLine { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed line error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_in_file_keeps_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.jsonl");
        std::fs::write(&path, b"{\"a\": 1}\n{\"a\": 2}\n{\"name\": \"\xc3\x28\"}\n").unwrap();
        assert!(matches!(
            load_jsonl(&path),
            Err(DatasetError::MalformedLine { line: 3, .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_jsonl(&dir.path().join("absent.jsonl")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn test_ensure_not_empty() {
        assert!(matches!(ensure_not_empty(&[]), Err(DatasetError::Empty)));
        assert!(ensure_not_empty(&[Record::default()]).is_ok());
    }

    #[test]
    fn test_write_jsonl_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/scores.jsonl");
        write_jsonl(&path, &[serde_json::json!({"a": 1}), serde_json::json!({"a": 2})]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\"a\":1}\n{\"a\":2}\n");
    }
}
