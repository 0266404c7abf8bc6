//! # Text Line Source
//!
//! Reads a text file into raw lines. The whole file is loaded before
//! reflowing; there is no streaming.
//!
//! Lines are split on `\n`. A trailing `\r` is stripped so files with DOS
//! line endings don't send a stray carriage return before each terminator.
//! No encoding validation is performed: bytes pass through as-is.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::SmartParallelError;

/// One line of the source file, without its line ending
pub type RawLine = Vec<u8>;

/// Read all lines of a file.
///
/// ## Errors
///
/// Returns [`SmartParallelError::Source`] if the file can't be opened or read.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<RawLine>, SmartParallelError> {
    let path = path.as_ref();
    let source_err = |source: std::io::Error| SmartParallelError::Source {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(source_err)?;
    let lines = lines_from_reader(BufReader::new(file)).map_err(source_err)?;

    tracing::debug!(path = %path.display(), lines = lines.len(), "read source file");
    Ok(lines)
}

/// Split everything readable from `reader` into lines.
pub fn lines_from_reader<R: BufRead>(reader: R) -> std::io::Result<Vec<RawLine>> {
    reader
        .split(b'\n')
        .map(|line| {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            Ok(line)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};

    #[test]
    fn test_split_lines() {
        let lines = lines_from_reader(Cursor::new("one\ntwo\n\nfour")).unwrap();
        assert_eq!(lines, vec![b"one".to_vec(), b"two".to_vec(), vec![], b"four".to_vec()]);
    }

    #[test]
    fn test_trailing_newline_adds_no_line() {
        let lines = lines_from_reader(Cursor::new("one\ntwo\n")).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_crlf_stripped() {
        let lines = lines_from_reader(Cursor::new("one\r\ntwo\r\n")).unwrap();
        assert_eq!(lines, vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn test_empty_input() {
        let lines = lines_from_reader(Cursor::new("")).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_read_lines_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "alpha\nbeta\n").unwrap();

        let lines = read_lines(file.path()).unwrap();
        assert_eq!(lines, vec![b"alpha".to_vec(), b"beta".to_vec()]);
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");

        match read_lines(&missing) {
            Err(SmartParallelError::Source { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected source error, got {other:?}"),
        }
    }
}
