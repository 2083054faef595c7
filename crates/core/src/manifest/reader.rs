//! Streaming manifest reader.

use std::fs::File;
use std::io::{BufRead, BufReader, Split};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ManifestError, TicketEntry};

/// Lines whose first byte is this marker are comments.
pub const COMMENT_MARKER: u8 = b'#';

/// Field delimiter.
pub const DELIMITER: char = ',';

/// Single-pass reader over a manifest file.
///
/// Lines are read as raw bytes. Comment and blank lines are dropped before
/// any decoding, so their content never matters. The reader owns the open
/// file handle. The handle is released when the reader is dropped, whether
/// iteration ran to completion, stopped early on an error, or unwound. A
/// reader cannot be restarted; open a new one to read the file again.
pub struct ManifestReader {
    path: PathBuf,
    lines: Split<BufReader<File>>,
    line_number: usize,
    exhausted: bool,
}

impl ManifestReader {
    /// Opens a manifest for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| ManifestError::Open {
            path: path.clone(),
            source,
        })?;
        debug!("Opened ticket list {}", path.display());

        Ok(Self {
            path,
            lines: BufReader::new(file).split(b'\n'),
            line_number: 0,
            exhausted: false,
        })
    }

    /// Path of the manifest being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for ManifestReader {
    type Item = Result<TicketEntry, ManifestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        loop {
            let raw = match self.lines.next() {
                Some(Ok(raw)) => raw,
                Some(Err(source)) => {
                    self.exhausted = true;
                    return Some(Err(ManifestError::Read {
                        path: self.path.clone(),
                        line: self.line_number + 1,
                        source,
                    }));
                }
                None => {
                    self.exhausted = true;
                    return None;
                }
            };
            self.line_number += 1;

            let raw = raw.strip_suffix(b"\r").unwrap_or(&raw);
            if is_skipped(raw) {
                continue;
            }

            return Some(decode_line(raw, self.line_number).and_then(|line| {
                parse_entry(&line, self.line_number)
            }));
        }
    }
}

impl Drop for ManifestReader {
    fn drop(&mut self) {
        debug!(
            "Closed ticket list {} after {} lines",
            self.path.display(),
            self.line_number
        );
    }
}

/// Comment lines and blank lines carry no record.
fn is_skipped(raw: &[u8]) -> bool {
    raw.first() == Some(&COMMENT_MARKER) || raw.iter().all(u8::is_ascii_whitespace)
}

fn decode_line(raw: &[u8], line_number: usize) -> Result<String, ManifestError> {
    String::from_utf8(raw.to_vec()).map_err(|e| ManifestError::MalformedRecord {
        line: line_number,
        reason: format!("record is not valid UTF-8: {}", e.utf8_error()),
    })
}

/// Reads every entry of a manifest, in file order.
pub fn read_manifest(path: impl AsRef<Path>) -> Result<Vec<TicketEntry>, ManifestError> {
    ManifestReader::open(path)?.collect()
}

fn parse_entry(line: &str, line_number: usize) -> Result<TicketEntry, ManifestError> {
    let fields = parse_record(line).map_err(|reason| ManifestError::MalformedRecord {
        line: line_number,
        reason,
    })?;

    match <[String; 2]>::try_from(fields) {
        Ok([ticket, path]) => Ok(TicketEntry { ticket, path }),
        Err(fields) => Err(ManifestError::MalformedRecord {
            line: line_number,
            reason: format!("expected 2 fields, found {}", fields.len()),
        }),
    }
}

/// Splits one delimited record into fields.
///
/// A field that starts with `"` is quoted: it may contain delimiters, and a
/// doubled quote inside it stands for a literal quote. Whitespace is kept as
/// is.
pub fn parse_record(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        let mut field = String::new();

        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => return Err("unterminated quoted field".to_string()),
                }
            }
            match chars.peek() {
                None | Some(&DELIMITER) => {}
                Some(c) => {
                    return Err(format!("unexpected {:?} after closing quote", c));
                }
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == DELIMITER {
                    break;
                }
                field.push(c);
                chars.next();
            }
        }

        fields.push(field);

        match chars.next() {
            Some(DELIMITER) => continue,
            None => break,
            Some(c) => return Err(format!("unexpected {:?}", c)),
        }
    }

    Ok(fields)
}
