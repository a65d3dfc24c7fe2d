//! Trace-File Readers.
//!
//! Traces are whitespace-separated text with one access per line:
//! an operation character (`r` or `w`), a hexadecimal address (a leading
//! `0x` is accepted), and, in split-cache traces, an access class
//! (`I` or `D`). Reaching end of file or a malformed record terminates
//! the stream cleanly; an unknown operation or class character is a
//! fatal error naming the offending token.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::common::{AccessClass, Operation, SimError, SimResult};

/// One parsed trace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    pub op: Operation,
    pub addr: u32,
    /// Present only in split-cache traces.
    pub class: Option<AccessClass>,
}

/// Line-oriented reader over a trace file.
///
/// Iterating yields `SimResult<TraceRecord>`; the iterator ends at end
/// of file or at the first malformed record (missing or non-hexadecimal
/// field), leaving whatever was processed so far intact.
pub struct TraceReader {
    lines: io::Lines<BufReader<File>>,
    done: bool,
}

impl TraceReader {
    /// Opens the trace at `path`.
    pub fn open(path: &Path) -> SimResult<Self> {
        let file = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            done: false,
        })
    }

    fn parse_line(line: &str) -> ParsedLine {
        let mut fields = line.split_whitespace();
        let (Some(op_field), Some(addr_field)) = (fields.next(), fields.next()) else {
            return ParsedLine::Malformed;
        };

        let mut chars = op_field.chars();
        let (Some(op_char), None) = (chars.next(), chars.next()) else {
            return ParsedLine::Malformed;
        };
        let op = match Operation::from_char(op_char) {
            Ok(op) => op,
            Err(err) => return ParsedLine::Bad(err),
        };

        let Ok(addr) = u32::from_str_radix(addr_field.trim_start_matches("0x"), 16) else {
            return ParsedLine::Malformed;
        };

        let class = match fields.next() {
            None => None,
            Some(class_field) => {
                let mut chars = class_field.chars();
                let (Some(class_char), None) = (chars.next(), chars.next()) else {
                    return ParsedLine::Malformed;
                };
                match AccessClass::from_char(class_char) {
                    Ok(class) => Some(class),
                    Err(err) => return ParsedLine::Bad(err),
                }
            }
        };

        ParsedLine::Record(TraceRecord { op, addr, class })
    }
}

enum ParsedLine {
    Record(TraceRecord),
    Bad(SimError),
    Malformed,
}

impl Iterator for TraceReader {
    type Item = SimResult<TraceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            return match Self::parse_line(&line) {
                ParsedLine::Record(record) => Some(Ok(record)),
                ParsedLine::Bad(err) => {
                    self.done = true;
                    Some(Err(err))
                }
                ParsedLine::Malformed => {
                    self.done = true;
                    None
                }
            };
        }
    }
}
