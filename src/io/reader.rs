//! Lazy record streams over text, readers and files.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::config::Options;
use crate::error::{FlatError, Result, Stage};
use crate::format::{self, RawField};
use crate::record::{Record, RecordType};

/// Splits a byte stream on a row terminator of any length.
#[derive(Debug)]
struct LineReader<R> {
    inner: R,
    row_sep: Vec<u8>,
    /// Physical lines read so far
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(inner: R, row_sep: &str) -> Self {
        Self {
            inner,
            row_sep: row_sep.as_bytes().to_vec(),
            line: 0,
        }
    }

    /// Next physical line without its terminator, or `None` at end of input.
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let Some(&last) = self.row_sep.last() else {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty row_sep"));
        };

        let mut buf = Vec::new();
        loop {
            let n = self.inner.read_until(last, &mut buf)?;
            if n == 0 || buf.ends_with(&self.row_sep) {
                break;
            }
        }
        if buf.is_empty() {
            return Ok(None);
        }
        self.line += 1;

        if buf.ends_with(&self.row_sep) {
            buf.truncate(buf.len() - self.row_sep.len());
            // "\r\n" files read with the default "\n" terminator
            if self.row_sep == b"\n" && buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        String::from_utf8(buf)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// A lazy, single-pass sequence of records.
///
/// Each call to `next` reads just enough input to produce one record. The
/// options in effect are captured when the stream is created. The first
/// error ends the stream; records yielded before it stay valid. Dropping the
/// stream releases the underlying reader (and file handle, for
/// [`RecordType::read_each`]) whether or not it was exhausted.
#[derive(Debug)]
pub struct Records<R> {
    ty: RecordType,
    opts: Options,
    lines: LineReader<R>,
    /// "-" for caller-supplied streams, otherwise the file path
    target: String,
    started: bool,
    done: bool,
}

impl<R: BufRead> Records<R> {
    pub(crate) fn new(ty: RecordType, reader: R, target: impl Into<String>) -> Self {
        let opts = ty.options_snapshot();
        let lines = LineReader::new(reader, &opts.row_sep);
        Self {
            ty,
            opts,
            lines,
            target: target.into(),
            started: false,
            done: false,
        }
    }

    /// The record type records are decoded into.
    pub fn record_type(&self) -> &RecordType {
        &self.ty
    }

    /// Physical lines consumed so far.
    pub fn line(&self) -> usize {
        self.lines.line
    }

    /// Drain the remaining records, stopping at the first error.
    pub fn collect_all(self) -> Result<Vec<Record>> {
        self.collect()
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        self.lines
            .next_line()
            .map_err(|e| FlatError::file_access(Stage::Read, self.target.clone(), e))
    }

    /// Next logical row: skips blank lines if configured and joins physical
    /// lines while a quoted field is open.
    fn next_fields(&mut self) -> Result<Option<(usize, Vec<RawField>)>> {
        loop {
            let Some(first) = self.read_line()? else {
                return Ok(None);
            };
            let line_no = self.lines.line;
            if first.is_empty() && self.opts.skip_blanks {
                continue;
            }

            let mut text = first;
            loop {
                if let Some(fields) = format::split_fields(&text, &self.opts, false, line_no)? {
                    return Ok(Some((line_no, fields)));
                }
                match self.read_line()? {
                    Some(next) => {
                        text.push_str(&self.opts.row_sep);
                        text.push_str(&next);
                    }
                    None => {
                        let fields = format::split_fields(&text, &self.opts, true, line_no)?
                            .unwrap_or_default();
                        return Ok(Some((line_no, fields)));
                    }
                }
            }
        }
    }

    fn advance(&mut self) -> Result<Option<Record>> {
        if !self.started {
            self.started = true;
            self.opts.validate()?;
            if self.opts.headers.consumes_first_row() {
                if let Some((line, _)) = self.next_fields()? {
                    tracing::trace!(input = %self.target, line, "header row skipped");
                }
            }
        }

        let Some((line_no, raw)) = self.next_fields()? else {
            return Ok(None);
        };
        let values = format::finish_fields(raw, &self.opts, self.ty.schema().len(), line_no)?;
        Ok(Some(Record::from_values(self.ty.clone(), values)))
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for Records<R> {}

/// Open `path` and stream its records.
pub(crate) fn open_records(ty: RecordType, path: &Path) -> Result<Records<BufReader<File>>> {
    let target = path.to_string_lossy().into_owned();
    let file = File::open(path).map_err(|e| FlatError::file_access(Stage::Open, target.clone(), e))?;
    Ok(Records::new(ty, BufReader::new(file), target))
}
