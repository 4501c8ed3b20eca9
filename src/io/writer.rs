//! Record serialization to files and writers.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::Options;
use crate::error::{FlatError, Result, Stage};
use crate::format;
use crate::record::Record;
use crate::schema::Schema;

/// Whether a write should start with a header row.
///
/// Appending to a file that already has content never repeats the header.
pub(crate) fn header_needed(opts: &Options, path: &Path, append: bool) -> bool {
    if !opts.write_headers {
        return false;
    }
    if !append {
        return true;
    }
    match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(_) => true,
    }
}

/// Header names: explicit names if configured, otherwise the schema columns.
pub(crate) fn header_names<'a>(opts: &'a Options, schema: &'a Schema) -> &'a [String] {
    opts.headers.names().unwrap_or_else(|| schema.columns())
}

/// Write an optional header row and one terminated line per record.
///
/// Returns the number of records written.
pub(crate) fn write_lines<'a, W, I>(
    writer: &mut W,
    schema: &Schema,
    opts: &Options,
    records: I,
    write_header: bool,
) -> io::Result<usize>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = &'a Record>,
{
    if write_header {
        let header = format::encode_header(header_names(opts, schema), opts);
        writer.write_all(header.as_bytes())?;
    }
    let mut count = 0;
    for record in records {
        let line = format::encode_row(record.values(), opts);
        writer.write_all(line.as_bytes())?;
        count += 1;
    }
    Ok(count)
}

fn open(path: &Path, append: bool) -> io::Result<File> {
    if append {
        OpenOptions::new().create(true).append(true).open(path)
    } else {
        OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(path)
    }
}

/// Write records to `path`, truncating or appending.
///
/// The header decision is taken before the file is opened, since opening in
/// append mode creates it. The file is closed on every exit path.
pub(crate) fn write_file<'a, I>(
    schema: &Schema,
    opts: &Options,
    path: &Path,
    records: I,
    append: bool,
) -> Result<usize>
where
    I: IntoIterator<Item = &'a Record>,
{
    opts.validate()?;
    let target = path.to_string_lossy().into_owned();
    let write_header = header_needed(opts, path, append);
    tracing::debug!(path = %target, append, write_header, "opening output file");

    let file = open(path, append).map_err(|e| FlatError::file_access(Stage::Open, &target, e))?;
    let mut out = BufWriter::new(file);
    let count = write_lines(&mut out, schema, opts, records, write_header)
        .map_err(|e| FlatError::file_access(Stage::Write, &target, e))?;
    out.flush()
        .map_err(|e| FlatError::file_access(Stage::Flush, &target, e))?;

    tracing::debug!(path = %target, records = count, "output file written");
    Ok(count)
}
