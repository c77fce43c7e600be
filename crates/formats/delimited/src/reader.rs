//! Opening, inspecting and streaming delimited files.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use csv2shp_core_common::{GeometryMode, Record, RecordSource, ResolvedGeometry, Schema};
use log::{debug, info};

use crate::error::{ReadError, Result};
use crate::infer::{infer_schema, resolve_geometry, synthesize_headers};

/// Delimited text configuration options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedOptions {
    /// The single-byte field delimiter (default: b';')
    pub delimiter: u8,
    /// Whether the first line is a header (default: true)
    pub has_header: bool,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            has_header: true,
        }
    }
}

impl DelimitedOptions {
    /// Create new options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter character
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether the file has a header row
    #[must_use]
    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }
}

/// Result of inspecting the header and the first data row.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    /// Column names, from the header or synthesized as `FieldN`.
    pub headers: Vec<String>,
    /// Attribute schema, excluding the geometry source column(s).
    pub schema: Schema,
    /// Resolved geometry columns and shape.
    pub geometry: ResolvedGeometry,
    /// The sampled data row.
    pub sample: Record,
}

impl Inspection {
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// Inspects `path`: reads the header (if any) and the first data row,
/// resolves the geometry columns and infers the attribute schema.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read, has no data row,
/// a column reference does not resolve, or the sampled WKT keyword is not a
/// supported shape.
pub fn inspect(
    path: impl AsRef<Path>,
    options: &DelimitedOptions,
    mode: &GeometryMode,
) -> Result<Inspection> {
    let path = path.as_ref();
    info!("Reading metadata from: {}", path.display());

    let mut stream = RecordStream::open_raw(path, options)?;
    let header = if options.has_header {
        Some(stream.next_record()?.ok_or_else(|| ReadError::EmptyInput {
            path: path.to_path_buf(),
        })?)
    } else {
        None
    };
    let sample = stream.next_record()?.ok_or_else(|| ReadError::EmptyInput {
        path: path.to_path_buf(),
    })?;

    let headers = match header {
        Some(header) => header.tokens().to_vec(),
        None => synthesize_headers(sample.len()),
    };
    debug!("Columns: {headers:?}");

    let geometry = resolve_geometry(mode, &headers, options.has_header, &sample)?;
    let schema = infer_schema(&headers, &sample, &geometry);
    info!(
        "Inferred {} attribute field(s), geometry {}",
        schema.len(),
        geometry.shape()
    );

    Ok(Inspection {
        headers,
        schema,
        geometry,
        sample,
    })
}

/// Opens a fresh stream over every data row of `path`, skipping the header
/// when the options declare one.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or the header cannot be read.
pub fn stream_rows(path: impl AsRef<Path>, options: &DelimitedOptions) -> Result<RecordStream> {
    let mut stream = RecordStream::open_raw(path.as_ref(), options)?;
    if options.has_header {
        stream.next_record()?;
    }
    Ok(stream)
}

/// Inspects `path` and opens a stream positioned at its first data row.
///
/// # Errors
///
/// See [`inspect`] and [`stream_rows`].
pub fn open(
    path: impl AsRef<Path>,
    options: &DelimitedOptions,
    mode: &GeometryMode,
) -> Result<(Inspection, RecordStream)> {
    let path = path.as_ref();
    let inspection = inspect(path, options, mode)?;
    let stream = stream_rows(path, options)?;
    Ok((inspection, stream))
}

/// Forward-only stream of records split on a single-byte delimiter.
///
/// No quoting or escaping is recognized. A short line yields fewer tokens
/// and blank lines are skipped.
pub struct RecordStream {
    reader: csv::Reader<File>,
    path: PathBuf,
    buffer: StringRecord,
    peeked: Option<Record>,
}

impl RecordStream {
    fn open_raw(path: &Path, options: &DelimitedOptions) -> Result<Self> {
        let file = File::open(path).map_err(|source| ReadError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        let reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(file);

        Ok(Self {
            reader,
            path: path.to_path_buf(),
            buffer: StringRecord::new(),
            peeked: None,
        })
    }

    fn read_next(&mut self) -> Result<Option<Record>> {
        let more = self
            .reader
            .read_record(&mut self.buffer)
            .map_err(|source| ReadError::Csv {
                path: self.path.clone(),
                source,
            })?;
        if !more {
            return Ok(None);
        }

        let line = self.buffer.position().map_or(0, csv::Position::line);
        let tokens = self.buffer.iter().map(str::to_owned).collect();
        Ok(Some(Record::new(line, tokens)))
    }

    /// Returns the next record, or `None` at the end of the input.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Csv`] if the line cannot be read.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        match self.peeked.take() {
            Some(record) => Ok(Some(record)),
            None => self.read_next(),
        }
    }

    /// Returns `true` if another record is available.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Csv`] if the look-ahead read fails.
    pub fn has_next(&mut self) -> Result<bool> {
        if self.peeked.is_none() {
            self.peeked = self.read_next()?;
        }
        Ok(self.peeked.is_some())
    }

    /// Path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for RecordStream {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

impl RecordSource for RecordStream {
    type Error = ReadError;

    fn next_record(&mut self) -> Result<Option<Record>> {
        RecordStream::next_record(self)
    }

    fn has_next(&mut self) -> Result<bool> {
        RecordStream::has_next(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv2shp_core_common::{FieldType, GeometryShape};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_input(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn tokens(record: &Record) -> Vec<&str> {
        record.tokens().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_inspect_xy_with_header() {
        let input = write_input("id;x;y;name\n1;10.5;20.0;alpha\n");
        let inspection = inspect(
            input.path(),
            &DelimitedOptions::default(),
            &GeometryMode::xy("x", "y"),
        )
        .unwrap();

        assert_eq!(inspection.headers, vec!["id", "x", "y", "name"]);
        assert_eq!(
            inspection.geometry,
            ResolvedGeometry::Xy {
                x_index: 1,
                y_index: 2
            }
        );
        let fields: Vec<_> = inspection
            .schema
            .iter()
            .map(|f| (f.name.as_str(), f.field_type))
            .collect();
        assert_eq!(
            fields,
            vec![("id", FieldType::Integer), ("name", FieldType::Text)]
        );
    }

    #[test]
    fn test_inspect_wkt() {
        let input = write_input("id;geom\n1;POINT (1 2)\n");
        let inspection = inspect(
            input.path(),
            &DelimitedOptions::default(),
            &GeometryMode::wkt("geom"),
        )
        .unwrap();

        assert_eq!(inspection.geometry.shape(), GeometryShape::Point);
        assert_eq!(inspection.schema.len(), 1);
        assert_eq!(inspection.sample.line(), 2);
    }

    #[test]
    fn test_inspect_without_header() {
        let input = write_input("5,6,foo\n7,8,bar\n");
        let options = DelimitedOptions::new()
            .with_delimiter(b',')
            .with_has_header(false);
        let inspection = inspect(input.path(), &options, &GeometryMode::xy("0", "1")).unwrap();

        assert_eq!(inspection.headers, vec!["Field0", "Field1", "Field2"]);
        assert_eq!(inspection.schema.len(), 1);
        assert_eq!(inspection.schema.fields()[0].name, "Field2");
    }

    #[test]
    fn test_inspect_missing_file() {
        let err = inspect(
            "/nonexistent/input.csv",
            &DelimitedOptions::default(),
            &GeometryMode::xy("x", "y"),
        )
        .unwrap_err();
        assert!(matches!(err, ReadError::FileNotFound { .. }));
    }

    #[test]
    fn test_inspect_header_only() {
        let input = write_input("id;x;y\n");
        let err = inspect(
            input.path(),
            &DelimitedOptions::default(),
            &GeometryMode::xy("x", "y"),
        )
        .unwrap_err();
        assert!(matches!(err, ReadError::EmptyInput { .. }));
    }

    #[test]
    fn test_inspect_unknown_geometry_column() {
        let input = write_input("id;geom\n1;POINT (1 2)\n");
        let err = inspect(
            input.path(),
            &DelimitedOptions::default(),
            &GeometryMode::wkt("shape"),
        )
        .unwrap_err();
        assert!(matches!(err, ReadError::ColumnMismatch { .. }));
    }

    #[test]
    fn test_stream_reemits_sample_row() {
        let input = write_input("id;x;y\n1;0;0\n2;1;1\n");
        let (inspection, stream) = open(
            input.path(),
            &DelimitedOptions::default(),
            &GeometryMode::xy("x", "y"),
        )
        .unwrap();

        let records: Vec<Record> = stream.collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], inspection.sample);
        assert_eq!(tokens(&records[1]), vec!["2", "1", "1"]);
        assert_eq!(records[1].line(), 3);
    }

    #[test]
    fn test_stream_short_line_is_not_padded() {
        let input = write_input("a;b;c\n1;2;3\n4\n");
        let mut stream = stream_rows(input.path(), &DelimitedOptions::default()).unwrap();

        assert_eq!(stream.next_record().unwrap().unwrap().len(), 3);
        let short = stream.next_record().unwrap().unwrap();
        assert_eq!(tokens(&short), vec!["4"]);
        assert!(stream.next_record().unwrap().is_none());
    }

    #[test]
    fn test_stream_ignores_quotes() {
        let input = write_input("a,b\n\"x,y\",z\n");
        let options = DelimitedOptions::new().with_delimiter(b',');
        let mut stream = stream_rows(input.path(), &options).unwrap();

        let record = stream.next_record().unwrap().unwrap();
        assert_eq!(tokens(&record), vec!["\"x", "y\"", "z"]);
    }

    #[test]
    fn test_has_next_does_not_consume() {
        let input = write_input("a;b\n1;2\n");
        let mut stream = stream_rows(input.path(), &DelimitedOptions::default()).unwrap();

        assert!(stream.has_next().unwrap());
        assert!(stream.has_next().unwrap());
        assert_eq!(tokens(&stream.next_record().unwrap().unwrap()), vec!["1", "2"]);
        assert!(!stream.has_next().unwrap());
        assert!(stream.next_record().unwrap().is_none());
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = write_input("id;name\r\n1;alpha\r\n");
        let mut stream = stream_rows(input.path(), &DelimitedOptions::default()).unwrap();
        let record = stream.next_record().unwrap().unwrap();
        assert_eq!(tokens(&record), vec!["1", "alpha"]);
    }
}
