//! Conversion operations.
//!
//! [`convert`] reads a delimited text file and writes its rows as features
//! of a new Shapefile. The input is inspected first, so the schema and the
//! geometry source are known before the output is created, and then streamed
//! record by record into the sink.

use std::path::Path;

use csv2shp_core_common::{FeatureSink, GeometryMode, RecordSource};
use csv2shp_delimited::{DelimitedOptions, Inspection};
use csv2shp_shapefile::ShapefileSink;
use log::{debug, info, warn};

use crate::error::{ConfigError, Csv2ShpError, Result};
use crate::types::{ConversionSummary, ConvertOptions, OnRecordError, Stage};

/// Record counts collected while streaming.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counts {
    rows_read: u64,
    features_written: u64,
    rows_skipped: u64,
}

/// Converts a delimited text file into an ESRI Shapefile.
///
/// # Errors
///
/// This function will return an error if:
/// - The options are invalid or the input cannot be opened.
/// - A column reference does not resolve against the sample row.
/// - The sampled WKT value is not a supported geometry type.
/// - The output dataset, its fields or a feature cannot be created.
/// - A record cannot be converted and the policy is [`OnRecordError::Abort`].
///
/// Errors detected before the output is created leave no file behind. After
/// that, an aborted run leaves a readable Shapefile holding the features
/// written so far.
pub fn convert(options: &ConvertOptions) -> Result<ConversionSummary> {
    info!("Starting conversion:");
    info!("Input: {}", options.input.display());
    info!("Output: {}", options.output.display());

    let mut conversion = Conversion::new(options);
    let result = conversion.run();
    if let Err(err) = &result {
        conversion.abort();
        warn!("Conversion aborted: {err}");
    }
    result
}

/// Inspects `path` without writing anything.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has no data row, a column
/// reference does not resolve, or the sampled WKT type is unsupported.
pub fn inspect_file(
    path: impl AsRef<Path>,
    options: &DelimitedOptions,
    mode: &GeometryMode,
) -> Result<Inspection> {
    validate_mode(mode)?;
    Ok(csv2shp_delimited::inspect(path, options, mode)?)
}

struct Conversion<'a> {
    options: &'a ConvertOptions,
    stage: Stage,
}

impl<'a> Conversion<'a> {
    fn new(options: &'a ConvertOptions) -> Self {
        Self {
            options,
            stage: Stage::Uninitialized,
        }
    }

    fn advance(&mut self, next: Stage) -> Result<()> {
        self.stage = self.stage.transition(next)?;
        debug!("Conversion stage: {}", self.stage);
        Ok(())
    }

    fn abort(&mut self) {
        if self.stage.can_transition_to(Stage::Aborted) {
            self.stage = Stage::Aborted;
        }
    }

    fn run(&mut self) -> Result<ConversionSummary> {
        let options = self.options;
        validate(options)?;

        let inspection =
            csv2shp_delimited::inspect(&options.input, &options.delimited, &options.mode)?;
        self.advance(Stage::SchemaInferred)?;

        let mut records = csv2shp_delimited::stream_rows(&options.input, &options.delimited)?;
        let mut sink = ShapefileSink::open(
            &options.output,
            &inspection.schema,
            inspection.geometry,
            options.shapefile.clone(),
        )?;
        self.advance(Stage::Writing)?;

        let counts = pump(&mut records, &mut sink, options.on_record_error)?;

        let written = sink.close()?;
        self.advance(Stage::Closed)?;

        info!(
            "Conversion completed: {} row(s) read, {} feature(s) written, {} skipped",
            counts.rows_read, counts.features_written, counts.rows_skipped
        );

        Ok(ConversionSummary {
            rows_read: counts.rows_read,
            features_written: counts.features_written,
            rows_skipped: counts.rows_skipped,
            schema: inspection.schema,
            geometry: inspection.geometry,
            shape: written.shape,
            output: written.path,
        })
    }
}

/// Moves every record from `source` into `sink`, applying `policy` to
/// record errors.
fn pump<S, K>(source: &mut S, sink: &mut K, policy: OnRecordError) -> Result<Counts>
where
    S: RecordSource,
    K: FeatureSink,
    Csv2ShpError: From<S::Error> + From<K::Error>,
{
    let mut counts = Counts::default();

    while let Some(record) = source.next_record()? {
        counts.rows_read += 1;
        match sink.write_record(&record).map_err(Csv2ShpError::from) {
            Ok(()) => counts.features_written += 1,
            Err(err) if err.is_record_error() && policy == OnRecordError::Skip => {
                warn!("Skipping record: {err}");
                counts.rows_skipped += 1;
            },
            Err(err) => return Err(err),
        }
    }

    Ok(counts)
}

fn validate(options: &ConvertOptions) -> Result<()> {
    if options.input.as_os_str().is_empty() {
        return Err(missing("input"));
    }
    if options.output.as_os_str().is_empty() {
        return Err(missing("output"));
    }
    if options.shapefile.text_width == 0 {
        return Err(ConfigError::InvalidOption {
            option: "text-width".to_string(),
            message: "must be at least 1".to_string(),
        }
        .into());
    }
    validate_mode(&options.mode)
}

fn validate_mode(mode: &GeometryMode) -> Result<()> {
    match mode {
        GeometryMode::Xy { x, .. } if x.as_str().is_empty() => Err(missing("x")),
        GeometryMode::Xy { y, .. } if y.as_str().is_empty() => Err(missing("y")),
        GeometryMode::Wkt { geometry } if geometry.as_str().is_empty() => Err(missing("geometry")),
        _ => Ok(()),
    }
}

fn missing(option: &str) -> Csv2ShpError {
    ConfigError::MissingRequired {
        option: option.to_string(),
    }
    .into()
}
