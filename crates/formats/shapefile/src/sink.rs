//! Shapefile sink: dataset creation, feature writing and close.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv2shp_core_common::drivers::SHAPEFILE_DRIVER;
use csv2shp_core_common::{FeatureSink, Record, ResolvedGeometry, Schema, find_driver};
use log::{debug, info};

use crate::error::{Result, WriteError};
use crate::fields::{attributes, table_builder};
use crate::geometry::{FeatureShape, LayerShape, point_from_xy, shape_from_wkt};

type ShpWriter = shapefile::Writer<BufWriter<File>>;

/// Options for the Shapefile writer
#[derive(Debug, Clone)]
pub struct ShapefileOptions {
    /// Driver looked up in the registry before anything is created
    /// (default: "ESRI Shapefile")
    pub driver: String,
    /// Width of text fields in bytes (default: 100)
    pub text_width: u8,
    /// Width of integer fields (default: 18)
    pub integer_width: u8,
    /// Width of real fields (default: 24)
    pub real_width: u8,
    /// Decimal places of real fields (default: 15)
    pub real_decimals: u8,
    /// Replace an existing dataset at the output path (default: false)
    pub overwrite: bool,
}

impl Default for ShapefileOptions {
    fn default() -> Self {
        Self {
            driver: SHAPEFILE_DRIVER.to_string(),
            text_width: 100,
            integer_width: 18,
            real_width: 24,
            real_decimals: 15,
            overwrite: false,
        }
    }
}

impl ShapefileOptions {
    /// Create new writer options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output driver name
    #[must_use]
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }

    /// Set the width of text fields
    #[must_use]
    pub fn with_text_width(mut self, width: u8) -> Self {
        self.text_width = width;
        self
    }

    /// Set whether an existing dataset may be replaced
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// What a closed sink wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    /// Path of the `.shp` file.
    pub path: PathBuf,
    /// Shape type of the layer.
    pub shape: LayerShape,
    /// Number of features written.
    pub features_written: u64,
}

/// An open Shapefile being filled with features.
///
/// The dataset is finalized by [`ShapefileSink::close`]. A sink dropped
/// without being closed (for example after a fatal error) is finalized by
/// the underlying writer's destructor, so partial output stays readable.
pub struct ShapefileSink {
    writer: ShpWriter,
    path: PathBuf,
    schema: Schema,
    geometry: ResolvedGeometry,
    shape: LayerShape,
    options: ShapefileOptions,
    features_written: u64,
}

impl std::fmt::Debug for ShapefileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapefileSink")
            .field("path", &self.path)
            .field("shape", &self.shape)
            .field("features_written", &self.features_written)
            .finish_non_exhaustive()
    }
}

impl ShapefileSink {
    /// Creates the output dataset with one field per schema entry.
    ///
    /// The `.shp` extension is enforced on `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::DriverUnavailable`],
    /// [`WriteError::DatasetCreateFailed`], [`WriteError::FieldCreateFailed`]
    /// or [`WriteError::LayerCreateFailed`]. No file is created or removed
    /// when the driver, field or dataset checks fail.
    pub fn open(
        path: impl AsRef<Path>,
        schema: &Schema,
        geometry: ResolvedGeometry,
        options: ShapefileOptions,
    ) -> Result<Self> {
        let driver = find_driver(&options.driver)
            .filter(|driver| driver.short_name == SHAPEFILE_DRIVER)
            .filter(|driver| driver.capabilities.write.is_supported())
            .ok_or_else(|| WriteError::DriverUnavailable {
                driver: options.driver.clone(),
            })?;
        debug!("Using driver {} ({})", driver.short_name, driver.long_name);

        let path = shapefile_path(path.as_ref());
        let builder = table_builder(schema, &options)?;
        prepare_dataset(&path, options.overwrite)?;

        let shape = LayerShape::from(geometry.shape());

        let writer = shapefile::Writer::from_path(&path, builder).map_err(|source| {
            WriteError::LayerCreateFailed {
                path: path.clone(),
                source,
            }
        })?;
        info!(
            "Created {shape} layer with {} field(s) at {}",
            schema.len(),
            path.display()
        );

        Ok(Self {
            writer,
            path,
            schema: schema.clone(),
            geometry,
            shape,
            options,
            features_written: 0,
        })
    }

    /// Converts `record` into a feature and appends it to the layer.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::NumericParseFailed`] or
    /// [`WriteError::MalformedGeometry`] for a bad record, which leaves the
    /// layer unchanged, and [`WriteError::FeatureCreateFailed`] if the
    /// library rejects the feature.
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let position = record.position();
        let shape = match self.geometry {
            ResolvedGeometry::Xy { x_index, y_index } => {
                point_from_xy(record.get(x_index), record.get(y_index), position)?
            },
            ResolvedGeometry::Wkt { index, .. } => shape_from_wkt(
                record.get(index).unwrap_or_default(),
                self.shape,
                position.with_column_index(index),
            )?,
        };
        let attributes = attributes(&self.schema, record, &self.options)?;

        let written = match &shape {
            FeatureShape::Point(point) => self.writer.write_shape_and_record(point, &attributes),
            FeatureShape::Polyline(line) => self.writer.write_shape_and_record(line, &attributes),
            FeatureShape::Polygon(polygon) => {
                self.writer.write_shape_and_record(polygon, &attributes)
            },
            FeatureShape::Multipoint(points) => {
                self.writer.write_shape_and_record(points, &attributes)
            },
        };
        written.map_err(|source| WriteError::FeatureCreateFailed { position, source })?;

        self.features_written += 1;
        Ok(())
    }

    /// Finalizes the dataset.
    ///
    /// # Errors
    ///
    /// Currently infallible; the signature leaves room for writers that
    /// report errors on finalization.
    pub fn close(self) -> Result<WriteSummary> {
        let Self {
            writer,
            path,
            shape,
            features_written,
            ..
        } = self;
        drop(writer);
        info!("Closed {} with {features_written} feature(s)", path.display());

        Ok(WriteSummary {
            path,
            shape,
            features_written,
        })
    }

    /// Path of the `.shp` file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shape type of the layer.
    #[must_use]
    pub fn shape(&self) -> LayerShape {
        self.shape
    }

    /// Number of features written so far.
    #[must_use]
    pub fn features_written(&self) -> u64 {
        self.features_written
    }
}

impl FeatureSink for ShapefileSink {
    type Error = WriteError;
    type Summary = WriteSummary;

    fn write_record(&mut self, record: &Record) -> Result<()> {
        ShapefileSink::write_record(self, record)
    }

    fn close(self) -> Result<WriteSummary> {
        ShapefileSink::close(self)
    }
}

/// Forces a `.shp` extension.
fn shapefile_path(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("shp") => path.to_path_buf(),
        _ => path.with_extension("shp"),
    }
}

fn prepare_dataset(path: &Path, overwrite: bool) -> Result<()> {
    let failed = |reason: String| WriteError::DatasetCreateFailed {
        path: path.to_path_buf(),
        reason,
    };

    if path.is_dir() {
        return Err(failed("path is a directory".to_string()));
    }

    let existing: Vec<PathBuf> = ["shp", "shx", "dbf"]
        .into_iter()
        .map(|ext| path.with_extension(ext))
        .filter(|sibling| sibling.exists())
        .collect();
    if !existing.is_empty() && !overwrite {
        return Err(failed(
            "dataset already exists (use overwrite to replace it)".to_string(),
        ));
    }
    for sibling in &existing {
        debug!("Removing existing {}", sibling.display());
        fs::remove_file(sibling).map_err(|err| failed(err.to_string()))?;
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|err| failed(err.to_string()))?;
    }
    Ok(())
}
