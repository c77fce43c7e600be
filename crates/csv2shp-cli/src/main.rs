//! Command-line interface for `csv2shp`, a converter from delimited text to ESRI Shapefiles.
//!
//! This binary provides a thin CLI over the [`csv2shp_core`] library: it parses
//! arguments, configures logging, delegates to command handlers and decides the
//! process exit code.
//!
//! # Architecture
//!
//! The CLI is built using [`clap`] for argument parsing and [`tracing`] for structured logging.
//! Library crates log through the `log` facade, which is bridged into `tracing`.
//!
//! # Available Commands
//!
//! - `convert` - Convert a delimited text file into a Shapefile
//! - `inspect` - Display the schema and geometry inferred from a delimited text file
//! - `drivers` - List all available format drivers and their capabilities

mod display;

use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing::{Level, debug, info};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use csv2shp_core::drivers::get_drivers;
use csv2shp_core::error::{ConfigError, Csv2ShpError};
use csv2shp_core::operations;
use csv2shp_core::types::{ConvertOptions, OnRecordError};
use csv2shp_core::{DelimitedOptions, GeometryMode, ShapefileOptions};

#[derive(Parser)]
#[command(
    name = "csv2shp",
    version,
    about = "Convert delimited text files into ESRI Shapefiles",
    long_about = "csv2shp reads a delimited text file whose rows carry a geometry, either as\n\
                  X/Y coordinate columns or as a WKT column, and writes them as features of a\n\
                  new ESRI Shapefile. Attribute types are inferred from the first data row."
)]
/// Command-line arguments and options for the `csv2shp` CLI.
///
/// This struct defines the top-level CLI interface, including global flags for
/// logging verbosity and the subcommand to execute.
struct Cli {
    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// How the geometry is encoded in each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Point coordinates in two numeric columns
    Xy,
    /// A Well-Known Text geometry in one column
    Wkt,
}

/// Options shared by every command that reads a delimited text file.
#[derive(Debug, Args)]
struct ReaderArgs {
    /// Path to the delimited text file.
    #[arg(short, long, value_name = "FILE")]
    input: String,

    /// Geometry encoding.
    #[arg(short, long, value_enum)]
    mode: Mode,

    /// Field delimiter, a single ASCII character.
    #[arg(short, long, default_value = ";")]
    delimiter: String,

    /// X column name, or 0-based index (xy mode).
    #[arg(short = 'x', long = "x", value_name = "COLUMN", default_value = "x")]
    x: String,

    /// Y column name, or 0-based index (xy mode).
    #[arg(short = 'y', long = "y", value_name = "COLUMN", default_value = "y")]
    y: String,

    /// Geometry column name, or 0-based index (wkt mode).
    #[arg(short, long, value_name = "COLUMN", default_value = "geom")]
    geometry: String,

    /// Whether the first line is a header (`t` or `f`).
    #[arg(
        long,
        value_name = "t|f",
        default_value = "t",
        action = ArgAction::Set,
        value_parser = parse_header_flag
    )]
    header: bool,
}

impl ReaderArgs {
    fn delimited_options(&self) -> Result<DelimitedOptions, ConfigError> {
        Ok(DelimitedOptions::default()
            .with_delimiter(parse_delimiter(&self.delimiter)?)
            .with_has_header(self.header))
    }

    fn geometry_mode(&self) -> GeometryMode {
        match self.mode {
            Mode::Xy => GeometryMode::xy(self.x.as_str(), self.y.as_str()),
            Mode::Wkt => GeometryMode::wkt(self.geometry.as_str()),
        }
    }
}

/// Available subcommands for the `csv2shp` CLI.
#[derive(Subcommand)]
enum Commands {
    /// Converts a delimited text file into an ESRI Shapefile.
    ///
    /// The schema and geometry are inferred from the first data row; every
    /// row is then written as one feature.
    Convert {
        #[command(flatten)]
        reader: ReaderArgs,

        /// Path for the output Shapefile (`.shp` is enforced).
        #[arg(short, long, value_name = "DATASET")]
        output: String,

        /// Width of text fields in bytes; longer values are truncated.
        #[arg(long, value_name = "N", default_value_t = 100)]
        text_width: u8,

        /// Replace an existing Shapefile at the output path.
        #[arg(long)]
        overwrite: bool,

        /// Skip rows that cannot be converted instead of aborting.
        #[arg(long)]
        skip_invalid: bool,
    },

    /// Displays the schema and geometry inferred from a delimited text file.
    Inspect {
        #[command(flatten)]
        reader: ReaderArgs,
    },

    /// Lists all available drivers and their capabilities.
    Drivers,
}

/// Entry point for the `csv2shp` command-line interface.
///
/// This function parses command-line arguments, configures the logging system based on
/// verbosity flags, and dispatches to the appropriate command handler. Any error,
/// including a rejected argument, is reported on standard error and turns into
/// exit code 1.
fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return usage_error(&err),
    };

    if let Err(err) = init_logging(&cli) {
        eprintln!("Error: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        },
    }
}

fn usage_error(err: &clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => err.exit(),
        _ => {
            let _ = err.print();
            ExitCode::FAILURE
        },
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    // Setup logging based on verbosity flags
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            reader,
            output,
            text_width,
            overwrite,
            skip_invalid,
        } => {
            info!("Converting {} to {output}", reader.input);
            handle_convert(&reader, &output, text_width, overwrite, skip_invalid)?;
        },
        Commands::Inspect { reader } => {
            info!("Inspecting {}", reader.input);
            handle_inspect(&reader)?;
        },
        Commands::Drivers => {
            handle_drivers();
        },
    }
    Ok(())
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<Csv2ShpError>() {
        Some(err) => {
            eprintln!("{}", err.user_message());
            if let Some(suggestion) = err.recovery_suggestion() {
                eprintln!("Hint: {suggestion}");
            }
        },
        None => eprintln!("Error: {err:#}"),
    }
}

fn handle_convert(
    reader: &ReaderArgs,
    output: &str,
    text_width: u8,
    overwrite: bool,
    skip_invalid: bool,
) -> Result<()> {
    let on_record_error = if skip_invalid {
        OnRecordError::Skip
    } else {
        OnRecordError::Abort
    };
    debug!("Record error policy: {on_record_error:?}");

    let options = ConvertOptions::new(&reader.input, output, reader.geometry_mode())
        .with_delimited(reader.delimited_options().map_err(Csv2ShpError::from)?)
        .with_shapefile(
            ShapefileOptions::default()
                .with_text_width(text_width)
                .with_overwrite(overwrite),
        )
        .with_on_record_error(on_record_error);

    let summary = operations::convert(&options)?;
    display::display_summary(&summary);
    Ok(())
}

fn handle_inspect(reader: &ReaderArgs) -> Result<()> {
    let options = reader.delimited_options().map_err(Csv2ShpError::from)?;
    let inspection = operations::inspect_file(&reader.input, &options, &reader.geometry_mode())?;
    display::display_inspection(&reader.input, &inspection);
    Ok(())
}

fn handle_drivers() {
    display::display_drivers(&get_drivers());
}

/// Parses the `--header` flag.
fn parse_header_flag(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "t" | "true" => Ok(true),
        "f" | "false" => Ok(false),
        other => Err(format!("expected 't' or 'f', found '{other}'")),
    }
}

/// Converts the `--delimiter` argument into the byte the reader splits on.
fn parse_delimiter(value: &str) -> Result<u8, ConfigError> {
    let invalid = || ConfigError::InvalidOption {
        option: "delimiter".to_string(),
        message: format!("'{value}' is not a single ASCII character"),
    };

    if value == "\\t" {
        return Ok(b'\t');
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => u8::try_from(c).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
