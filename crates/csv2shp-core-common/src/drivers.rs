//! Driver registry for the formats `csv2shp` reads and writes.
//!
//! Each driver records its support status for the three operations the tool
//! exposes (inspect, read, write). The writer looks its driver up here before
//! creating any output, so a driver that is missing or cannot write surfaces
//! as a "driver unavailable" error rather than a half-created dataset.
//!
//! # Examples
//!
//! ```
//! use csv2shp_core_common::drivers::{SHAPEFILE_DRIVER, find_driver};
//!
//! let shapefile = find_driver(SHAPEFILE_DRIVER).expect("shapefile driver should exist");
//! assert!(shapefile.capabilities.write.is_supported());
//! ```

/// Short name of the delimited-text input driver.
pub const CSV_DRIVER: &str = "CSV";

/// Short name of the Shapefile output driver.
pub const SHAPEFILE_DRIVER: &str = "ESRI Shapefile";

/// Support status for a specific driver operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportStatus {
    /// The operation is fully supported and implemented.
    Supported,
    /// The operation is not supported by the driver.
    NotSupported,
    /// The operation is planned for future implementation.
    Planned,
}

impl SupportStatus {
    /// Returns `true` if the operation is fully supported and implemented.
    ///
    /// ```
    /// use csv2shp_core_common::drivers::SupportStatus;
    ///
    /// assert!(SupportStatus::Supported.is_supported());
    /// assert!(!SupportStatus::Planned.is_supported());
    /// ```
    #[must_use]
    pub fn is_supported(&self) -> bool {
        matches!(self, SupportStatus::Supported)
    }

    /// Returns the string representation of this support status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            SupportStatus::Supported => "Supported",
            SupportStatus::NotSupported => "Not Supported",
            SupportStatus::Planned => "Planned",
        }
    }
}

/// Capabilities supported by a driver.
#[derive(Debug, Clone, Copy)]
pub struct DriverCapabilities {
    /// Support status for inspecting a dataset's schema.
    pub info: SupportStatus,
    /// Support status for reading records from this format.
    pub read: SupportStatus,
    /// Support status for writing features to this format.
    pub write: SupportStatus,
}

/// Format driver definition.
#[derive(Debug, Clone)]
pub struct Driver {
    /// Short name used for driver identification (e.g., `"ESRI Shapefile"`).
    pub short_name: &'static str,
    /// Long descriptive name for display purposes.
    pub long_name: &'static str,
    /// Operations supported by this driver.
    pub capabilities: DriverCapabilities,
}

impl Driver {
    /// Creates a new driver definition with specified capabilities.
    #[must_use]
    pub const fn new(
        short_name: &'static str,
        long_name: &'static str,
        info: SupportStatus,
        read: SupportStatus,
        write: SupportStatus,
    ) -> Self {
        Self {
            short_name,
            long_name,
            capabilities: DriverCapabilities { info, read, write },
        }
    }
}

/// Returns every driver known to `csv2shp`.
#[must_use]
pub fn get_drivers() -> Vec<Driver> {
    use SupportStatus::{NotSupported, Supported};

    vec![
        Driver::new(
            CSV_DRIVER,
            "Delimited text with X/Y or WKT geometry",
            Supported,
            Supported,
            NotSupported,
        ),
        Driver::new(
            SHAPEFILE_DRIVER,
            "ESRI Shapefile / DBF",
            NotSupported,
            NotSupported,
            Supported,
        ),
    ]
}

/// Finds a driver by its short name (case-insensitive).
#[must_use]
pub fn find_driver(name: &str) -> Option<Driver> {
    get_drivers()
        .into_iter()
        .find(|driver| driver.short_name.eq_ignore_ascii_case(name))
}
