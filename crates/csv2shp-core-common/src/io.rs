//! I/O traits for the two halves of a conversion.
//!
//! The conversion driver pulls [`Record`]s from a [`RecordSource`] and pushes
//! them into a [`FeatureSink`]. Both sides report their own error types; the
//! driver lifts them into its taxonomy.

use crate::schema::Record;

/// Forward-only source of input records.
pub trait RecordSource {
    /// Error produced while reading.
    type Error;

    /// Returns the next record, or `None` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying input cannot be read.
    fn next_record(&mut self) -> Result<Option<Record>, Self::Error>;

    /// Returns `true` if at least one more record is available.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying input cannot be read.
    fn has_next(&mut self) -> Result<bool, Self::Error>;
}

/// Destination that turns records into features.
pub trait FeatureSink {
    /// Error produced while writing.
    type Error;

    /// Value reported once the sink is closed.
    type Summary;

    /// Converts one record into a feature and appends it.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be converted or written.
    fn write_record(&mut self, record: &Record) -> Result<(), Self::Error>;

    /// Flushes and finalizes the output. Consumes the sink, so it can only
    /// happen once.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be finalized.
    fn close(self) -> Result<Self::Summary, Self::Error>
    where
        Self: Sized;
}
