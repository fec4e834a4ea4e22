//! Format adapters for the source table and the units files.

pub mod csv;

pub use self::csv::{DELIMITER, DirectorySink, load, load_from_reader, write_units};
