pub mod csv_writer;
pub mod json_writer;

pub use csv_writer::{CsvWriter, OutputFileInfo};
pub use json_writer::JsonWriter;
