use crate::error::{ProcessingError, Result};
use crate::models::RawTable;
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_DELIMITER};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Reads a trip CSV file into a [`RawTable`].
pub struct TripReader {
    delimiter: u8,
    use_mmap: bool,
}

impl TripReader {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            use_mmap: false,
        }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            use_mmap,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read a whole trip table. A path that does not name a readable file is
    /// a [`ProcessingError::MissingSource`]; rows the CSV parser rejects are
    /// dropped and counted in `skipped_rows`.
    pub fn read_table(&self, path: &Path) -> Result<RawTable> {
        let file = open_source(path)?;

        let table = if self.use_mmap {
            let mmap = unsafe { Mmap::map(&file)? };
            self.parse_bytes(&mmap)?
        } else {
            let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            self.parse_bytes(&bytes)?
        };

        debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.headers.len(),
            skipped = table.skipped_rows,
            "Read trip table"
        );

        Ok(table)
    }

    /// Parse CSV bytes. A leading byte-order mark is removed and invalid
    /// UTF-8 sequences are replaced rather than failing the load.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<RawTable> {
        let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
        if had_errors {
            warn!("Input contains invalid UTF-8; offending bytes were replaced");
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut table = RawTable::new(headers, Vec::new());

        for result in reader.records() {
            match result {
                Ok(record) => table.rows.push(record.iter().map(str::to_string).collect()),
                Err(e) => {
                    debug!("Skipping malformed CSV row: {}", e);
                    table.skipped_rows += 1;
                }
            }
        }

        if table.skipped_rows > 0 {
            warn!("Skipped {} malformed rows", table.skipped_rows);
        }

        Ok(table)
    }
}

impl Default for TripReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Open an input file, reporting absent or unopenable paths as a missing source.
fn open_source(path: &Path) -> Result<File> {
    if !path.is_file() {
        return Err(ProcessingError::MissingSource {
            path: path.to_path_buf(),
        });
    }

    File::open(path).map_err(|e| {
        debug!("Failed to open {}: {}", path.display(), e);
        ProcessingError::MissingSource {
            path: path.to_path_buf(),
        }
    })
}
