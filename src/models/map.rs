use std::path::{Path, PathBuf};

use crate::error::{ProcessingError, Result};

/// A pre-rendered trip map. The contents are opaque and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDocument {
    pub source: PathBuf,
    pub contents: String,
}

impl MapDocument {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ProcessingError::MissingSource {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "Loaded map document");

        Ok(Self {
            source: path.to_path_buf(),
            contents,
        })
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn write_to(&self, mut writer: impl std::io::Write) -> Result<()> {
        writer.write_all(self.contents.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
