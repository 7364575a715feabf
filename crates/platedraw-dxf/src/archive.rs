//! Batch zip archive.
//!
//! One run produces one deflate-compressed archive holding every exported
//! DXF, keyed by the part's sanitized filename. The archive name carries
//! the run timestamp so repeated runs never clobber each other.

use std::io::{Seek, Write};

use chrono::{DateTime, Local};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::GeometryError;
use crate::writer::GeometryFile;

/// Archive filename for a run started at `stamp`.
pub fn archive_filename(stamp: DateTime<Local>) -> String {
    format!("Batch_DXF_{}.zip", stamp.format("%Y%m%d_%H%M%S"))
}

/// Streaming zip writer for one batch of geometry files.
pub struct GeometryArchive<W: Write + Seek> {
    zip: ZipWriter<W>,
    entries: usize,
}

impl<W: Write + Seek> GeometryArchive<W> {
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            entries: 0,
        }
    }

    /// Append one exported part.
    pub fn add(&mut self, file: &GeometryFile) -> Result<(), GeometryError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.zip.start_file(file.filename.as_str(), options)?;
        self.zip.write_all(&file.bytes)?;
        self.entries += 1;
        Ok(())
    }

    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Finalize the central directory and hand back the writer.
    pub fn finish(self) -> Result<W, GeometryError> {
        let entries = self.entries;
        let writer = self.zip.finish()?;
        info!(entries, "finished DXF batch archive");
        Ok(writer)
    }
}
