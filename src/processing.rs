//! Batch pipeline.
//!
//! Takes a list of raw part records, normalizes each one exactly once and
//! drives both artifact paths off the shared result. The PDF path accounts
//! for every record (bad records get placeholder pages); the DXF path skips
//! what it cannot cut and says so. When both artifacts are requested they
//! run on separate threads over the same read-only descriptors, since
//! their outputs are disjoint.

use std::fs::{self, File};
use std::path::PathBuf;

use chrono::Local;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use platedraw_core::{format_mm, normalize, raw_thickness, DecimalStyle, PartDescriptor, RawRecord, Shape};
use platedraw_dxf::{archive_filename, export_part, GeometryArchive, GeometryError};
use platedraw_pdf::{PageCanvas, PageDocument};

/// An artifact-level failure: the output sink for one artifact broke.
///
/// Fatal for that artifact only; the other artifact finishes on its own.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("output I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// What to generate and where.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub generate_pdf: bool,
    pub generate_dxf: bool,
    pub output_dir: PathBuf,
    pub decimal_style: DecimalStyle,
}

impl ProcessOptions {
    /// Both artifacts into `output_dir`, comma decimals.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            generate_pdf: true,
            generate_dxf: true,
            output_dir: output_dir.into(),
            decimal_style: DecimalStyle::default(),
        }
    }

    pub fn pdf_only(mut self) -> Self {
        self.generate_dxf = false;
        self
    }

    pub fn dxf_only(mut self) -> Self {
        self.generate_pdf = false;
        self
    }
}

/// Receiver for human-readable batch updates.
///
/// Progress is advisory only: it reports DXF export percentage and nothing
/// blocks on it.
pub trait StatusSink: Sync {
    fn status(&self, message: &str);
    fn progress(&self, percent: u8);
}

/// Default sink: forwards everything to the tracing subscriber.
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn status(&self, message: &str) {
        info!("{message}");
    }

    fn progress(&self, percent: u8) {
        debug!(percent, "batch progress");
    }
}

/// Result of the PDF artifact path.
#[derive(Debug)]
pub struct PdfReport {
    /// Written documents, one per thickness group.
    pub files: Vec<PathBuf>,
    pub pages: usize,
    /// Pages rendered as placeholders instead of drawings.
    pub placeholder_pages: usize,
}

/// Result of the DXF artifact path.
#[derive(Debug)]
pub struct DxfReport {
    pub archive: PathBuf,
    pub entries: usize,
    /// Parts skipped because they had no exportable geometry.
    pub skipped: usize,
}

/// Outcome of one batch run. An absent arm means that artifact was not
/// requested.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub pdf: Option<Result<PdfReport, ArtifactError>>,
    pub dxf: Option<Result<DxfReport, ArtifactError>>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        fn arm_ok<T>(arm: &Option<Result<T, ArtifactError>>) -> bool {
            arm.as_ref().map(|r| r.is_ok()).unwrap_or(true)
        }
        arm_ok(&self.pdf) && arm_ok(&self.dxf)
    }
}

struct PreparedPart {
    descriptor: PartDescriptor,
    /// False when normalization failed and the descriptor is a stand-in.
    normalized: bool,
}

/// Run one batch over `records`.
///
/// Every record is normalized once up front; per-part failures never abort
/// the run. An empty input completes successfully without touching the
/// filesystem.
pub fn run_batch(records: &[RawRecord], options: &ProcessOptions, sink: &dyn StatusSink) -> BatchOutcome {
    if records.is_empty() {
        sink.status("Nothing to process: the part list is empty.");
        return BatchOutcome::default();
    }
    sink.status(&format!("Processing {} part record(s)", records.len()));

    let prepared: Vec<PreparedPart> = records
        .iter()
        .map(|record| match normalize(record) {
            Ok(descriptor) => PreparedPart {
                descriptor,
                normalized: true,
            },
            Err(err) => {
                warn!(%err, "record failed normalization, using stand-in descriptor");
                PreparedPart {
                    descriptor: fallback_descriptor(record),
                    normalized: false,
                }
            }
        })
        .collect();

    let mut outcome = BatchOutcome::default();
    match (options.generate_pdf, options.generate_dxf) {
        (true, true) => {
            let parts = &prepared;
            let pdf_slot = &mut outcome.pdf;
            let dxf_slot = &mut outcome.dxf;
            std::thread::scope(|scope| {
                scope.spawn(move || *pdf_slot = Some(write_pdf_documents(parts, options, sink)));
                scope.spawn(move || *dxf_slot = Some(write_dxf_archive(parts, options, sink)));
            });
        }
        (true, false) => outcome.pdf = Some(write_pdf_documents(&prepared, options, sink)),
        (false, true) => outcome.dxf = Some(write_dxf_archive(&prepared, options, sink)),
        (false, false) => sink.status("No artifacts requested."),
    }
    outcome
}

/// Stand-in descriptor for a record that failed normalization, so the PDF
/// output still accounts for it with a placeholder page in the right
/// thickness group.
fn fallback_descriptor(record: &RawRecord) -> PartDescriptor {
    let field = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| record.get(*key))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
    };
    PartDescriptor {
        name: field(&["name", "part_name"]).unwrap_or("UNNAMED").to_string(),
        shape: Shape::Unknown(field(&["shape", "shape_type"]).unwrap_or("").to_lowercase()),
        thickness: raw_thickness(record),
        quantity: 0,
        holes: Vec::new(),
    }
}

/// Filename label for one thickness group. Decimal points become
/// underscores so the label stays filesystem-safe on every platform.
fn thickness_label(thickness: Option<f64>) -> String {
    match thickness {
        Some(value) => format_mm(value, DecimalStyle::Point).replace('.', "_"),
        None => "no-thickness".to_string(),
    }
}

fn needs_placeholder(part: &PreparedPart) -> bool {
    !part.normalized
        || matches!(part.descriptor.shape, Shape::Unknown(_))
        || part.descriptor.shape.validate().is_err()
}

/// One PDF document per thickness group, groups and pages in input order.
fn write_pdf_documents(
    parts: &[PreparedPart],
    options: &ProcessOptions,
    sink: &dyn StatusSink,
) -> Result<PdfReport, ArtifactError> {
    sink.status("Generating PDF drawings");
    let dir = options.output_dir.join("pdf");
    fs::create_dir_all(&dir)?;

    let mut groups: Vec<(String, Vec<&PreparedPart>)> = Vec::new();
    for part in parts {
        let label = thickness_label(part.descriptor.thickness);
        match groups.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, members)) => members.push(part),
            None => groups.push((label, vec![part])),
        }
    }

    let mut report = PdfReport {
        files: Vec::with_capacity(groups.len()),
        pages: 0,
        placeholder_pages: 0,
    };
    for (label, members) in groups {
        let mut document = PageDocument::new();
        for part in members {
            if needs_placeholder(part) {
                report.placeholder_pages += 1;
            }
            let canvas = PageCanvas::new(options.decimal_style);
            document.push_page(canvas.render_part(&part.descriptor));
        }
        report.pages += document.page_count();

        let path = dir.join(format!("Drawings_{label}mm.pdf"));
        fs::write(&path, document.finish())?;
        sink.status(&format!("PDF written: {}", path.display()));
        report.files.push(path);
    }
    Ok(report)
}

/// All exportable parts into one timestamped zip archive.
fn write_dxf_archive(
    parts: &[PreparedPart],
    options: &ProcessOptions,
    sink: &dyn StatusSink,
) -> Result<DxfReport, ArtifactError> {
    sink.status("Generating DXF geometry");
    let dir = options.output_dir.join("dxf");
    fs::create_dir_all(&dir)?;

    let path = dir.join(archive_filename(Local::now()));
    let mut archive = GeometryArchive::new(File::create(&path)?);

    let total = parts.len();
    let mut skipped = 0;
    for (index, part) in parts.iter().enumerate() {
        if !part.normalized {
            warn!(part = %part.descriptor.name, "skipping DXF for incomplete record");
            skipped += 1;
        } else {
            match export_part(&part.descriptor) {
                Ok(file) => archive.add(&file)?,
                Err(err) if err.is_part_level() => {
                    warn!(part = %part.descriptor.name, %err, "skipping DXF");
                    sink.status(&format!(
                        "Warning: skipping DXF for '{}': {err}",
                        part.descriptor.name
                    ));
                    skipped += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
        sink.progress((((index + 1) * 100) / total) as u8);
    }

    let entries = archive.entry_count();
    archive.finish()?;
    sink.status(&format!("DXF archive written: {}", path.display()));
    Ok(DxfReport {
        archive: path,
        entries,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thickness_label() {
        assert_eq!(thickness_label(Some(3.0)), "3");
        assert_eq!(thickness_label(Some(7.5)), "7_5");
        assert_eq!(thickness_label(None), "no-thickness");
    }

    #[test]
    fn test_fallback_descriptor_keeps_what_it_can() {
        let record: RawRecord = serde_json::json!({"name": "X", "thickness": 3})
            .as_object()
            .unwrap()
            .clone();
        let part = fallback_descriptor(&record);
        assert_eq!(part.name, "X");
        assert_eq!(part.shape, Shape::Unknown(String::new()));
        assert_eq!(part.thickness, Some(3.0));

        let record: RawRecord = serde_json::json!({"shape": "circle"})
            .as_object()
            .unwrap()
            .clone();
        let part = fallback_descriptor(&record);
        assert_eq!(part.name, "UNNAMED");
    }

    #[test]
    fn test_empty_input_is_success_without_output() {
        let options = ProcessOptions::new("/nonexistent/never-created");
        let outcome = run_batch(&[], &options, &TracingSink);
        assert!(outcome.is_success());
        assert!(outcome.pdf.is_none());
        assert!(outcome.dxf.is_none());
    }

    #[test]
    fn test_options_builders() {
        let options = ProcessOptions::new("out").pdf_only();
        assert!(options.generate_pdf);
        assert!(!options.generate_dxf);
        let options = ProcessOptions::new("out").dxf_only();
        assert!(!options.generate_pdf);
        assert!(options.generate_dxf);
    }
}
