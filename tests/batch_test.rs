//! End-to-end batch runs against a temporary output directory.

use std::fs::File;
use std::sync::Mutex;

use serde_json::{json, Value};

use platedraw::processing::{run_batch, ProcessOptions, StatusSink};
use platedraw::RawRecord;

struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    fn contains(&self, needle: &str) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|m| m.contains(needle))
    }
}

impl StatusSink for CollectingSink {
    fn status(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn progress(&self, _percent: u8) {}
}

fn records(value: Value) -> Vec<RawRecord> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry.as_object().unwrap().clone())
        .collect()
}

#[test]
fn test_full_batch_produces_both_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = records(json!([
        {
            "name": "Plate A", "shape": "rectangle",
            "width": 200, "height": 100, "thickness": 3, "qty": 2,
            "holes": [{"diam": 8, "x": 10, "y": 50}, {"diam": 8, "x": 190, "y": 50}]
        },
        {"name": "Disc", "shape": "circle", "diameter": 50, "thickness": 3, "qty": 1},
        {
            "name": "Wedge", "shape": "trapezoid",
            "large_base": 120, "small_base": 60, "height": 40, "thickness": 5, "qty": 1
        }
    ]));

    let sink = CollectingSink::new();
    let outcome = run_batch(&input, &ProcessOptions::new(dir.path()), &sink);
    assert!(outcome.is_success());

    // Two thickness groups: 3 mm holds two pages, 5 mm holds one.
    let pdf = outcome.pdf.unwrap().unwrap();
    assert_eq!(pdf.pages, 3);
    assert_eq!(pdf.placeholder_pages, 0);
    let mut names: Vec<String> = pdf
        .files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Drawings_3mm.pdf", "Drawings_5mm.pdf"]);
    for (path, count) in [("Drawings_3mm.pdf", 2), ("Drawings_5mm.pdf", 1)] {
        let bytes = std::fs::read(dir.path().join("pdf").join(path)).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains(&format!("/Count {count}")), "{path}");
    }

    let dxf = outcome.dxf.unwrap().unwrap();
    assert_eq!(dxf.entries, 3);
    assert_eq!(dxf.skipped, 0);
    let archive_name = dxf.archive.file_name().unwrap().to_string_lossy().into_owned();
    assert!(archive_name.starts_with("Batch_DXF_"));
    assert!(archive_name.ends_with(".zip"));

    let mut archive = zip::ZipArchive::new(File::open(&dxf.archive).unwrap()).unwrap();
    let mut entries: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["Disc.dxf", "Plate_A.dxf", "Wedge.dxf"]);

    assert!(sink.contains("Generating PDF drawings"));
    assert!(sink.contains("DXF archive written"));
}

#[test]
fn test_bad_records_become_placeholders_not_failures() {
    let dir = tempfile::tempdir().unwrap();
    let input = records(json!([
        {"name": "Broken", "shape": "rectangle", "width": 0, "height": 50, "thickness": 3},
        {"name": "Five Sides", "shape": "pentagon", "thickness": 3},
        {"shape": "circle", "diameter": 10}
    ]));

    let sink = CollectingSink::new();
    let outcome = run_batch(&input, &ProcessOptions::new(dir.path()), &sink);
    assert!(outcome.is_success());

    // Every record gets a page even though none could be drawn.
    let pdf = outcome.pdf.unwrap().unwrap();
    assert_eq!(pdf.pages, 3);
    assert_eq!(pdf.placeholder_pages, 3);
    // 3 mm group plus the sentinel group for the record with no thickness.
    assert_eq!(pdf.files.len(), 2);
    assert!(pdf
        .files
        .iter()
        .any(|p| p.file_name().unwrap() == "Drawings_no-thicknessmm.pdf"));

    let dxf = outcome.dxf.unwrap().unwrap();
    assert_eq!(dxf.entries, 0);
    assert_eq!(dxf.skipped, 3);
    assert!(sink.contains("skipping DXF"));
}

#[test]
fn test_pdf_only_skips_dxf_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = records(json!([
        {"name": "Disc", "shape": "circle", "diameter": 60, "thickness": 3}
    ]));

    let outcome = run_batch(
        &input,
        &ProcessOptions::new(dir.path()).pdf_only(),
        &CollectingSink::new(),
    );
    assert!(outcome.is_success());
    assert!(outcome.pdf.is_some());
    assert!(outcome.dxf.is_none());
    assert!(dir.path().join("pdf").is_dir());
    assert!(!dir.path().join("dxf").exists());
}

#[test]
fn test_groups_follow_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = records(json!([
        {"name": "A", "shape": "circle", "diameter": 10, "thickness": 5},
        {"name": "B", "shape": "circle", "diameter": 10, "thickness": 2},
        {"name": "C", "shape": "circle", "diameter": 10, "thickness": 5}
    ]));

    let outcome = run_batch(
        &input,
        &ProcessOptions::new(dir.path()).pdf_only(),
        &CollectingSink::new(),
    );
    let pdf = outcome.pdf.unwrap().unwrap();
    let names: Vec<String> = pdf
        .files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    // First-seen thickness keeps first position; C joins A's document.
    assert_eq!(names, vec!["Drawings_5mm.pdf", "Drawings_2mm.pdf"]);
    assert_eq!(pdf.pages, 3);
}
