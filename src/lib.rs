//! # Platedraw
//!
//! Batch generator of manufacturing outputs for flat cut parts:
//! - Dimensioned A4 PDF drawing pages, one per part, grouped into one
//!   document per material thickness
//! - Geometry-only DXF files for the cutting path, batched into a
//!   timestamped zip archive
//!
//! ## Architecture
//!
//! Platedraw is organized as a workspace with multiple crates:
//!
//! 1. **platedraw-core** - Part model, record normalization, number formatting
//! 2. **platedraw-pdf** - Layout solver, dimension chains, page rendering, PDF assembly
//! 3. **platedraw-dxf** - DXF geometry export and zip batching
//! 4. **platedraw** - Main binary: batch pipeline and CLI
//!
//! Both outputs are driven by the same normalized part descriptors, so the
//! drawing a person reads and the geometry a machine cuts always agree.

pub mod processing;

pub use platedraw_core::{
    format_mm, normalize, parse_mm, sanitize_filename, DecimalStyle, DimensionError, Hole,
    NormalizeError, PartDescriptor, RawRecord, Shape,
};
pub use platedraw_dxf::{archive_filename, export_part, GeometryArchive, GeometryError};
pub use platedraw_pdf::{PageCanvas, PageDocument};

pub use processing::{
    run_batch, ArtifactError, BatchOutcome, DxfReport, PdfReport, ProcessOptions, StatusSink,
    TracingSink,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let fmt_layer = fmt::layer().with_target(true).with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
