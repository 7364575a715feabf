//! # Platedraw PDF
//!
//! Renders one dimensioned A4 drawing page per part and assembles the pages
//! of a thickness group into a single PDF document.
//!
//! ## Core Components
//!
//! - **Layout solver** ([`layout`]): fits a part into the drawable area with
//!   reserved dimension lanes, uniform scaling and centering.
//! - **Dimension chains** ([`dimension`]): converts hole coordinates into
//!   chained dimension segments along each axis.
//! - **Page renderer** ([`page`]): header, footer table, shape outlines,
//!   dimension lines and hole call-outs as a PDF content stream.
//! - **Document assembly** ([`document`]): wraps finished content streams
//!   into a complete PDF file with the two Helvetica Type1 fonts.
//!
//! Rendering is side-effect free: pages and documents are produced as byte
//! buffers, file placement is the caller's concern.

pub mod dimension;
pub mod document;
pub mod layout;
pub mod page;
pub mod text;

pub use dimension::{chain, total_span, DimChain, DimSegment, DIM_EPSILON_MM};
pub use document::PageDocument;
pub use layout::{solve, Placement};
pub use page::PageCanvas;
