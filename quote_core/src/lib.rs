//! # quote_core - Curtain Quotation Engine
//!
//! `quote_core` is the computational heart of Pleat: it records client
//! projects and window measurements, prices fabric and stitching, and
//! renders printable quotations.
//!
//! ## Design Philosophy
//!
//! - **Pure pricing**: the engine is stateless formulas over plain numbers
//! - **Frozen quotes**: a measurement's metres and cost are fixed when it is added
//! - **Injected storage**: the project store owns whatever medium it is given
//! - **JSON-First**: every record and error implements Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use quote_core::project::{MeasurementDraft, ProjectDraft};
//! use quote_core::quotation::{render_html, Quotation, QuotationOptions};
//! use quote_core::store::{MemoryMedium, ProjectStore};
//!
//! let mut store = ProjectStore::new(MemoryMedium::new());
//! let project = store.create(ProjectDraft::new("A", "123").with_title("T"))?;
//! store.add_measurement(&project.id, MeasurementDraft::new("R1", 30.0, 60.0, 100.0, 50.0))?;
//!
//! let project = store.require(&project.id)?;
//! let quote = Quotation::new(&project, &project.measurements, QuotationOptions::default());
//! let html = render_html(&quote);
//! assert!(html.contains("R1"));
//! # Ok::<(), quote_core::errors::QuoteError>(())
//! ```
//!
//! ## Modules
//!
//! - [`pricing`] - Piece table, cloth, cost and rod formulas; aggregates
//! - [`project`] - Project and measurement records, typed drafts and patches
//! - [`store`] - Project store over a key-value medium (memory or files)
//! - [`quotation`] - Quotation model with HTML and PDF renderers
//! - [`units`] - Inch, trade-metre and rod-unit wrappers
//! - [`errors`] - Structured error types

pub mod errors;
pub mod pricing;
pub mod project;
pub mod quotation;
pub mod store;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{QuoteError, QuoteResult};
pub use project::{CurtainType, Measurement, MeasurementDraft, Project, ProjectDraft, ProjectPatch, RecordId};
pub use quotation::{Quotation, QuotationOptions};
pub use store::{FileMedium, KeyValueMedium, MemoryMedium, ProjectStore};
