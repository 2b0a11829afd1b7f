//! # Quotation
//!
//! Turns a project and its measurements into a printable quotation.
//!
//! [`Quotation::build`] derives every figure once: line items, the optional
//! rod block and the cost summary. The renderers only format what it holds:
//!
//! - [`render_html`] - self-contained HTML with inline styling and a print
//!   button, for a browser's print / save-as-PDF
//! - [`render_pdf`] - the same content compiled to PDF through Typst
//!
//! Cloth and stitching figures are recomputed from each measurement's rate
//! fields here, while the curtain subtotal sums the frozen `totalCost`
//! snapshots. The two agree unless the pricing formulas changed after a
//! measurement was taken.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::project::{MeasurementDraft, Project, ProjectDraft};
//! use quote_core::quotation::{render_html, Quotation, QuotationOptions};
//!
//! let mut project = Project::from_draft(ProjectDraft::new("A", "123").with_rod_rate(10.0)).unwrap();
//! project.add_measurement(
//!     MeasurementDraft::new("R1", 120.0, 60.0, 100.0, 50.0).into_measurement().unwrap(),
//! );
//!
//! let quote = Quotation::new(&project, &project.measurements, QuotationOptions::default());
//! assert_eq!(quote.summary.rod_cost, 100.0);
//!
//! let html = render_html(&quote);
//! assert!(html.contains("Rod Installation"));
//! ```

mod html;
mod pdf;

pub use html::render_html;
pub use pdf::render_pdf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pricing::{self, ProjectTotals};
use crate::project::{CurtainType, Measurement, Project};

/// The single currency symbol used on every document
pub const CURRENCY_SYMBOL: &str = "₹";

/// Project title printed when the project has none
const DEFAULT_PROJECT_TITLE: &str = "Curtain Installation";

/// Document-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationOptions {
    /// Business name in the document header
    pub business_name: String,
    /// One line under the business name (address, phone)
    pub business_details: String,
    /// Heading above the customer block
    pub title: String,
}

impl Default for QuotationOptions {
    fn default() -> Self {
        QuotationOptions {
            business_name: "Interior Measurement & Quotation".to_string(),
            business_details: "Curtain Measurement & Costing".to_string(),
            title: "QUOTATION".to_string(),
        }
    }
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// 1-based row number
    pub index: usize,
    pub room_label: String,
    pub width_inches: f64,
    pub height_inches: f64,
    pub pieces: f64,
    /// Frozen metres, as stored
    pub total_meters: String,
    pub curtain_type: CurtainType,
    /// Rate times frozen metres
    pub cloth_cost: f64,
    /// Per-piece stitching times pieces
    pub stitching_cost: f64,
    /// Frozen line total
    pub total_cost: f64,
}

impl LineItem {
    fn from_measurement(index: usize, m: &Measurement) -> Self {
        LineItem {
            index,
            room_label: m.room_label.clone(),
            width_inches: m.width_inches,
            height_inches: m.height_inches,
            pieces: m.pieces,
            total_meters: m.total_meters.clone(),
            curtain_type: m.curtain_type,
            cloth_cost: m.cloth_cost(),
            stitching_cost: m.stitching_total(),
            total_cost: m.total_cost_value(),
        }
    }
}

/// Rod installation block, present only when there is rod length to quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RodSummary {
    pub total_width_inches: f64,
    pub rod_length: f64,
    pub rate_per_length: f64,
    pub rod_cost: f64,
}

/// Cost summary box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QuotationSummary {
    pub cloth_total: f64,
    pub stitching_total: f64,
    /// Sum of frozen line totals
    pub curtain_subtotal: f64,
    pub rod_cost: f64,
    pub grand_total: f64,
}

/// Everything a rendered quotation shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub quote_number: String,
    pub issued_at: DateTime<Utc>,
    pub client_name: String,
    pub phone_number: String,
    pub address: String,
    pub project_title: String,
    pub line_items: Vec<LineItem>,
    pub rod: Option<RodSummary>,
    pub summary: QuotationSummary,
    pub options: QuotationOptions,
}

impl Quotation {
    /// Build a quotation issued now.
    pub fn new(project: &Project, measurements: &[Measurement], options: QuotationOptions) -> Self {
        Self::build(project, measurements, options, Utc::now())
    }

    /// Build a quotation with an explicit issue time.
    pub fn build(
        project: &Project,
        measurements: &[Measurement],
        options: QuotationOptions,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let line_items: Vec<LineItem> = measurements
            .iter()
            .enumerate()
            .map(|(i, m)| LineItem::from_measurement(i + 1, m))
            .collect();

        let totals = ProjectTotals::from_measurements(measurements, project.rod_rate_per_length);

        let rod = (totals.rod_length > 0.0).then_some(RodSummary {
            total_width_inches: totals.total_width_inches,
            rod_length: totals.rod_length,
            rate_per_length: totals.rod_rate_per_length,
            rod_cost: totals.rod_cost,
        });

        let summary = QuotationSummary {
            cloth_total: line_items.iter().map(|l| l.cloth_cost).sum(),
            stitching_total: line_items.iter().map(|l| l.stitching_cost).sum(),
            curtain_subtotal: totals.total_cost,
            rod_cost: totals.rod_cost,
            grand_total: totals.grand_total,
        };

        let project_title = if project.project_title.trim().is_empty() {
            DEFAULT_PROJECT_TITLE.to_string()
        } else {
            project.project_title.clone()
        };

        Quotation {
            quote_number: quote_number(issued_at),
            issued_at,
            client_name: project.client_name.clone(),
            phone_number: project.phone_number.clone(),
            address: project.address.clone(),
            project_title,
            line_items,
            rod,
            summary,
            options,
        }
    }

    /// Issue date as printed (day/month/year).
    pub fn issue_date(&self) -> String {
        self.issued_at.format("%d/%m/%Y").to_string()
    }

    /// True when the summary should show a rod installation row.
    pub fn has_rod_cost(&self) -> bool {
        self.summary.rod_cost > 0.0
    }
}

/// `QT` followed by the last six digits of the issue time in milliseconds.
pub fn quote_number(issued_at: DateTime<Utc>) -> String {
    format!("QT{:06}", issued_at.timestamp_millis().rem_euclid(1_000_000))
}

/// Currency amount at `decimals` places. Two-decimal amounts use the
/// snapshot rule; whole amounts round half away from zero.
fn money(value: f64, decimals: usize) -> String {
    if decimals == 2 {
        return format!("{}{}", CURRENCY_SYMBOL, pricing::to_snapshot(value));
    }
    let scale = 10f64.powi(decimals as i32);
    format!("{}{:.*}", CURRENCY_SYMBOL, decimals, (value * scale).round() / scale)
}
