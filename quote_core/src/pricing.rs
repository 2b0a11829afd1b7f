//! # Pricing Engine
//!
//! Pure, stateless formulas that turn raw window measurements into fabric
//! quantity and cost. Nothing here touches storage or the clock.
//!
//! ## Formulas
//!
//! | Quantity | Formula |
//! |---|---|
//! | pieces | width band lookup, see [`pieces_from_width`] |
//! | cloth metres | `((height + 15) * pieces) / 39` |
//! | line cost | `cloth_rate * metres + stitching_per_piece * pieces` |
//! | rod length | `total_width / 12` |
//! | rod cost | `rod_length * rate_per_length` |
//!
//! None of the formulas round. Rounding happens once, when a measurement's
//! derived values are frozen into 2-decimal strings (see [`to_snapshot`]).
//!
//! Inputs are not validated here. Callers validate required fields first
//! and coerce loosely-typed input with [`parse_or_zero`].
//!
//! ## Example
//!
//! ```rust
//! use quote_core::pricing::{cloth_meters, pieces_from_width, to_snapshot, total_cost};
//!
//! let pieces = pieces_from_width(30.0);
//! assert_eq!(pieces, 2.0);
//!
//! let meters = cloth_meters(60.0, pieces);
//! assert_eq!(to_snapshot(meters), "3.85");
//!
//! let cost = total_cost(100.0, meters, 50.0, pieces);
//! assert_eq!(to_snapshot(cost), "484.62");
//! ```

use serde::{Deserialize, Serialize};

use crate::project::Measurement;
use crate::units::{Inches, Meters, RodUnits};

/// Fixed hem and header allowance added to every drop, in inches
pub const HEM_ALLOWANCE_IN: f64 = 15.0;

/// Widest width covered by the band table
pub const TABLE_MAX_WIDTH_IN: f64 = 140.0;

/// Pieces at the top of the band table
const TABLE_MAX_PIECES: f64 = 7.0;

/// Width added per extra half piece beyond the table
const EXTRAPOLATION_STEP_IN: f64 = 10.0;

/// Upper width bound (inclusive, inches) and the pieces needed up to it.
///
/// Anything narrower than the first bound, negative widths included,
/// takes the first band.
const WIDTH_BANDS: [(f64, f64); 13] = [
    (20.0, 1.0),
    (28.0, 1.5),
    (40.0, 2.0),
    (50.0, 2.5),
    (60.0, 3.0),
    (70.0, 3.5),
    (80.0, 4.0),
    (90.0, 4.5),
    (100.0, 5.0),
    (110.0, 5.5),
    (120.0, 6.0),
    (130.0, 6.5),
    (140.0, 7.0),
];

/// Number of fabric panels needed to cover a window of the given width.
///
/// Follows the trade band table up to 140 inches, then adds half a piece
/// for every further 10 inches or part thereof. There is no upper bound.
///
/// ```rust
/// use quote_core::pricing::pieces_from_width;
///
/// assert_eq!(pieces_from_width(11.0), 1.0);
/// assert_eq!(pieces_from_width(21.0), 1.5);
/// assert_eq!(pieces_from_width(140.0), 7.0);
/// assert_eq!(pieces_from_width(141.0), 7.5);
/// assert_eq!(pieces_from_width(150.0), 7.5);
/// ```
pub fn pieces_from_width(width_inches: f64) -> f64 {
    if let Some(&(_, pieces)) = WIDTH_BANDS.iter().find(|(upper, _)| width_inches <= *upper) {
        return pieces;
    }
    let extra_steps = ((width_inches - TABLE_MAX_WIDTH_IN) / EXTRAPOLATION_STEP_IN).ceil();
    TABLE_MAX_PIECES + extra_steps * 0.5
}

/// Fabric required, in trade metres, for one window.
pub fn cloth_meters(height_inches: f64, pieces: f64) -> f64 {
    let fabric_run = Inches(height_inches + HEM_ALLOWANCE_IN) * pieces;
    Meters::from(fabric_run).0
}

/// Fabric cost of a line: rate per metre times metres.
pub fn cloth_cost(cloth_rate_per_meter: f64, total_meters: f64) -> f64 {
    cloth_rate_per_meter * total_meters
}

/// Stitching cost of a line. Stitching is charged per piece.
pub fn stitching_total(stitching_cost_per_piece: f64, pieces: f64) -> f64 {
    stitching_cost_per_piece * pieces
}

/// Total cost of a line: cloth plus stitching for every piece.
pub fn total_cost(cloth_rate_per_meter: f64, total_meters: f64, stitching_cost_per_piece: f64, pieces: f64) -> f64 {
    cloth_cost(cloth_rate_per_meter, total_meters) + stitching_total(stitching_cost_per_piece, pieces)
}

/// Rod length, in rod units, for the combined width of all windows.
pub fn rod_length(total_width_inches: f64) -> f64 {
    RodUnits::from(Inches(total_width_inches)).0
}

/// Rod installation cost.
pub fn rod_cost(rod_length: f64, rate_per_length: f64) -> f64 {
    rod_length * rate_per_length
}

/// Format with two decimals, rounding the exact binary value once.
///
/// `2.675` is stored as `2.67499...`, so it becomes `"2.67"`. This is the
/// one place derived values are rounded, when they are frozen into a
/// measurement.
pub fn to_snapshot(value: f64) -> String {
    format!("{:.2}", value)
}

/// Parse a loosely-typed numeric string, treating anything unparseable as zero.
///
/// ```rust
/// use quote_core::pricing::parse_or_zero;
///
/// assert_eq!(parse_or_zero(" 3.85 "), 3.85);
/// assert_eq!(parse_or_zero(""), 0.0);
/// assert_eq!(parse_or_zero("abc"), 0.0);
/// ```
pub fn parse_or_zero(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Aggregate figures for a list of measurements, derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectTotals {
    /// Number of measurement rows
    pub measurement_count: usize,
    /// Sum of frozen `totalMeters`
    pub total_meters: f64,
    /// Sum of frozen `totalCost` (curtain subtotal)
    pub total_cost: f64,
    /// Sum of window widths in inches
    pub total_width_inches: f64,
    /// Combined rod length in rod units
    pub rod_length: f64,
    /// Rod rate per unit (zero when the project has none)
    pub rod_rate_per_length: f64,
    /// Rod installation cost
    pub rod_cost: f64,
    /// Curtain subtotal plus rod cost
    pub grand_total: f64,
}

impl ProjectTotals {
    /// Aggregate a measurement list. A missing rod rate counts as zero.
    pub fn from_measurements(measurements: &[Measurement], rod_rate_per_length: Option<f64>) -> Self {
        let total_meters: f64 = measurements.iter().map(Measurement::total_meters_value).sum();
        let total_cost: f64 = measurements.iter().map(Measurement::total_cost_value).sum();
        let total_width: Inches = measurements.iter().map(|m| Inches(m.width_inches)).sum();

        let rate = rod_rate_per_length.unwrap_or(0.0);
        let rod_length = rod_length(total_width.0);
        let rod_cost = rod_cost(rod_length, rate);

        ProjectTotals {
            measurement_count: measurements.len(),
            total_meters,
            total_cost,
            total_width_inches: total_width.0,
            rod_length,
            rod_rate_per_length: rate,
            rod_cost,
            grand_total: total_cost + rod_cost,
        }
    }
}
