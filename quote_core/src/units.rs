//! # Unit Types
//!
//! Newtype wrappers for the three length measures the trade mixes: window
//! dimensions in inches, fabric in trade metres, and curtain rods in rod
//! units. They serialize as bare numbers.
//!
//! The trade metre is 39 inches, not the exact 39.37; quotations have always
//! been priced on the round figure, so conversions here use it too.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::units::{Inches, Meters, RodUnits};
//!
//! let fabric: Meters = Inches(78.0).into();
//! assert_eq!(fabric.0, 2.0);
//!
//! let rod: RodUnits = Inches(120.0).into();
//! assert_eq!(rod.0, 10.0);
//! ```

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, Mul};

/// Inches in one trade metre of fabric
pub const INCHES_PER_METER: f64 = 39.0;

/// Inches of combined window width per rod unit
pub const INCHES_PER_ROD_UNIT: f64 = 12.0;

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Fabric length in trade metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Curtain rod length in rod units (12 inches each)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RodUnits(pub f64);

impl From<Inches> for Meters {
    fn from(inches: Inches) -> Self {
        Meters(inches.0 / INCHES_PER_METER)
    }
}

impl From<Inches> for RodUnits {
    fn from(inches: Inches) -> Self {
        RodUnits(inches.0 / INCHES_PER_ROD_UNIT)
    }
}

impl Add for Inches {
    type Output = Inches;
    fn add(self, rhs: Inches) -> Inches {
        Inches(self.0 + rhs.0)
    }
}

impl Mul<f64> for Inches {
    type Output = Inches;
    fn mul(self, rhs: f64) -> Inches {
        Inches(self.0 * rhs)
    }
}

impl Sum for Inches {
    fn sum<I: Iterator<Item = Inches>>(iter: I) -> Inches {
        iter.fold(Inches(0.0), |acc, x| acc + x)
    }
}
