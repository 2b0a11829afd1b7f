//! # Project Data Structures
//!
//! A `Project` is one client job. It owns its measurements outright: they
//! have no storage of their own and disappear with the project.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── id, createdAt (fixed at creation)
//! ├── clientName, phoneNumber, address, projectTitle
//! ├── rodRatePerLength (optional)
//! └── measurements: Vec<Measurement> (insertion order)
//! ```
//!
//! Records serialize as camelCase JSON, the persisted layout. Absent
//! optional fields deserialize to their defaults.
//!
//! ## Snapshot semantics
//!
//! A measurement's `totalMeters` and `totalCost` are computed once, when it
//! is built from a [`MeasurementDraft`], and stored as 2-decimal strings.
//! They are never recomputed on read, so an issued quote does not change
//! if the pricing formulas do.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::project::{MeasurementDraft, Project, ProjectDraft};
//!
//! let draft = ProjectDraft::new("A. Sharma", "9876543210");
//! let mut project = Project::from_draft(draft).unwrap();
//!
//! let measurement = MeasurementDraft::new("Living Room", 30.0, 60.0, 100.0, 50.0)
//!     .into_measurement()
//!     .unwrap();
//! project.add_measurement(measurement);
//!
//! assert_eq!(project.measurements[0].pieces, 2.0);
//! assert_eq!(project.measurements[0].total_meters, "3.85");
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{QuoteError, QuoteResult};
use crate::pricing::{self, parse_or_zero, ProjectTotals};

/// Opaque record identifier for projects and measurements.
///
/// New records get a UUID v4 string, but any non-empty string read from the
/// store is accepted as-is: older stores hold timestamp-style ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        RecordId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId(value)
    }
}

impl FromStr for RecordId {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(QuoteError::validation("id", s, "must not be empty"));
        }
        Ok(RecordId(trimmed.to_string()))
    }
}

/// Root record for one client job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Assigned at creation, never changes
    pub id: RecordId,

    pub client_name: String,

    pub phone_number: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub project_title: String,

    /// Assigned at creation, never changes
    pub created_at: DateTime<Utc>,

    /// Rod installation rate per rod unit
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::deserialize_rate"
    )]
    pub rod_rate_per_length: Option<f64>,

    /// Window measurements in insertion order
    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

impl Project {
    /// Validate a draft and build a new project with a fresh id and timestamp.
    pub fn from_draft(draft: ProjectDraft) -> QuoteResult<Self> {
        draft.validate()?;
        Ok(Project {
            id: RecordId::new(),
            client_name: draft.client_name.trim().to_string(),
            phone_number: draft.phone_number.trim().to_string(),
            address: draft.address.trim().to_string(),
            project_title: draft.project_title.trim().to_string(),
            created_at: Utc::now(),
            rod_rate_per_length: draft.rod_rate_per_length,
            measurements: Vec::new(),
        })
    }

    /// Title shown in lists: the project title, or the client name when blank.
    pub fn display_title(&self) -> &str {
        if self.project_title.trim().is_empty() {
            &self.client_name
        } else {
            &self.project_title
        }
    }

    /// Append a measurement, returning its id.
    pub fn add_measurement(&mut self, measurement: Measurement) -> RecordId {
        let id = measurement.id.clone();
        self.measurements.push(measurement);
        id
    }

    /// Remove a measurement by id, returning it if it existed.
    pub fn remove_measurement(&mut self, id: &RecordId) -> Option<Measurement> {
        let index = self.measurements.iter().position(|m| &m.id == id)?;
        Some(self.measurements.remove(index))
    }

    /// Get a measurement by id.
    pub fn get_measurement(&self, id: &RecordId) -> Option<&Measurement> {
        self.measurements.iter().find(|m| &m.id == id)
    }

    /// Shallow merge: every field present in the patch replaces the stored one.
    ///
    /// A patch carrying `measurements` replaces the whole list.
    pub fn apply_patch(&mut self, patch: ProjectPatch) {
        if let Some(client_name) = patch.client_name {
            self.client_name = client_name;
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = phone_number;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(project_title) = patch.project_title {
            self.project_title = project_title;
        }
        if let Some(rate) = patch.rod_rate_per_length {
            self.rod_rate_per_length = rate;
        }
        if let Some(measurements) = patch.measurements {
            self.measurements = measurements;
        }
    }

    /// Aggregate figures over all measurements, including the rod.
    pub fn totals(&self) -> ProjectTotals {
        ProjectTotals::from_measurements(&self.measurements, self.rod_rate_per_length)
    }

    /// Compact figures for list views.
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            title: self.display_title().to_string(),
            client_name: self.client_name.clone(),
            created_at: self.created_at,
            measurement_count: self.measurements.len(),
            total_meters: self.measurements.iter().map(Measurement::total_meters_value).sum(),
            total_cost: self.measurements.iter().map(Measurement::total_cost_value).sum(),
        }
    }
}

/// Compact per-project figures for the project list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: RecordId,
    pub title: String,
    pub client_name: String,
    pub created_at: DateTime<Utc>,
    pub measurement_count: usize,
    pub total_meters: f64,
    pub total_cost: f64,
}

/// Operator input for a new project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub client_name: String,
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub project_title: String,
    #[serde(default)]
    pub rod_rate_per_length: Option<f64>,
}

impl ProjectDraft {
    /// Draft with the two required fields set.
    pub fn new(client_name: impl Into<String>, phone_number: impl Into<String>) -> Self {
        ProjectDraft {
            client_name: client_name.into(),
            phone_number: phone_number.into(),
            ..Default::default()
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_title(mut self, project_title: impl Into<String>) -> Self {
        self.project_title = project_title.into();
        self
    }

    pub fn with_rod_rate(mut self, rate: f64) -> Self {
        self.rod_rate_per_length = Some(rate);
        self
    }

    /// Check required fields. The project title is optional.
    pub fn validate(&self) -> QuoteResult<()> {
        if self.client_name.trim().is_empty() {
            return Err(QuoteError::missing_field("clientName"));
        }
        if self.phone_number.trim().is_empty() {
            return Err(QuoteError::missing_field("phoneNumber"));
        }
        if let Some(rate) = self.rod_rate_per_length {
            validate_rate("rodRatePerLength", rate)?;
        }
        Ok(())
    }
}

/// Partial update for a project. `None` leaves a field untouched.
///
/// `rod_rate_per_length: Some(None)` clears the rate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub client_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub project_title: Option<String>,
    pub rod_rate_per_length: Option<Option<f64>>,
    pub measurements: Option<Vec<Measurement>>,
}

impl ProjectPatch {
    /// Patch that replaces the measurement list only.
    pub fn measurements(measurements: Vec<Measurement>) -> Self {
        ProjectPatch {
            measurements: Some(measurements),
            ..Default::default()
        }
    }

    /// Patch that sets the rod rate only.
    pub fn rod_rate(rate: Option<f64>) -> Self {
        ProjectPatch {
            rod_rate_per_length: Some(rate),
            ..Default::default()
        }
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self == &ProjectPatch::default()
    }

    /// Reject blank required fields and negative rates.
    pub fn validate(&self) -> QuoteResult<()> {
        if matches!(&self.client_name, Some(name) if name.trim().is_empty()) {
            return Err(QuoteError::missing_field("clientName"));
        }
        if matches!(&self.phone_number, Some(phone) if phone.trim().is_empty()) {
            return Err(QuoteError::missing_field("phoneNumber"));
        }
        if let Some(Some(rate)) = self.rod_rate_per_length {
            validate_rate("rodRatePerLength", rate)?;
        }
        Ok(())
    }
}

/// Curtain style. Descriptive only; it does not affect pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CurtainType {
    #[default]
    Eyelet,
    Pleated,
    #[serde(rename = "Rod Pocket")]
    RodPocket,
}

impl CurtainType {
    pub const ALL: [CurtainType; 3] = [CurtainType::Eyelet, CurtainType::Pleated, CurtainType::RodPocket];

    pub fn display_name(&self) -> &'static str {
        match self {
            CurtainType::Eyelet => "Eyelet",
            CurtainType::Pleated => "Pleated",
            CurtainType::RodPocket => "Rod Pocket",
        }
    }

    /// Parse a style name, ignoring case, spaces, dashes and underscores.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "eyelet" => Some(CurtainType::Eyelet),
            "pleated" => Some(CurtainType::Pleated),
            "rodpocket" => Some(CurtainType::RodPocket),
            _ => None,
        }
    }
}

impl fmt::Display for CurtainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One window line on a quotation. Built only from a [`MeasurementDraft`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: RecordId,
    pub room_label: String,
    pub width_inches: f64,
    pub height_inches: f64,
    /// Fabric panels; may be a half value
    pub pieces: f64,
    #[serde(default)]
    pub curtain_type: CurtainType,
    pub cloth_rate_per_meter: f64,
    /// Stitching cost per piece
    pub stitching_cost: f64,
    /// Frozen at creation, 2 decimals
    pub total_meters: String,
    /// Frozen at creation, 2 decimals
    pub total_cost: String,
}

impl Measurement {
    /// Stored `totalMeters` as a number (parse-or-zero).
    pub fn total_meters_value(&self) -> f64 {
        parse_or_zero(&self.total_meters)
    }

    /// Stored `totalCost` as a number (parse-or-zero).
    pub fn total_cost_value(&self) -> f64 {
        parse_or_zero(&self.total_cost)
    }

    /// Fabric cost recomputed from the stored rate and frozen metres.
    pub fn cloth_cost(&self) -> f64 {
        pricing::cloth_cost(self.cloth_rate_per_meter, self.total_meters_value())
    }

    /// Stitching cost recomputed from the per-piece rate.
    pub fn stitching_total(&self) -> f64 {
        pricing::stitching_total(self.stitching_cost, self.pieces)
    }
}

/// Operator input for a new measurement.
///
/// Numeric fields are optional so an incomplete form can be represented;
/// [`validate`](MeasurementDraft::validate) rejects it before any pricing
/// happens. `pieces` left empty is derived from the width.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementDraft {
    pub room_label: String,
    pub width_inches: Option<f64>,
    pub height_inches: Option<f64>,
    #[serde(default)]
    pub pieces: Option<f64>,
    #[serde(default)]
    pub curtain_type: CurtainType,
    pub cloth_rate_per_meter: Option<f64>,
    pub stitching_cost: Option<f64>,
}

impl MeasurementDraft {
    /// Complete draft with pieces left to the width table.
    pub fn new(
        room_label: impl Into<String>,
        width_inches: f64,
        height_inches: f64,
        cloth_rate_per_meter: f64,
        stitching_cost: f64,
    ) -> Self {
        MeasurementDraft {
            room_label: room_label.into(),
            width_inches: Some(width_inches),
            height_inches: Some(height_inches),
            pieces: None,
            curtain_type: CurtainType::default(),
            cloth_rate_per_meter: Some(cloth_rate_per_meter),
            stitching_cost: Some(stitching_cost),
        }
    }

    /// Override the width-derived piece count.
    pub fn with_pieces(mut self, pieces: f64) -> Self {
        self.pieces = Some(pieces);
        self
    }

    pub fn with_curtain_type(mut self, curtain_type: CurtainType) -> Self {
        self.curtain_type = curtain_type;
        self
    }

    /// Pieces that will be used: the operator's figure or the width table's.
    pub fn effective_pieces(&self) -> Option<f64> {
        self.pieces.or_else(|| self.width_inches.map(pricing::pieces_from_width))
    }

    /// Check that every required field is present and in range.
    pub fn validate(&self) -> QuoteResult<()> {
        if self.room_label.trim().is_empty() {
            return Err(QuoteError::missing_field("roomLabel"));
        }
        let width = require("widthInches", self.width_inches)?;
        validate_positive("widthInches", width)?;
        let height = require("heightInches", self.height_inches)?;
        validate_positive("heightInches", height)?;
        if let Some(pieces) = self.pieces {
            validate_positive("pieces", pieces)?;
        }
        let rate = require("clothRatePerMeter", self.cloth_rate_per_meter)?;
        validate_rate("clothRatePerMeter", rate)?;
        let stitching = require("stitchingCost", self.stitching_cost)?;
        validate_rate("stitchingCost", stitching)?;
        Ok(())
    }

    /// Validate, derive pieces if needed, and freeze the derived totals.
    pub fn into_measurement(self) -> QuoteResult<Measurement> {
        self.validate()?;
        let pieces = self
            .effective_pieces()
            .ok_or_else(|| QuoteError::missing_field("pieces"))?;
        let width_inches = require("widthInches", self.width_inches)?;
        let height_inches = require("heightInches", self.height_inches)?;
        let cloth_rate_per_meter = require("clothRatePerMeter", self.cloth_rate_per_meter)?;
        let stitching_cost = require("stitchingCost", self.stitching_cost)?;

        let meters = pricing::cloth_meters(height_inches, pieces);
        let cost = pricing::total_cost(cloth_rate_per_meter, meters, stitching_cost, pieces);

        Ok(Measurement {
            id: RecordId::new(),
            room_label: self.room_label.trim().to_string(),
            width_inches,
            height_inches,
            pieces,
            curtain_type: self.curtain_type,
            cloth_rate_per_meter,
            stitching_cost,
            total_meters: pricing::to_snapshot(meters),
            total_cost: pricing::to_snapshot(cost),
        })
    }
}

fn require(field: &str, value: Option<f64>) -> QuoteResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(QuoteError::validation(field, v.to_string(), "Must be a finite number")),
        None => Err(QuoteError::missing_field(field)),
    }
}

fn validate_positive(field: &str, value: f64) -> QuoteResult<()> {
    if value <= 0.0 {
        return Err(QuoteError::validation(field, value.to_string(), "Must be greater than zero"));
    }
    Ok(())
}

fn validate_rate(field: &str, value: f64) -> QuoteResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(QuoteError::validation(field, value.to_string(), "Must not be negative"));
    }
    Ok(())
}

/// Older records may hold the rod rate as a form string.
mod lenient {
    use serde::{Deserialize, Deserializer};

    use crate::pricing::parse_or_zero;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRate {
        Number(f64),
        Text(String),
    }

    pub fn deserialize_rate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<RawRate>::deserialize(deserializer)? {
            Some(RawRate::Number(n)) => Some(n),
            Some(RawRate::Text(s)) if s.trim().is_empty() => None,
            Some(RawRate::Text(s)) => Some(parse_or_zero(&s)),
            None => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_project() -> Project {
        Project::from_draft(
            ProjectDraft::new("A", "123")
                .with_title("T")
                .with_address("12 Lake Road"),
        )
        .unwrap()
    }

    #[test]
    fn test_project_creation() {
        let project = sample_project();
        assert_eq!(project.client_name, "A");
        assert_eq!(project.phone_number, "123");
        assert_eq!(project.project_title, "T");
        assert!(project.measurements.is_empty());
        assert_eq!(project.rod_rate_per_length, None);
    }

    #[test]
    fn test_project_draft_requires_client_and_phone() {
        let err = Project::from_draft(ProjectDraft::new("  ", "123")).unwrap_err();
        assert_eq!(err, QuoteError::missing_field("clientName"));

        let err = Project::from_draft(ProjectDraft::new("A", "")).unwrap_err();
        assert_eq!(err, QuoteError::missing_field("phoneNumber"));

        // Title is optional
        assert!(Project::from_draft(ProjectDraft::new("A", "123")).is_ok());
    }

    #[test]
    fn test_display_title_falls_back_to_client() {
        let mut project = sample_project();
        assert_eq!(project.display_title(), "T");
        project.project_title.clear();
        assert_eq!(project.display_title(), "A");
    }

    #[test]
    fn test_project_serialization_layout() {
        let mut project = sample_project();
        project.rod_rate_per_length = Some(45.0);
        let json = serde_json::to_value(&project).unwrap();

        assert_eq!(json["clientName"], "A");
        assert_eq!(json["phoneNumber"], "123");
        assert_eq!(json["projectTitle"], "T");
        assert_eq!(json["rodRatePerLength"], 45.0);
        assert!(json["createdAt"].is_string());
        assert!(json["measurements"].is_array());

        let roundtrip: Project = serde_json::from_value(json).unwrap();
        assert_eq!(roundtrip, project);
    }

    #[test]
    fn test_project_deserialize_tolerates_missing_optional_fields() {
        let json = r#"{
            "id": "7f9c24e8-3b12-4fef-91e0-3f2a1c6d5b4a",
            "clientName": "B",
            "phoneNumber": "555",
            "createdAt": "2025-03-01T10:00:00Z",
            "rodRatePerLength": "35"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.address, "");
        assert_eq!(project.project_title, "");
        assert!(project.measurements.is_empty());
        assert_eq!(project.rod_rate_per_length, Some(35.0));
    }

    #[test]
    fn test_blank_rod_rate_string_is_none() {
        let json = r#"{
            "id": "7f9c24e8-3b12-4fef-91e0-3f2a1c6d5b4a",
            "clientName": "B",
            "phoneNumber": "555",
            "createdAt": "2025-03-01T10:00:00Z",
            "rodRatePerLength": ""
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.rod_rate_per_length, None);
    }

    #[test]
    fn test_measurement_snapshot() {
        let m = MeasurementDraft::new("R1", 30.0, 60.0, 100.0, 50.0)
            .into_measurement()
            .unwrap();
        assert_eq!(m.pieces, 2.0);
        assert_eq!(m.total_meters, "3.85");
        assert_eq!(m.total_cost, "484.62");
        assert_eq!(m.curtain_type, CurtainType::Eyelet);
    }

    #[test]
    fn test_measurement_explicit_pieces_override_table() {
        let m = MeasurementDraft::new("R1", 30.0, 63.0, 100.0, 50.0)
            .with_pieces(3.0)
            .into_measurement()
            .unwrap();
        assert_eq!(m.pieces, 3.0);
        // (63 + 15) * 3 / 39 = 6
        assert_eq!(m.total_meters, "6.00");
        assert_eq!(m.total_cost, "750.00");
    }

    #[test]
    fn test_measurement_draft_validation() {
        let mut draft = MeasurementDraft::new("R1", 30.0, 60.0, 100.0, 50.0);
        draft.room_label = " ".to_string();
        assert_eq!(draft.validate().unwrap_err(), QuoteError::missing_field("roomLabel"));

        let mut draft = MeasurementDraft::new("R1", 30.0, 60.0, 100.0, 50.0);
        draft.height_inches = None;
        assert_eq!(draft.validate().unwrap_err(), QuoteError::missing_field("heightInches"));

        let draft = MeasurementDraft::new("R1", 0.0, 60.0, 100.0, 50.0);
        assert!(draft.validate().unwrap_err().is_validation());

        let draft = MeasurementDraft::new("R1", 30.0, 60.0, -1.0, 50.0);
        assert_eq!(draft.validate().unwrap_err().error_code(), "VALIDATION_ERROR");

        let draft = MeasurementDraft::new("R1", 30.0, 60.0, 0.0, 0.0);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_add_and_remove_measurement() {
        let mut project = sample_project();
        let first = MeasurementDraft::new("R1", 30.0, 60.0, 100.0, 50.0)
            .into_measurement()
            .unwrap();
        let second = MeasurementDraft::new("R2", 50.0, 80.0, 120.0, 60.0)
            .into_measurement()
            .unwrap();
        let first_id = project.add_measurement(first);
        let second_id = project.add_measurement(second);

        assert_eq!(project.measurements.len(), 2);
        assert_eq!(project.measurements[0].room_label, "R1");
        assert!(project.get_measurement(&second_id).is_some());

        let removed = project.remove_measurement(&first_id).unwrap();
        assert_eq!(removed.room_label, "R1");
        assert_eq!(project.measurements.len(), 1);
        assert!(project.remove_measurement(&first_id).is_none());
    }

    #[test]
    fn test_apply_patch_is_shallow() {
        let mut project = sample_project();
        project.add_measurement(
            MeasurementDraft::new("R1", 30.0, 60.0, 100.0, 50.0)
                .into_measurement()
                .unwrap(),
        );
        let before = project.clone();

        project.apply_patch(ProjectPatch {
            phone_number: Some("999".to_string()),
            ..Default::default()
        });
        assert_eq!(project.phone_number, "999");
        assert_eq!(project.client_name, before.client_name);
        assert_eq!(project.measurements, before.measurements);
        assert_eq!(project.created_at, before.created_at);

        project.apply_patch(ProjectPatch::measurements(Vec::new()));
        assert!(project.measurements.is_empty());

        project.apply_patch(ProjectPatch::rod_rate(Some(20.0)));
        assert_eq!(project.rod_rate_per_length, Some(20.0));
        project.apply_patch(ProjectPatch::rod_rate(None));
        assert_eq!(project.rod_rate_per_length, None);
    }

    #[test]
    fn test_patch_validation() {
        assert!(ProjectPatch::default().is_empty());
        let patch = ProjectPatch {
            client_name: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(patch.validate().unwrap_err(), QuoteError::missing_field("clientName"));
        assert!(ProjectPatch::rod_rate(Some(-2.0)).validate().is_err());
        assert!(ProjectPatch::rod_rate(None).validate().is_ok());
    }

    #[test]
    fn test_curtain_type_names() {
        assert_eq!(serde_json::to_string(&CurtainType::RodPocket).unwrap(), "\"Rod Pocket\"");
        assert_eq!(CurtainType::from_name("rod-pocket"), Some(CurtainType::RodPocket));
        assert_eq!(CurtainType::from_name("PLEATED"), Some(CurtainType::Pleated));
        assert_eq!(CurtainType::from_name("roman"), None);
    }

    #[test]
    fn test_summary() {
        let mut project = sample_project();
        project.add_measurement(
            MeasurementDraft::new("R1", 30.0, 60.0, 100.0, 50.0)
                .into_measurement()
                .unwrap(),
        );
        let summary = project.summary();
        assert_eq!(summary.measurement_count, 1);
        assert_eq!(summary.title, "T");
        assert!((summary.total_meters - 3.85).abs() < 1e-9);
        assert!((summary.total_cost - 484.62).abs() < 1e-9);
    }
}
