//! End-to-end tests: project creation, measurement entry and quotation
//! export through the on-disk store.

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use quote_core::project::{CurtainType, MeasurementDraft, ProjectDraft, ProjectPatch};
use quote_core::quotation::{render_html, Quotation, QuotationOptions};
use quote_core::store::{FileMedium, KeyValueMedium, ProjectStore, PROJECTS_KEY};

fn open_store(dir: &std::path::Path) -> ProjectStore<FileMedium> {
    ProjectStore::new(FileMedium::open(dir, "integration").unwrap())
}

#[test]
fn test_measurement_snapshot_end_to_end() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());

    let project = store
        .create(ProjectDraft::new("A", "123").with_title("T"))
        .unwrap();
    let measurement = store
        .add_measurement(&project.id, MeasurementDraft::new("R1", 30.0, 60.0, 100.0, 50.0))
        .unwrap();

    assert_eq!(measurement.pieces, 2.0);
    assert_eq!(measurement.total_meters, "3.85");
    // 100 * 3.846... + 50 * 2
    assert_eq!(measurement.total_cost, "484.62");

    // A fresh store over the same directory sees the same record
    let reopened = open_store(dir.path());
    let stored = reopened.require(&project.id).unwrap();
    assert_eq!(stored.measurements, vec![measurement]);
    assert_eq!(stored.created_at, project.created_at);
}

#[test]
fn test_persisted_layout_is_camel_case_array() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    let project = store.create(ProjectDraft::new("A", "123")).unwrap();
    store
        .add_measurement(
            &project.id,
            MeasurementDraft::new("Bay", 75.0, 90.0, 150.0, 60.0).with_curtain_type(CurtainType::RodPocket),
        )
        .unwrap();

    let blob = store.medium().read(PROJECTS_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let record = &json.as_array().unwrap()[0];
    assert_eq!(record["clientName"], "A");
    let m = &record["measurements"][0];
    assert_eq!(m["roomLabel"], "Bay");
    assert_eq!(m["curtainType"], "Rod Pocket");
    assert_eq!(m["pieces"], 4.0);
    assert!(m["totalMeters"].is_string());
    assert!(m["totalCost"].is_string());
}

#[test]
fn test_frozen_totals_survive_rate_edits() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    let project = store.create(ProjectDraft::new("A", "123")).unwrap();
    let m = store
        .add_measurement(&project.id, MeasurementDraft::new("R1", 30.0, 60.0, 100.0, 50.0))
        .unwrap();

    // Edit the stored rate directly; the frozen total stays as it was
    let mut edited = m.clone();
    edited.cloth_rate_per_meter = 200.0;
    store
        .update(&project.id, ProjectPatch::measurements(vec![edited]))
        .unwrap();

    let stored = store.require(&project.id).unwrap();
    assert_eq!(stored.measurements[0].total_cost, "484.62");

    // The quotation re-derives cloth cost from the new rate
    let quote = Quotation::new(&stored, &stored.measurements, QuotationOptions::default());
    assert!((quote.line_items[0].cloth_cost - 770.0).abs() < 1e-9);
    assert!((quote.summary.curtain_subtotal - 484.62).abs() < 1e-9);
}

#[test]
fn test_quotation_from_stored_project() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    let project = store
        .create(ProjectDraft::new("Mehta Residence", "98200").with_address("4 Palm Grove"))
        .unwrap();
    store
        .add_measurement(&project.id, MeasurementDraft::new("Living", 60.0, 96.0, 250.0, 80.0))
        .unwrap();
    store
        .add_measurement(&project.id, MeasurementDraft::new("Study", 60.0, 48.0, 180.0, 60.0))
        .unwrap();
    store
        .update(&project.id, ProjectPatch::rod_rate(Some(90.0)))
        .unwrap();

    let project = store.require(&project.id).unwrap();
    let quote = Quotation::new(&project, &project.measurements, QuotationOptions::default());

    // 120 inches of width -> 10 rod units -> 900
    let rod = quote.rod.unwrap();
    assert_eq!(rod.rod_length, 10.0);
    assert_eq!(rod.rod_cost, 900.0);
    let expected_subtotal: f64 = project.measurements.iter().map(|m| m.total_cost_value()).sum();
    assert!((quote.summary.grand_total - (expected_subtotal + 900.0)).abs() < 1e-9);
    assert_eq!(quote.project_title, "Curtain Installation");

    let html = render_html(&quote);
    assert!(html.contains("Mehta Residence"));
    assert!(html.contains("4 Palm Grove"));
    assert!(html.contains("<span>Rod Installation:</span><span>₹900.00</span>"));
}

#[test]
fn test_delete_project_and_measurements() {
    let dir = tempdir().unwrap();
    let mut store = open_store(dir.path());
    let keep = store.create(ProjectDraft::new("Keep", "1")).unwrap();
    let gone = store.create(ProjectDraft::new("Gone", "2")).unwrap();
    let m = store
        .add_measurement(&gone.id, MeasurementDraft::new("R1", 30.0, 60.0, 100.0, 50.0))
        .unwrap();

    assert!(store.delete(&gone.id).unwrap());
    assert!(!store.delete(&gone.id).unwrap());

    let remaining = store.list().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);

    let err = store.remove_measurement(&gone.id, &m.id).unwrap_err();
    assert!(err.is_not_found());
}
