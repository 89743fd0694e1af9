//! Integration tests for inspection sync and triage

mod common;

use chrono::Utc;
use common::{print_test_header, Fixture, MockStore};
use maintenance_engine::contract::*;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

fn inspection(fixture: &Fixture, answers: &[(Uuid, Value)]) -> SyncInspection {
    SyncInspection {
        asset_id: fixture.asset_id,
        template_id: fixture.template_id,
        answers: answers.iter().cloned().collect::<BTreeMap<_, _>>(),
        critical_flag: None,
        captured_at: Utc::now(),
        gps_latitude: Some(19.4326),
        gps_longitude: Some(-99.1332),
        client_report_id: None,
    }
}

#[tokio::test]
async fn test_critical_failure_opens_high_ticket_and_stops_asset() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();

    print_test_header(
        "test_critical_failure_opens_high_ticket_and_stops_asset",
        &[
            "A failing CRITICAL_STOP answer opens one HIGH ticket and sets the",
            "asset OUT_OF_SERVICE in the same unit of work.",
        ],
    );

    let payload = inspection(
        &fixture,
        &[
            (fixture.critical_question, json!("no")),
            (fixture.warning_question, json!(false)),
            (fixture.info_question, json!("yes")),
        ],
    );

    let receipt = service
        .process_sync(fixture.tenant_id, fixture.technician_id, payload)
        .await
        .expect("sync");

    let reports = store.reports();
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.id, receipt.report_id);
    assert_eq!(report.synced_at, receipt.synced_at);
    assert_eq!(report.inspector_id, fixture.technician_id);
    assert!(report.has_critical_failure);

    let answers = store.answers();
    assert_eq!(answers.len(), 3);
    let failing: Vec<_> = answers.iter().filter(|a| a.is_failure).collect();
    assert_eq!(failing.len(), 2);

    let tickets = store.tickets();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].priority, TicketPriority::High);
    assert_eq!(tickets[0].report_id, Some(receipt.report_id));
    assert_eq!(tickets[0].created_by, Some(fixture.technician_id));
    assert_eq!(
        tickets[0].description,
        "Critical failure detected during inspection: 1 critical item(s) failed"
    );

    let asset = store.asset(fixture.asset_id).unwrap();
    assert_eq!(asset.operational_status, OperationalStatus::OutOfService);
}

#[tokio::test]
async fn test_warning_failure_opens_medium_ticket_only() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();

    let payload = inspection(
        &fixture,
        &[
            (fixture.critical_question, json!("YES")),
            (fixture.warning_question, json!(" fail ")),
        ],
    );
    service
        .process_sync(fixture.tenant_id, fixture.technician_id, payload)
        .await
        .expect("sync");

    let tickets = store.tickets();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].priority, TicketPriority::Medium);
    assert_eq!(
        tickets[0].description,
        "Inspection warning: 1 item(s) require attention"
    );
    assert!(!store.reports()[0].has_critical_failure);

    let asset = store.asset(fixture.asset_id).unwrap();
    assert_eq!(asset.operational_status, OperationalStatus::Operational);
}

#[tokio::test]
async fn test_passing_inspection_opens_nothing() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();

    let payload = inspection(
        &fixture,
        &[
            (fixture.critical_question, json!(true)),
            (fixture.warning_question, json!("Yes")),
            (fixture.info_question, json!(1)),
        ],
    );
    service
        .process_sync(fixture.tenant_id, fixture.technician_id, payload)
        .await
        .expect("sync");

    assert_eq!(store.reports().len(), 1);
    assert!(store.answers().iter().all(|a| !a.is_failure));
    assert!(store.tickets().is_empty());
    assert_eq!(
        store.asset(fixture.asset_id).unwrap().operational_status,
        OperationalStatus::Operational
    );
}

#[tokio::test]
async fn test_info_and_unknown_failures_open_nothing() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();

    // A question from another template is unknown here and counts as INFO
    let other_template = store.seed_template(fixture.tenant_id);
    let foreign_critical = store.seed_question(other_template, Severity::CriticalStop);

    let payload = inspection(
        &fixture,
        &[
            (fixture.info_question, json!("NO")),
            (foreign_critical, json!(0)),
        ],
    );
    service
        .process_sync(fixture.tenant_id, fixture.technician_id, payload)
        .await
        .expect("sync");

    assert_eq!(store.answers().iter().filter(|a| a.is_failure).count(), 2);
    assert!(store.tickets().is_empty());
    assert!(!store.reports()[0].has_critical_failure);
}

#[tokio::test]
async fn test_critical_flag_forces_critical() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();

    let mut payload = inspection(&fixture, &[(fixture.critical_question, json!("YES"))]);
    payload.critical_flag = Some(true);

    service
        .process_sync(fixture.tenant_id, fixture.technician_id, payload)
        .await
        .expect("sync");

    let tickets = store.tickets();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].priority, TicketPriority::High);
    assert_eq!(tickets[0].description, "Critical failure reported by inspector");
    assert!(store.reports()[0].has_critical_failure);
    assert_eq!(
        store.asset(fixture.asset_id).unwrap().operational_status,
        OperationalStatus::OutOfService
    );
}

#[tokio::test]
async fn test_client_report_id_makes_sync_idempotent() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();

    print_test_header(
        "test_client_report_id_makes_sync_idempotent",
        &["Resubmitting with the same key returns the first receipt and writes nothing."],
    );

    let mut payload = inspection(&fixture, &[(fixture.critical_question, json!("NO"))]);
    payload.client_report_id = Some("device-7:report-42".to_string());

    let first = service
        .process_sync(fixture.tenant_id, fixture.technician_id, payload.clone())
        .await
        .expect("first sync");
    let second = service
        .process_sync(fixture.tenant_id, fixture.technician_id, payload)
        .await
        .expect("second sync");

    assert_eq!(first, second);
    assert_eq!(store.reports().len(), 1);
    assert_eq!(store.tickets().len(), 1);
}

#[tokio::test]
async fn test_same_key_committed_concurrently_returns_first_receipt() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();

    print_test_header(
        "test_same_key_committed_concurrently_returns_first_receipt",
        &[
            "A sync that misses the key lookup and then collides on insert",
            "answers with the receipt of the sync that won.",
        ],
    );

    let mut payload = inspection(&fixture, &[(fixture.critical_question, json!("NO"))]);
    payload.client_report_id = Some("device-7:report-43".to_string());

    let first = service
        .process_sync(fixture.tenant_id, fixture.technician_id, payload.clone())
        .await
        .expect("first sync");

    store.hide_report_keys_once();
    let second = service
        .process_sync(fixture.tenant_id, fixture.technician_id, payload)
        .await
        .expect("second sync");

    assert_eq!(first, second);
    assert_eq!(store.reports().len(), 1);
    assert_eq!(store.answers().len(), 1);
    assert_eq!(store.tickets().len(), 1);
}

#[tokio::test]
async fn test_resubmission_without_key_creates_duplicates() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();

    let payload = inspection(&fixture, &[(fixture.warning_question, json!("NO"))]);
    for _ in 0..2 {
        service
            .process_sync(fixture.tenant_id, fixture.technician_id, payload.clone())
            .await
            .expect("sync");
    }

    assert_eq!(store.reports().len(), 2);
    assert_eq!(store.tickets().len(), 2);
}

#[tokio::test]
async fn test_sync_rejects_invalid_payloads() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();

    let empty = inspection(&fixture, &[]);
    let mut bad_latitude = inspection(&fixture, &[(fixture.info_question, json!("YES"))]);
    bad_latitude.gps_latitude = Some(91.0);
    let mut blank_key = inspection(&fixture, &[(fixture.info_question, json!("YES"))]);
    blank_key.client_report_id = Some("  ".to_string());

    for payload in [empty, bad_latitude, blank_key] {
        let err = service
            .process_sync(fixture.tenant_id, fixture.technician_id, payload)
            .await
            .unwrap_err();
        assert!(matches!(err, MaintenanceError::Validation { .. }), "{:?}", err);
    }
    assert!(store.reports().is_empty());
}

#[tokio::test]
async fn test_sync_for_foreign_asset_is_not_found() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();
    let other = store.seed_ready_tenant();

    let payload = inspection(&other, &[(other.critical_question, json!("NO"))]);
    let err = service
        .process_sync(fixture.tenant_id, fixture.technician_id, payload)
        .await
        .unwrap_err();

    assert!(matches!(err, MaintenanceError::NotFound { .. }));
    assert!(store.reports().is_empty());
    assert_eq!(
        store.asset(other.asset_id).unwrap().operational_status,
        OperationalStatus::Operational
    );
}

#[tokio::test]
async fn test_foreign_template_severities_are_ignored() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();
    let other = store.seed_ready_tenant();

    let mut payload = inspection(&fixture, &[(other.critical_question, json!("NO"))]);
    payload.template_id = other.template_id;

    let receipt = service
        .process_sync(fixture.tenant_id, fixture.technician_id, payload)
        .await
        .expect("sync");

    let reports = store.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].id, receipt.report_id);
    assert!(!reports[0].has_critical_failure);
    assert!(store.tickets().is_empty());
    assert_eq!(
        store.asset(fixture.asset_id).unwrap().operational_status,
        OperationalStatus::Operational
    );
}

#[tokio::test]
async fn test_failed_record_rolls_back_everything() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();
    store.fail_inspection_records();

    let payload = inspection(&fixture, &[(fixture.critical_question, json!("NO"))]);
    let err = service
        .process_sync(fixture.tenant_id, fixture.technician_id, payload)
        .await
        .unwrap_err();

    assert!(matches!(err, MaintenanceError::Transaction { .. }));
    assert!(store.reports().is_empty());
    assert!(store.answers().is_empty());
    assert!(store.tickets().is_empty());
    assert_eq!(
        store.asset(fixture.asset_id).unwrap().operational_status,
        OperationalStatus::Operational
    );
}
