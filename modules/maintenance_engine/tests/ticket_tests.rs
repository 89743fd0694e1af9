//! Integration tests for the ticket lifecycle and asset patches

mod common;

use common::{print_test_header, Fixture, MockStore};
use maintenance_engine::contract::*;
use maintenance_engine::domain::Service;

async fn open_ticket(service: &Service, fixture: &Fixture) -> Ticket {
    service
        .create_ticket(
            fixture.tenant_id,
            fixture.admin_id,
            NewTicket {
                asset_id: fixture.asset_id,
                description: "Brake pedal feels soft".to_string(),
                priority: TicketPriority::High,
            },
        )
        .await
        .expect("create ticket")
}

#[tokio::test]
async fn test_ticket_full_lifecycle() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();

    print_test_header(
        "test_ticket_full_lifecycle",
        &["OPEN -> IN_PROGRESS -> RESOLVED with assignee and notes."],
    );

    let ticket = open_ticket(&service, &fixture).await;
    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.created_by, Some(fixture.admin_id));
    assert!(ticket.schedule_id.is_none() && ticket.report_id.is_none());

    let started = service
        .start_ticket(fixture.tenant_id, ticket.id, Some(fixture.technician_id))
        .await
        .expect("start");
    assert_eq!(started.status, TicketStatus::InProgress);
    assert_eq!(started.assigned_to, Some(fixture.technician_id));

    let resolved = service
        .resolve_ticket(fixture.tenant_id, ticket.id, "  Replaced brake fluid  ")
        .await
        .expect("resolve");
    assert_eq!(resolved.status, TicketStatus::Resolved);
    assert_eq!(
        resolved.resolution_notes.as_deref(),
        Some("Replaced brake fluid")
    );
    assert!(resolved.resolved_at.is_some());
}

#[tokio::test]
async fn test_resolve_requires_notes() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();
    let ticket = open_ticket(&service, &fixture).await;

    let err = service
        .resolve_ticket(fixture.tenant_id, ticket.id, "   ")
        .await
        .unwrap_err();

    assert!(matches!(err, MaintenanceError::Validation { .. }));
    let tickets = store.tickets();
    assert_eq!(tickets[0].status, TicketStatus::Open);
}

#[tokio::test]
async fn test_open_ticket_can_be_resolved_directly() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();
    let ticket = open_ticket(&service, &fixture).await;

    let resolved = service
        .resolve_ticket(fixture.tenant_id, ticket.id, "False alarm")
        .await
        .expect("resolve");
    assert_eq!(resolved.status, TicketStatus::Resolved);
}

#[tokio::test]
async fn test_invalid_transitions_conflict() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();
    let ticket = open_ticket(&service, &fixture).await;

    service
        .start_ticket(fixture.tenant_id, ticket.id, None)
        .await
        .expect("start");
    let err = service
        .start_ticket(fixture.tenant_id, ticket.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::Conflict { .. }));

    service
        .resolve_ticket(fixture.tenant_id, ticket.id, "Done")
        .await
        .expect("resolve");

    let err = service
        .resolve_ticket(fixture.tenant_id, ticket.id, "Again")
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::Conflict { .. }));

    let err = service
        .assign_ticket(fixture.tenant_id, ticket.id, fixture.technician_id)
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::Conflict { .. }));
}

#[tokio::test]
async fn test_transition_from_stale_status_conflicts() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();

    print_test_header(
        "test_transition_from_stale_status_conflicts",
        &[
            "A start that read OPEN loses to a resolve committed in between:",
            "the save is rejected and the ticket stays RESOLVED.",
        ],
    );

    let ticket = open_ticket(&service, &fixture).await;
    store.resolve_concurrently(ticket.id);

    let err = service
        .start_ticket(fixture.tenant_id, ticket.id, Some(fixture.technician_id))
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::Conflict { .. }));

    let stored = &store.tickets()[0];
    assert_eq!(stored.status, TicketStatus::Resolved);
    assert!(stored.assigned_to.is_none());
    assert!(stored.resolved_at.is_some());
}

#[tokio::test]
async fn test_assignee_must_be_active_tenant_user() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();
    let other = store.seed_ready_tenant();
    let ticket = open_ticket(&service, &fixture).await;

    let err = service
        .assign_ticket(fixture.tenant_id, ticket.id, other.technician_id)
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::Validation { .. }));

    store.deactivate_user(fixture.technician_id);
    let err = service
        .start_ticket(fixture.tenant_id, ticket.id, Some(fixture.technician_id))
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::Validation { .. }));

    let assigned = service
        .assign_ticket(fixture.tenant_id, ticket.id, fixture.admin_id)
        .await
        .expect("assign");
    assert_eq!(assigned.assigned_to, Some(fixture.admin_id));
    assert_eq!(assigned.status, TicketStatus::Open);
}

#[tokio::test]
async fn test_foreign_ticket_is_not_found() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();
    let other = store.seed_ready_tenant();
    let ticket = open_ticket(&service, &fixture).await;

    let err = service
        .resolve_ticket(other.tenant_id, ticket.id, "Not mine")
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::NotFound { .. }));

    let err = service
        .start_ticket(other.tenant_id, ticket.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::NotFound { .. }));
}

#[tokio::test]
async fn test_create_ticket_validation() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();
    let other = store.seed_ready_tenant();

    let err = service
        .create_ticket(
            fixture.tenant_id,
            fixture.admin_id,
            NewTicket {
                asset_id: fixture.asset_id,
                description: " ".to_string(),
                priority: TicketPriority::Low,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::Validation { .. }));

    let err = service
        .create_ticket(
            fixture.tenant_id,
            fixture.admin_id,
            NewTicket {
                asset_id: other.asset_id,
                description: "Wrong tenant".to_string(),
                priority: TicketPriority::Low,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::NotFound { .. }));
    assert!(store.tickets().is_empty());
}

// ===== Asset patch =====

#[tokio::test]
async fn test_update_asset_patch() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();

    let asset = service
        .update_asset(
            fixture.tenant_id,
            fixture.asset_id,
            AssetPatch {
                operational_status: Some(OperationalStatus::Maintenance),
                current_hours: Some(1420.5),
            },
        )
        .await
        .expect("patch asset");
    assert_eq!(asset.operational_status, OperationalStatus::Maintenance);
    assert_eq!(asset.current_hours, 1420.5);

    // Manual patches may bring an asset back into service
    let asset = service
        .update_asset(
            fixture.tenant_id,
            fixture.asset_id,
            AssetPatch {
                operational_status: Some(OperationalStatus::Operational),
                current_hours: None,
            },
        )
        .await
        .expect("patch asset");
    assert_eq!(asset.operational_status, OperationalStatus::Operational);
    assert_eq!(asset.current_hours, 1420.5);
}

#[tokio::test]
async fn test_update_asset_errors() {
    let store = MockStore::new();
    let service = store.service();
    let fixture = store.seed_ready_tenant();
    let other = store.seed_ready_tenant();

    for patch in [
        AssetPatch::default(),
        AssetPatch {
            current_hours: Some(-1.0),
            ..AssetPatch::default()
        },
        AssetPatch {
            current_hours: Some(f64::NAN),
            ..AssetPatch::default()
        },
    ] {
        let err = service
            .update_asset(fixture.tenant_id, fixture.asset_id, patch)
            .await
            .unwrap_err();
        assert!(matches!(err, MaintenanceError::Validation { .. }));
    }

    let err = service
        .update_asset(
            fixture.tenant_id,
            other.asset_id,
            AssetPatch {
                current_hours: Some(10.0),
                ..AssetPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MaintenanceError::NotFound { .. }));
    assert_eq!(store.asset(other.asset_id).unwrap().current_hours, 1000.0);
}
