//! Ticket lifecycle shared by manual creation, schedule firing and triage
//!
//! `OPEN -> IN_PROGRESS -> RESOLVED`. Resolution needs notes; a resolved
//! ticket is closed for good.

use crate::contract::{MaintenanceError, Ticket, TicketPriority, TicketStatus};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Origin of a new ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketSource {
    Manual,
    Schedule(Uuid),
    Inspection(Uuid),
}

impl Ticket {
    /// Single constructor for every creation path
    pub fn open(
        asset_id: Uuid,
        source: TicketSource,
        created_by: Option<Uuid>,
        priority: TicketPriority,
        description: String,
        now: DateTime<Utc>,
    ) -> Self {
        let (report_id, schedule_id) = match source {
            TicketSource::Manual => (None, None),
            TicketSource::Schedule(id) => (None, Some(id)),
            TicketSource::Inspection(id) => (Some(id), None),
        };
        Self {
            id: Uuid::new_v4(),
            asset_id,
            report_id,
            schedule_id,
            created_by,
            assigned_to: None,
            description,
            priority,
            status: TicketStatus::Open,
            resolution_notes: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        }
    }

    pub fn start(
        &mut self,
        assignee: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<(), MaintenanceError> {
        if self.status != TicketStatus::Open {
            return Err(MaintenanceError::conflict(format!(
                "ticket {} cannot be started from status {:?}",
                self.id, self.status
            )));
        }
        self.status = TicketStatus::InProgress;
        if assignee.is_some() {
            self.assigned_to = assignee;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn assign(&mut self, assignee: Uuid, now: DateTime<Utc>) -> Result<(), MaintenanceError> {
        if self.status == TicketStatus::Resolved {
            return Err(MaintenanceError::conflict(format!(
                "ticket {} is resolved and cannot be reassigned",
                self.id
            )));
        }
        self.assigned_to = Some(assignee);
        self.updated_at = now;
        Ok(())
    }

    pub fn resolve(&mut self, notes: &str, now: DateTime<Utc>) -> Result<(), MaintenanceError> {
        let notes = notes.trim();
        if notes.is_empty() {
            return Err(MaintenanceError::validation(
                "resolution notes are required to resolve a ticket",
            ));
        }
        if self.status == TicketStatus::Resolved {
            return Err(MaintenanceError::conflict(format!(
                "ticket {} is already resolved",
                self.id
            )));
        }
        self.status = TicketStatus::Resolved;
        self.resolution_notes = Some(notes.to_string());
        self.resolved_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_ticket() -> Ticket {
        Ticket::open(
            Uuid::new_v4(),
            TicketSource::Manual,
            None,
            TicketPriority::Low,
            "Horn not working".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn sources_link_report_or_schedule() {
        let schedule_id = Uuid::new_v4();
        let t = Ticket::open(
            Uuid::new_v4(),
            TicketSource::Schedule(schedule_id),
            None,
            TicketPriority::Medium,
            "x".to_string(),
            Utc::now(),
        );
        assert_eq!(t.schedule_id, Some(schedule_id));
        assert_eq!(t.report_id, None);
        assert_eq!(t.status, TicketStatus::Open);
    }

    #[test]
    fn full_lifecycle() {
        let mut t = open_ticket();
        let tech = Uuid::new_v4();
        t.start(Some(tech), Utc::now()).unwrap();
        assert_eq!(t.status, TicketStatus::InProgress);
        assert_eq!(t.assigned_to, Some(tech));

        t.resolve("  replaced fuse ", Utc::now()).unwrap();
        assert_eq!(t.status, TicketStatus::Resolved);
        assert_eq!(t.resolution_notes.as_deref(), Some("replaced fuse"));
        assert!(t.resolved_at.is_some());
    }

    #[test]
    fn resolve_requires_notes() {
        let mut t = open_ticket();
        assert!(matches!(
            t.resolve("   ", Utc::now()),
            Err(MaintenanceError::Validation { .. })
        ));
        assert_eq!(t.status, TicketStatus::Open);
    }

    #[test]
    fn closed_tickets_reject_transitions() {
        let mut t = open_ticket();
        t.resolve("done", Utc::now()).unwrap();
        assert!(matches!(t.start(None, Utc::now()), Err(MaintenanceError::Conflict { .. })));
        assert!(matches!(
            t.assign(Uuid::new_v4(), Utc::now()),
            Err(MaintenanceError::Conflict { .. })
        ));
        assert!(matches!(
            t.resolve("again", Utc::now()),
            Err(MaintenanceError::Conflict { .. })
        ));
    }
}
