//! Database migrations for the maintenance engine

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_reference_tables::Migration),
            Box::new(m20250301_000002_create_workflow_tables::Migration),
        ]
    }
}

/// Tables owned by the CRUD modules, reduced to the columns the engine reads
mod m20250301_000001_create_reference_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_reference_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Tenants::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Tenants::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Tenants::Name).string().not_null())
                        .col(
                            ColumnDef::new(Tenants::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Tenants::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Users::TenantId).uuid().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(
                            ColumnDef::new(Users::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .to_owned(),
                )
                .await?;

            for (table, named) in [
                (TenantScoped::Locations, true),
                (TenantScoped::ServiceContracts, false),
                (TenantScoped::SlaDefinitions, false),
                (TenantScoped::ChecklistTemplates, true),
            ] {
                let mut create = Table::create();
                create
                    .table(table)
                    .if_not_exists()
                    .col(ColumnDef::new(TenantScoped::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TenantScoped::TenantId).uuid().not_null());
                if named {
                    create.col(ColumnDef::new(TenantScoped::Name).string().not_null());
                }
                manager.create_table(create.to_owned()).await?;
            }

            manager
                .create_table(
                    Table::create()
                        .table(Forklifts::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Forklifts::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Forklifts::TenantId).uuid().not_null())
                        .col(ColumnDef::new(Forklifts::LocationId).uuid())
                        .col(ColumnDef::new(Forklifts::Name).string().not_null())
                        .col(ColumnDef::new(Forklifts::SerialNumber).string())
                        .col(
                            ColumnDef::new(Forklifts::OperationalStatus)
                                .string()
                                .not_null()
                                .default("OPERATIONAL"),
                        )
                        .col(
                            ColumnDef::new(Forklifts::CurrentHours)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Forklifts::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ChecklistQuestions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ChecklistQuestions::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ChecklistQuestions::TemplateId).uuid().not_null())
                        .col(ColumnDef::new(ChecklistQuestions::Text).string().not_null())
                        .col(
                            ColumnDef::new(ChecklistQuestions::Severity)
                                .string()
                                .not_null()
                                .default("INFO"),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_checklist_questions_template")
                                .from(ChecklistQuestions::Table, ChecklistQuestions::TemplateId)
                                .to(TenantScoped::ChecklistTemplates, TenantScoped::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_users_tenant")
                        .table(Users::Table)
                        .col(Users::TenantId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_forklifts_tenant")
                        .table(Forklifts::Table)
                        .col(Forklifts::TenantId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ChecklistQuestions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Forklifts::Table).to_owned())
                .await?;
            for table in [
                TenantScoped::ChecklistTemplates,
                TenantScoped::SlaDefinitions,
                TenantScoped::ServiceContracts,
                TenantScoped::Locations,
            ] {
                manager
                    .drop_table(Table::drop().table(table).to_owned())
                    .await?;
            }
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Tenants::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Tenants {
        Table,
        Id,
        Name,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        TenantId,
        Email,
        Role,
        IsActive,
    }

    /// Shared column names of the count-only tables
    #[derive(DeriveIden, Clone, Copy)]
    pub(super) enum TenantScoped {
        Locations,
        ServiceContracts,
        SlaDefinitions,
        ChecklistTemplates,
        Id,
        TenantId,
        Name,
    }

    #[derive(DeriveIden)]
    pub(super) enum Forklifts {
        Table,
        Id,
        TenantId,
        LocationId,
        Name,
        SerialNumber,
        OperationalStatus,
        CurrentHours,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ChecklistQuestions {
        Table,
        Id,
        TemplateId,
        Text,
        Severity,
    }
}

/// Schedules, inspection reports and tickets written by the engine
mod m20250301_000002_create_workflow_tables {
    use super::m20250301_000001_create_reference_tables::Forklifts;
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_workflow_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PreventiveSchedules::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PreventiveSchedules::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PreventiveSchedules::TenantId).uuid().not_null())
                        .col(ColumnDef::new(PreventiveSchedules::AssetId).uuid())
                        .col(ColumnDef::new(PreventiveSchedules::TaskName).string().not_null())
                        .col(ColumnDef::new(PreventiveSchedules::Description).text())
                        .col(
                            ColumnDef::new(PreventiveSchedules::FrequencyType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PreventiveSchedules::FrequencyValue)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PreventiveSchedules::NextDueAt)
                                .timestamp_with_time_zone(),
                        )
                        .col(ColumnDef::new(PreventiveSchedules::NextDueHours).double())
                        .col(
                            ColumnDef::new(PreventiveSchedules::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(PreventiveSchedules::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(PreventiveSchedules::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_preventive_schedules_asset")
                                .from(PreventiveSchedules::Table, PreventiveSchedules::AssetId)
                                .to(Forklifts::Table, Forklifts::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_preventive_schedules_due")
                        .table(PreventiveSchedules::Table)
                        .col(PreventiveSchedules::IsActive)
                        .col(PreventiveSchedules::NextDueAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InspectionReports::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InspectionReports::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(InspectionReports::TenantId).uuid().not_null())
                        .col(ColumnDef::new(InspectionReports::AssetId).uuid().not_null())
                        .col(ColumnDef::new(InspectionReports::TemplateId).uuid().not_null())
                        .col(ColumnDef::new(InspectionReports::InspectorId).uuid().not_null())
                        .col(ColumnDef::new(InspectionReports::ClientReportId).string_len(128))
                        .col(
                            ColumnDef::new(InspectionReports::CapturedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InspectionReports::SyncedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InspectionReports::GpsLatitude).double())
                        .col(ColumnDef::new(InspectionReports::GpsLongitude).double())
                        .col(
                            ColumnDef::new(InspectionReports::HasCriticalFailure)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inspection_reports_asset")
                                .from(InspectionReports::Table, InspectionReports::AssetId)
                                .to(Forklifts::Table, Forklifts::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            // NULL keys never collide, so keyless syncs stay unrestricted
            manager
                .create_index(
                    Index::create()
                        .name("uq_inspection_reports_client_key")
                        .table(InspectionReports::Table)
                        .col(InspectionReports::TenantId)
                        .col(InspectionReports::ClientReportId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InspectionAnswers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(InspectionAnswers::ReportId).uuid().not_null())
                        .col(ColumnDef::new(InspectionAnswers::QuestionId).uuid().not_null())
                        .col(ColumnDef::new(InspectionAnswers::RawValue).json().not_null())
                        .col(
                            ColumnDef::new(InspectionAnswers::NormalizedValue)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InspectionAnswers::IsFailure)
                                .boolean()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(InspectionAnswers::ReportId)
                                .col(InspectionAnswers::QuestionId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inspection_answers_report")
                                .from(InspectionAnswers::Table, InspectionAnswers::ReportId)
                                .to(InspectionReports::Table, InspectionReports::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MaintenanceTickets::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaintenanceTickets::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(MaintenanceTickets::AssetId).uuid().not_null())
                        .col(ColumnDef::new(MaintenanceTickets::ReportId).uuid())
                        .col(ColumnDef::new(MaintenanceTickets::ScheduleId).uuid())
                        .col(ColumnDef::new(MaintenanceTickets::CreatedBy).uuid())
                        .col(ColumnDef::new(MaintenanceTickets::AssignedTo).uuid())
                        .col(ColumnDef::new(MaintenanceTickets::Description).text().not_null())
                        .col(ColumnDef::new(MaintenanceTickets::Priority).string().not_null())
                        .col(ColumnDef::new(MaintenanceTickets::Status).string().not_null())
                        .col(ColumnDef::new(MaintenanceTickets::ResolutionNotes).text())
                        .col(
                            ColumnDef::new(MaintenanceTickets::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(MaintenanceTickets::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(MaintenanceTickets::ResolvedAt)
                                .timestamp_with_time_zone(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_maintenance_tickets_asset")
                                .from(MaintenanceTickets::Table, MaintenanceTickets::AssetId)
                                .to(Forklifts::Table, Forklifts::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            for (name, col) in [
                ("idx_maintenance_tickets_asset", MaintenanceTickets::AssetId),
                ("idx_maintenance_tickets_schedule", MaintenanceTickets::ScheduleId),
            ] {
                manager
                    .create_index(
                        Index::create()
                            .name(name)
                            .table(MaintenanceTickets::Table)
                            .col(col)
                            .to_owned(),
                    )
                    .await?;
            }

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MaintenanceTickets::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(InspectionAnswers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(InspectionReports::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PreventiveSchedules::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PreventiveSchedules {
        Table,
        Id,
        TenantId,
        AssetId,
        TaskName,
        Description,
        FrequencyType,
        FrequencyValue,
        NextDueAt,
        NextDueHours,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum InspectionReports {
        Table,
        Id,
        TenantId,
        AssetId,
        TemplateId,
        InspectorId,
        ClientReportId,
        CapturedAt,
        SyncedAt,
        GpsLatitude,
        GpsLongitude,
        HasCriticalFailure,
    }

    #[derive(DeriveIden)]
    enum InspectionAnswers {
        Table,
        ReportId,
        QuestionId,
        RawValue,
        NormalizedValue,
        IsFailure,
    }

    #[derive(DeriveIden)]
    enum MaintenanceTickets {
        Table,
        Id,
        AssetId,
        ReportId,
        ScheduleId,
        CreatedBy,
        AssignedTo,
        Description,
        Priority,
        Status,
        ResolutionNotes,
        CreatedAt,
        UpdatedAt,
        ResolvedAt,
    }
}
