use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== STATIONS ==========
        manager
            .create_table(
                Table::create()
                    .table(Stations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stations::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Stations::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Stations::VolumePercentage)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Stations::CollectionRequested)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Stations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(
                        ColumnDef::new(Stations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT NOW()"),
                    )
                    .to_owned(),
            )
            .await?;

        // Case-insensitive unique index on station name
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX stations_name_lower_idx ON stations (LOWER(name))",
            )
            .await?;

        // ========== STATION_HISTORY ==========
        // Append-only operation log; rows are never updated or deleted
        // individually and die with their station via the FK cascade.
        manager
            .create_table(
                Table::create()
                    .table(StationHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StationHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(StationHistory::StationId).uuid().not_null())
                    .col(
                        ColumnDef::new(StationHistory::OperationType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StationHistory::VolumePercentage)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StationHistory::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(ColumnDef::new(StationHistory::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_station_history_station")
                            .from(StationHistory::Table, StationHistory::StationId)
                            .to(Stations::Table, Stations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for per-station listing, newest first
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX idx_station_history_station_time ON station_history (station_id, timestamp DESC)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order of dependencies
        manager
            .drop_table(
                Table::drop()
                    .table(StationHistory::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Stations::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Stations {
    Table,
    Id,
    Name,
    VolumePercentage,
    CollectionRequested,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum StationHistory {
    Table,
    Id,
    StationId,
    OperationType,
    VolumePercentage,
    Timestamp,
    Notes,
}
