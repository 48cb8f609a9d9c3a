use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Games::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Games::UserId).string().not_null())
                    // Board cells as JSON text; decoded and validated by the
                    // repository layer
                    .col(ColumnDef::new(Games::Board).text().not_null())
                    .col(
                        ColumnDef::new(Games::GameOver)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Games::Won)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Games::NumMoves)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Games::History).text().not_null())
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create index for the active-games-by-owner query
        manager
            .create_index(
                Index::create()
                    .name("idx_games_user_id_game_over")
                    .table(Games::Table)
                    .col(Games::UserId)
                    .col(Games::GameOver)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
    UserId,
    Board,
    GameOver,
    Won,
    NumMoves,
    History,
    CreatedAt,
    UpdatedAt,
}
