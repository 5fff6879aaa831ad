use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create films table
        manager
            .create_table(
                Table::create()
                    .table(Films::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Films::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Films::Name).string_len(150).not_null())
                    .col(
                        ColumnDef::new(Films::Description)
                            .string_len(1000)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Films::Date).date().not_null())
                    .col(ColumnDef::new(Films::Rate).integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create actors table
        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Actors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Actors::Name).string().not_null())
                    .col(ColumnDef::new(Actors::Sex).string().not_null())
                    .col(ColumnDef::new(Actors::Birth).date().not_null())
                    .to_owned(),
            )
            .await?;

        // Create film_actors junction table (many-to-many films <-> actors).
        // The composite primary key rejects duplicate pairs at the schema level.
        manager
            .create_table(
                Table::create()
                    .table(FilmActors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FilmActors::FilmId).integer().not_null())
                    .col(ColumnDef::new(FilmActors::ActorId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(FilmActors::FilmId)
                            .col(FilmActors::ActorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_actors_film_id")
                            .from(FilmActors::Table, FilmActors::FilmId)
                            .to(Films::Table, Films::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_actors_actor_id")
                            .from(FilmActors::Table, FilmActors::ActorId)
                            .to(Actors::Table, Actors::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FilmActors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Films::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Actors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Films {
    Table,
    Id,
    Name,
    Description,
    Date,
    Rate,
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    Id,
    Name,
    Sex,
    Birth,
}

#[derive(DeriveIden)]
enum FilmActors {
    Table,
    FilmId,
    ActorId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Username,
    PasswordHash,
    Role,
}
