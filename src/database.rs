use std::time::Duration;

use color_eyre::{
    Result,
    eyre::{Context, OptionExt},
};
use migration::MigratorTrait;
use sea_orm::entity::prelude::Date;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database as SeaDatabase, DatabaseConnection, EntityTrait,
    PaginatorTrait, Set,
};

use crate::auth;
use crate::config::{Config, Env};
use crate::entities;
use crate::entities::{actor::Sex, user::Role};

pub struct Database {
    pub conn: DatabaseConnection,
}

impl Database {
    /// Connect to the configured database and bring the schema up to date.
    pub async fn open(config: &Config) -> Result<Self> {
        tracing::debug!(url = %config.database.url, "Opening database");

        let mut opt = ConnectOptions::new(config.database.url.clone());
        opt.max_connections(100)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(8))
            .max_lifetime(Duration::from_secs(8))
            .sqlx_logging(false);

        let conn = SeaDatabase::connect(opt)
            .await
            .context(format!("Failed to open database: {}", config.database.url))?;

        tracing::debug!("Running database migrations");
        migration::Migrator::up(&conn, None)
            .await
            .context("Failed to run database migrations")?;

        if config.env == Env::Test {
            seed_test_data(&conn).await?;
        }

        tracing::info!("Database ready");
        Ok(Database { conn })
    }
}

/// Insert the fixture rows used by the test environment: two known users,
/// two actors and two films. Does nothing if users already exist.
pub async fn seed_test_data(conn: &DatabaseConnection) -> Result<()> {
    let existing = entities::user::Entity::find()
        .count(conn)
        .await
        .context("Failed to count users")?;
    if existing > 0 {
        return Ok(());
    }

    tracing::debug!("Seeding test fixtures");

    let users = [
        ("admin", "admin", Role::Admin),
        ("client", "client", Role::Client),
    ];
    for (username, password, role) in users {
        entities::user::ActiveModel {
            username: Set(username.to_owned()),
            password_hash: Set(auth::hash_password(password)?),
            role: Set(role),
        }
        .insert(conn)
        .await
        .context(format!("Failed to insert user: {username}"))?;
    }

    let fixture_date = Date::from_ymd_opt(2001, 2, 2).ok_or_eyre("Invalid fixture date")?;

    let actors = [("name1", Sex::Female), ("name2", Sex::Male)];
    for (name, sex) in actors {
        entities::actor::ActiveModel {
            name: Set(name.to_owned()),
            sex: Set(sex),
            birth: Set(fixture_date),
            ..Default::default()
        }
        .insert(conn)
        .await
        .context(format!("Failed to insert actor: {name}"))?;
    }

    let films = [("Film1", "Desk film1", 5), ("Film2", "Desk film2", 7)];
    for (name, description, rate) in films {
        entities::film::ActiveModel {
            name: Set(name.to_owned()),
            description: Set(description.to_owned()),
            date: Set(fixture_date),
            rate: Set(rate),
            ..Default::default()
        }
        .insert(conn)
        .await
        .context(format!("Failed to insert film: {name}"))?;
    }

    Ok(())
}
