// connexion BD

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;

pub async fn establish_connection() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set in .env file");

    let mut options = ConnectOptions::new(database_url);
    // Les requêtes SQL partent dans les logs en niveau debug seulement
    options.sqlx_logging_level(log::LevelFilter::Debug);

    Database::connect(options).await
}
