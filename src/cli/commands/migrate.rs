use serde::Serialize;
use std::fmt;

use crate::config::AppConfig;
use crate::database::Database;

#[derive(Debug, Serialize)]
pub struct MigrateReport {
    pub database: String,
    pub status: &'static str,
}

impl fmt::Display for MigrateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Migrations applied to {}", self.database)
    }
}

pub async fn handle(db: &Database, config: &AppConfig) -> anyhow::Result<MigrateReport> {
    db.migrate().await?;

    Ok(MigrateReport {
        database: config.database.url.clone(),
        status: "ok",
    })
}
