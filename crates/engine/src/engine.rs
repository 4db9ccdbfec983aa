use crate::config::{DatabaseConfig, ServerConfig};
use crate::dispatch::Dispatcher;
use crate::http::HttpServer;
use axum::Router;
use freight_executor::{Database, DisconnectedDatabase, MySqlDatabase};
use std::io;
use std::sync::Arc;

pub struct Engine {
    config: ServerConfig,
    database: Arc<dyn Database>,
}

impl Engine {
    /// Connects to the configured database and builds the engine around
    /// whatever came out of the attempt. Never fails: an unreachable
    /// database only makes the reports fail per request.
    pub async fn connect(config: ServerConfig) -> Self {
        let database = connect_database(&config.database).await;
        Self::with_database(config, database)
    }

    pub fn with_database(config: ServerConfig, database: Arc<dyn Database>) -> Self {
        Self { config, database }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn router(&self) -> Router {
        Dispatcher::new(self.database.clone()).router()
    }

    pub async fn run(&self) -> io::Result<()> {
        let server = HttpServer::new(self.router(), self.config.http());
        server.start().await
    }
}

/// Makes the single startup connection attempt. There is no reconnect; on
/// failure every query answers with the startup error.
pub async fn connect_database(config: &DatabaseConfig) -> Arc<dyn Database> {
    match MySqlDatabase::connect(config.connect_options()).await {
        Ok(db) => {
            log::info!("connected to MySQL database {}", config.display_target());
            Arc::new(db)
        }
        Err(e) => {
            log::error!(
                "database connection to {} failed: {}",
                config.display_target(),
                e
            );
            Arc::new(DisconnectedDatabase::new(e.to_string()))
        }
    }
}
