//! Configuración de conexión a PostgreSQL
//!
//! Este módulo crea el pool y aplica las migraciones del libro de liquidaciones.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Conexión a la base de datos
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Crear el pool a partir de la configuración
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("🔗 Conectando a PostgreSQL: {}", mask_database_url(&config.url));

        let pool = config
            .create_pool()
            .await
            .context("Error conectando a la base de datos")?;

        info!("✅ PostgreSQL conectado exitosamente");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Ejecutar migraciones de la base de datos
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Error ejecutando migraciones")?;
        info!("📦 Migraciones aplicadas");
        Ok(())
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if url[..at_pos].rfind(':').is_some() {
            let protocol_end = url.find("://").map(|pos| pos + 3).unwrap_or(0);
            let protocol = &url[..protocol_end];
            let host = &url[at_pos + 1..];
            format!("{}***:***@{}", protocol, host)
        } else {
            url.to_string()
        }
    } else {
        url.to_string()
    }
}
