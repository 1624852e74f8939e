//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{Context, Result};
use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub currency_symbol: String,
    pub run_migrations: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            log_level: "debug".to_string(),
            currency_symbol: "₹".to_string(),
            run_migrations: true,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración del entorno; las variables ausentes toman el valor por defecto
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let port = match env::var("PORT") {
            Ok(value) => value
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid number, got '{}'", value))?,
            Err(_) => defaults.port,
        };
        let run_migrations = match env::var("RUN_MIGRATIONS") {
            Ok(value) => value
                .trim()
                .parse()
                .with_context(|| format!("RUN_MIGRATIONS must be true or false, got '{}'", value))?,
            Err(_) => defaults.run_migrations,
        };
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| {
            if environment == "production" {
                "info".to_string()
            } else {
                defaults.log_level.clone()
            }
        });

        Ok(Self {
            port,
            host: env::var("HOST").unwrap_or(defaults.host),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_default(),
            log_level,
            currency_symbol: env::var("CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
            run_migrations,
            environment,
        })
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
