//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::EnvironmentConfig;
use crate::repositories::SettlementLedger;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn SettlementLedger>,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(ledger: Arc<dyn SettlementLedger>, config: EnvironmentConfig) -> Self {
        Self { ledger, config }
    }
}
