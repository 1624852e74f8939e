//! Servicio de liquidaciones
//!
//! Compone la calculadora y el libro: lee los viajes elegibles, calcula y,
//! si hay algo que pagar, registra la liquidación en una sola transacción.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::settlement_calculator::{calculate_settlement, SettlementCalculation};
use crate::models::{Driver, EligibleTrip, SettlementFilters, SettlementRecord, SettlementType};
use crate::repositories::{CreatedSettlement, NewSettlement, SettlementLedger};
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Resultado de `process_settlement`
#[derive(Debug, Clone, PartialEq)]
pub enum SettlementOutcome {
    Settled(CreatedSettlement),
    /// Estado informativo, no un error; no se escribió nada
    NothingToSettle {
        settlement_type: SettlementType,
        trip_count: usize,
    },
}

#[derive(Clone)]
pub struct SettlementService {
    ledger: Arc<dyn SettlementLedger>,
}

impl SettlementService {
    pub fn new(ledger: Arc<dyn SettlementLedger>) -> Self {
        Self { ledger }
    }

    async fn load_driver(&self, driver_id: Uuid) -> AppResult<Driver> {
        self.ledger
            .find_driver(driver_id)
            .await?
            .ok_or_else(|| not_found_error("Driver", &driver_id.to_string()))
    }

    /// Calcular sin escribir nada
    pub async fn preview(
        &self,
        driver_id: Uuid,
        settlement_type: SettlementType,
    ) -> AppResult<SettlementCalculation> {
        let driver = self.load_driver(driver_id).await?;
        let trips = self.ledger.eligible_trips(driver_id, None).await?;
        calculate_settlement(&driver, &trips, settlement_type)
    }

    /// Calcular y registrar la liquidación de un conductor
    pub async fn process_settlement(
        &self,
        driver_id: Uuid,
        settlement_type: SettlementType,
    ) -> AppResult<SettlementOutcome> {
        info!("🧮 Procesando liquidación {} para conductor {}", settlement_type, driver_id);

        let summary = match self.preview(driver_id, settlement_type).await? {
            SettlementCalculation::NothingToSettle { trip_count } => {
                info!(
                    "ℹ️ Nada que liquidar para conductor {} ({} viajes elegibles)",
                    driver_id, trip_count
                );
                return Ok(SettlementOutcome::NothingToSettle {
                    settlement_type,
                    trip_count,
                });
            }
            SettlementCalculation::Ready(summary) => summary,
        };

        info!(
            "📊 Conductor {}: {} viajes, {} líneas, total {}",
            driver_id,
            summary.trip_count,
            summary.line_items.len(),
            summary.total_amount
        );

        match self.ledger.create_settlement(NewSettlement::from(&summary)).await {
            Ok(created) => {
                info!("✅ Liquidación {} creada", created.settlement.id);
                Ok(SettlementOutcome::Settled(created))
            }
            Err(e @ AppError::EligibilityConflict(_)) => {
                warn!("⚠️ Conflicto de elegibilidad para conductor {}: {}", driver_id, e);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn eligible_trips(
        &self,
        driver_id: Uuid,
        up_to: Option<NaiveDate>,
    ) -> AppResult<Vec<EligibleTrip>> {
        self.load_driver(driver_id).await?;
        self.ledger.eligible_trips(driver_id, up_to).await
    }

    pub async fn list_settlements(&self, filters: &SettlementFilters) -> AppResult<Vec<SettlementRecord>> {
        self.ledger.query_settlements(filters).await
    }
}
