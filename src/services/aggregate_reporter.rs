//! Totales pendientes de la flota para el dashboard
//!
//! Usa el mismo predicado de elegibilidad del libro y la misma regla de
//! atribución de la calculadora. No persiste nada.

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::settlement_calculator::attribute_trip;
use crate::models::EligibleTrip;
use crate::repositories::{FleetCounts, SettlementLedger};
use crate::utils::errors::AppResult;

/// Batta y salario pendientes de liquidar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PendingTotals {
    pub pending_batta: Decimal,
    pub pending_salary: Decimal,
    pub eligible_trips: usize,
}

/// Estadísticas del dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub counts: FleetCounts,
    pub pending: PendingTotals,
}

/// Sumar lo pendiente aplicando la preferencia de cada conductor
pub fn sum_pending(trips: &[EligibleTrip]) -> AppResult<PendingTotals> {
    let mut totals = PendingTotals::default();
    for trip in trips {
        let rates = trip.rates();
        rates.validate()?;
        let attribution = attribute_trip(trip.payment_preference, rates);
        totals.pending_batta += attribution.batta;
        totals.pending_salary += attribution.salary;
        totals.eligible_trips += 1;
    }
    Ok(totals)
}

#[derive(Clone)]
pub struct AggregateReporter {
    ledger: Arc<dyn SettlementLedger>,
}

impl AggregateReporter {
    pub fn new(ledger: Arc<dyn SettlementLedger>) -> Self {
        Self { ledger }
    }

    pub async fn aggregate_pending(&self) -> AppResult<PendingTotals> {
        let trips = self.ledger.all_eligible_trips(None).await?;
        sum_pending(&trips)
    }

    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        let (counts, pending) =
            futures::try_join!(self.ledger.fleet_counts(), self.aggregate_pending())?;

        debug!(
            "📊 Dashboard: {} conductores, {} viajes completados, batta {} / salario {} pendientes",
            counts.total_drivers, counts.completed_trips, pending.pending_batta, pending.pending_salary
        );

        Ok(DashboardStats { counts, pending })
    }
}
