//! Repositorios
//!
//! El libro de liquidaciones (`SettlementLedger`) es el único dueño de la
//! regla "un viaje incluido en un ítem nunca vuelve a ser elegible".

pub mod settlement_repository;

#[cfg(test)]
pub mod memory_ledger;

pub use settlement_repository::PgSettlementRepository;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{
    ComponentType, Driver, EligibleTrip, Settlement, SettlementFilters, SettlementItem,
    SettlementRecord, SettlementType,
};
use crate::services::settlement_calculator::SettlementSummary;
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::{validate_non_negative, validate_positive};

/// Ítem a insertar junto con la liquidación
#[derive(Debug, Clone, PartialEq)]
pub struct NewSettlementItem {
    pub trip_id: Uuid,
    pub amount: Decimal,
    pub component_type: ComponentType,
}

/// Liquidación a insertar (salida de la calculadora)
#[derive(Debug, Clone, PartialEq)]
pub struct NewSettlement {
    pub driver_id: Uuid,
    pub settlement_type: SettlementType,
    pub total_amount: Decimal,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub notes: Option<String>,
    pub items: Vec<NewSettlementItem>,
}

impl From<&SettlementSummary> for NewSettlement {
    fn from(summary: &SettlementSummary) -> Self {
        Self {
            driver_id: summary.driver_id,
            settlement_type: summary.settlement_type,
            total_amount: summary.total_amount,
            period_start: summary.period_start,
            period_end: summary.period_end,
            notes: Some(summary.notes()),
            items: summary
                .line_items
                .iter()
                .map(|line| NewSettlementItem {
                    trip_id: line.trip_id,
                    amount: line.amount,
                    component_type: line.component_type,
                })
                .collect(),
        }
    }
}

impl NewSettlement {
    pub fn trip_ids(&self) -> Vec<Uuid> {
        self.items.iter().map(|item| item.trip_id).collect()
    }

    /// Precondiciones del libro, comunes a todas las implementaciones
    pub fn validate(&self) -> AppResult<()> {
        validate_positive(self.total_amount)
            .map_err(|_| validation_error("total_amount", "Settlement total must be greater than zero"))?;

        if self.items.is_empty() {
            return Err(validation_error("items", "Settlement must contain at least one item"));
        }

        if self.period_start > self.period_end {
            return Err(validation_error("period_start", "Period start must not be after period end"));
        }

        let expected_component = self.settlement_type.component();
        let mut seen = HashSet::with_capacity(self.items.len());
        let mut sum = Decimal::ZERO;

        for item in &self.items {
            validate_non_negative(item.amount)
                .map_err(|_| validation_error("amount", "Item amount must not be negative"))?;
            if item.component_type != expected_component {
                return Err(validation_error(
                    "component_type",
                    "Item component does not match the settlement type",
                ));
            }
            if !seen.insert(item.trip_id) {
                return Err(validation_error("trip_id", "A trip can only appear once in a settlement"));
            }
            sum += item.amount;
        }

        if sum != self.total_amount {
            return Err(validation_error("total_amount", "Settlement total must equal the sum of its items"));
        }

        Ok(())
    }
}

/// Liquidación registrada con sus ítems
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreatedSettlement {
    pub settlement: Settlement,
    pub items: Vec<SettlementItem>,
}

/// Conteos globales de la flota para el dashboard
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct FleetCounts {
    pub total_drivers: i64,
    pub completed_trips: i64,
}

/// Contrato del libro de liquidaciones
#[async_trait]
pub trait SettlementLedger: Send + Sync {
    /// Datos maestros del conductor (solo lectura)
    async fn find_driver(&self, driver_id: Uuid) -> AppResult<Option<Driver>>;

    /// Viajes completados del conductor sin ítem de liquidación
    async fn eligible_trips(
        &self,
        driver_id: Uuid,
        up_to: Option<NaiveDate>,
    ) -> AppResult<Vec<EligibleTrip>>;

    /// Viajes elegibles de todos los conductores
    async fn all_eligible_trips(&self, up_to: Option<NaiveDate>) -> AppResult<Vec<EligibleTrip>>;

    /// Registrar la liquidación y sus ítems como una unidad atómica.
    ///
    /// Vuelve a comprobar la elegibilidad dentro de la transacción; si algún
    /// viaje ya fue liquidado, falla con `EligibilityConflict` sin efecto.
    async fn create_settlement(&self, new_settlement: NewSettlement) -> AppResult<CreatedSettlement>;

    /// Historial ordenado por `settled_at` descendente
    async fn query_settlements(&self, filters: &SettlementFilters) -> AppResult<Vec<SettlementRecord>>;

    async fn fleet_counts(&self) -> AppResult<FleetCounts>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_settlement(items: Vec<NewSettlementItem>, total: Decimal) -> NewSettlement {
        NewSettlement {
            driver_id: Uuid::new_v4(),
            settlement_type: SettlementType::Weekly,
            total_amount: total,
            period_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            notes: None,
            items,
        }
    }

    fn batta(amount: Decimal) -> NewSettlementItem {
        NewSettlementItem {
            trip_id: Uuid::new_v4(),
            amount,
            component_type: ComponentType::Batta,
        }
    }

    #[test]
    fn test_valid_settlement_passes() {
        let s = new_settlement(vec![batta(dec!(100)), batta(dec!(50))], dec!(150));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_zero_total_rejected() {
        let s = new_settlement(vec![batta(dec!(0))], dec!(0));
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_total_mismatch_rejected() {
        let s = new_settlement(vec![batta(dec!(100))], dec!(100.01));
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_duplicate_trip_rejected() {
        let item = batta(dec!(10));
        let s = new_settlement(vec![item.clone(), item], dec!(20));
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_wrong_component_rejected() {
        let mut item = batta(dec!(10));
        item.component_type = ComponentType::Salary;
        let s = new_settlement(vec![item], dec!(10));
        assert!(s.validate().is_err());
    }
}
