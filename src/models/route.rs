//! Modelo de Route
//!
//! Cada ruta define montos fijos por viaje: batta y salario. No dependen de
//! la distancia ni del tiempo.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::validate_non_negative;

/// Route principal - mapea a la tabla routes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub batta_per_trip: Decimal,
    pub salary_per_trip: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Montos fijos por viaje de una ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRates {
    pub batta_per_trip: Decimal,
    pub salary_per_trip: Decimal,
}

impl RouteRates {
    pub fn new(batta_per_trip: Decimal, salary_per_trip: Decimal) -> Self {
        Self {
            batta_per_trip,
            salary_per_trip,
        }
    }

    /// Los montos de ruta nunca pueden ser negativos
    pub fn validate(&self) -> AppResult<()> {
        validate_non_negative(self.batta_per_trip)
            .map_err(|_| validation_error("batta_per_trip", "Batta per trip must not be negative"))?;
        validate_non_negative(self.salary_per_trip)
            .map_err(|_| validation_error("salary_per_trip", "Salary per trip must not be negative"))?;
        Ok(())
    }

    pub fn total(&self) -> Decimal {
        self.batta_per_trip + self.salary_per_trip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rates_total() {
        assert_eq!(RouteRates::new(dec!(100), dec!(50)).total(), dec!(150));
    }

    #[test]
    fn test_negative_rates_rejected() {
        assert!(RouteRates::new(dec!(0), dec!(0)).validate().is_ok());
        assert!(RouteRates::new(dec!(-1), dec!(50)).validate().is_err());
        assert!(RouteRates::new(dec!(10), dec!(-0.5)).validate().is_err());
    }
}
