//! Modelo de Trip
//!
//! Los viajes los registra un colaborador externo. Un viaje es elegible para
//! liquidación si está `completed` y ningún ítem de liquidación lo referencia.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use super::driver::PaymentPreference;
use super::route::RouteRates;
use rust_decimal::Decimal;

/// Estado del viaje - mapea al ENUM trip_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "trip_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Pending,
    Completed,
    Cancelled,
}

/// Trip principal - mapea a la tabla trips
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub route_id: Uuid,
    pub vehicle_id: Uuid,
    pub trip_date: NaiveDate,
    pub status: TripStatus,
}

/// Viaje elegible con los datos de ruta y conductor necesarios para liquidar
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct EligibleTrip {
    pub trip_id: Uuid,
    pub driver_id: Uuid,
    pub payment_preference: PaymentPreference,
    pub route_id: Uuid,
    pub route_name: String,
    pub trip_date: NaiveDate,
    pub batta_per_trip: Decimal,
    pub salary_per_trip: Decimal,
}

impl EligibleTrip {
    pub fn rates(&self) -> RouteRates {
        RouteRates::new(self.batta_per_trip, self.salary_per_trip)
    }
}
