//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean al schema PostgreSQL
//! del libro de liquidaciones.

pub mod driver;
pub mod route;
pub mod settlement;
pub mod trip;

pub use driver::{Driver, PaymentPreference};
pub use route::{Route, RouteRates};
pub use settlement::{
    ComponentType, Settlement, SettlementFilters, SettlementItem, SettlementItemDetail,
    SettlementRecord, SettlementType,
};
pub use trip::{EligibleTrip, Trip, TripStatus};
