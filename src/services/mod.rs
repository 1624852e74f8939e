//! Services module
//!
//! Este módulo contiene la lógica de negocio: la calculadora de
//! liquidaciones, el flujo de registro y los agregados del dashboard.

pub mod aggregate_reporter;
pub mod settlement_calculator;
pub mod settlement_service;

pub use aggregate_reporter::{AggregateReporter, DashboardStats, PendingTotals};
pub use settlement_calculator::{
    attribute_trip, calculate_settlement, SettlementCalculation, SettlementLine, SettlementSummary,
    TripAttribution,
};
pub use settlement_service::{SettlementOutcome, SettlementService};
