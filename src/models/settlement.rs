//! Modelos de Settlement y SettlementItem
//!
//! Una liquidación se crea junto con sus ítems en una sola transacción y no
//! se modifica nunca después. La existencia de un ítem para un viaje es lo
//! único que lo vuelve no elegible.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::driver::PaymentPreference;

/// Tipo de liquidación - mapea al ENUM settlement_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "settlement_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SettlementType {
    /// Semanal: paga batta
    Weekly,
    /// Mensual: paga salario
    Monthly,
}

impl SettlementType {
    pub const ALL: [&'static str; 2] = ["weekly", "monthly"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementType::Weekly => "weekly",
            SettlementType::Monthly => "monthly",
        }
    }

    /// Componente que emite este tipo de liquidación
    pub fn component(&self) -> ComponentType {
        match self {
            SettlementType::Weekly => ComponentType::Batta,
            SettlementType::Monthly => ComponentType::Salary,
        }
    }
}

impl fmt::Display for SettlementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettlementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "weekly" => Ok(SettlementType::Weekly),
            "monthly" => Ok(SettlementType::Monthly),
            other => Err(format!("unknown settlement type '{}'", other)),
        }
    }
}

/// Componente del pago - mapea al ENUM component_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "component_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Batta,
    Salary,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Batta => "batta",
            ComponentType::Salary => "salary",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement principal - mapea a la tabla settlements
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Settlement {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub settlement_type: SettlementType,
    pub total_amount: Decimal,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub settled_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// SettlementItem - mapea a la tabla settlement_items
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct SettlementItem {
    pub id: Uuid,
    pub settlement_id: Uuid,
    pub trip_id: Uuid,
    pub amount: Decimal,
    pub component_type: ComponentType,
}

/// Ítem con los datos del viaje para el historial
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct SettlementItemDetail {
    pub id: Uuid,
    pub settlement_id: Uuid,
    pub trip_id: Uuid,
    pub amount: Decimal,
    pub component_type: ComponentType,
    pub trip_date: NaiveDate,
    pub route_name: String,
}

/// Liquidación con su conductor y sus ítems
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SettlementRecord {
    pub settlement: Settlement,
    pub driver_name: String,
    pub payment_preference: PaymentPreference,
    pub items: Vec<SettlementItemDetail>,
}

/// Filtros del historial de liquidaciones
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettlementFilters {
    pub driver_id: Option<Uuid>,
    pub settlement_type: Option<SettlementType>,
}
