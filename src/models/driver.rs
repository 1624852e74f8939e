//! Modelo de Driver
//!
//! Mapea a la tabla `drivers`. El maestro de conductores lo mantiene un
//! colaborador externo; aquí solo se lee.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Preferencia de pago del conductor - mapea al ENUM payment_preference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "payment_preference", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentPreference {
    /// Todo el monto del viaje se paga como batta
    BattaOnly,
    /// Todo el monto del viaje se paga como salario
    SalaryOnly,
    /// Batta y salario según la definición de la ruta
    Both,
}

impl PaymentPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentPreference::BattaOnly => "batta_only",
            PaymentPreference::SalaryOnly => "salary_only",
            PaymentPreference::Both => "both",
        }
    }

    /// Etiqueta legible, p. ej. "batta only"
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for PaymentPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Driver principal - mapea a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub payment_preference: PaymentPreference,
    pub created_at: DateTime<Utc>,
}
