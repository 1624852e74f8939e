use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    ComponentType, EligibleTrip, SettlementFilters, SettlementItem, SettlementItemDetail,
    SettlementRecord, SettlementType,
};
use crate::repositories::CreatedSettlement;
use crate::services::{SettlementLine, SettlementSummary};
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::money::serialize_amount;
use crate::utils::validation::{validate_date, validate_enum, validate_not_empty, validate_uuid};

// Request para previsualizar o procesar una liquidación
#[derive(Debug, Deserialize, Validate)]
pub struct ProcessSettlementRequest {
    #[validate(required)]
    pub driver_id: Option<String>,

    #[validate(required)]
    pub settlement_type: Option<String>,
}

impl ProcessSettlementRequest {
    /// Validar y convertir a tipos de dominio
    pub fn parse(&self) -> AppResult<(Uuid, SettlementType)> {
        self.validate()?;

        let driver_id = self.driver_id.as_deref().unwrap_or_default();
        validate_not_empty(driver_id)
            .map_err(|_| validation_error("driver_id", "A driver must be selected"))?;
        let driver_id = validate_uuid(driver_id.trim())
            .map_err(|_| validation_error("driver_id", "Driver id is not a valid UUID"))?;

        let settlement_type = parse_settlement_type(self.settlement_type.as_deref().unwrap_or_default())?;

        Ok((driver_id, settlement_type))
    }
}

fn parse_settlement_type(value: &str) -> AppResult<SettlementType> {
    let value = value.trim();
    validate_enum(value, &SettlementType::ALL)
        .map_err(|_| validation_error("settlement_type", "Settlement type must be weekly or monthly"))?;
    value
        .parse()
        .map_err(|_| validation_error("settlement_type", "Settlement type must be weekly or monthly"))
}

// Query del historial; string vacío = sin filtro
#[derive(Debug, Default, Deserialize)]
pub struct SettlementHistoryQuery {
    pub driver_id: Option<String>,
    pub settlement_type: Option<String>,
}

impl SettlementHistoryQuery {
    pub fn into_filters(self) -> AppResult<SettlementFilters> {
        let driver_id = match non_empty(self.driver_id) {
            Some(id) => Some(
                validate_uuid(&id)
                    .map_err(|_| validation_error("driver_id", "Driver id is not a valid UUID"))?,
            ),
            None => None,
        };

        let settlement_type = match non_empty(self.settlement_type) {
            Some(value) => Some(parse_settlement_type(&value)?),
            None => None,
        };

        Ok(SettlementFilters {
            driver_id,
            settlement_type,
        })
    }
}

// Query de viajes elegibles
#[derive(Debug, Default, Deserialize)]
pub struct EligibleTripsQuery {
    pub up_to: Option<String>,
}

impl EligibleTripsQuery {
    pub fn up_to_date(&self) -> AppResult<Option<NaiveDate>> {
        match non_empty(self.up_to.clone()) {
            Some(value) => validate_date(&value)
                .map(Some)
                .map_err(|_| validation_error("up_to", "Date must use the YYYY-MM-DD format")),
            None => Ok(None),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Línea de detalle de la previsualización
#[derive(Debug, Serialize)]
pub struct TripDetailResponse {
    pub trip_id: Uuid,
    pub route: String,
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_amount")]
    pub amount: Decimal,
    pub component: ComponentType,
}

impl From<&SettlementLine> for TripDetailResponse {
    fn from(line: &SettlementLine) -> Self {
        Self {
            trip_id: line.trip_id,
            route: line.route_name.clone(),
            date: line.trip_date,
            amount: line.amount,
            component: line.component_type,
        }
    }
}

// Previsualización de una liquidación
#[derive(Debug, Serialize)]
pub struct SettlementPreviewResponse {
    pub driver_id: Uuid,
    pub driver: String,
    pub driver_preference: String,
    pub settlement_type: SettlementType,
    #[serde(serialize_with = "serialize_amount")]
    pub total_amount: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub batta_amount: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub salary_amount: Decimal,
    pub trip_count: usize,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub trip_details: Vec<TripDetailResponse>,
}

impl From<&SettlementSummary> for SettlementPreviewResponse {
    fn from(summary: &SettlementSummary) -> Self {
        Self {
            driver_id: summary.driver_id,
            driver: summary.driver_name.clone(),
            driver_preference: summary.payment_preference.label(),
            settlement_type: summary.settlement_type,
            total_amount: summary.total_amount,
            batta_amount: summary.batta_amount,
            salary_amount: summary.salary_amount,
            trip_count: summary.trip_count,
            period_start: summary.period_start,
            period_end: summary.period_end,
            trip_details: summary.line_items.iter().map(TripDetailResponse::from).collect(),
        }
    }
}

// Ítem de una liquidación registrada
#[derive(Debug, Serialize)]
pub struct SettlementItemResponse {
    pub id: Uuid,
    pub trip_id: Uuid,
    #[serde(serialize_with = "serialize_amount")]
    pub amount: Decimal,
    pub component_type: ComponentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,
}

impl From<&SettlementItem> for SettlementItemResponse {
    fn from(item: &SettlementItem) -> Self {
        Self {
            id: item.id,
            trip_id: item.trip_id,
            amount: item.amount,
            component_type: item.component_type,
            trip_date: None,
            route_name: None,
        }
    }
}

impl From<SettlementItemDetail> for SettlementItemResponse {
    fn from(item: SettlementItemDetail) -> Self {
        Self {
            id: item.id,
            trip_id: item.trip_id,
            amount: item.amount,
            component_type: item.component_type,
            trip_date: Some(item.trip_date),
            route_name: Some(item.route_name),
        }
    }
}

// Response de liquidación
#[derive(Debug, Serialize)]
pub struct SettlementResponse {
    pub id: Uuid,
    pub driver_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_preference: Option<String>,
    pub settlement_type: SettlementType,
    #[serde(serialize_with = "serialize_amount")]
    pub total_amount: Decimal,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub settled_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub items: Vec<SettlementItemResponse>,
}

impl From<&CreatedSettlement> for SettlementResponse {
    fn from(created: &CreatedSettlement) -> Self {
        let s = &created.settlement;
        Self {
            id: s.id,
            driver_id: s.driver_id,
            driver_name: None,
            payment_preference: None,
            settlement_type: s.settlement_type,
            total_amount: s.total_amount,
            period_start: s.period_start,
            period_end: s.period_end,
            settled_at: s.settled_at,
            notes: s.notes.clone(),
            items: created.items.iter().map(SettlementItemResponse::from).collect(),
        }
    }
}

impl From<SettlementRecord> for SettlementResponse {
    fn from(record: SettlementRecord) -> Self {
        let s = record.settlement;
        Self {
            id: s.id,
            driver_id: s.driver_id,
            driver_name: Some(record.driver_name),
            payment_preference: Some(record.payment_preference.to_string()),
            settlement_type: s.settlement_type,
            total_amount: s.total_amount,
            period_start: s.period_start,
            period_end: s.period_end,
            settled_at: s.settled_at,
            notes: s.notes,
            items: record.items.into_iter().map(SettlementItemResponse::from).collect(),
        }
    }
}

// Viaje pendiente de liquidar
#[derive(Debug, Serialize)]
pub struct EligibleTripResponse {
    pub trip_id: Uuid,
    pub route_id: Uuid,
    pub route_name: String,
    pub trip_date: NaiveDate,
    #[serde(serialize_with = "serialize_amount")]
    pub batta_per_trip: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub salary_per_trip: Decimal,
}

impl From<EligibleTrip> for EligibleTripResponse {
    fn from(trip: EligibleTrip) -> Self {
        Self {
            trip_id: trip.trip_id,
            route_id: trip.route_id,
            route_name: trip.route_name,
            trip_date: trip.trip_date,
            batta_per_trip: trip.batta_per_trip,
            salary_per_trip: trip.salary_per_trip,
        }
    }
}
