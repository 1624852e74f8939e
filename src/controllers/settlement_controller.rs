use std::sync::Arc;

use crate::dto::settlement_dto::{
    EligibleTripResponse, EligibleTripsQuery, ProcessSettlementRequest, SettlementHistoryQuery,
    SettlementPreviewResponse, SettlementResponse,
};
use crate::dto::ApiResponse;
use crate::models::SettlementType;
use crate::repositories::SettlementLedger;
use crate::services::{SettlementCalculation, SettlementOutcome, SettlementService};
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::money::format_amount;
use crate::utils::validation::validate_uuid;

pub struct SettlementController {
    service: SettlementService,
    currency_symbol: String,
}

fn nothing_to_settle_message(settlement_type: SettlementType) -> String {
    format!("No pending {} payments for this driver.", settlement_type)
}

impl SettlementController {
    pub fn new(ledger: Arc<dyn SettlementLedger>, currency_symbol: &str) -> Self {
        Self {
            service: SettlementService::new(ledger),
            currency_symbol: currency_symbol.to_string(),
        }
    }

    pub async fn preview(
        &self,
        request: ProcessSettlementRequest,
    ) -> AppResult<ApiResponse<SettlementPreviewResponse>> {
        let (driver_id, settlement_type) = request.parse()?;

        match self.service.preview(driver_id, settlement_type).await? {
            SettlementCalculation::Ready(summary) => {
                Ok(ApiResponse::success(SettlementPreviewResponse::from(&summary)))
            }
            SettlementCalculation::NothingToSettle { .. } => {
                Ok(ApiResponse::info(nothing_to_settle_message(settlement_type)))
            }
        }
    }

    pub async fn process(
        &self,
        request: ProcessSettlementRequest,
    ) -> AppResult<ApiResponse<SettlementResponse>> {
        let (driver_id, settlement_type) = request.parse()?;

        match self.service.process_settlement(driver_id, settlement_type).await? {
            SettlementOutcome::Settled(created) => {
                let message = format!(
                    "Settlement processed successfully! Amount: {}{}",
                    self.currency_symbol,
                    format_amount(created.settlement.total_amount)
                );
                Ok(ApiResponse::success_with_message(
                    SettlementResponse::from(&created),
                    message,
                ))
            }
            SettlementOutcome::NothingToSettle { settlement_type, .. } => {
                Ok(ApiResponse::info(nothing_to_settle_message(settlement_type)))
            }
        }
    }

    pub async fn history(&self, query: SettlementHistoryQuery) -> AppResult<Vec<SettlementResponse>> {
        let filters = query.into_filters()?;
        let records = self.service.list_settlements(&filters).await?;
        Ok(records.into_iter().map(SettlementResponse::from).collect())
    }

    pub async fn eligible_trips(
        &self,
        driver_id: &str,
        query: EligibleTripsQuery,
    ) -> AppResult<Vec<EligibleTripResponse>> {
        let driver_id = validate_uuid(driver_id)
            .map_err(|_| validation_error("driver_id", "Driver id is not a valid UUID"))?;
        let trips = self.service.eligible_trips(driver_id, query.up_to_date()?).await?;
        Ok(trips.into_iter().map(EligibleTripResponse::from).collect())
    }
}
