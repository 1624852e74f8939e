use std::sync::Arc;

use crate::dto::dashboard_dto::DashboardResponse;
use crate::repositories::SettlementLedger;
use crate::services::AggregateReporter;
use crate::utils::errors::AppResult;

pub struct DashboardController {
    reporter: AggregateReporter,
}

impl DashboardController {
    pub fn new(ledger: Arc<dyn SettlementLedger>) -> Self {
        Self {
            reporter: AggregateReporter::new(ledger),
        }
    }

    pub async fn stats(&self) -> AppResult<DashboardResponse> {
        let stats = self.reporter.dashboard().await?;
        Ok(DashboardResponse::from(stats))
    }
}
