use rust_decimal::Decimal;
use serde::Serialize;

use crate::services::DashboardStats;
use crate::utils::money::serialize_amount;

// Response del dashboard
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_drivers: i64,
    pub total_trips: i64,
    #[serde(serialize_with = "serialize_amount")]
    pub pending_batta: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub pending_salary: Decimal,
    pub pending_trips: usize,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_drivers: stats.counts.total_drivers,
            total_trips: stats.counts.completed_trips,
            pending_batta: stats.pending.pending_batta,
            pending_salary: stats.pending.pending_salary,
            pending_trips: stats.pending.eligible_trips,
        }
    }
}
