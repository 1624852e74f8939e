//! Libro en memoria para tests
//!
//! Implementa el mismo contrato que `PgSettlementRepository`: todo
//! `create_settlement` ocurre bajo un único lock y solo se publica al final.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{CreatedSettlement, FleetCounts, NewSettlement, SettlementLedger};
use crate::models::{
    Driver, EligibleTrip, PaymentPreference, Route, Settlement, SettlementFilters, SettlementItem,
    SettlementItemDetail, SettlementRecord, Trip, TripStatus,
};
use crate::utils::errors::{eligibility_conflict_error, not_found_error, AppError, AppResult};
use rust_decimal::Decimal;

#[derive(Default)]
struct LedgerState {
    drivers: HashMap<Uuid, Driver>,
    routes: HashMap<Uuid, Route>,
    trips: Vec<Trip>,
    settlements: Vec<Settlement>,
    items: Vec<SettlementItem>,
}

impl LedgerState {
    fn settled_trips(&self) -> HashSet<Uuid> {
        self.items.iter().map(|item| item.trip_id).collect()
    }

    fn eligible(&self, driver_id: Option<Uuid>, up_to: Option<NaiveDate>) -> Vec<EligibleTrip> {
        let settled = self.settled_trips();
        let mut trips: Vec<EligibleTrip> = self
            .trips
            .iter()
            .filter(|t| t.status == TripStatus::Completed)
            .filter(|t| driver_id.map_or(true, |id| t.driver_id == id))
            .filter(|t| up_to.map_or(true, |limit| t.trip_date <= limit))
            .filter(|t| !settled.contains(&t.id))
            .filter_map(|t| {
                let driver = self.drivers.get(&t.driver_id)?;
                let route = self.routes.get(&t.route_id)?;
                Some(EligibleTrip {
                    trip_id: t.id,
                    driver_id: t.driver_id,
                    payment_preference: driver.payment_preference,
                    route_id: route.id,
                    route_name: route.name.clone(),
                    trip_date: t.trip_date,
                    batta_per_trip: route.batta_per_trip,
                    salary_per_trip: route.salary_per_trip,
                })
            })
            .collect();
        trips.sort_by(|a, b| b.trip_date.cmp(&a.trip_date));
        trips
    }
}

#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
    fail_item_insert: AtomicBool,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_driver(&self, name: &str, preference: PaymentPreference) -> Uuid {
        let driver = Driver {
            id: Uuid::new_v4(),
            name: name.to_string(),
            payment_preference: preference,
            created_at: Utc::now(),
        };
        let id = driver.id;
        self.state.lock().await.drivers.insert(id, driver);
        id
    }

    pub async fn add_route(&self, name: &str, batta: Decimal, salary: Decimal) -> Uuid {
        let route = Route {
            id: Uuid::new_v4(),
            name: name.to_string(),
            batta_per_trip: batta,
            salary_per_trip: salary,
            created_at: Utc::now(),
        };
        let id = route.id;
        self.state.lock().await.routes.insert(id, route);
        id
    }

    pub async fn add_trip(
        &self,
        driver_id: Uuid,
        route_id: Uuid,
        trip_date: NaiveDate,
        status: TripStatus,
    ) -> Uuid {
        let trip = Trip {
            id: Uuid::new_v4(),
            driver_id,
            route_id,
            vehicle_id: Uuid::nil(),
            trip_date,
            status,
        };
        let id = trip.id;
        self.state.lock().await.trips.push(trip);
        id
    }

    /// Simular un fallo de almacenamiento al insertar ítems
    pub fn fail_next_item_insert(&self) {
        self.fail_item_insert.store(true, Ordering::SeqCst);
    }

    pub async fn settlement_count(&self) -> usize {
        self.state.lock().await.settlements.len()
    }

    pub async fn items_for_trip(&self, trip_id: Uuid) -> usize {
        self.state
            .lock()
            .await
            .items
            .iter()
            .filter(|item| item.trip_id == trip_id)
            .count()
    }
}

#[async_trait]
impl SettlementLedger for InMemoryLedger {
    async fn find_driver(&self, driver_id: Uuid) -> AppResult<Option<Driver>> {
        Ok(self.state.lock().await.drivers.get(&driver_id).cloned())
    }

    async fn eligible_trips(
        &self,
        driver_id: Uuid,
        up_to: Option<NaiveDate>,
    ) -> AppResult<Vec<EligibleTrip>> {
        Ok(self.state.lock().await.eligible(Some(driver_id), up_to))
    }

    async fn all_eligible_trips(&self, up_to: Option<NaiveDate>) -> AppResult<Vec<EligibleTrip>> {
        Ok(self.state.lock().await.eligible(None, up_to))
    }

    async fn create_settlement(&self, new_settlement: NewSettlement) -> AppResult<CreatedSettlement> {
        new_settlement.validate()?;

        let mut state = self.state.lock().await;

        if !state.drivers.contains_key(&new_settlement.driver_id) {
            return Err(not_found_error("Driver", &new_settlement.driver_id.to_string()));
        }

        let eligible: HashSet<Uuid> = state
            .eligible(Some(new_settlement.driver_id), None)
            .into_iter()
            .map(|t| t.trip_id)
            .collect();
        let stale: Vec<Uuid> = new_settlement
            .trip_ids()
            .into_iter()
            .filter(|id| !eligible.contains(id))
            .collect();
        if !stale.is_empty() {
            return Err(eligibility_conflict_error(&stale));
        }

        let settlement = Settlement {
            id: Uuid::new_v4(),
            driver_id: new_settlement.driver_id,
            settlement_type: new_settlement.settlement_type,
            total_amount: new_settlement.total_amount,
            period_start: new_settlement.period_start,
            period_end: new_settlement.period_end,
            settled_at: Utc::now(),
            notes: new_settlement.notes.clone(),
        };

        let mut staged = Vec::with_capacity(new_settlement.items.len());
        for item in &new_settlement.items {
            if self.fail_item_insert.swap(false, Ordering::SeqCst) {
                return Err(AppError::Database(sqlx::Error::Protocol(
                    "simulated item insert failure".to_string(),
                )));
            }
            staged.push(SettlementItem {
                id: Uuid::new_v4(),
                settlement_id: settlement.id,
                trip_id: item.trip_id,
                amount: item.amount,
                component_type: item.component_type,
            });
        }

        state.settlements.push(settlement.clone());
        state.items.extend(staged.iter().cloned());

        Ok(CreatedSettlement {
            settlement,
            items: staged,
        })
    }

    async fn query_settlements(&self, filters: &SettlementFilters) -> AppResult<Vec<SettlementRecord>> {
        let state = self.state.lock().await;

        let mut records: Vec<SettlementRecord> = state
            .settlements
            .iter()
            .rev()
            .filter(|s| filters.driver_id.map_or(true, |id| s.driver_id == id))
            .filter(|s| filters.settlement_type.map_or(true, |ty| s.settlement_type == ty))
            .filter_map(|s| {
                let driver = state.drivers.get(&s.driver_id)?;
                let items = state
                    .items
                    .iter()
                    .filter(|item| item.settlement_id == s.id)
                    .filter_map(|item| {
                        let trip = state.trips.iter().find(|t| t.id == item.trip_id)?;
                        let route = state.routes.get(&trip.route_id)?;
                        Some(SettlementItemDetail {
                            id: item.id,
                            settlement_id: item.settlement_id,
                            trip_id: item.trip_id,
                            amount: item.amount,
                            component_type: item.component_type,
                            trip_date: trip.trip_date,
                            route_name: route.name.clone(),
                        })
                    })
                    .collect();
                Some(SettlementRecord {
                    settlement: s.clone(),
                    driver_name: driver.name.clone(),
                    payment_preference: driver.payment_preference,
                    items,
                })
            })
            .collect();

        records.sort_by(|a, b| b.settlement.settled_at.cmp(&a.settlement.settled_at));
        Ok(records)
    }

    async fn fleet_counts(&self) -> AppResult<FleetCounts> {
        let state = self.state.lock().await;
        Ok(FleetCounts {
            total_drivers: state.drivers.len() as i64,
            completed_trips: state
                .trips
                .iter()
                .filter(|t| t.status == TripStatus::Completed)
                .count() as i64,
        })
    }
}
