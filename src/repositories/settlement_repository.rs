use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{CreatedSettlement, FleetCounts, NewSettlement, SettlementLedger};
use crate::models::{
    Driver, EligibleTrip, PaymentPreference, Settlement, SettlementFilters, SettlementItem,
    SettlementItemDetail, SettlementRecord,
};
use crate::utils::errors::{eligibility_conflict_error, not_found_error, AppError, AppResult};

/// Viajes completados sin ítem de liquidación (anti-join)
const ELIGIBLE_TRIPS_SQL: &str = r#"
    SELECT t.id AS trip_id, t.driver_id, d.payment_preference, t.route_id,
           r.name AS route_name, t.trip_date, r.batta_per_trip, r.salary_per_trip
    FROM trips t
    JOIN drivers d ON d.id = t.driver_id
    JOIN routes r ON r.id = t.route_id
    WHERE t.status = 'completed'
      AND ($1::uuid IS NULL OR t.driver_id = $1)
      AND ($2::date IS NULL OR t.trip_date <= $2)
      AND NOT EXISTS (SELECT 1 FROM settlement_items si WHERE si.trip_id = t.id)
    ORDER BY t.trip_date DESC
"#;

// Fila del historial: liquidación + datos del conductor
#[derive(Debug, sqlx::FromRow)]
struct SettlementRow {
    #[sqlx(flatten)]
    settlement: Settlement,
    driver_name: String,
    payment_preference: PaymentPreference,
}

/// Libro de liquidaciones sobre PostgreSQL
pub struct PgSettlementRepository {
    pool: PgPool,
}

impl PgSettlementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_eligible(
        &self,
        driver_id: Option<Uuid>,
        up_to: Option<NaiveDate>,
    ) -> AppResult<Vec<EligibleTrip>> {
        let trips = sqlx::query_as::<_, EligibleTrip>(ELIGIBLE_TRIPS_SQL)
            .bind(driver_id)
            .bind(up_to)
            .fetch_all(&self.pool)
            .await?;

        Ok(trips)
    }

    /// Bloquear la fila del conductor; serializa las liquidaciones del mismo conductor
    async fn lock_driver(tx: &mut Transaction<'_, Postgres>, driver_id: Uuid) -> AppResult<()> {
        let locked: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM drivers WHERE id = $1 FOR UPDATE")
            .bind(driver_id)
            .fetch_optional(&mut **tx)
            .await?;

        match locked {
            Some(_) => Ok(()),
            None => Err(not_found_error("Driver", &driver_id.to_string())),
        }
    }

    /// Re-chequeo de elegibilidad dentro de la transacción
    async fn ensure_still_eligible(
        tx: &mut Transaction<'_, Postgres>,
        driver_id: Uuid,
        trip_ids: &[Uuid],
    ) -> AppResult<()> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT t.id
            FROM trips t
            WHERE t.id = ANY($1)
              AND t.driver_id = $2
              AND t.status = 'completed'
              AND NOT EXISTS (SELECT 1 FROM settlement_items si WHERE si.trip_id = t.id)
            FOR UPDATE OF t
            "#,
        )
        .bind(trip_ids)
        .bind(driver_id)
        .fetch_all(&mut **tx)
        .await?;

        let eligible: HashSet<Uuid> = rows.into_iter().map(|(id,)| id).collect();
        let stale: Vec<Uuid> = trip_ids
            .iter()
            .copied()
            .filter(|id| !eligible.contains(id))
            .collect();

        if stale.is_empty() {
            Ok(())
        } else {
            Err(eligibility_conflict_error(&stale))
        }
    }
}

/// La violación de `UNIQUE (trip_id)` significa que otro proceso liquidó el viaje
fn map_item_insert_error(error: sqlx::Error, trip_id: Uuid) -> AppError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => eligibility_conflict_error(&[trip_id]),
        _ => AppError::Database(error),
    }
}

#[async_trait]
impl SettlementLedger for PgSettlementRepository {
    async fn find_driver(&self, driver_id: Uuid) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>(
            "SELECT id, name, payment_preference, created_at FROM drivers WHERE id = $1",
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    async fn eligible_trips(
        &self,
        driver_id: Uuid,
        up_to: Option<NaiveDate>,
    ) -> AppResult<Vec<EligibleTrip>> {
        self.fetch_eligible(Some(driver_id), up_to).await
    }

    async fn all_eligible_trips(&self, up_to: Option<NaiveDate>) -> AppResult<Vec<EligibleTrip>> {
        self.fetch_eligible(None, up_to).await
    }

    async fn create_settlement(&self, new_settlement: NewSettlement) -> AppResult<CreatedSettlement> {
        new_settlement.validate()?;

        let driver_id = new_settlement.driver_id;
        let trip_ids = new_settlement.trip_ids();

        // Si algo falla antes del commit, el drop de `tx` hace rollback
        let mut tx = self.pool.begin().await?;

        Self::lock_driver(&mut tx, driver_id).await?;

        if let Err(e) = Self::ensure_still_eligible(&mut tx, driver_id, &trip_ids).await {
            warn!("⚠️ Liquidación abortada para conductor {}: {}", driver_id, e);
            return Err(e);
        }

        let settlement = sqlx::query_as::<_, Settlement>(
            r#"
            INSERT INTO settlements (id, driver_id, settlement_type, total_amount, period_start, period_end, settled_at, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, driver_id, settlement_type, total_amount, period_start, period_end, settled_at, notes
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(driver_id)
        .bind(new_settlement.settlement_type)
        .bind(new_settlement.total_amount)
        .bind(new_settlement.period_start)
        .bind(new_settlement.period_end)
        .bind(Utc::now())
        .bind(&new_settlement.notes)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(new_settlement.items.len());
        for item in &new_settlement.items {
            let inserted = sqlx::query_as::<_, SettlementItem>(
                r#"
                INSERT INTO settlement_items (id, settlement_id, trip_id, amount, component_type)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, settlement_id, trip_id, amount, component_type
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(settlement.id)
            .bind(item.trip_id)
            .bind(item.amount)
            .bind(item.component_type)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_item_insert_error(e, item.trip_id))?;

            items.push(inserted);
        }

        tx.commit().await?;

        info!(
            "💾 Liquidación {} registrada: conductor {}, {} ítems, total {}",
            settlement.id,
            driver_id,
            items.len(),
            settlement.total_amount
        );

        Ok(CreatedSettlement { settlement, items })
    }

    async fn query_settlements(&self, filters: &SettlementFilters) -> AppResult<Vec<SettlementRecord>> {
        let rows = sqlx::query_as::<_, SettlementRow>(
            r#"
            SELECT s.id, s.driver_id, s.settlement_type, s.total_amount, s.period_start,
                   s.period_end, s.settled_at, s.notes,
                   d.name AS driver_name, d.payment_preference
            FROM settlements s
            JOIN drivers d ON d.id = s.driver_id
            WHERE ($1::uuid IS NULL OR s.driver_id = $1)
              AND ($2::settlement_type IS NULL OR s.settlement_type = $2)
            ORDER BY s.settled_at DESC
            "#,
        )
        .bind(filters.driver_id)
        .bind(filters.settlement_type)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let settlement_ids: Vec<Uuid> = rows.iter().map(|row| row.settlement.id).collect();
        let details = sqlx::query_as::<_, SettlementItemDetail>(
            r#"
            SELECT si.id, si.settlement_id, si.trip_id, si.amount, si.component_type,
                   t.trip_date, r.name AS route_name
            FROM settlement_items si
            JOIN trips t ON t.id = si.trip_id
            JOIN routes r ON r.id = t.route_id
            WHERE si.settlement_id = ANY($1)
            ORDER BY t.trip_date ASC
            "#,
        )
        .bind(&settlement_ids)
        .fetch_all(&self.pool)
        .await?;

        debug!("📥 Historial: {} liquidaciones, {} ítems", rows.len(), details.len());

        let mut items_by_settlement: HashMap<Uuid, Vec<SettlementItemDetail>> = HashMap::new();
        for detail in details {
            items_by_settlement
                .entry(detail.settlement_id)
                .or_default()
                .push(detail);
        }

        let records = rows
            .into_iter()
            .map(|row| SettlementRecord {
                items: items_by_settlement.remove(&row.settlement.id).unwrap_or_default(),
                settlement: row.settlement,
                driver_name: row.driver_name,
                payment_preference: row.payment_preference,
            })
            .collect();

        Ok(records)
    }

    async fn fleet_counts(&self) -> AppResult<FleetCounts> {
        let (total_drivers, completed_trips): (i64, i64) = sqlx::query_as(
            r#"
            SELECT (SELECT COUNT(*) FROM drivers),
                   (SELECT COUNT(*) FROM trips WHERE status = 'completed')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(FleetCounts {
            total_drivers,
            completed_trips,
        })
    }
}
