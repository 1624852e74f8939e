//! Calculadora de liquidaciones
//!
//! Función pura: dado un conductor, sus viajes elegibles (con los montos de
//! la ruta) y el tipo de liquidación, produce el resumen a liquidar. No toca
//! la base de datos.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ComponentType, Driver, EligibleTrip, PaymentPreference, RouteRates, SettlementType};
use crate::utils::errors::{validation_error, AppResult};

/// Reparto de un viaje entre batta y salario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TripAttribution {
    pub batta: Decimal,
    pub salary: Decimal,
}

impl TripAttribution {
    /// Monto correspondiente a un componente
    pub fn amount_for(&self, component: ComponentType) -> Decimal {
        match component {
            ComponentType::Batta => self.batta,
            ComponentType::Salary => self.salary,
        }
    }
}

/// Regla de atribución por viaje.
///
/// Para `batta_only` y `salary_only` el monto completo del viaje (batta +
/// salario) va al único componente de la preferencia.
pub fn attribute_trip(preference: PaymentPreference, rates: RouteRates) -> TripAttribution {
    let total = rates.total();
    match preference {
        PaymentPreference::BattaOnly => TripAttribution {
            batta: total,
            salary: Decimal::ZERO,
        },
        PaymentPreference::SalaryOnly => TripAttribution {
            batta: Decimal::ZERO,
            salary: total,
        },
        PaymentPreference::Both => TripAttribution {
            batta: rates.batta_per_trip,
            salary: rates.salary_per_trip,
        },
    }
}

/// Línea de liquidación (un viaje, un componente)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementLine {
    pub trip_id: Uuid,
    pub route_name: String,
    pub trip_date: NaiveDate,
    pub amount: Decimal,
    pub component_type: ComponentType,
}

/// Resumen listo para registrar en el libro
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementSummary {
    pub driver_id: Uuid,
    pub driver_name: String,
    pub payment_preference: PaymentPreference,
    pub settlement_type: SettlementType,
    pub total_amount: Decimal,
    /// Batta atribuida sobre todos los viajes considerados
    pub batta_amount: Decimal,
    /// Salario atribuido sobre todos los viajes considerados
    pub salary_amount: Decimal,
    pub trip_count: usize,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub line_items: Vec<SettlementLine>,
}

impl SettlementSummary {
    /// Nota que acompaña a la liquidación registrada
    pub fn notes(&self) -> String {
        format!("{} settlement for {} trips", self.settlement_type, self.trip_count)
    }
}

/// Resultado del cálculo
#[derive(Debug, Clone, PartialEq)]
pub enum SettlementCalculation {
    /// No hay viajes o el total es exactamente cero; no es un error
    NothingToSettle { trip_count: usize },
    Ready(SettlementSummary),
}

/// Calcular la liquidación de un conductor.
///
/// `trips` debe contener solo viajes elegibles del conductor. Los viajes cuyo
/// monto en el componente pedido es cero no generan línea, pero sí cuentan
/// en `trip_count` y en los límites del período.
pub fn calculate_settlement(
    driver: &Driver,
    trips: &[EligibleTrip],
    settlement_type: SettlementType,
) -> AppResult<SettlementCalculation> {
    if trips.is_empty() {
        return Ok(SettlementCalculation::NothingToSettle { trip_count: 0 });
    }

    let component = settlement_type.component();
    let mut line_items = Vec::with_capacity(trips.len());
    let mut batta_amount = Decimal::ZERO;
    let mut salary_amount = Decimal::ZERO;
    let mut total_amount = Decimal::ZERO;
    let mut period_start = trips[0].trip_date;
    let mut period_end = trips[0].trip_date;

    for trip in trips {
        if trip.driver_id != driver.id {
            return Err(validation_error("trips", "Trip does not belong to the selected driver"));
        }

        let rates = trip.rates();
        rates.validate()?;

        let attribution = attribute_trip(driver.payment_preference, rates);
        batta_amount += attribution.batta;
        salary_amount += attribution.salary;

        period_start = period_start.min(trip.trip_date);
        period_end = period_end.max(trip.trip_date);

        let amount = attribution.amount_for(component);
        if amount > Decimal::ZERO {
            total_amount += amount;
            line_items.push(SettlementLine {
                trip_id: trip.trip_id,
                route_name: trip.route_name.clone(),
                trip_date: trip.trip_date,
                amount,
                component_type: component,
            });
        }
    }

    if total_amount.is_zero() {
        return Ok(SettlementCalculation::NothingToSettle {
            trip_count: trips.len(),
        });
    }

    Ok(SettlementCalculation::Ready(SettlementSummary {
        driver_id: driver.id,
        driver_name: driver.name.clone(),
        payment_preference: driver.payment_preference,
        settlement_type,
        total_amount,
        batta_amount,
        salary_amount,
        trip_count: trips.len(),
        period_start,
        period_end,
        line_items,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn driver(preference: PaymentPreference) -> Driver {
        Driver {
            id: Uuid::new_v4(),
            name: "Ravi".to_string(),
            payment_preference: preference,
            created_at: Utc::now(),
        }
    }

    fn trip(driver: &Driver, date: (i32, u32, u32), batta: Decimal, salary: Decimal) -> EligibleTrip {
        EligibleTrip {
            trip_id: Uuid::new_v4(),
            driver_id: driver.id,
            payment_preference: driver.payment_preference,
            route_id: Uuid::nil(),
            route_name: "Chennai - Vellore".to_string(),
            trip_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            batta_per_trip: batta,
            salary_per_trip: salary,
        }
    }

    fn three_trips(driver: &Driver) -> Vec<EligibleTrip> {
        vec![
            trip(driver, (2024, 1, 1), dec!(100), dec!(50)),
            trip(driver, (2024, 1, 2), dec!(100), dec!(50)),
            trip(driver, (2024, 1, 3), dec!(100), dec!(50)),
        ]
    }

    fn ready(calc: SettlementCalculation) -> SettlementSummary {
        match calc {
            SettlementCalculation::Ready(summary) => summary,
            other => panic!("expected a settlement, got {:?}", other),
        }
    }

    #[test]
    fn test_attribution_rule() {
        let rates = RouteRates::new(dec!(100), dec!(50));
        assert_eq!(
            attribute_trip(PaymentPreference::BattaOnly, rates),
            TripAttribution { batta: dec!(150), salary: dec!(0) }
        );
        assert_eq!(
            attribute_trip(PaymentPreference::SalaryOnly, rates),
            TripAttribution { batta: dec!(0), salary: dec!(150) }
        );
        assert_eq!(
            attribute_trip(PaymentPreference::Both, rates),
            TripAttribution { batta: dec!(100), salary: dec!(50) }
        );
    }

    #[test]
    fn test_batta_only_weekly_pays_full_trip_amount() {
        let d = driver(PaymentPreference::BattaOnly);
        let summary = ready(calculate_settlement(&d, &three_trips(&d), SettlementType::Weekly).unwrap());

        assert_eq!(summary.total_amount, dec!(450));
        assert_eq!(summary.line_items.len(), 3);
        assert!(summary
            .line_items
            .iter()
            .all(|l| l.component_type == ComponentType::Batta && l.amount == dec!(150)));
    }

    #[test]
    fn test_both_preference_splits_by_settlement_type() {
        let d = driver(PaymentPreference::Both);
        let trips = three_trips(&d);

        let weekly = ready(calculate_settlement(&d, &trips, SettlementType::Weekly).unwrap());
        assert_eq!(weekly.total_amount, dec!(300));
        assert_eq!(weekly.batta_amount, dec!(300));
        assert_eq!(weekly.salary_amount, dec!(150));

        let monthly = ready(calculate_settlement(&d, &trips, SettlementType::Monthly).unwrap());
        assert_eq!(monthly.total_amount, dec!(150));
        assert!(monthly
            .line_items
            .iter()
            .all(|l| l.component_type == ComponentType::Salary));
    }

    #[test]
    fn test_batta_only_monthly_has_nothing_to_settle() {
        let d = driver(PaymentPreference::BattaOnly);
        let calc = calculate_settlement(&d, &three_trips(&d), SettlementType::Monthly).unwrap();
        assert_eq!(calc, SettlementCalculation::NothingToSettle { trip_count: 3 });
    }

    #[test]
    fn test_empty_trip_list_is_nothing_to_settle() {
        let d = driver(PaymentPreference::Both);
        let calc = calculate_settlement(&d, &[], SettlementType::Weekly).unwrap();
        assert_eq!(calc, SettlementCalculation::NothingToSettle { trip_count: 0 });
    }

    #[test]
    fn test_zero_amount_trips_are_excluded_but_counted() {
        let d = driver(PaymentPreference::Both);
        let trips = vec![
            trip(&d, (2024, 1, 1), dec!(0), dec!(50)),
            trip(&d, (2024, 1, 5), dec!(80), dec!(50)),
        ];

        let summary = ready(calculate_settlement(&d, &trips, SettlementType::Weekly).unwrap());
        assert_eq!(summary.line_items.len(), 1);
        assert_eq!(summary.line_items[0].trip_id, trips[1].trip_id);
        assert_eq!(summary.trip_count, 2);
        assert_eq!(summary.period_start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(summary.total_amount, dec!(80));
    }

    #[test]
    fn test_all_zero_batta_is_nothing_to_settle() {
        let d = driver(PaymentPreference::Both);
        let trips = vec![trip(&d, (2024, 1, 1), dec!(0), dec!(50))];
        let calc = calculate_settlement(&d, &trips, SettlementType::Weekly).unwrap();
        assert_eq!(calc, SettlementCalculation::NothingToSettle { trip_count: 1 });
    }

    #[test]
    fn test_period_bounds_ignore_input_order() {
        let d = driver(PaymentPreference::SalaryOnly);
        let trips = vec![
            trip(&d, (2024, 1, 1), dec!(10), dec!(10)),
            trip(&d, (2024, 1, 10), dec!(10), dec!(10)),
            trip(&d, (2024, 1, 5), dec!(10), dec!(10)),
        ];
        let summary = ready(calculate_settlement(&d, &trips, SettlementType::Monthly).unwrap());
        assert_eq!(summary.period_start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(summary.period_end, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn test_total_equals_sum_of_lines() {
        let d = driver(PaymentPreference::BattaOnly);
        let trips: Vec<_> = (1..=28)
            .map(|day| trip(&d, (2024, 2, day), dec!(33.33), dec!(0.01)))
            .collect();
        let summary = ready(calculate_settlement(&d, &trips, SettlementType::Weekly).unwrap());
        let sum: Decimal = summary.line_items.iter().map(|l| l.amount).sum();
        assert_eq!(summary.total_amount, sum);
        assert_eq!(summary.total_amount, dec!(933.52));
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let d = driver(PaymentPreference::Both);
        let trips = three_trips(&d);
        let first = calculate_settlement(&d, &trips, SettlementType::Weekly).unwrap();
        let second = calculate_settlement(&d, &trips, SettlementType::Weekly).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_negative_route_amount_is_validation_error() {
        let d = driver(PaymentPreference::Both);
        let trips = vec![trip(&d, (2024, 1, 1), dec!(-5), dec!(50))];
        assert!(calculate_settlement(&d, &trips, SettlementType::Monthly).is_err());
    }

    #[test]
    fn test_foreign_trip_is_rejected() {
        let d = driver(PaymentPreference::Both);
        let other = driver(PaymentPreference::Both);
        let trips = vec![trip(&other, (2024, 1, 1), dec!(5), dec!(5))];
        assert!(calculate_settlement(&d, &trips, SettlementType::Weekly).is_err());
    }

    #[test]
    fn test_notes() {
        let d = driver(PaymentPreference::BattaOnly);
        let summary = ready(calculate_settlement(&d, &three_trips(&d), SettlementType::Weekly).unwrap());
        assert_eq!(summary.notes(), "weekly settlement for 3 trips");
    }
}
