//! Formateo de montos
//!
//! Internamente todo se acumula con `Decimal`; el redondeo a dos decimales
//! solo ocurre al presentar los valores.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serializer;

/// Redondear un monto a dos decimales (half-up, como la moneda)
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formatear un monto con dos decimales fijos, p. ej. `450.00`
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = round_amount(amount);
    rounded.rescale(2);
    rounded.to_string()
}

/// Serializador serde para campos monetarios en los DTOs
pub fn serialize_amount<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_amount(*amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(450)), "450.00");
        assert_eq!(format_amount(dec!(12.5)), "12.50");
        assert_eq!(format_amount(dec!(0.005)), "0.01");
        assert_eq!(format_amount(dec!(99.994)), "99.99");
    }

    #[test]
    fn test_repeated_additions_do_not_drift() {
        let total: Decimal = (0..1000).map(|_| dec!(0.10)).sum();
        assert_eq!(total, dec!(100.00));
        assert_eq!(format_amount(total), "100.00");
    }
}
