//! Money type for Vietnamese đồng amounts.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An amount in Vietnamese đồng.
///
/// The đồng has no fractional unit in practice, so amounts are stored as
/// whole `i64` values. Product prices are strictly positive; order totals
/// are non-negative.
///
/// ```
/// use gearshop_core::Vnd;
///
/// let price = Vnd::new(1_500_000);
/// assert_eq!(price.to_string(), "1.500.000₫");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Vnd(i64);

impl Vnd {
    /// Zero đồng.
    pub const ZERO: Self = Self(0);

    /// Create an amount from a whole number of đồng.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Whether this is a valid product price (strictly positive).
    #[must_use]
    pub const fn is_valid_price(&self) -> bool {
        self.0 > 0
    }

    /// Checked addition.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked multiplication by a quantity.
    #[must_use]
    pub const fn checked_mul(self, quantity: i64) -> Option<Self> {
        match self.0.checked_mul(quantity) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl From<i64> for Vnd {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}

impl From<Vnd> for i64 {
    fn from(amount: Vnd) -> Self {
        amount.0
    }
}

impl fmt::Display for Vnd {
    /// Formats with dot thousand separators and a đồng sign: `1.500.000₫`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.0 < 0;
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
        let offset = digits.len() % 3;
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        if negative {
            write!(f, "-{grouped}₫")
        } else {
            write!(f, "{grouped}₫")
        }
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Vnd {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Vnd {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Vnd {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_dot_separators() {
        assert_eq!(Vnd::new(0).to_string(), "0₫");
        assert_eq!(Vnd::new(500).to_string(), "500₫");
        assert_eq!(Vnd::new(1_000).to_string(), "1.000₫");
        assert_eq!(Vnd::new(25_990_000).to_string(), "25.990.000₫");
        assert_eq!(Vnd::new(1_234_567_890).to_string(), "1.234.567.890₫");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(Vnd::new(-1_500_000).to_string(), "-1.500.000₫");
    }

    #[test]
    fn price_validity() {
        assert!(Vnd::new(1).is_valid_price());
        assert!(!Vnd::ZERO.is_valid_price());
        assert!(!Vnd::new(-100).is_valid_price());
    }

    #[test]
    fn checked_arithmetic() {
        let line = Vnd::new(350_000).checked_mul(3).unwrap();
        assert_eq!(line, Vnd::new(1_050_000));
        assert_eq!(
            line.checked_add(Vnd::new(30_000)).unwrap(),
            Vnd::new(1_080_000)
        );
        assert!(Vnd::new(i64::MAX).checked_mul(2).is_none());
    }
}
