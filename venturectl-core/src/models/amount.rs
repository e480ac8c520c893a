//! Arbitrary-precision money amounts
//!
//! Investment totals routinely exceed 2^53, which JSON clients decode as
//! doubles. `Amount` is the one place that decides how such values cross the
//! wire: it always serializes as a string of decimal digits, and every entity
//! that carries money uses it.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ValidationError;

/// Widest value a `NUMERIC(78, 0)` column holds.
pub const MAX_AMOUNT_DIGITS: usize = 78;

static DIGITS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,78}$").expect("invalid amount regex"));

/// Non-negative integral amount of unbounded width
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigDecimal);

impl Amount {
    /// Parse a string of decimal digits.
    ///
    /// Signs, separators, fractions and exponents are rejected so that the
    /// stored value is exactly what the client typed.
    ///
    /// # Example
    /// ```
    /// use venturectl_core::Amount;
    ///
    /// let amount = Amount::parse("9007199254740993").unwrap();
    /// assert_eq!(amount.to_string(), "9007199254740993");
    /// assert!(Amount::parse("1.5").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "amount" });
        }
        if s.len() > MAX_AMOUNT_DIGITS {
            return Err(ValidationError::TooLong {
                field: "amount",
                max: MAX_AMOUNT_DIGITS,
            });
        }
        if !DIGITS_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "amount",
                reason: "must be a non-negative integer",
            });
        }
        let value = BigDecimal::from_str(s).map_err(|_| ValidationError::InvalidValue {
            field: "amount",
            value: s.to_owned(),
        })?;
        Ok(Self(value.with_scale(0)))
    }

    pub fn zero() -> Self {
        Self(BigDecimal::from(0u64))
    }

    /// Borrow the underlying decimal (scale is always 0).
    pub fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }

    pub fn into_decimal(self) -> BigDecimal {
        self.0
    }

    /// `self - other`, floored at zero.
    pub fn saturating_sub(&self, other: &Amount) -> Amount {
        if other.0 >= self.0 {
            return Self::zero();
        }
        Self(&self.0 - &other.0)
    }
}

impl std::ops::Add<&Amount> for &Amount {
    type Output = Amount;

    fn add(self, other: &Amount) -> Amount {
        Amount(&self.0 + &other.0)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(BigDecimal::from(value))
    }
}

/// Column values arrive as `NUMERIC(78, 0)`; any fractional part is dropped.
impl From<BigDecimal> for Amount {
    fn from(value: BigDecimal) -> Self {
        Self(value.with_scale(0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // BigInt's Display never switches to exponent notation
        let (digits, _) = self.0.with_scale(0).into_bigint_and_exponent();
        write!(f, "{}", digits)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a string of decimal digits")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::parse(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        u64::try_from(v)
            .map(Amount::from)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    // Integers beyond u64 reach us as doubles and have already lost digits.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Err(E::invalid_value(de::Unexpected::Float(v), &self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_beyond_safe_integer_as_string() {
        let amount = Amount::parse("9007199254740993").unwrap();
        let json = serde_json::to_value(&amount).unwrap();
        assert_eq!(json, serde_json::json!("9007199254740993"));
    }

    #[test]
    fn accepts_json_integer_and_string() {
        let from_int: Amount = serde_json::from_str("9007199254740993").unwrap();
        let from_str: Amount = serde_json::from_str("\"9007199254740993\"").unwrap();
        assert_eq!(from_int, from_str);
    }

    #[test]
    fn rejects_fraction_negative_and_float() {
        assert!(serde_json::from_str::<Amount>("\"12.5\"").is_err());
        assert!(serde_json::from_str::<Amount>("-3").is_err());
        assert!(serde_json::from_str::<Amount>("1.5").is_err());
        assert!(serde_json::from_str::<Amount>("\"1e9\"").is_err());
    }

    #[test]
    fn wide_values_keep_every_digit() {
        let digits = "123456789012345678901234567890123456789";
        assert_eq!(Amount::parse(digits).unwrap().to_string(), digits);
    }

    #[test]
    fn column_values_print_without_exponent() {
        let value = BigDecimal::from_str("1000000000000000000000").unwrap();
        assert_eq!(Amount::from(value).to_string(), "1000000000000000000000");
    }

    #[test]
    fn too_wide_is_rejected() {
        let digits = "1".repeat(MAX_AMOUNT_DIGITS + 1);
        assert!(matches!(
            Amount::parse(&digits),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn arithmetic_stays_exact_and_non_negative() {
        let big = Amount::parse("9007199254740993").unwrap();
        let sum = &big + &Amount::from(7);
        assert_eq!(sum.to_string(), "9007199254741000");
        assert_eq!(sum.saturating_sub(&Amount::from(7)), big);
        assert_eq!(Amount::from(3).saturating_sub(&Amount::from(5)), Amount::zero());
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(Amount::parse("10").unwrap() > Amount::parse("9").unwrap());
        assert_eq!(Amount::default(), Amount::zero());
    }
}
