//! Price type for representing monetary values.
//!
//! Uses a minor-unit (paise) integer representation so that price
//! comparisons in range filters never suffer floating-point drift. On the
//! wire a price is a decimal JSON number (some store builds send decimal
//! strings, which are accepted too).

use crate::error::CatalogError;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Minor units per whole currency unit.
const MINOR_PER_UNIT: i64 = 100;

/// Currency symbol used for display (the storefront sells in INR).
const CURRENCY_SYMBOL: &str = "\u{20b9}";

/// A price in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price {
    amount_minor: i64,
}

impl Price {
    /// A zero price.
    pub const ZERO: Price = Price { amount_minor: 0 };

    /// Create a price from minor units (paise).
    pub const fn from_minor(amount_minor: i64) -> Self {
        Self { amount_minor }
    }

    /// Create a price from whole currency units.
    pub const fn from_units(units: i64) -> Self {
        Self {
            amount_minor: units * MINOR_PER_UNIT,
        }
    }

    /// Create a price from a decimal amount.
    ///
    /// ```
    /// use catalog_core::Price;
    /// let price = Price::from_decimal(49.99);
    /// assert_eq!(price.amount_minor(), 4999);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Self {
            amount_minor: (amount * MINOR_PER_UNIT as f64).round() as i64,
        }
    }

    /// Parse a user- or URL-supplied decimal string.
    ///
    /// Rejects anything that is not a finite, non-negative number.
    pub fn parse(input: &str) -> Result<Self, CatalogError> {
        let value: f64 = input
            .trim()
            .parse()
            .map_err(|_| CatalogError::InvalidPrice(input.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(CatalogError::InvalidPrice(input.to_string()));
        }
        Ok(Self::from_decimal(value))
    }

    /// Amount in minor units.
    pub fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_minor as f64 / MINOR_PER_UNIT as f64
    }

    /// Shortest decimal form, as used in URLs (`500`, `499.5`, `499.05`).
    pub fn amount_string(&self) -> String {
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.abs();
        let units = abs / MINOR_PER_UNIT;
        let fraction = abs % MINOR_PER_UNIT;

        if fraction == 0 {
            format!("{}{}", sign, units)
        } else if fraction % 10 == 0 {
            format!("{}{}.{}", sign, units, fraction / 10)
        } else {
            format!("{}{}.{:02}", sign, units, fraction)
        }
    }

    /// Format with currency symbol and two decimals (e.g. "₹499.00").
    pub fn display(&self) -> String {
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.abs();
        format!(
            "{}{}{}.{:02}",
            sign,
            CURRENCY_SYMBOL,
            abs / MINOR_PER_UNIT,
            abs % MINOR_PER_UNIT
        )
    }

    /// Round up to the next multiple of `step`.
    ///
    /// Returns the price unchanged when the rounded value would not fit.
    pub fn ceil_to(&self, step: Price) -> Price {
        if step.amount_minor <= 0 || self.amount_minor <= 0 {
            return *self;
        }
        let Some(padded) = self.amount_minor.checked_add(step.amount_minor - 1) else {
            return *self;
        };
        let steps = padded / step.amount_minor;
        Price::from_minor(steps * step.amount_minor)
    }

    /// Whole-percent discount from `regular` down to `sale`.
    ///
    /// Zero when there is no discount or the regular price is zero.
    pub fn discount_percent(regular: Price, sale: Price) -> u32 {
        if regular.amount_minor <= 0 || regular <= sale {
            return 0;
        }
        let savings = (regular.amount_minor - sale.amount_minor) as f64;
        ((savings / regular.amount_minor as f64) * 100.0).round() as u32
    }
}

impl FromStr for Price {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Price::parse(s)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) if n.is_finite() => Ok(Price::from_decimal(n)),
            Raw::Number(n) => Err(de::Error::custom(format!("invalid price: {}", n))),
            Raw::Text(s) => Price::parse(&s).map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_parse() {
        assert_eq!(Price::parse("500").unwrap(), Price::from_units(500));
        assert_eq!(Price::parse(" 499.5 ").unwrap(), Price::from_minor(49950));
        assert!(Price::parse("").is_err());
        assert!(Price::parse("abc").is_err());
        assert!(Price::parse("-1").is_err());
        assert!(Price::parse("NaN").is_err());
        assert!(Price::parse("inf").is_err());
    }

    #[test]
    fn test_amount_string_is_shortest_form() {
        assert_eq!(Price::from_units(500).amount_string(), "500");
        assert_eq!(Price::from_minor(49950).amount_string(), "499.5");
        assert_eq!(Price::from_minor(49905).amount_string(), "499.05");
        assert_eq!(Price::ZERO.amount_string(), "0");
    }

    #[test]
    fn test_amount_string_parses_back() {
        for minor in [0, 5, 50, 99, 100, 12345, 49999] {
            let price = Price::from_minor(minor);
            assert_eq!(Price::parse(&price.amount_string()).unwrap(), price);
        }
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_minor(49900).display(), "\u{20b9}499.00");
        assert_eq!(Price::from_minor(1999).to_string(), "\u{20b9}19.99");
    }

    #[test]
    fn test_ceil_to_hundred() {
        let hundred = Price::from_units(100);
        assert_eq!(Price::from_units(1234).ceil_to(hundred), Price::from_units(1300));
        assert_eq!(Price::from_units(1200).ceil_to(hundred), Price::from_units(1200));
        assert_eq!(Price::from_minor(120001).ceil_to(hundred), Price::from_units(1300));
    }

    #[test]
    fn test_ceil_to_near_the_limit() {
        let hundred = Price::from_units(100);
        let huge = Price::from_decimal(1e30);
        assert_eq!(huge.amount_minor(), i64::MAX);
        assert_eq!(huge.ceil_to(hundred), huge);
    }

    #[test]
    fn test_discount_percent() {
        let regular = Price::from_units(1000);
        assert_eq!(Price::discount_percent(regular, Price::from_units(750)), 25);
        assert_eq!(Price::discount_percent(Price::from_units(3), Price::from_units(2)), 33);
        assert_eq!(Price::discount_percent(regular, regular), 0);
        assert_eq!(Price::discount_percent(regular, Price::from_units(1200)), 0);
        assert_eq!(Price::discount_percent(Price::ZERO, Price::ZERO), 0);
    }

    #[test]
    fn test_price_deserializes_numbers_and_strings() {
        let n: Price = serde_json::from_str("499").unwrap();
        assert_eq!(n, Price::from_units(499));
        let f: Price = serde_json::from_str("499.99").unwrap();
        assert_eq!(f, Price::from_minor(49999));
        let s: Price = serde_json::from_str("\"1299.00\"").unwrap();
        assert_eq!(s, Price::from_units(1299));
        assert!(serde_json::from_str::<Price>("\"free\"").is_err());
    }
}
