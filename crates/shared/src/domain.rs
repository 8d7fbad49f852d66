use std::{fmt, iter::Sum, ops::Add};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(pub String);

impl CatalogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for CatalogId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Money in whole cents.
///
/// Serialized as a decimal number with two places (`9.99`) so persisted carts
/// stay readable, but every sum is computed on integer cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    pub fn checked_add(self, rhs: Price) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Saturating product. Carts refuse quantities whose totals would not
    /// fit, so this never saturates for a line that made it into a cart.
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }

    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents > i64::MAX as f64 {
            return None;
        }
        Some(Self(cents as i64))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Price::from_decimal(raw).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid price {raw}: must be a finite, non-negative amount"
            ))
        })
    }
}

/// Read-only description of a purchasable book, supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: CatalogId,
    pub title: String,
    pub author: String,
    #[serde(rename = "price")]
    pub unit_price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: CatalogId,
    pub title: String,
    pub author: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl LineItem {
    pub fn from_entry(entry: &CatalogEntry, quantity: u32) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            author: entry.author.clone(),
            unit_price: entry.unit_price,
            quantity,
        }
    }

    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_displays_two_decimals() {
        assert_eq!(Price::from_cents(999).to_string(), "9.99");
        assert_eq!(Price::from_cents(1200).to_string(), "12.00");
        assert_eq!(Price::from_cents(5).to_string(), "0.05");
        assert_eq!(Price::ZERO.to_string(), "0.00");
    }

    #[test]
    fn price_decimal_conversion_rounds_to_cents() {
        assert_eq!(Price::from_decimal(12.99), Some(Price::from_cents(1299)));
        assert_eq!(Price::from_decimal(0.1 + 0.2), Some(Price::from_cents(30)));
        assert_eq!(Price::from_decimal(-1.0), None);
        assert_eq!(Price::from_decimal(f64::NAN), None);
    }

    #[test]
    fn price_serializes_as_decimal_number() {
        let encoded = serde_json::to_string(&Price::from_cents(1499)).expect("encode");
        assert_eq!(encoded, "14.99");
        let decoded: Price = serde_json::from_str("16.99").expect("decode");
        assert_eq!(decoded, Price::from_cents(1699));
        assert!(serde_json::from_str::<Price>("-3.5").is_err());
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        assert_eq!(
            Price::from_cents(999).checked_times(3),
            Some(Price::from_cents(2997))
        );
        assert_eq!(Price::from_cents(i64::MAX).checked_times(2), None);
        assert_eq!(Price::from_cents(i64::MAX).checked_add(Price::from_cents(1)), None);
    }

    #[test]
    fn line_total_multiplies_unit_price() {
        let item = LineItem {
            id: CatalogId::from("1984"),
            title: "1984".into(),
            author: "George Orwell".into(),
            unit_price: Price::from_cents(999),
            quantity: 3,
        };
        assert_eq!(item.line_total(), Price::from_cents(2997));
    }
}
