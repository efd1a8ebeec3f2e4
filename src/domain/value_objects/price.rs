use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A monetary amount with two fractional digits, held as minor units (cents).
///
/// Any integer amount is representable, including zero and negative values;
/// deciding which amounts are acceptable is left to the entity and the
/// validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Build a price from a decimal amount. Fails for amounts that are not
    /// finite, do not fit in whole cents, or carry digits past the cent.
    pub fn from_decimal(amount: f64) -> Result<Self, PriceError> {
        // 2^63, the first magnitude an i64 cent count cannot hold
        const CENTS_LIMIT: f64 = 9_223_372_036_854_775_808.0;

        if !amount.is_finite() {
            return Err(PriceError::NotFinite);
        }

        let scaled = amount * 100.0;
        let cents = scaled.round();
        if !(-CENTS_LIMIT..CENTS_LIMIT).contains(&cents) {
            return Err(PriceError::OutOfRange(amount));
        }

        // Leave room for binary representation error such as 9.99 * 100
        let tolerance = 1e-6_f64.max(scaled.abs() * f64::EPSILON * 4.0);
        if (scaled - cents).abs() > tolerance {
            return Err(PriceError::SubCentPrecision(amount));
        }

        Ok(Self(cents as i64))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

// On the wire a price is a plain JSON number such as 12.5
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Price::from_decimal(amount).map_err(serde::de::Error::custom)
    }
}

/// A decimal amount that has no exact cent representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceError {
    NotFinite,
    OutOfRange(f64),
    SubCentPrecision(f64),
}

impl std::fmt::Display for PriceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceError::NotFinite => write!(f, "price must be a finite number"),
            PriceError::OutOfRange(amount) => write!(f, "price {} is too large", amount),
            PriceError::SubCentPrecision(amount) => {
                write!(f, "price {} has more than two decimal places", amount)
            }
        }
    }
}

impl std::error::Error for PriceError {}
