//! Arbitrary-precision power amounts and exact threshold normalization.
//!
//! Strategy balances are raw token units (up to `uint256`), each reported
//! with its own cumulative decimal count. Thresholds are whole-unit
//! integers. Comparing the two never goes through floating point: every
//! term is scaled to the largest decimal count in 512-bit arithmetic and
//! the threshold is scaled the same way.

use primitive_types::{U256, U512};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// A non-negative integer amount: a raw strategy balance or a threshold.
///
/// Serialized as a decimal string so values above 2^53 survive JSON.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Power(U256);

impl Power {
    pub const ZERO: Self = Self(U256([0; 4]));

    pub fn new(raw: U256) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<u64> for Power {
    fn from(v: u64) -> Self {
        Self(U256::from(v))
    }
}

impl From<u128> for Power {
    fn from(v: u128) -> Self {
        Self(U256::from(v))
    }
}

impl FromStr for Power {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TypesError::InvalidPower(s.to_string()));
        }
        U256::from_dec_str(trimmed)
            .map(Self)
            .map_err(|_| TypesError::InvalidPower(s.to_string()))
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Power {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Power {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self::from(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// `10^exp` in 512-bit arithmetic, or `None` once it no longer fits.
fn pow10(exp: u32) -> Option<U512> {
    let ten = U512::from(10u8);
    (0..exp).try_fold(U512::one(), |acc, _| acc.checked_mul(ten))
}

/// Sum of `value / 10^decimals` terms, held exactly as
/// `scaled / 10^decimals`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalizedTotal {
    scaled: U512,
    decimals: u32,
}

impl NormalizedTotal {
    /// The empty sum.
    pub fn zero() -> Self {
        Self {
            scaled: U512::zero(),
            decimals: 0,
        }
    }

    /// Sum `(raw value, cumulative decimals)` terms without losing precision.
    pub fn from_terms<'a, I>(terms: I) -> Result<Self, TypesError>
    where
        I: IntoIterator<Item = (&'a Power, u32)>,
    {
        let terms: Vec<(&Power, u32)> = terms.into_iter().collect();
        let decimals = terms.iter().map(|(_, d)| *d).max().unwrap_or(0);

        let mut scaled = U512::zero();
        for (value, term_decimals) in terms {
            let factor = pow10(decimals - term_decimals).ok_or(TypesError::Overflow("scale"))?;
            let term = U512::from(value.raw())
                .checked_mul(factor)
                .ok_or(TypesError::Overflow("term"))?;
            scaled = scaled
                .checked_add(term)
                .ok_or(TypesError::Overflow("sum"))?;
        }

        Ok(Self { scaled, decimals })
    }

    /// Whether the normalized total is at least `threshold` whole units.
    pub fn meets(&self, threshold: &Power) -> Result<bool, TypesError> {
        let unit = pow10(self.decimals).ok_or(TypesError::Overflow("threshold scale"))?;
        let scaled_threshold = U512::from(threshold.raw())
            .checked_mul(unit)
            .ok_or(TypesError::Overflow("threshold"))?;
        Ok(self.scaled >= scaled_threshold)
    }

    /// Whole-unit part of the total, for display and logs.
    pub fn integer_part(&self) -> U512 {
        match pow10(self.decimals) {
            Some(unit) => self.scaled / unit,
            None => U512::zero(),
        }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }
}

impl fmt::Display for NormalizedTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(unit) = pow10(self.decimals) else {
            return write!(f, "{}e-{}", self.scaled, self.decimals);
        };
        let whole = self.scaled / unit;
        let frac = self.scaled % unit;
        if frac.is_zero() {
            write!(f, "{whole}")
        } else {
            let digits = format!("{frac}");
            let padded = format!("{}{}", "0".repeat(self.decimals as usize - digits.len()), digits);
            write!(f, "{whole}.{}", padded.trim_end_matches('0'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(v: u64) -> Power {
        Power::from(v)
    }

    #[test]
    fn normalizes_single_term() {
        let value = p(500_000);
        let total = NormalizedTotal::from_terms([(&value, 2)]).unwrap();
        assert_eq!(total.integer_part(), U512::from(5000u64));
        assert!(total.meets(&p(1000)).unwrap());
        assert!(total.meets(&p(5000)).unwrap());
        assert!(!total.meets(&p(5001)).unwrap());
    }

    #[test]
    fn mixes_decimal_counts_exactly() {
        // 1.5 + 0.25 + 3 = 4.75
        let a = p(15);
        let b = p(25);
        let c = p(3);
        let total = NormalizedTotal::from_terms([(&a, 1), (&b, 2), (&c, 0)]).unwrap();
        assert_eq!(total.to_string(), "4.75");
        assert_eq!(total.decimals(), 2);
        assert!(total.meets(&p(4)).unwrap());
        assert!(!total.meets(&p(5)).unwrap());
    }

    #[test]
    fn fractional_dust_does_not_round_up() {
        // 999.999999999999999999 with 18 decimals is below 1000.
        let value: Power = "999999999999999999999".parse().unwrap();
        let total = NormalizedTotal::from_terms([(&value, 18)]).unwrap();
        assert!(!total.meets(&p(1000)).unwrap());
        assert!(total.meets(&p(999)).unwrap());
    }

    #[test]
    fn large_balances_keep_precision() {
        // 2^200 whole units, compared one unit apart.
        let raw = U256::from(2u8).pow(U256::from(200u32));
        let value = Power::new(raw);
        let total = NormalizedTotal::from_terms([(&value, 0)]).unwrap();
        assert!(total.meets(&Power::new(raw)).unwrap());
        assert!(!total.meets(&Power::new(raw + U256::one())).unwrap());
    }

    #[test]
    fn empty_sum_only_meets_zero() {
        let total = NormalizedTotal::from_terms(std::iter::empty()).unwrap();
        assert_eq!(total, NormalizedTotal::zero());
        assert!(total.meets(&Power::ZERO).unwrap());
        assert!(!total.meets(&p(1)).unwrap());
    }

    #[test]
    fn absurd_decimals_overflow_instead_of_truncating() {
        let value = p(1);
        let zero = Power::ZERO;
        let err = NormalizedTotal::from_terms([(&value, 0), (&zero, 400)]).unwrap_err();
        assert!(matches!(err, TypesError::Overflow(_)));
    }

    #[test]
    fn power_parses_and_serializes_as_decimal_string() {
        let v: Power = serde_json::from_str("\"115792089237316195423570985008687907853269984665640564039457584007913129639935\"").unwrap();
        assert_eq!(v.raw(), U256::MAX);
        assert_eq!(
            serde_json::to_string(&p(42)).unwrap(),
            "\"42\""
        );
        let n: Power = serde_json::from_str("7").unwrap();
        assert_eq!(n, p(7));
        assert!("".parse::<Power>().is_err());
        assert!("1.5".parse::<Power>().is_err());
    }
}
