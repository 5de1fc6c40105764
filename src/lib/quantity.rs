//! Kubernetes-style resource quantities backed by exact decimals.
//!
//! A quantity is a signed decimal number followed by an optional suffix:
//! a binary SI suffix (`Ki`, `Mi`, ... `Ei`), a decimal SI suffix (`n`, `u`,
//! `m`, `k`, `M`, ... `E`) or a decimal exponent (`e3`, `E-2`). Values are
//! held as [`BigDecimal`] so sums and comparisons never go through `f64`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::lib::error::QuantityError;

/// Finest precision a parsed quantity keeps (nano units).
const NANO_SCALE: i64 = 9;

/// Largest decimal exponent accepted in `e<n>` suffixes.
const MAX_EXPONENT: i64 = 308;

const BINARY_SUFFIXES: [&str; 7] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];

/// Suffix family a quantity was written with; drives the canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityFormat {
    DecimalSI,
    BinarySI,
    DecimalExponent,
}

enum Multiplier {
    Binary(u32),
    Decimal(i64),
}

/// An exact resource amount such as `250m` CPU or `512Mi` memory.
///
/// Equality and ordering are numeric: `1000m` equals `1`.
#[derive(Debug, Clone)]
pub struct Quantity {
    value: BigDecimal,
    format: QuantityFormat,
}

impl Quantity {
    pub fn new(value: BigDecimal, format: QuantityFormat) -> Self {
        Self { value, format }
    }

    /// Wraps an aggregate result; aggregates always use decimal SI.
    pub fn from_decimal(value: BigDecimal) -> Self {
        Self::new(value, QuantityFormat::DecimalSI)
    }

    pub fn zero() -> Self {
        Self::from_decimal(BigDecimal::zero())
    }

    pub fn as_decimal(&self) -> &BigDecimal {
        &self.value
    }

    pub fn format(&self) -> QuantityFormat {
        self.format
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Adds `other` in place without any rounding.
    pub fn add(&mut self, other: &Quantity) {
        self.value = &self.value + &other.value;
    }

    /// Canonical string form: no precision lost, largest suffix possible.
    pub fn canonical(&self) -> String {
        if self.value.is_zero() {
            return "0".to_string();
        }
        let rounded = round_away_from_zero(&self.value, NANO_SCALE);
        let (unscaled, scale) = rounded.as_bigint_and_exponent();

        if self.format == QuantityFormat::BinarySI {
            if let Some(text) = binary_canonical(&unscaled, scale) {
                return text;
            }
        }
        decimal_canonical(unscaled, scale, self.format)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(QuantityError::Empty);
        }

        let (negative, rest) = match text.as_bytes()[0] {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, suffix) = rest.split_at(number_len);
        let (integer, fraction) = number.split_once('.').unwrap_or((number, ""));
        if (integer.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(QuantityError::InvalidNumber(text.to_string()));
        }

        let digits = format!("{integer}{fraction}");
        let mut unscaled = BigInt::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| QuantityError::InvalidNumber(text.to_string()))?;
        let mut scale = fraction.len() as i64;

        let (format, multiplier) =
            parse_suffix(suffix).ok_or_else(|| QuantityError::InvalidSuffix(text.to_string()))?;
        match multiplier {
            Multiplier::Binary(power) => unscaled *= BigInt::from(1024u32).pow(power),
            Multiplier::Decimal(exponent) => scale -= exponent,
        }
        if negative {
            unscaled = -unscaled;
        }

        let value = round_away_from_zero(&BigDecimal::new(unscaled, scale), NANO_SCALE);
        Ok(Self { value, format })
    }
}

fn parse_suffix(suffix: &str) -> Option<(QuantityFormat, Multiplier)> {
    if let Some(power) = BINARY_SUFFIXES
        .iter()
        .skip(1)
        .position(|candidate| *candidate == suffix)
    {
        return Some((QuantityFormat::BinarySI, Multiplier::Binary(power as u32 + 1)));
    }

    let exponent = match suffix {
        "n" => -9,
        "u" => -6,
        "m" => -3,
        "" => 0,
        "k" => 3,
        "M" => 6,
        "G" => 9,
        "T" => 12,
        "P" => 15,
        "E" => 18,
        _ => {
            let digits = suffix.strip_prefix(['e', 'E'])?;
            let exponent: i64 = digits.parse().ok()?;
            if exponent.abs() > MAX_EXPONENT {
                return None;
            }
            return Some((QuantityFormat::DecimalExponent, Multiplier::Decimal(exponent)));
        }
    };
    Some((QuantityFormat::DecimalSI, Multiplier::Decimal(exponent)))
}

fn binary_canonical(unscaled: &BigInt, scale: i64) -> Option<String> {
    let mut mantissa = integral_value(unscaled, scale)?;
    let base = BigInt::from(1024u32);
    if mantissa.abs() < base {
        return None;
    }

    let mut power = 0;
    while power + 1 < BINARY_SUFFIXES.len() && (&mantissa % &base).is_zero() {
        mantissa /= &base;
        power += 1;
    }
    Some(format!("{mantissa}{}", BINARY_SUFFIXES[power]))
}

fn decimal_canonical(mut unscaled: BigInt, mut scale: i64, format: QuantityFormat) -> String {
    let ten = BigInt::from(10u32);
    while !unscaled.is_zero() && (&unscaled % &ten).is_zero() {
        unscaled /= &ten;
        scale -= 1;
    }

    let exponent = -scale;
    let mut exponent3 = exponent.div_euclid(3) * 3;
    let mut mantissa = unscaled * pow10((exponent - exponent3) as u32);

    if format == QuantityFormat::DecimalExponent {
        return if exponent3 == 0 {
            mantissa.to_string()
        } else {
            format!("{mantissa}e{exponent3}")
        };
    }

    if exponent3 > 18 {
        mantissa *= pow10((exponent3 - 18) as u32);
        exponent3 = 18;
    }
    let suffix = match exponent3 {
        -9 => "n",
        -6 => "u",
        -3 => "m",
        3 => "k",
        6 => "M",
        9 => "G",
        12 => "T",
        15 => "P",
        18 => "E",
        _ => "",
    };
    format!("{mantissa}{suffix}")
}

fn integral_value(unscaled: &BigInt, scale: i64) -> Option<BigInt> {
    if scale <= 0 {
        return Some(unscaled * pow10((-scale) as u32));
    }
    let divisor = pow10(scale as u32);
    if (unscaled % &divisor).is_zero() {
        Some(unscaled / divisor)
    } else {
        None
    }
}

pub(crate) fn pow10(exponent: u32) -> BigInt {
    BigInt::from(10u32).pow(exponent)
}

/// Rounds `value` to `scale` fractional digits, away from zero.
pub(crate) fn round_away_from_zero(value: &BigDecimal, scale: i64) -> BigDecimal {
    let (unscaled, current) = value.as_bigint_and_exponent();
    if current <= scale {
        return value.clone();
    }
    let divisor = pow10((current - scale) as u32);
    let mut quotient = &unscaled / &divisor;
    if !(&unscaled % &divisor).is_zero() {
        quotient += unscaled.signum();
    }
    BigDecimal::new(quotient, scale)
}

/// Divides `value` by `divisor`, truncating toward zero at `scale`.
///
/// `divisor` must be non-zero; callers check before dividing.
pub(crate) fn quo_round_down(value: &BigDecimal, divisor: &BigInt, scale: i64) -> BigDecimal {
    let (unscaled, current) = value.as_bigint_and_exponent();
    let (numerator, denominator) = if scale >= current {
        (unscaled * pow10((scale - current) as u32), divisor.clone())
    } else {
        (unscaled, divisor * pow10((current - scale) as u32))
    };
    BigDecimal::new(numerator / denominator, scale)
}

/// Plain positional decimal text (`1.100`, `2000`), never scientific.
pub(crate) fn to_plain_string(value: &BigDecimal) -> String {
    let (unscaled, scale) = value.as_bigint_and_exponent();
    if unscaled.is_zero() && scale <= 0 {
        return "0".to_string();
    }

    let sign = if unscaled.is_negative() { "-" } else { "" };
    let digits = unscaled.abs().to_string();
    if scale <= 0 {
        return format!("{sign}{digits}{}", "0".repeat((-scale) as usize));
    }

    let scale = scale as usize;
    let padded = if digits.len() <= scale {
        format!("{}{digits}", "0".repeat(scale + 1 - digits.len()))
    } else {
        digits
    };
    let (integer, fraction) = padded.split_at(padded.len() - scale);
    format!("{sign}{integer}.{fraction}")
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
