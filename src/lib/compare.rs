//! Comparators over optional column values.
//!
//! Both comparators order an unset value after any set one. They differ on
//! NaN: `compare_scalar` places NaN *before* every real number, so NaN and
//! nil end up on opposite ends of an ascending sort.

use std::cmp::Ordering;

use crate::lib::quantity::Quantity;

/// Orders optional quantities numerically, unset last.
pub fn compare_quantity(a: Option<&Quantity>, b: Option<&Quantity>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

/// Orders optional floats, unset last and NaN first.
///
/// Two NaNs compare as `Greater` in both directions.
pub fn compare_scalar(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) if a == b => Ordering::Equal,
        (Some(a), Some(b)) if a < b || (a.is_nan() && !b.is_nan()) => Ordering::Less,
        _ => Ordering::Greater,
    }
}
