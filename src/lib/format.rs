//! Cell text for quantities, percentage deltas and aggregates.

use std::env;

use anstyle::{Color, RgbColor, Style};
use is_terminal::IsTerminal;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::lib::quantity::{Quantity, round_away_from_zero, to_plain_string};

/// Placeholder for unset cells
pub const TABLE_UNSET_CELL: &str = "-";

const IEC_SIZES: [&str; 9] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];
const SI_SIZES: [&str; 11] = ["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB", "RB", "QB"];

/// Whether ANSI styling is written into cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMode {
    enabled: bool,
}

impl ColorMode {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Colors are used only on a terminal, unless turned off by flag or environment.
    pub fn detect(no_colors: bool) -> Self {
        if no_colors || env_no_color() {
            return Self::disabled();
        }
        let forced = env::var("CLICOLOR_FORCE").is_ok_and(|v| !v.is_empty() && v != "0");
        Self::new(forced || std::io::stdout().is_terminal())
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn paint(&self, text: &str, style: Style) -> String {
        if !self.enabled {
            return text.to_string();
        }
        format!("{}{}{}", style.render(), text, style.render_reset())
    }
}

fn env_no_color() -> bool {
    let no_color = env::var("NO_COLOR").is_ok_and(|v| !v.is_empty());
    let clicolor_off = env::var("CLICOLOR").is_ok_and(|v| v == "0")
        && env::var("CLICOLOR_FORCE").is_err();
    no_color || clicolor_off
}

/// Magnitude band of a percentage delta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaTint {
    Good,
    Warning,
    Alert,
}

impl DeltaTint {
    pub fn classify(delta: f64) -> Self {
        if (-10.0..=20.0).contains(&delta) {
            DeltaTint::Good
        } else if (delta > 20.0 && delta < 50.0) || (delta < -10.0 && delta > -50.0) {
            DeltaTint::Warning
        } else {
            DeltaTint::Alert
        }
    }

    pub fn style(&self) -> Style {
        let rgb = match self {
            DeltaTint::Good => RgbColor(0xA8, 0xCC, 0x8C),
            DeltaTint::Warning => RgbColor(0xDB, 0xAB, 0x79),
            DeltaTint::Alert => RgbColor(0xE8, 0x83, 0x88),
        };
        Style::new().fg_color(Some(Color::Rgb(rgb))).bold()
    }
}

/// Unset or zero quantities render as a dash.
pub fn format_quantity(quantity: Option<&Quantity>) -> String {
    match quantity {
        Some(q) if !q.is_zero() => q.canonical(),
        _ => TABLE_UNSET_CELL.to_string(),
    }
}

/// Signed two-decimal percentage, tinted by magnitude when colors are on.
pub fn format_percentage(delta: Option<f64>, colors: ColorMode) -> String {
    let Some(delta) = delta else {
        return TABLE_UNSET_CELL.to_string();
    };
    let text = format!("{delta:+.2}");
    colors.paint(&text, DeltaTint::classify(delta).style())
}

/// Lower-cased group-kind prefix in front of a name, dimmed when colors are on.
pub fn format_kind_prefixed(group_kind: &str, name: &str, colors: ColorMode) -> String {
    let prefix = colors.paint(&group_kind.to_lowercase(), Style::new().dimmed());
    format!("{prefix}/{name}")
}

/// Aggregate CPU value as a plain decimal at its native scale.
pub fn format_cores(quantity: &Quantity) -> String {
    to_plain_string(quantity.as_decimal())
}

/// Aggregate memory value as `IEC/SI` bytes, e.g. `1.2GiB/1.3GB`.
pub fn format_bytes(quantity: &Quantity) -> String {
    let rounded = round_away_from_zero(quantity.as_decimal(), 0);
    let (bytes, _) = rounded.with_scale(0).as_bigint_and_exponent();
    let text = format!(
        "{}/{}",
        humanize_bytes(&bytes, 1024, &IEC_SIZES),
        humanize_bytes(&bytes, 1000, &SI_SIZES)
    );
    text.replace(' ', "")
}

/// Human readable byte count in powers of `base`.
///
/// The displayed value is the integral quotient plus the last remainder as
/// a fraction of `base`, with one decimal below 10.
pub fn humanize_bytes(bytes: &BigInt, base: u32, sizes: &[&str]) -> String {
    if *bytes < BigInt::from(10u32) {
        return format!("{bytes} B");
    }

    let base_int = BigInt::from(base);
    let max_magnitude = sizes.len() - 1;
    let mut value = bytes.clone();
    let mut remainder = BigInt::zero();
    let mut magnitude = 0;
    while value >= base_int {
        remainder = &value % &base_int;
        value = &value / &base_int;
        magnitude += 1;
        if magnitude == max_magnitude {
            break;
        }
    }

    let shown = value.to_f64().unwrap_or(f64::INFINITY)
        + remainder.to_f64().unwrap_or(0.0) / f64::from(base);
    if shown < 10.0 {
        format!("{shown:.1} {}", sizes[magnitude])
    } else {
        format!("{shown:.0} {}", sizes[magnitude])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> Quantity {
        s.parse().unwrap()
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(None), "-");
        assert_eq!(format_quantity(Some(&q("0"))), "-");
        assert_eq!(format_quantity(Some(&q("0m"))), "-");
        assert_eq!(format_quantity(Some(&q("250m"))), "250m");
        assert_eq!(format_quantity(Some(&q("1.5Gi"))), "1536Mi");
    }

    #[test]
    fn test_format_percentage_plain() {
        let colors = ColorMode::disabled();
        assert_eq!(format_percentage(None, colors), "-");
        assert_eq!(format_percentage(Some(12.5), colors), "+12.50");
        assert_eq!(format_percentage(Some(-60.0), colors), "-60.00");
        assert_eq!(format_percentage(Some(0.0), colors), "+0.00");
    }

    #[test]
    fn test_format_percentage_colored() {
        let colors = ColorMode::new(true);
        let text = format_percentage(Some(5.0), colors);
        assert!(text.contains("+5.00"));
        assert!(text.contains("38;2;168;204;140"));
        assert!(text.starts_with('\u{1b}'));
        // unset cells stay plain
        assert_eq!(format_percentage(None, colors), "-");
    }

    #[test]
    fn test_delta_bands() {
        assert_eq!(DeltaTint::classify(-10.0), DeltaTint::Good);
        assert_eq!(DeltaTint::classify(20.0), DeltaTint::Good);
        assert_eq!(DeltaTint::classify(0.0), DeltaTint::Good);
        assert_eq!(DeltaTint::classify(20.01), DeltaTint::Warning);
        assert_eq!(DeltaTint::classify(49.99), DeltaTint::Warning);
        assert_eq!(DeltaTint::classify(-10.01), DeltaTint::Warning);
        assert_eq!(DeltaTint::classify(-49.99), DeltaTint::Warning);
        assert_eq!(DeltaTint::classify(50.0), DeltaTint::Alert);
        assert_eq!(DeltaTint::classify(-50.0), DeltaTint::Alert);
        assert_eq!(DeltaTint::classify(250.0), DeltaTint::Alert);
        assert_eq!(DeltaTint::classify(f64::NAN), DeltaTint::Alert);
    }

    #[test]
    fn test_kind_prefix() {
        assert_eq!(
            format_kind_prefixed("Deployment.apps", "web", ColorMode::disabled()),
            "deployment.apps/web"
        );
        let dimmed = format_kind_prefixed("Deployment.apps", "web", ColorMode::new(true));
        assert!(dimmed.contains("deployment.apps"));
        assert!(dimmed.ends_with("/web"));
        assert_ne!(dimmed, "deployment.apps/web");
    }

    #[test]
    fn test_humanize_bytes() {
        let bytes = |n: u64| BigInt::from(n);
        assert_eq!(humanize_bytes(&bytes(0), 1024, &IEC_SIZES), "0 B");
        assert_eq!(humanize_bytes(&bytes(9), 1000, &SI_SIZES), "9 B");
        assert_eq!(humanize_bytes(&bytes(10), 1000, &SI_SIZES), "10 B");
        assert_eq!(humanize_bytes(&bytes(1536), 1024, &IEC_SIZES), "1.5 KiB");
        assert_eq!(humanize_bytes(&bytes(82854982), 1000, &SI_SIZES), "83 MB");
        assert_eq!(humanize_bytes(&bytes(134217728), 1024, &IEC_SIZES), "128 MiB");
    }

    #[test]
    fn test_format_bytes_dual_units() {
        assert_eq!(format_bytes(&q("1288490189")), "1.2GiB/1.3GB");
        assert_eq!(format_bytes(&q("128Mi")), "128MiB/134MB");
        assert_eq!(format_bytes(&Quantity::zero()), "0B/0B");
        // fractional bytes round up
        assert_eq!(format_bytes(&q("9.1")), "10B/10B");
    }

    #[test]
    fn test_format_cores() {
        assert_eq!(format_cores(&q("1.100")), "1.100");
        assert_eq!(format_cores(&q("250m")), "0.250");
        assert_eq!(format_cores(&q("3")), "3");
    }
}
