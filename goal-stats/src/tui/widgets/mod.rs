// TUI widget modules for each dashboard panel.

pub mod league_average;
pub mod match_projection;
pub mod quit_confirm;
pub mod status_bar;
pub mod team_picker;
pub mod team_stats;

use crate::stats::aggregate::round2;

/// Format a statistic for display: whole numbers without decimals, anything
/// else rounded to two, half away from zero.
pub fn format_value(value: f64) -> String {
    let value = round2(value);
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Format a percentage value with a trailing `%`.
pub fn format_pct(value: f64) -> String {
    format!("{}%", format_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_value_drops_zero_fraction() {
        assert_eq!(format_value(80.0), "80");
        assert_eq!(format_value(2.5), "2.50");
        assert_eq!(format_value(85.125), "85.13");
        assert_eq!(format_value(0.125), "0.13");
        assert_eq!(format_value(79.999), "80");
    }

    #[test]
    fn format_pct_appends_sign() {
        assert_eq!(format_pct(55.0), "55%");
        assert_eq!(format_pct(0.5), "0.50%");
    }
}
