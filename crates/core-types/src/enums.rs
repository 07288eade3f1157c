use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Display names for the `EXTRACT(DOW ...)` day numbers, 0 = Sunday.
///
/// Weekday aggregates index into this table; weekdays without sales are
/// simply absent from the result, so consumers look names up per row rather
/// than assuming all seven are present.
pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// The bucket size used when grouping revenue over a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// The unit string accepted by PostgreSQL's `date_trunc`.
    pub fn as_trunc_unit(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }
}

impl FromStr for Granularity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            other => Err(CoreError::Validation(format!(
                "unknown granularity '{}', expected day, week or month",
                other
            ))),
        }
    }
}

/// Which aggregate a product ranking is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankMetric {
    /// Total units sold.
    Quantity,
    /// Total revenue (sum of sale totals).
    Revenue,
}

/// Whether an anomalous day sits above or below the 2-sigma band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyKind {
    High,
    Low,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_parses_case_insensitively() {
        assert_eq!("Day".parse::<Granularity>().unwrap(), Granularity::Day);
        assert_eq!("WEEK".parse::<Granularity>().unwrap(), Granularity::Week);
        assert_eq!("month".parse::<Granularity>().unwrap(), Granularity::Month);
        assert!("fortnight".parse::<Granularity>().is_err());
    }

    #[test]
    fn trunc_units_match_postgres() {
        assert_eq!(Granularity::Day.as_trunc_unit(), "day");
        assert_eq!(Granularity::Week.as_trunc_unit(), "week");
        assert_eq!(Granularity::Month.as_trunc_unit(), "month");
    }
}
