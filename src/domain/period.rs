//! Reporting period: named presets or an explicit calendar date range.

use crate::error::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The reporting window applied to statistics calls.
///
/// Either a fixed named preset or a custom range of calendar dates (no
/// time-of-day, interpreted at UTC). The active period participates in
/// cache-key derivation for stats actions, so two presets never collide on
/// a cached payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Preset(Preset),
    Custom { start: NaiveDate, end: NaiveDate },
}

/// Fixed named periods understood by the statistics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Today,
    Yesterday,
    Last7,
    Last30,
    LastMonth,
    Total,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Today => "today",
            Preset::Yesterday => "yesterday",
            Preset::Last7 => "last7",
            Preset::Last30 => "last30",
            Preset::LastMonth => "lastmonth",
            Preset::Total => "total",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "today" => Preset::Today,
            "yesterday" => Preset::Yesterday,
            "last7" => Preset::Last7,
            "last30" => Preset::Last30,
            "lastmonth" => Preset::LastMonth,
            "total" => Preset::Total,
            _ => return None,
        })
    }

    pub const ALL: [Preset; 6] = [
        Preset::Today,
        Preset::Yesterday,
        Preset::Last7,
        Preset::Last30,
        Preset::LastMonth,
        Preset::Total,
    ];
}

impl Default for Period {
    fn default() -> Self {
        Period::Preset(Preset::Last30)
    }
}

impl Period {
    /// Builds a custom period, validating that both dates are present and
    /// ordered. A reversed range is a validation error, never silently
    /// corrected.
    pub fn custom(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, AppError> {
        let (Some(start), Some(end)) = (start, end) else {
            return Err(AppError::validation(
                "Both start and end dates are required for a custom period.",
            ));
        };
        if start > end {
            return Err(AppError::validation(
                "Custom period start date must not be after the end date.",
            ));
        }
        Ok(Period::Custom { start, end })
    }

    /// Wire value of the `period` query parameter.
    pub fn period_param(&self) -> &'static str {
        match self {
            Period::Preset(preset) => preset.as_str(),
            Period::Custom { .. } => "custom",
        }
    }

    /// Query parameters this period contributes to a stats request, in the
    /// order they appear on the wire. Custom ranges add their dates; presets
    /// contribute the period name alone.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Period::Preset(preset) => vec![("period", preset.as_str().to_string())],
            Period::Custom { start, end } => vec![
                ("period", "custom".to_string()),
                ("startDate", start.to_string()),
                ("endDate", end.to_string()),
            ],
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Preset(preset) => f.write_str(preset.as_str()),
            Period::Custom { start, end } => write!(f, "{start} → {end}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_is_last30() {
        assert_eq!(Period::default(), Period::Preset(Preset::Last30));
    }

    #[test]
    fn test_custom_requires_both_dates() {
        assert!(Period::custom(Some(date("2026-01-01")), None).is_err());
        assert!(Period::custom(None, Some(date("2026-01-31"))).is_err());
        assert!(Period::custom(None, None).is_err());
    }

    #[test]
    fn test_custom_rejects_reversed_range() {
        let err = Period::custom(Some(date("2026-02-01")), Some(date("2026-01-01"))).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_custom_single_day_is_valid() {
        let period = Period::custom(Some(date("2026-01-15")), Some(date("2026-01-15"))).unwrap();
        assert_eq!(period.period_param(), "custom");
    }

    #[test]
    fn test_preset_query_params() {
        let params = Period::Preset(Preset::Last7).query_params();
        assert_eq!(params, vec![("period", "last7".to_string())]);
    }

    #[test]
    fn test_custom_query_params_include_dates() {
        let period = Period::custom(Some(date("2026-01-01")), Some(date("2026-01-31"))).unwrap();
        let params = period.query_params();
        assert_eq!(
            params,
            vec![
                ("period", "custom".to_string()),
                ("startDate", "2026-01-01".to_string()),
                ("endDate", "2026-01-31".to_string()),
            ]
        );
    }

    #[test]
    fn test_preset_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(Preset::parse(preset.as_str()), Some(preset));
        }
        assert_eq!(Preset::parse("fortnight"), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let period = Period::custom(Some(date("2026-03-01")), Some(date("2026-03-05"))).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        let back: Period = serde_json::from_str(&json).unwrap();
        assert_eq!(period, back);
    }
}
