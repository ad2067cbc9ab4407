//! Statistics payload, normalized from the upstream wire shape.
//!
//! The statistics API nests its time series under
//! `clickStatistics.datasets[0].data` and names the totals differently for
//! domains (`clicks`) and links (`totalClicks`). Everything is flattened here
//! so the presenter and views work off one shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point of the click time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickPoint {
    pub date: NaiveDate,
    pub count: u64,
}

/// One row of a categorical breakdown (referrer, browser, country, OS).
///
/// `label` is `None` when the upstream omits it — for referrers that means
/// a direct visit, which the presenter labels accordingly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: Option<String>,
    pub count: u64,
}

impl BreakdownEntry {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: Some(label.into()),
            count,
        }
    }
}

/// Normalized statistics for a domain or a single link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawStats")]
pub struct StatsPayload {
    pub total_clicks: u64,
    pub human_clicks: u64,
    /// Total link count; only present on domain-level stats.
    pub total_links: Option<u64>,
    /// Click counts per day, ascending by date.
    pub click_series: Vec<ClickPoint>,
    pub referrers: Vec<BreakdownEntry>,
    pub browsers: Vec<BreakdownEntry>,
    pub countries: Vec<BreakdownEntry>,
    pub oses: Vec<BreakdownEntry>,
}

// ─── Upstream wire shape ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawStats {
    #[serde(default, alias = "totalClicks")]
    clicks: Option<u64>,
    #[serde(default, rename = "humanClicks")]
    human_clicks: Option<u64>,
    #[serde(default)]
    links: Option<u64>,
    #[serde(default, rename = "clickStatistics")]
    click_statistics: Option<RawClickStatistics>,
    #[serde(default)]
    referer: Vec<RawReferrer>,
    #[serde(default)]
    browser: Vec<RawBrowser>,
    #[serde(default)]
    country: Vec<RawCountry>,
    #[serde(default)]
    os: Vec<RawOs>,
}

#[derive(Deserialize)]
struct RawClickStatistics {
    #[serde(default)]
    datasets: Vec<RawDataset>,
}

#[derive(Deserialize)]
struct RawDataset {
    #[serde(default)]
    data: Vec<RawPoint>,
}

#[derive(Deserialize)]
struct RawPoint {
    x: String,
    y: u64,
}

#[derive(Deserialize)]
struct RawReferrer {
    #[serde(default)]
    referer: Option<String>,
    score: u64,
}

#[derive(Deserialize)]
struct RawBrowser {
    #[serde(default)]
    browser: Option<String>,
    score: u64,
}

#[derive(Deserialize)]
struct RawCountry {
    #[serde(default)]
    country: Option<String>,
    #[serde(default, rename = "countryName")]
    country_name: Option<String>,
    score: u64,
}

#[derive(Deserialize)]
struct RawOs {
    #[serde(default)]
    os: Option<String>,
    score: u64,
}

/// Parses the `x` value of a series point, which arrives either as a bare
/// date or a full RFC3339 timestamp.
fn parse_point_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return Some(date);
    }
    raw.get(..10).and_then(|d| d.parse().ok())
}

impl From<RawStats> for StatsPayload {
    fn from(raw: RawStats) -> Self {
        let mut click_series: Vec<ClickPoint> = raw
            .click_statistics
            .into_iter()
            .flat_map(|cs| cs.datasets)
            .take(1)
            .flat_map(|ds| ds.data)
            .filter_map(|p| {
                parse_point_date(&p.x).map(|date| ClickPoint { date, count: p.y })
            })
            .collect();
        click_series.sort_by_key(|p| p.date);

        Self {
            total_clicks: raw.clicks.unwrap_or(0),
            human_clicks: raw.human_clicks.unwrap_or(0),
            total_links: raw.links,
            click_series,
            referrers: raw
                .referer
                .into_iter()
                .map(|r| BreakdownEntry {
                    label: r.referer,
                    count: r.score,
                })
                .collect(),
            browsers: raw
                .browser
                .into_iter()
                .map(|b| BreakdownEntry {
                    label: b.browser,
                    count: b.score,
                })
                .collect(),
            countries: raw
                .country
                .into_iter()
                .map(|c| BreakdownEntry {
                    // Prefer the human-readable name over the ISO code.
                    label: c.country_name.or(c.country),
                    count: c.score,
                })
                .collect(),
            oses: raw
                .os
                .into_iter()
                .map(|o| BreakdownEntry {
                    label: o.os,
                    count: o.score,
                })
                .collect(),
        }
    }
}
