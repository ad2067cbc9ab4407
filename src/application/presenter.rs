//! Chart-series presentation: pure mapping from a stats payload to
//! renderable series.
//!
//! No rendering happens here; the presentation layer (terminal, HTML,
//! anything) consumes [`ChartUpdate`]s and draws or clears each slot.

use crate::domain::entities::StatsPayload;
use chrono::NaiveDate;

/// Label substituted when a referrer entry carries no label.
const DIRECT_LABEL: &str = "Direct";

/// The five chart slots of a stats view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSlot {
    Clicks,
    Referrers,
    Browsers,
    Countries,
    OperatingSystems,
}

impl ChartSlot {
    pub fn title(&self) -> &'static str {
        match self {
            ChartSlot::Clicks => "Clicks",
            ChartSlot::Referrers => "Referrers",
            ChartSlot::Browsers => "Browsers",
            ChartSlot::Countries => "Countries",
            ChartSlot::OperatingSystems => "Operating Systems",
        }
    }
}

/// A chart ready to render, or an instruction to remove whatever was
/// previously rendered in the slot.
///
/// An empty input collection must clear its slot rather than render an
/// empty frame, so `Clear` is explicit.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartUpdate {
    Line {
        slot: ChartSlot,
        series: Vec<(NaiveDate, u64)>,
    },
    Bar {
        slot: ChartSlot,
        series: Vec<(String, u64)>,
    },
    Clear(ChartSlot),
}

impl ChartUpdate {
    pub fn slot(&self) -> ChartSlot {
        match self {
            ChartUpdate::Line { slot, .. }
            | ChartUpdate::Bar { slot, .. }
            | ChartUpdate::Clear(slot) => *slot,
        }
    }
}

/// Maps a stats payload to one update per chart slot.
///
/// The time series passes through unchanged (already ascending by date);
/// categorical breakdowns keep upstream order, with missing referrer labels
/// replaced by [`DIRECT_LABEL`].
pub fn chart_updates(stats: &StatsPayload) -> Vec<ChartUpdate> {
    let mut updates = Vec::with_capacity(5);

    if stats.click_series.is_empty() {
        updates.push(ChartUpdate::Clear(ChartSlot::Clicks));
    } else {
        updates.push(ChartUpdate::Line {
            slot: ChartSlot::Clicks,
            series: stats
                .click_series
                .iter()
                .map(|p| (p.date, p.count))
                .collect(),
        });
    }

    updates.push(bar_update(
        ChartSlot::Referrers,
        stats.referrers.iter().map(|e| {
            (
                e.label.clone().unwrap_or_else(|| DIRECT_LABEL.to_string()),
                e.count,
            )
        }),
    ));
    updates.push(bar_update(
        ChartSlot::Browsers,
        stats
            .browsers
            .iter()
            .map(|e| (e.label.clone().unwrap_or_default(), e.count)),
    ));
    updates.push(bar_update(
        ChartSlot::Countries,
        stats
            .countries
            .iter()
            .map(|e| (e.label.clone().unwrap_or_default(), e.count)),
    ));
    updates.push(bar_update(
        ChartSlot::OperatingSystems,
        stats
            .oses
            .iter()
            .map(|e| (e.label.clone().unwrap_or_default(), e.count)),
    ));

    updates
}

fn bar_update(slot: ChartSlot, series: impl Iterator<Item = (String, u64)>) -> ChartUpdate {
    let series: Vec<(String, u64)> = series.collect();
    if series.is_empty() {
        ChartUpdate::Clear(slot)
    } else {
        ChartUpdate::Bar { slot, series }
    }
}
