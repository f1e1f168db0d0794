// ===============================
// src/series.rs (chart samples)
// ===============================
use chrono::{DateTime, FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activity::{usable, viewer_delta};
use crate::display::to_cents;
use crate::domain::{ExpenseRecord, MemberId, PaymentRecord, TimeSeriesPoint};
use crate::numeric::{lenient_decimal, parse_timestamp};

pub const DEFAULT_MAX_POINTS: usize = 24;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub value: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesOptions {
    pub max_points: usize,
    /// Offset the labels are rendered in; ordering always uses UTC instants.
    pub label_offset: FixedOffset,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self { max_points: DEFAULT_MAX_POINTS, label_offset: Utc.fix() }
    }
}

pub fn sample_time_series(events: &[SeriesEvent], max_points: usize) -> Vec<TimeSeriesPoint> {
    sample_time_series_with(events, &SeriesOptions { max_points, ..Default::default() })
}

/// Drops unparseable timestamps, sorts ascending (ties keep input order),
/// keeps the newest `max_points` and splits each value into stacked parts.
/// A missing value plots as 0.
pub fn sample_time_series_with(events: &[SeriesEvent], opts: &SeriesOptions) -> Vec<TimeSeriesPoint> {
    let mut timed: Vec<(DateTime<Utc>, &SeriesEvent)> = events
        .iter()
        .filter_map(|ev| match ev.timestamp.as_deref().and_then(parse_timestamp) {
            Some(t) => Some((t, ev)),
            None => {
                debug!(id = ?ev.id, "series: dropping event without usable timestamp");
                None
            }
        })
        .collect();
    // sort_by stabil -> timestamp kembar tetap urut input
    timed.sort_by(|a, b| a.0.cmp(&b.0));

    let skip = timed.len().saturating_sub(opts.max_points);
    timed
        .into_iter()
        .skip(skip)
        .enumerate()
        .map(|(i, (t, ev))| point(i, t, ev, opts.label_offset))
        .collect()
}

fn point(index: usize, time: DateTime<Utc>, ev: &SeriesEvent, offset: FixedOffset) -> TimeSeriesPoint {
    let value = to_cents(ev.value.unwrap_or_default());
    let local = time.with_timezone(&offset);
    TimeSeriesPoint {
        id: ev.id.clone().unwrap_or_else(|| index.to_string()),
        label: local.format("%Y-%m-%d %H:%M").to_string(),
        short_label: local.format("%Y-%m-%d").to_string(),
        value,
        positive_part: if value > Decimal::ZERO { value } else { Decimal::ZERO },
        negative_part: if value < Decimal::ZERO { value } else { Decimal::ZERO },
    }
}

/// Viewer's share per expense (positive paid, negative borrowed). Expenses
/// the feed would drop are left out; a missing share still plots as 0.
pub fn expense_series(expenses: &[ExpenseRecord]) -> Vec<SeriesEvent> {
    expenses
        .iter()
        .filter(|e| usable("expense", e.id, e.amount, e.create_time.as_deref()).is_some())
        .map(|e| SeriesEvent { id: Some(e.id.to_string()), timestamp: e.create_time.clone(), value: e.user_share })
        .collect()
}

/// Payments as seen by the viewer: outflow negative, inflow positive, others 0.
/// Same record filter as the feed, so a bad amount never flips sign here.
pub fn payment_series(payments: &[PaymentRecord], viewer_id: MemberId) -> Vec<SeriesEvent> {
    payments
        .iter()
        .filter_map(|p| {
            let (amount, _) = usable("payment", p.id, p.amount, p.payment_time.as_deref())?;
            Some(SeriesEvent {
                id: Some(format!("p-{}", p.id)),
                timestamp: p.payment_time.clone(),
                value: Some(viewer_delta(p.payer_id, p.payee_id, amount, viewer_id)),
            })
        })
        .collect()
}
